use std::io::Write;

use crate::ast::{Node, PrettyPrinter};
use crate::Result;

use super::{BaseGeneratorStrategy, ClassRuntime, GeneratorStrategy, OPEN_TAG};

/// Renders the tree and defines the resulting class in a runtime.
///
/// When the runtime refuses direct evaluation the code goes through a
/// temporary file instead, which is removed once loaded.
pub struct EvaluatingGeneratorStrategy<R: ClassRuntime> {
    base: BaseGeneratorStrategy,
    runtime: R,
}

impl<R: ClassRuntime> EvaluatingGeneratorStrategy<R> {
    pub fn new(runtime: R) -> Self {
        Self {
            base: BaseGeneratorStrategy::new(),
            runtime,
        }
    }

    pub fn set_pretty_printer(&mut self, printer: Box<dyn PrettyPrinter>) {
        self.base.set_pretty_printer(printer);
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    fn evaluate_through_file(&self, code: &str) -> Result<()> {
        let mut file = tempfile::Builder::new()
            .prefix("EvaluatingGeneratorStrategy")
            .suffix(".php.tmp")
            .tempfile()?;
        write!(file, "{OPEN_TAG}\n{code}")?;
        file.flush()?;
        tracing::debug!("loading generated code through {}", file.path().display());
        self.runtime.require(file.path())?;
        file.close()?;
        Ok(())
    }
}

impl<R: ClassRuntime> GeneratorStrategy for EvaluatingGeneratorStrategy<R> {
    fn generate(&mut self, tree: &[Node]) -> Result<String> {
        let code = self.base.generate(tree)?;
        if self.runtime.can_evaluate() {
            self.runtime.evaluate(&code)?;
        } else {
            self.evaluate_through_file(&code)?;
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Class;
    use crate::inflector::UniqueIdentifierGenerator;
    use crate::strategy::InMemoryRuntime;

    #[test]
    fn test_generate() {
        let class_name = UniqueIdentifierGenerator::identifier("Foo");
        let mut strategy = EvaluatingGeneratorStrategy::new(InMemoryRuntime::new());
        let generated = strategy
            .generate(&[Node::Class(Class::new(class_name.clone()))])
            .unwrap();

        assert!(generated.contains(&class_name));
        assert!(strategy.runtime().is_defined(&class_name));
    }

    #[test]
    fn test_generate_with_disabled_eval() {
        let class_name = UniqueIdentifierGenerator::identifier("Foo");
        let mut strategy = EvaluatingGeneratorStrategy::new(InMemoryRuntime::without_eval());
        let generated = strategy
            .generate(&[Node::Class(Class::new(class_name.clone()))])
            .unwrap();

        assert!(generated.contains(&class_name));
        assert!(strategy.runtime().is_defined(&class_name));
    }

    #[test]
    fn test_last_generation_wins() {
        let runtime = InMemoryRuntime::new();
        let mut strategy = EvaluatingGeneratorStrategy::new(&runtime);
        strategy.generate(&[Node::Class(Class::new("Twice"))]).unwrap();

        let mut changed = Class::new("Twice");
        changed.is_final = true;
        let code = strategy.generate(&[Node::Class(changed)]).unwrap();
        assert!(code.starts_with("final class Twice"));
        assert_eq!(runtime.defined_classes(), vec!["Twice"]);
    }

    #[test]
    fn test_runtime_failure_is_reported() {
        let mut strategy = EvaluatingGeneratorStrategy::new(InMemoryRuntime::new());
        let err = strategy.generate(&[]).unwrap_err();
        assert!(matches!(err, crate::ClassgenError::Runtime(_)));
    }
}
