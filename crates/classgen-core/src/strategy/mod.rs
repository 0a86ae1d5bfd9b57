/*!
# Generator Strategies

Turn a finished syntax tree into source code, and optionally into a loaded
class.

- [`BaseGeneratorStrategy`] only renders the tree
- [`EvaluatingGeneratorStrategy`] renders and defines the class in a
  [`ClassRuntime`]
- [`FileWriterGeneratorStrategy`] renders and writes the class to the file
  its [`FileLocator`](crate::locator::FileLocator) picks
*/

pub mod evaluating;
pub mod file_writer;
pub mod runtime;

pub use evaluating::EvaluatingGeneratorStrategy;
pub use file_writer::FileWriterGeneratorStrategy;
pub use runtime::{declared_classes, ClassRuntime, InMemoryRuntime, OPEN_TAG};

use crate::ast::{Node, PrettyPrinter, StandardPrinter};
use crate::Result;

/// Generates code from a syntax tree
pub trait GeneratorStrategy {
    /// Render the tree, returning the generated code (without open tag)
    fn generate(&mut self, tree: &[Node]) -> Result<String>;
}

/// Renders trees with a pretty printer, [`StandardPrinter`] by default
pub struct BaseGeneratorStrategy {
    printer: Box<dyn PrettyPrinter>,
}

impl BaseGeneratorStrategy {
    pub fn new() -> Self {
        Self {
            printer: Box::new(StandardPrinter),
        }
    }

    pub fn set_pretty_printer(&mut self, printer: Box<dyn PrettyPrinter>) {
        self.printer = printer;
    }

    pub fn pretty_printer(&self) -> &dyn PrettyPrinter {
        self.printer.as_ref()
    }
}

impl Default for BaseGeneratorStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorStrategy for BaseGeneratorStrategy {
    fn generate(&mut self, tree: &[Node]) -> Result<String> {
        let code = self.printer.pretty_print(tree);
        tracing::trace!("rendered {} node(s) into {} bytes", tree.len(), code.len());
        Ok(code)
    }
}
