use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::ast::{Node, PrettyPrinter};
use crate::locator::FileLocator;
use crate::visitor::{inspect, FqcnResolver};
use crate::Result;

use super::{BaseGeneratorStrategy, GeneratorStrategy, OPEN_TAG};

/// Renders the tree and writes it to the file picked by the locator.
///
/// The file is written to a temporary sibling first and then renamed over
/// the target, so readers never see a partially written class. Writing the
/// same class again replaces the file.
pub struct FileWriterGeneratorStrategy<L: FileLocator> {
    base: BaseGeneratorStrategy,
    locator: L,
    resolver: FqcnResolver,
}

impl<L: FileLocator> FileWriterGeneratorStrategy<L> {
    pub fn new(locator: L) -> Self {
        Self {
            base: BaseGeneratorStrategy::new(),
            locator,
            resolver: FqcnResolver::new(),
        }
    }

    pub fn set_pretty_printer(&mut self, printer: Box<dyn PrettyPrinter>) {
        self.base.set_pretty_printer(printer);
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }
}

impl<L: FileLocator> GeneratorStrategy for FileWriterGeneratorStrategy<L> {
    fn generate(&mut self, tree: &[Node]) -> Result<String> {
        inspect(&mut self.resolver, tree)?;
        let class_name = self.resolver.fqcn()?.to_string();

        let code = self.base.generate(tree)?;
        let path = self.locator.generated_class_file_name(&class_name);
        write_atomically(&path, &format!("{OPEN_TAG}\n\n{code}"))?;
        tracing::debug!(
            "wrote class {} to {} ({} bytes)",
            class_name,
            path.display(),
            code.len()
        );
        Ok(code)
    }
}

fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
