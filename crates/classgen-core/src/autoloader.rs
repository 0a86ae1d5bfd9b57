//! Loads generated classes on demand

use crate::inflector::Inflector;
use crate::locator::FileLocator;
use crate::strategy::ClassRuntime;
use crate::Result;

/// Autoload hook for generated classes.
///
/// Only names the inflector recognizes as generated are considered. A class
/// that is already defined, or whose file does not exist, is not loaded and
/// is not an error; only failures while reading the file are.
pub struct Autoloader<I, L, R> {
    inflector: I,
    locator: L,
    runtime: R,
}

impl<I, L, R> Autoloader<I, L, R>
where
    I: Inflector,
    L: FileLocator,
    R: ClassRuntime,
{
    pub fn new(inflector: I, locator: L, runtime: R) -> Self {
        Self {
            inflector,
            locator,
            runtime,
        }
    }

    /// Try to load the class, returning whether it was loaded
    pub fn load(&self, class_name: &str) -> Result<bool> {
        if self.runtime.is_defined(class_name) {
            tracing::trace!("autoload skipped {}: already defined", class_name);
            return Ok(false);
        }
        if !self.inflector.is_generated_class_name(class_name) {
            tracing::trace!("autoload skipped {}: not a generated class", class_name);
            return Ok(false);
        }

        let path = self.locator.generated_class_file_name(class_name);
        if !path.exists() {
            tracing::debug!("autoload of {} found no file at {}", class_name, path.display());
            return Ok(false);
        }

        let loaded = self.runtime.require(&path)?;
        tracing::debug!("autoloaded {} from {}", class_name, path.display());
        Ok(loaded)
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflector::{Options, UniqueIdentifierGenerator};
    use crate::strategy::InMemoryRuntime;
    use std::cell::Cell;
    use std::path::PathBuf;

    /// Answers every `is_generated_class_name` with a fixed value
    struct StubInflector {
        generated: bool,
        queried: Cell<usize>,
    }

    impl StubInflector {
        fn new(generated: bool) -> Self {
            Self {
                generated,
                queried: Cell::new(0),
            }
        }
    }

    impl Inflector for StubInflector {
        fn user_class_name(&self, class_name: &str) -> String {
            class_name.to_string()
        }

        fn generated_class_name(&self, class_name: &str, _options: &Options) -> String {
            class_name.to_string()
        }

        fn is_generated_class_name(&self, _class_name: &str) -> bool {
            self.queried.set(self.queried.get() + 1);
            self.generated
        }
    }

    struct StubLocator {
        path: PathBuf,
        located: Cell<usize>,
    }

    impl StubLocator {
        fn new(path: PathBuf) -> Self {
            Self {
                path,
                located: Cell::new(0),
            }
        }
    }

    impl FileLocator for StubLocator {
        fn generated_class_file_name(&self, _class_name: &str) -> PathBuf {
            self.located.set(self.located.get() + 1);
            self.path.clone()
        }
    }

    fn class_name() -> String {
        format!("Foo\\{}", UniqueIdentifierGenerator::identifier("Bar"))
    }

    #[test]
    fn test_will_not_autoload_user_classes() {
        let autoloader = Autoloader::new(
            StubInflector::new(false),
            StubLocator::new(PathBuf::from("unused")),
            InMemoryRuntime::new(),
        );
        assert!(!autoloader.load(&class_name()).unwrap());
        assert_eq!(autoloader.inflector.queried.get(), 1);
        assert_eq!(autoloader.locator.located.get(), 0);
    }

    #[test]
    fn test_will_not_autoload_non_existing_class() {
        let dir = tempfile::tempdir().unwrap();
        let autoloader = Autoloader::new(
            StubInflector::new(true),
            StubLocator::new(dir.path().join("non-existing")),
            InMemoryRuntime::new(),
        );
        assert!(!autoloader.load(&class_name()).unwrap());
        assert_eq!(autoloader.locator.located.get(), 1);
    }

    #[test]
    fn test_will_not_autoload_existing_class() {
        let runtime = InMemoryRuntime::new();
        runtime.evaluate("namespace Foo;\nclass Existing {}").unwrap();
        let autoloader = Autoloader::new(
            StubInflector::new(true),
            StubLocator::new(PathBuf::from("unused")),
            runtime,
        );
        assert!(!autoloader.load("Foo\\Existing").unwrap());
        assert_eq!(autoloader.inflector.queried.get(), 0);
    }

    #[test]
    fn test_will_autoload_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let short_name = UniqueIdentifierGenerator::identifier("Bar");
        let fqcn = format!("Foo\\{short_name}");
        let path = dir.path().join("foo.php");
        std::fs::write(&path, format!("<?php namespace Foo; class {short_name}{{}}")).unwrap();

        let autoloader = Autoloader::new(
            StubInflector::new(true),
            StubLocator::new(path),
            InMemoryRuntime::new(),
        );
        assert!(autoloader.load(&fqcn).unwrap());
        assert!(autoloader.runtime().is_defined(&fqcn));
        assert_eq!(autoloader.inflector.queried.get(), 1);
        assert_eq!(autoloader.locator.located.get(), 1);

        // Now defined, so a second request is a no-op
        assert!(!autoloader.load(&fqcn).unwrap());
    }
}
