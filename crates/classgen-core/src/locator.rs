//! Maps generated class names to the files holding them

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ast::NAMESPACE_SEPARATOR;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Provided directory \"{path}\" does not exist")]
    InvalidDirectory {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },
}

/// Resolves the file of a generated class
pub trait FileLocator {
    /// Path of the file holding the class. Always the same path for the
    /// same name.
    fn generated_class_file_name(&self, class_name: &str) -> PathBuf;
}

impl<L: FileLocator + ?Sized> FileLocator for &L {
    fn generated_class_file_name(&self, class_name: &str) -> PathBuf {
        (**self).generated_class_file_name(class_name)
    }
}

/// Flat directory of generated classes: `Foo\Bar\Baz` lives in
/// `<dir>/FooBarBaz.php`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryFileLocator {
    directory: PathBuf,
}

impl DirectoryFileLocator {
    /// The directory must exist; it is resolved to its canonical path
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, LocatorError> {
        let requested = directory.as_ref();
        let directory = requested
            .canonicalize()
            .map_err(|source| LocatorError::InvalidDirectory {
                path: requested.to_path_buf(),
                source: Some(source),
            })?;
        if !directory.is_dir() {
            return Err(LocatorError::InvalidDirectory {
                path: requested.to_path_buf(),
                source: None,
            });
        }
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl FileLocator for DirectoryFileLocator {
    fn generated_class_file_name(&self, class_name: &str) -> PathBuf {
        let file_name: String = class_name
            .chars()
            .filter(|c| *c != NAMESPACE_SEPARATOR)
            .collect();
        self.directory.join(format!("{file_name}.php"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_class_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let locator = DirectoryFileLocator::new(dir.path()).unwrap();
        let canonical = dir.path().canonicalize().unwrap();

        assert_eq!(locator.directory(), canonical);
        assert_eq!(
            locator.generated_class_file_name("Foo\\Bar\\Baz"),
            canonical.join("FooBarBaz.php")
        );
        assert_eq!(
            locator.generated_class_file_name("Foo_Bar_Baz"),
            canonical.join("Foo_Bar_Baz.php")
        );
    }

    #[test]
    fn test_rejects_non_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("non-existing");
        let err = DirectoryFileLocator::new(&missing).unwrap_err();
        assert!(matches!(err, LocatorError::InvalidDirectory { ref path, .. } if *path == missing));
        assert!(err.to_string().contains("non-existing"));
    }

    #[test]
    fn test_rejects_plain_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(DirectoryFileLocator::new(file.path()).is_err());
    }
}
