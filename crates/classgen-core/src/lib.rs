//! # Classgen Core
//!
//! Code generation toolkit for class-based source code, including:
//! - Class syntax trees, names and a pretty printer
//! - Name inflection between user classes and generated classes
//! - Tree visitors: FQCN resolution, renaming, parent and interface
//!   replacement, method disabling
//! - A builder turning reflected class descriptors into trees
//! - Generator strategies rendering, evaluating or writing generated classes
//! - File location and an autoload hook for generated classes

#![warn(clippy::all)]

pub mod ast;
pub mod autoloader;
pub mod builder;
pub mod inflector;
pub mod locator;
pub mod strategy;
pub mod visitor;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use ast::{
    Class, ClassMethod, ClassName, Name, NameError, Node, PrettyPrinter, StandardPrinter,
    SyntaxTree,
};
pub use autoloader::Autoloader;
pub use builder::{ClassBuilder, ClassDescriptor};
pub use inflector::{
    ClassNameInflector, GeneratedClassMarker, Inflector, InvalidMarker, Options,
    ParameterEncoder, UniqueIdentifierGenerator,
};
pub use locator::{DirectoryFileLocator, FileLocator, LocatorError};
pub use strategy::{
    BaseGeneratorStrategy, ClassRuntime, EvaluatingGeneratorStrategy,
    FileWriterGeneratorStrategy, GeneratorStrategy, InMemoryRuntime,
};
pub use visitor::{
    ClassExtension, ClassImplementor, ClassRenamer, FilterDecision, FqcnResolver, MethodDisabler,
    MethodFilter, MethodNameFilter, NodeTraverser, NodeVisitor, PublicMethodsFilter, Replacement,
    VisitorError,
};

/// Classgen version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log directive when `RUST_LOG` is not set
pub const DEFAULT_LOG_DIRECTIVE: &str = "classgen_core=info";

/// Initialize tracing for classgen components
pub fn init_tracing() {
    init_tracing_with(DEFAULT_LOG_DIRECTIVE);
}

/// Initialize tracing with a fallback directive used when `RUST_LOG` is not
/// set. Does nothing if a global subscriber is already installed.
pub fn init_tracing_with(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Classgen configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassgenConfig {
    /// Namespace prefix of all generated classes
    pub generated_namespace: String,
    /// Directory holding generated class files
    pub generated_classes_dir: PathBuf,
    /// Namespace segment flagging generated classes
    pub marker: GeneratedClassMarker,
}

impl Default for ClassgenConfig {
    fn default() -> Self {
        Self {
            generated_namespace: "GeneratedClasses".to_string(),
            generated_classes_dir: "./generated-classes".into(),
            marker: GeneratedClassMarker::default(),
        }
    }
}

impl ClassgenConfig {
    /// Load a JSON configuration file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn inflector(&self) -> ClassNameInflector {
        ClassNameInflector::with_marker(self.generated_namespace.clone(), self.marker.clone())
    }

    /// Locator for the generated classes directory, which must exist
    pub fn file_locator(&self) -> std::result::Result<DirectoryFileLocator, LocatorError> {
        DirectoryFileLocator::new(&self.generated_classes_dir)
    }
}

/// Error types for classgen operations
#[derive(thiserror::Error, Debug)]
pub enum ClassgenError {
    /// Invalid class or namespace name
    #[error("Name error: {0}")]
    Name(#[from] NameError),

    /// Tree rejected by a visitor
    #[error("Visitor error: {0}")]
    Visitor(#[from] VisitorError),

    /// Generated classes directory problem
    #[error("Locator error: {0}")]
    Locator(#[from] LocatorError),

    /// Generated class marker is not a valid identifier
    #[error("Invalid marker: {0}")]
    Marker(#[from] InvalidMarker),

    /// Temporary file or generated classes directory I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed descriptor or configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by a class runtime
    #[error("Runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

/// Result type for classgen operations
pub type Result<T> = std::result::Result<T, ClassgenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClassgenConfig::default();
        assert_eq!(config.generated_namespace, "GeneratedClasses");
        assert_eq!(config.marker.as_str(), "__PM__");
        assert_eq!(config.inflector().generated_namespace(), "GeneratedClasses");
    }

    #[test]
    fn test_config_from_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classgen.json");
        std::fs::write(&path, r#"{"generated_namespace": "Proxies", "marker": "__CG__"}"#).unwrap();

        let config = ClassgenConfig::from_file(&path).unwrap();
        assert_eq!(config.generated_namespace, "Proxies");
        assert_eq!(config.marker.as_str(), "__CG__");
        assert_eq!(config.generated_classes_dir, PathBuf::from("./generated-classes"));

        let generated = config.inflector().generated_class_name("Foo", &Options::new());
        assert!(generated.starts_with("Proxies\\__CG__\\Foo\\"));
    }

    #[test]
    fn test_config_rejects_invalid_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classgen.json");
        std::fs::write(&path, r#"{"marker": "not a marker"}"#).unwrap();
        assert!(matches!(
            ClassgenConfig::from_file(&path),
            Err(ClassgenError::Json(_))
        ));
    }

    #[test]
    fn test_file_locator_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClassgenConfig {
            generated_classes_dir: dir.path().join("missing"),
            ..ClassgenConfig::default()
        };
        assert!(config.file_locator().is_err());

        let config = ClassgenConfig {
            generated_classes_dir: dir.path().to_path_buf(),
            ..ClassgenConfig::default()
        };
        assert!(config.file_locator().is_ok());
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing_with("classgen_core=debug");
    }
}
