/*!
# Class Name Inflection

Maps user class names to generated class names and back.

A generated name is laid out as

```text
<generated namespace>\__PM__\<user class name>\<encoded options>
```

The marker segment is the only signal that a name is generated. User names
are recovered from the segments after the *last* marker, so re-inflecting a
generated name never nests wrappers.
*/

pub mod encoder;
pub mod unique;

pub use encoder::{Options, ParameterEncoder};
pub use unique::{is_valid_identifier, UniqueIdentifierGenerator};

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::NAMESPACE_SEPARATOR;

/// Marker segment used unless configured otherwise
pub const GENERATED_CLASS_MARKER: &str = "__PM__";

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid generated class marker '{0}': must be a valid identifier")]
pub struct InvalidMarker(pub String);

/// Reserved namespace segment flagging generated classes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GeneratedClassMarker(String);

impl GeneratedClassMarker {
    pub fn new(marker: impl Into<String>) -> Result<Self, InvalidMarker> {
        let marker = marker.into();
        if is_valid_identifier(&marker) {
            Ok(Self(marker))
        } else {
            Err(InvalidMarker(marker))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GeneratedClassMarker {
    fn default() -> Self {
        Self(GENERATED_CLASS_MARKER.to_string())
    }
}

impl fmt::Display for GeneratedClassMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for GeneratedClassMarker {
    type Error = InvalidMarker;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GeneratedClassMarker> for String {
    fn from(value: GeneratedClassMarker) -> Self {
        value.0
    }
}

/// Bidirectional mapping between user class names and generated class names
pub trait Inflector {
    /// Retrieve the user class name of any class name
    fn user_class_name(&self, class_name: &str) -> String;

    /// Retrieve the generated class name for the given class name and options
    fn generated_class_name(&self, class_name: &str, options: &Options) -> String;

    /// Check whether the given class name is a generated class name
    fn is_generated_class_name(&self, class_name: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct ClassNameInflector {
    generated_namespace: String,
    marker: GeneratedClassMarker,
    encoder: ParameterEncoder,
}

impl ClassNameInflector {
    pub fn new(generated_namespace: impl Into<String>) -> Self {
        Self::with_marker(generated_namespace, GeneratedClassMarker::default())
    }

    pub fn with_marker(generated_namespace: impl Into<String>, marker: GeneratedClassMarker) -> Self {
        let generated_namespace = generated_namespace
            .into()
            .trim_matches(NAMESPACE_SEPARATOR)
            .to_string();
        Self {
            generated_namespace,
            marker,
            encoder: ParameterEncoder::new(),
        }
    }

    pub fn generated_namespace(&self) -> &str {
        &self.generated_namespace
    }

    pub fn marker(&self) -> &GeneratedClassMarker {
        &self.marker
    }

    fn segments(class_name: &str) -> Vec<&str> {
        class_name
            .trim_matches(NAMESPACE_SEPARATOR)
            .split(NAMESPACE_SEPARATOR)
            .collect()
    }
}

impl Inflector for ClassNameInflector {
    fn user_class_name(&self, class_name: &str) -> String {
        let segments = Self::segments(class_name);
        let Some(position) = segments.iter().rposition(|s| *s == self.marker.as_str()) else {
            return class_name.to_string();
        };
        // Everything between the last marker and the encoded short name
        let start = position + 1;
        let end = segments.len().saturating_sub(1);
        if start >= end {
            return class_name.to_string();
        }
        segments[start..end].join("\\")
    }

    fn generated_class_name(&self, class_name: &str, options: &Options) -> String {
        let user_class_name = self.user_class_name(class_name);
        let user_class_name = user_class_name.trim_matches(NAMESPACE_SEPARATOR);
        let suffix = self.encoder.encode_parameters(options);
        let mut generated = String::new();
        if !self.generated_namespace.is_empty() {
            generated.push_str(&self.generated_namespace);
            generated.push(NAMESPACE_SEPARATOR);
        }
        generated.push_str(self.marker.as_str());
        generated.push(NAMESPACE_SEPARATOR);
        generated.push_str(user_class_name);
        generated.push(NAMESPACE_SEPARATOR);
        generated.push_str(&suffix);
        tracing::trace!("inflected {} to {}", class_name, generated);
        generated
    }

    fn is_generated_class_name(&self, class_name: &str) -> bool {
        Self::segments(class_name)
            .iter()
            .any(|s| *s == self.marker.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Literal;
    use crate::inflector::encoder::ENCODED_PREFIX;

    fn inflector() -> ClassNameInflector {
        ClassNameInflector::new("GeneratedClassNS")
    }

    fn options(pairs: &[(&str, &str)]) -> Options {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), Literal::from(*value)))
            .collect()
    }

    #[test]
    fn test_inflector() {
        let inflector = inflector();
        for real in ["Foo", "Foo\\Bar"] {
            let prefix = format!("GeneratedClassNS\\__PM__\\{real}\\{ENCODED_PREFIX}");
            let generated = inflector.generated_class_name(real, &Options::new());

            assert!(!inflector.is_generated_class_name(real));
            assert!(inflector.is_generated_class_name(&generated));
            assert!(generated.starts_with(&prefix), "{generated}");
            assert_eq!(inflector.user_class_name(real), real);
            assert_eq!(inflector.user_class_name(&generated), real);
            assert_eq!(
                inflector.generated_class_name(&generated, &Options::new()),
                generated
            );
        }
    }

    #[test]
    fn test_generates_same_class_name_with_same_parameters() {
        let inflector = inflector();
        assert_eq!(
            inflector.generated_class_name("Foo\\Bar", &Options::new()),
            inflector.generated_class_name("Foo\\Bar", &Options::new())
        );
        assert_eq!(
            inflector.generated_class_name("Foo\\Bar", &options(&[("baz", "tab")])),
            inflector.generated_class_name("Foo\\Bar", &options(&[("baz", "tab")]))
        );
    }

    #[test]
    fn test_generates_different_class_name_with_different_parameters() {
        let inflector = inflector();
        let name = |opts: &[(&str, &str)]| inflector.generated_class_name("Foo\\Bar", &options(opts));

        assert_ne!(name(&[]), name(&[("foo", "bar")]));
        assert_ne!(name(&[("baz", "tab")]), name(&[("tab", "baz")]));
        assert_ne!(name(&[("foo", "bar"), ("tab", "baz")]), name(&[("foo", "bar")]));
        assert_ne!(
            name(&[("foo", "bar"), ("tab", "baz")]),
            name(&[("tab", "baz"), ("foo", "bar")])
        );
    }

    #[test]
    fn test_user_name_recovery_is_idempotent() {
        let inflector = inflector();
        for real in ["Foo", "Foo\\Bar", "A\\B\\C\\D"] {
            let generated = inflector.generated_class_name(real, &options(&[("a", "b")]));
            assert_eq!(
                inflector.user_class_name(&generated),
                inflector.user_class_name(real)
            );
        }
    }

    #[test]
    fn test_last_marker_wins() {
        let inflector = inflector();
        let chained = "Outer\\__PM__\\Ignored\\Suffix\\__PM__\\Foo\\Bar\\Generated123";
        assert_eq!(inflector.user_class_name(chained), "Foo\\Bar");
        assert!(inflector.is_generated_class_name(chained));
    }

    #[test]
    fn test_degenerate_generated_names_are_returned_unchanged() {
        let inflector = inflector();
        assert_eq!(inflector.user_class_name("Foo\\__PM__"), "Foo\\__PM__");
        assert_eq!(inflector.user_class_name("__PM__\\Suffix"), "__PM__\\Suffix");
    }

    #[test]
    fn test_marker_must_be_an_identifier() {
        assert!(GeneratedClassMarker::new("__Gen__").is_ok());
        assert!(GeneratedClassMarker::new("a\\b").is_err());
        assert!(GeneratedClassMarker::new("").is_err());

        let custom = ClassNameInflector::with_marker(
            "\\Proxies\\",
            GeneratedClassMarker::new("__Gen__").unwrap(),
        );
        let generated = custom.generated_class_name("Foo", &Options::new());
        assert!(generated.starts_with("Proxies\\__Gen__\\Foo\\"));
        assert!(!inflector().is_generated_class_name(&generated));
    }

    #[test]
    fn test_marker_substring_is_not_a_marker() {
        let inflector = inflector();
        assert!(!inflector.is_generated_class_name("Foo\\__PM__Bar\\Baz"));
    }
}
