//! Unique identifier generator
//!
//! Produces identifiers that never repeat, even for the same input. Meant
//! for naming test fixtures and throwaway classes, never for inflection.

use std::sync::OnceLock;

use regex::bytes::Regex;
use uuid::Uuid;

/// Identifier grammar, matched byte-wise so any byte above 0x7e is allowed
pub const VALID_IDENTIFIER_FORMAT: &str = r"(?-u)^[a-zA-Z_\x7F-\xFF][a-zA-Z0-9_\x7F-\xFF]+$";

/// Prefix used when the requested base name is not a valid identifier
pub const DEFAULT_IDENTIFIER: &str = "g";

fn identifier_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(VALID_IDENTIFIER_FORMAT).expect("identifier pattern is a valid regex")
    })
}

/// Check a string against the identifier grammar (at least two characters)
pub fn is_valid_identifier(name: &str) -> bool {
    identifier_regex().is_match(name.as_bytes())
}

pub struct UniqueIdentifierGenerator;

impl UniqueIdentifierGenerator {
    /// Generate a valid unique identifier from the given name
    pub fn identifier(name: &str) -> String {
        let prefix = if is_valid_identifier(name) {
            name
        } else {
            DEFAULT_IDENTIFIER
        };
        format!("{prefix}{}", Uuid::new_v4().simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_NAMES: &[&str] = &["", "1", "foo", "Foo", "bar", "Bar", "foo_bar"];

    #[test]
    fn test_generates_unique_identifiers() {
        for name in BASE_NAMES {
            assert_ne!(
                UniqueIdentifierGenerator::identifier(name),
                UniqueIdentifierGenerator::identifier(name)
            );
        }
    }

    #[test]
    fn test_generates_valid_identifiers() {
        for name in BASE_NAMES {
            let identifier = UniqueIdentifierGenerator::identifier(name);
            assert!(is_valid_identifier(&identifier), "invalid identifier {identifier}");
        }
    }

    #[test]
    fn test_keeps_valid_base_name_as_prefix() {
        assert!(UniqueIdentifierGenerator::identifier("foo_bar").starts_with("foo_bar"));
        assert!(UniqueIdentifierGenerator::identifier("1").starts_with(DEFAULT_IDENTIFIER));
    }

    #[test]
    fn test_identifier_grammar() {
        assert!(is_valid_identifier("Foo"));
        assert!(is_valid_identifier("_1"));
        assert!(is_valid_identifier("caf\u{e9}"));
        assert!(!is_valid_identifier("F"));
        assert!(!is_valid_identifier("1foo"));
        assert!(!is_valid_identifier("foo-bar"));
        assert!(!is_valid_identifier("Foo\\Bar"));
    }
}
