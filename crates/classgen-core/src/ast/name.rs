// Names and fully-qualified class names
// A name is an ordered path of non-empty segments joined by a backslash.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between namespace segments
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Errors raised while building names
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NameError {
    #[error("Empty name")]
    Empty,

    #[error("Name '{name}' contains an empty segment")]
    EmptySegment { name: String },
}

/// A name reference inside the tree: a namespace path, a parent class,
/// an interface, a type hint or a constant.
///
/// A fully-qualified name renders with a leading separator and resolves
/// from the global namespace; any other name resolves relative to the
/// enclosing namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name {
    // Never empty, no empty segment
    parts: Vec<String>,
    fully_qualified: bool,
}

impl Name {
    /// Parse a backslash separated name. A leading separator makes the name
    /// fully qualified; a trailing one is ignored.
    pub fn parse(name: &str) -> Result<Self, NameError> {
        Ok(Self {
            parts: split_segments(name)?,
            fully_qualified: name.starts_with(NAMESPACE_SEPARATOR),
        })
    }

    /// Build a relative name from already split parts
    pub fn from_parts<I, S>(parts: I) -> Result<Self, NameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        if parts.is_empty() {
            return Err(NameError::Empty);
        }
        if parts.iter().any(|part| part.is_empty()) {
            return Err(NameError::EmptySegment {
                name: parts.join("\\"),
            });
        }
        Ok(Self {
            parts,
            fully_qualified: false,
        })
    }

    /// The same name, resolved from the global namespace
    pub fn into_fully_qualified(mut self) -> Self {
        self.fully_qualified = true;
        self
    }

    pub fn is_fully_qualified(&self) -> bool {
        self.fully_qualified
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Last segment of the name
    pub fn last(&self) -> &str {
        &self.parts[self.parts.len() - 1]
    }
}

// Segments only; the printer adds the leading separator
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("\\"))
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Name {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        if value.fully_qualified {
            format!("{NAMESPACE_SEPARATOR}{value}")
        } else {
            value.to_string()
        }
    }
}

impl From<&ClassName> for Name {
    fn from(class_name: &ClassName) -> Self {
        let mut parts = class_name.namespace.clone();
        parts.push(class_name.short_name.clone());
        Self {
            parts,
            fully_qualified: false,
        }
    }
}

/// Fully-qualified class name: namespace path plus short name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassName {
    pub namespace: Vec<String>,
    pub short_name: String,
}

impl ClassName {
    pub fn parse(name: &str) -> Result<Self, NameError> {
        let mut segments = split_segments(name)?;
        // split_segments never yields an empty list
        let short_name = segments.pop().unwrap_or_default();
        Ok(Self {
            namespace: segments,
            short_name,
        })
    }

    /// Qualify a short name with a namespace path
    pub fn qualify(namespace: &[String], short_name: &str) -> Self {
        Self {
            namespace: namespace.to_vec(),
            short_name: short_name.to_string(),
        }
    }

    pub fn namespace_name(&self) -> String {
        self.namespace.join("\\")
    }

    pub fn has_namespace(&self) -> bool {
        !self.namespace.is_empty()
    }

    /// Namespace path as a tree name, if the class is not global
    pub fn namespace_as_name(&self) -> Option<Name> {
        if self.namespace.is_empty() {
            None
        } else {
            Some(Name {
                parts: self.namespace.clone(),
                fully_qualified: false,
            })
        }
    }

    /// All segments, namespace first
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.namespace
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.short_name.as_str()))
    }

    pub fn contains_segment(&self, segment: &str) -> bool {
        self.segments().any(|s| s == segment)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.namespace {
            write!(f, "{segment}\\")?;
        }
        write!(f, "{}", self.short_name)
    }
}

impl FromStr for ClassName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClassName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClassName> for String {
    fn from(value: ClassName) -> Self {
        value.to_string()
    }
}

fn split_segments(name: &str) -> Result<Vec<String>, NameError> {
    let trimmed = name.trim_matches(NAMESPACE_SEPARATOR);
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    let segments: Vec<String> = trimmed
        .split(NAMESPACE_SEPARATOR)
        .map(str::to_string)
        .collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(NameError::EmptySegment {
            name: name.to_string(),
        });
    }
    Ok(segments)
}
