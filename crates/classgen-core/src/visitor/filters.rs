//! Method filters for the method disabler pass

use std::collections::HashSet;

use crate::ast::ClassMethod;

/// What the method disabler does with a method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Leave the method untouched
    Skip,
    /// Replace the body with a throw statement
    Disable,
    /// Remove the method from the class
    Drop,
}

/// Classifies methods for [`MethodDisabler`](super::MethodDisabler)
pub trait MethodFilter {
    fn classify(&self, method: &ClassMethod) -> FilterDecision;
}

impl<F> MethodFilter for F
where
    F: Fn(&ClassMethod) -> FilterDecision,
{
    fn classify(&self, method: &ClassMethod) -> FilterDecision {
        self(method)
    }
}

/// Drops every method that is not public
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicMethodsFilter;

impl MethodFilter for PublicMethodsFilter {
    fn classify(&self, method: &ClassMethod) -> FilterDecision {
        if method.is_public() {
            FilterDecision::Skip
        } else {
            FilterDecision::Drop
        }
    }
}

/// Disables methods by name. Method names are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct MethodNameFilter {
    names: HashSet<String>,
}

impl MethodNameFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| name.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl MethodFilter for MethodNameFilter {
    fn classify(&self, method: &ClassMethod) -> FilterDecision {
        if self.names.contains(&method.name.to_ascii_lowercase()) {
            FilterDecision::Disable
        } else {
            FilterDecision::Skip
        }
    }
}
