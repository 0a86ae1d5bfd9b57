/*!
# Tree Visitors

Tree-rewriting passes over a class syntax tree.

## Overview

Every pass implements [`NodeVisitor`]. The traversal driver walks the tree
depth first and calls, in order:

1. `before_traverse` with the top-level statements
2. `enter_node` when a node is first reached (pre-order)
3. the same hooks for the node's statements, in declaration order
4. `leave_node` once all statements were visited (post-order)
5. `after_traverse` with the resulting top-level statements

Visitors never mutate nodes in place. Hooks return a replacement directive
and the driver performs the substitution.

## Passes

- [`FqcnResolver`]: extracts the single class name and namespace of a tree
- [`ClassRenamer`]: renames a class, moving it between namespaces
- [`ClassExtension`]: changes the parent of a class
- [`ClassImplementor`]: replaces the interfaces a class implements
- [`MethodDisabler`]: disables or drops methods picked by a [`MethodFilter`]
*/

pub mod class_extension;
pub mod class_implementor;
pub mod class_renamer;
pub mod filters;
pub mod fqcn_resolver;
pub mod method_disabler;
pub mod traverser;


pub use class_extension::ClassExtension;
pub use class_implementor::ClassImplementor;
pub use class_renamer::ClassRenamer;
pub use filters::{FilterDecision, MethodFilter, MethodNameFilter, PublicMethodsFilter};
pub use fqcn_resolver::FqcnResolver;
pub use method_disabler::MethodDisabler;
pub use traverser::{inspect, traverse, NodeTraverser, VisitStats};

use thiserror::Error;

use crate::ast::{Class, ClassName, Node};

/// Errors raised by visitors during traversal
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisitorError {
    #[error("Ambiguous tree: {message}")]
    AmbiguousTree { message: String },

    #[error("Not resolved: no {what} discovered")]
    NotResolved { what: &'static str },

    #[error("Malformed {kind} node: {message}")]
    MalformedNode { kind: &'static str, message: String },
}

impl VisitorError {
    pub fn ambiguous(message: &str) -> Self {
        Self::AmbiguousTree {
            message: message.to_string(),
        }
    }

    pub fn malformed(kind: &'static str, message: &str) -> Self {
        Self::MalformedNode {
            kind,
            message: message.to_string(),
        }
    }
}

pub type VisitResult<T> = std::result::Result<T, VisitorError>;

/// What the driver does with a node once `leave_node` returns
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// Leave the node unchanged
    Keep,
    /// Substitute a single node
    Replace(Node),
    /// Splice a list of nodes in place of the node
    ReplaceWithMany(Vec<Node>),
    /// Drop the node from its statement list
    Remove,
}

/// Contract implemented by every tree pass
pub trait NodeVisitor {
    /// Human-readable name for this pass
    fn name(&self) -> &'static str;

    /// Called with the top-level statements before traversal. Reset
    /// per-traversal state here. Returning `Some` replaces the statements.
    fn before_traverse(&mut self, nodes: &[Node]) -> VisitResult<Option<Vec<Node>>> {
        let _ = nodes;
        Ok(None)
    }

    /// Pre-order hook. Returning `Some` substitutes the node before its
    /// statements are visited.
    fn enter_node(&mut self, node: &Node) -> VisitResult<Option<Node>> {
        let _ = node;
        Ok(None)
    }

    /// Post-order hook, the primary mutation point
    fn leave_node(&mut self, node: &Node) -> VisitResult<Replacement> {
        let _ = node;
        Ok(Replacement::Keep)
    }

    /// Called with the resulting top-level statements
    fn after_traverse(&mut self, nodes: &[Node]) -> VisitResult<Option<Vec<Node>>> {
        let _ = nodes;
        Ok(None)
    }
}

/// Tracks the namespace enclosing the node being visited.
///
/// Shared by all passes that match classes by fully-qualified name.
#[derive(Debug, Clone, Default)]
pub struct NamespaceScope {
    current: Option<Vec<String>>,
}

impl NamespaceScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Record entering a namespace node; other nodes are ignored
    pub fn enter(&mut self, node: &Node) -> VisitResult<()> {
        if let Node::Namespace(namespace) = node {
            if self.current.is_some() {
                return Err(VisitorError::malformed(
                    "namespace",
                    "namespaces cannot be nested",
                ));
            }
            let path = match &namespace.name {
                Some(name) => name.parts().to_vec(),
                None => Vec::new(),
            };
            self.current = Some(path);
        }
        Ok(())
    }

    /// Record leaving a namespace node; other nodes are ignored
    pub fn leave(&mut self, node: &Node) {
        if matches!(node, Node::Namespace(_)) {
            self.current = None;
        }
    }

    pub fn in_namespace(&self) -> bool {
        self.current.is_some()
    }

    pub fn path(&self) -> &[String] {
        self.current.as_deref().unwrap_or_default()
    }

    /// Fully-qualified name of a class declared in the current scope
    pub fn qualify(&self, short_name: &str) -> ClassName {
        ClassName::qualify(self.path(), short_name)
    }

    /// Qualify a class declaration, rejecting anonymous classes
    pub fn qualify_class(&self, class: &Class) -> VisitResult<ClassName> {
        if class.name.is_empty() {
            return Err(VisitorError::malformed("class", "class has no name"));
        }
        Ok(self.qualify(&class.name))
    }
}
