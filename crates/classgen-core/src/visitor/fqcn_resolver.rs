//! Resolves the fully-qualified name of the single class in a tree

use crate::ast::{ClassName, Node};

use super::{NodeVisitor, VisitResult, VisitorError};

/// Records the namespace and class of a single-class tree.
///
/// Run it with [`inspect`](super::inspect) or [`traverse`](super::traverse),
/// then query [`name`](Self::name), [`namespace`](Self::namespace) or
/// [`fqcn`](Self::fqcn). A tree with two namespaces or two classes is
/// rejected as ambiguous.
#[derive(Debug, Clone, Default)]
pub struct FqcnResolver {
    namespace: Option<Vec<String>>,
    class: Option<String>,
}

impl FqcnResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Short name of the discovered class
    pub fn name(&self) -> VisitResult<&str> {
        self.class
            .as_deref()
            .ok_or(VisitorError::NotResolved { what: "class" })
    }

    /// Namespace of the discovered class, empty for the global namespace
    pub fn namespace(&self) -> VisitResult<String> {
        match (&self.namespace, &self.class) {
            (Some(path), _) => Ok(path.join("\\")),
            (None, Some(_)) => Ok(String::new()),
            (None, None) => Err(VisitorError::NotResolved { what: "namespace" }),
        }
    }

    /// Fully-qualified name of the discovered class
    pub fn fqcn(&self) -> VisitResult<ClassName> {
        let name = self.name()?;
        let namespace = self.namespace.as_deref().unwrap_or_default();
        Ok(ClassName::qualify(namespace, name))
    }
}

impl NodeVisitor for FqcnResolver {
    fn name(&self) -> &'static str {
        "FqcnResolver"
    }

    fn before_traverse(&mut self, _nodes: &[Node]) -> VisitResult<Option<Vec<Node>>> {
        self.namespace = None;
        self.class = None;
        Ok(None)
    }

    fn enter_node(&mut self, node: &Node) -> VisitResult<Option<Node>> {
        match node {
            Node::Namespace(namespace) => {
                if self.namespace.is_some() {
                    return Err(VisitorError::ambiguous(
                        "multiple nested namespaces discovered",
                    ));
                }
                let path = namespace
                    .name
                    .as_ref()
                    .map(|name| name.parts().to_vec())
                    .unwrap_or_default();
                self.namespace = Some(path);
            }
            Node::Class(class) => {
                if self.class.is_some() {
                    return Err(VisitorError::ambiguous("multiple classes discovered"));
                }
                if class.name.is_empty() {
                    return Err(VisitorError::malformed("class", "class has no name"));
                }
                self.class = Some(class.name.clone());
            }
            _ => {}
        }
        Ok(None)
    }
}
