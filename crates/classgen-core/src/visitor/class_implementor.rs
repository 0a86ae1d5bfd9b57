//! Replaces the interfaces implemented by a matched class

use crate::ast::{ClassName, Name, Node};

use super::{NamespaceScope, NodeVisitor, Replacement, VisitResult};

#[derive(Debug, Clone)]
pub struct ClassImplementor {
    matched: ClassName,
    interfaces: Vec<Name>,
    scope: NamespaceScope,
}

impl ClassImplementor {
    /// Interfaces are set in the given order, replacing any existing ones
    pub fn new(matched: ClassName, interfaces: &[ClassName]) -> Self {
        Self {
            matched,
            interfaces: interfaces.iter().map(Name::from).collect(),
            scope: NamespaceScope::new(),
        }
    }
}

impl NodeVisitor for ClassImplementor {
    fn name(&self) -> &'static str {
        "ClassImplementor"
    }

    fn before_traverse(&mut self, _nodes: &[Node]) -> VisitResult<Option<Vec<Node>>> {
        self.scope.reset();
        Ok(None)
    }

    fn enter_node(&mut self, node: &Node) -> VisitResult<Option<Node>> {
        self.scope.enter(node)?;
        Ok(None)
    }

    fn leave_node(&mut self, node: &Node) -> VisitResult<Replacement> {
        self.scope.leave(node);
        let Node::Class(class) = node else {
            return Ok(Replacement::Keep);
        };
        if self.scope.qualify_class(class)? != self.matched {
            return Ok(Replacement::Keep);
        }

        tracing::debug!(
            "class {} now implements {} interface(s)",
            self.matched,
            self.interfaces.len()
        );
        let mut implementor = class.clone();
        implementor.implements = self.interfaces.clone();
        Ok(Replacement::Replace(Node::Class(implementor)))
    }
}
