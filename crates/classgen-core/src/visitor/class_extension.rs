//! Changes the parent class of a matched class

use crate::ast::{ClassName, Name, Node};

use super::{NamespaceScope, NodeVisitor, Replacement, VisitResult};

#[derive(Debug, Clone)]
pub struct ClassExtension {
    matched: ClassName,
    new_parent: Name,
    scope: NamespaceScope,
}

impl ClassExtension {
    pub fn new(matched: ClassName, new_parent: &ClassName) -> Self {
        Self {
            matched,
            new_parent: Name::from(new_parent).into_fully_qualified(),
            scope: NamespaceScope::new(),
        }
    }
}

impl NodeVisitor for ClassExtension {
    fn name(&self) -> &'static str {
        "ClassExtension"
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

        tracing::debug!("class {} now extends {}", self.matched, self.new_parent);
        let mut extended = class.clone();
        extended.extends = Some(self.new_parent.clone());
        Ok(Replacement::Replace(Node::Class(extended)))
    }
}
