//! Renames a class, moving it to another namespace if needed

use crate::ast::{ClassName, Namespace, Node};

use super::{NamespaceScope, NodeVisitor, Replacement, VisitResult, VisitorError};

/// Renames the class matching `matched` to `new_name`.
///
/// The tree is reshaped to follow the new namespace: the enclosing namespace
/// is renamed, unwrapped when the new name is global, or synthesized when a
/// global class moves into a namespace. A renamed class must be the only
/// class of its namespace; other statements of that namespace are dropped.
#[derive(Debug, Clone)]
pub struct ClassRenamer {
    matched: ClassName,
    new_name: ClassName,
    scope: NamespaceScope,
    renamed_in_namespace: bool,
}

impl ClassRenamer {
    pub fn new(matched: ClassName, new_name: ClassName) -> Self {
        Self {
            matched,
            new_name,
            scope: NamespaceScope::new(),
            renamed_in_namespace: false,
        }
    }
}

impl NodeVisitor for ClassRenamer {
    fn name(&self) -> &'static str {
        "ClassRenamer"
    }

    fn before_traverse(&mut self, _nodes: &[Node]) -> VisitResult<Option<Vec<Node>>> {
        self.scope.reset();
        self.renamed_in_namespace = false;
        Ok(None)
    }

    fn enter_node(&mut self, node: &Node) -> VisitResult<Option<Node>> {
        self.scope.enter(node)?;
        Ok(None)
    }

    fn leave_node(&mut self, node: &Node) -> VisitResult<Replacement> {
        match node {
            Node::Class(class) => {
                if self.scope.qualify_class(class)? != self.matched {
                    return Ok(Replacement::Keep);
                }
                tracing::debug!("renaming class {} to {}", self.matched, self.new_name);

                let mut renamed = class.clone();
                renamed.name = self.new_name.short_name.clone();
                let renamed = Node::Class(renamed);

                if self.scope.in_namespace() {
                    self.renamed_in_namespace = true;
                    return Ok(Replacement::Replace(renamed));
                }
                match self.new_name.namespace_as_name() {
                    Some(namespace) => Ok(Replacement::Replace(Node::Namespace(Namespace::new(
                        Some(namespace),
                        vec![renamed],
                    )))),
                    None => Ok(Replacement::Replace(renamed)),
                }
            }
            Node::Namespace(namespace) => {
                self.scope.leave(node);
                if !std::mem::take(&mut self.renamed_in_namespace) {
                    return Ok(Replacement::Keep);
                }

                // The namespace keeps the renamed class and nothing else
                let classes: Vec<Node> = namespace
                    .stmts
                    .iter()
                    .filter(|stmt| matches!(stmt, Node::Class(_)))
                    .cloned()
                    .collect();
                if classes.len() > 1 {
                    return Err(VisitorError::ambiguous(&format!(
                        "cannot rename {}: its namespace declares {} classes",
                        self.matched,
                        classes.len()
                    )));
                }

                match self.new_name.namespace_as_name() {
                    Some(name) => Ok(Replacement::Replace(Node::Namespace(Namespace::new(
                        Some(name),
                        classes,
                    )))),
                    None => Ok(Replacement::ReplaceWithMany(classes)),
                }
            }
            _ => Ok(Replacement::Keep),
        }
    }
}
