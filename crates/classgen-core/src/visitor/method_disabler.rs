//! Disables or drops methods picked by a filter

use crate::ast::{ClassName, Expr, Literal, Name, Node};

use super::{FilterDecision, MethodFilter, NodeVisitor, Replacement, VisitResult};

/// Exception thrown by disabled methods
pub const DISABLED_METHOD_EXCEPTION: &str = "BadMethodCallException";

pub const DISABLED_METHOD_MESSAGE: &str = "Method is disabled";

pub struct MethodDisabler {
    filter: Box<dyn MethodFilter>,
}

impl MethodDisabler {
    pub fn new(filter: impl MethodFilter + 'static) -> Self {
        Self {
            filter: Box::new(filter),
        }
    }

    /// The body given to disabled methods
    pub fn disabled_body() -> Vec<Node> {
        vec![Node::Throw(Expr::New {
            class: Name::from(&ClassName::qualify(&[], DISABLED_METHOD_EXCEPTION))
                .into_fully_qualified(),
            args: vec![Expr::Literal(Literal::from(DISABLED_METHOD_MESSAGE))],
        })]
    }
}

impl NodeVisitor for MethodDisabler {
    fn name(&self) -> &'static str {
        "MethodDisabler"
    }

    fn leave_node(&mut self, node: &Node) -> VisitResult<Replacement> {
        let Node::ClassMethod(method) = node else {
            return Ok(Replacement::Keep);
        };

        match self.filter.classify(method) {
            FilterDecision::Skip => Ok(Replacement::Keep),
            FilterDecision::Drop => {
                tracing::debug!("dropping method {}", method.name);
                Ok(Replacement::Remove)
            }
            FilterDecision::Disable => {
                tracing::debug!("disabling method {}", method.name);
                let mut disabled = method.clone();
                // A method with a body cannot stay abstract
                disabled.is_abstract = false;
                disabled.stmts = Some(Self::disabled_body());
                Ok(Replacement::Replace(Node::ClassMethod(disabled)))
            }
        }
    }
}
