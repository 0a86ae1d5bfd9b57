/*!
# Node Traverser

Depth-first traversal driver. Calls the visitor hooks and applies the
replacement directives they return.
*/

use std::collections::HashMap;

use crate::ast::{Node, SyntaxTree};

use super::{NodeVisitor, Replacement, VisitResult};

/// Run a single visitor over a tree, returning the rewritten tree
pub fn traverse(visitor: &mut dyn NodeVisitor, nodes: SyntaxTree) -> VisitResult<SyntaxTree> {
    let mut stats = VisitStats::new(visitor.name());
    run(visitor, nodes, &mut stats)
}

/// Run a visitor over a borrowed tree. Hooks are called in traversal order
/// but any replacement they return is discarded; used by read-only passes.
pub fn inspect(visitor: &mut dyn NodeVisitor, nodes: &[Node]) -> VisitResult<()> {
    visitor.before_traverse(nodes)?;
    inspect_list(visitor, nodes)?;
    visitor.after_traverse(nodes)?;
    Ok(())
}

/// Runs an ordered list of visitors, one full traversal each
pub struct NodeTraverser {
    visitors: Vec<Box<dyn NodeVisitor>>,
    stats: HashMap<String, VisitStats>,
}

impl NodeTraverser {
    pub fn new() -> Self {
        Self {
            visitors: Vec::new(),
            stats: HashMap::new(),
        }
    }

    /// Add a visitor; visitors run in insertion order
    pub fn add_visitor(&mut self, visitor: Box<dyn NodeVisitor>) {
        let name = visitor.name().to_string();
        self.stats
            .entry(name.clone())
            .or_insert_with(|| VisitStats::new(&name));
        self.visitors.push(visitor);
    }

    pub fn with_visitor(mut self, visitor: Box<dyn NodeVisitor>) -> Self {
        self.add_visitor(visitor);
        self
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }

    /// Traverse the tree once per visitor
    pub fn traverse(&mut self, mut nodes: SyntaxTree) -> VisitResult<SyntaxTree> {
        for visitor in &mut self.visitors {
            let name = visitor.name();
            let stats = self
                .stats
                .entry(name.to_string())
                .or_insert_with(|| VisitStats::new(name));
            tracing::debug!("running visitor {} over {} top-level nodes", name, nodes.len());
            nodes = run(visitor.as_mut(), nodes, stats)?;
        }
        Ok(nodes)
    }

    /// Get traversal statistics
    pub fn stats(&self) -> &HashMap<String, VisitStats> {
        &self.stats
    }

    /// Clear statistics
    pub fn clear_stats(&mut self) {
        for stats in self.stats.values_mut() {
            *stats = VisitStats::new(&stats.visitor_name);
        }
    }
}

impl Default for NodeTraverser {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-visitor traversal statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VisitStats {
    pub visitor_name: String,
    pub traversals: u64,
    pub nodes_entered: u64,
    pub replacements: u64,
    pub removals: u64,
}

impl VisitStats {
    pub fn new(visitor_name: &str) -> Self {
        Self {
            visitor_name: visitor_name.to_string(),
            ..Self::default()
        }
    }

    /// Whether the visitor changed anything at all
    pub fn changed(&self) -> bool {
        self.replacements > 0 || self.removals > 0
    }
}

fn run(
    visitor: &mut dyn NodeVisitor,
    nodes: SyntaxTree,
    stats: &mut VisitStats,
) -> VisitResult<SyntaxTree> {
    stats.traversals += 1;
    let nodes = match visitor.before_traverse(&nodes)? {
        Some(replaced) => replaced,
        None => nodes,
    };
    let nodes = walk_list(visitor, nodes, stats)?;
    let nodes = match visitor.after_traverse(&nodes)? {
        Some(replaced) => replaced,
        None => nodes,
    };
    Ok(nodes)
}

fn walk_list(
    visitor: &mut dyn NodeVisitor,
    nodes: Vec<Node>,
    stats: &mut VisitStats,
) -> VisitResult<Vec<Node>> {
    let mut result = Vec::with_capacity(nodes.len());
    for node in nodes {
        stats.nodes_entered += 1;
        let node = match visitor.enter_node(&node)? {
            Some(replaced) => {
                stats.replacements += 1;
                replaced
            }
            None => node,
        };
        let node = walk_children(visitor, node, stats)?;

        match visitor.leave_node(&node)? {
            Replacement::Keep => result.push(node),
            Replacement::Replace(replaced) => {
                stats.replacements += 1;
                result.push(replaced);
            }
            Replacement::ReplaceWithMany(replaced) => {
                stats.replacements += 1;
                result.extend(replaced);
            }
            Replacement::Remove => {
                tracing::trace!("{} removed {}", visitor.name(), node);
                stats.removals += 1;
            }
        }
    }
    Ok(result)
}

fn walk_children(
    visitor: &mut dyn NodeVisitor,
    node: Node,
    stats: &mut VisitStats,
) -> VisitResult<Node> {
    let node = match node {
        Node::Namespace(mut namespace) => {
            let stmts = std::mem::take(&mut namespace.stmts);
            namespace.stmts = walk_list(visitor, stmts, stats)?;
            Node::Namespace(namespace)
        }
        Node::Class(mut class) => {
            let stmts = std::mem::take(&mut class.stmts);
            class.stmts = walk_list(visitor, stmts, stats)?;
            Node::Class(class)
        }
        Node::ClassMethod(mut method) => {
            if let Some(stmts) = method.stmts.take() {
                method.stmts = Some(walk_list(visitor, stmts, stats)?);
            }
            Node::ClassMethod(method)
        }
        other => other,
    };
    Ok(node)
}

fn inspect_list(visitor: &mut dyn NodeVisitor, nodes: &[Node]) -> VisitResult<()> {
    for node in nodes {
        visitor.enter_node(node)?;
        inspect_list(visitor, children(node))?;
        visitor.leave_node(node)?;
    }
    Ok(())
}

fn children(node: &Node) -> &[Node] {
    match node {
        Node::Namespace(namespace) => &namespace.stmts,
        Node::Class(class) => &class.stmts,
        Node::ClassMethod(method) => method.stmts.as_deref().unwrap_or_default(),
        _ => &[],
    }
}
