// Class syntax tree
// Trees are produced by the reflection builder (or an external parser),
// rewritten by visitors and finally rendered by a pretty printer.

pub mod name;
pub mod source_gen;
pub use name::{ClassName, Name, NameError, NAMESPACE_SEPARATOR};
pub use source_gen::{PrettyPrinter, StandardPrinter, ToSource};


use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered forest of top-level statements
pub type SyntaxTree = Vec<Node>;

/// Member and method visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

/// Literal values: constant values, property and parameter defaults,
/// and the option values fed to the identifier encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Literal>),
    Map(IndexMap<String, Literal>),
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

/// Expressions: only the shapes generated code needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    /// Symbolic reference to a named constant, e.g. `PHP_VERSION` or `self::FOO`
    ConstFetch(Name),
    New { class: Name, args: Vec<Expr> },
}

/// Coarse parameter type hint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeHint {
    Array,
    Callable,
    Class(Name),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub by_ref: bool,
    pub type_hint: Option<TypeHint>,
    pub default: Option<Expr>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            by_ref: false,
            type_hint: None,
            default: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    /// `None` for an unnamed (global) namespace block
    pub name: Option<Name>,
    pub stmts: Vec<Node>,
}

impl Namespace {
    pub fn new(name: Option<Name>, stmts: Vec<Node>) -> Self {
        Self { name, stmts }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub is_abstract: bool,
    pub is_final: bool,
    pub extends: Option<Name>,
    pub implements: Vec<Name>,
    pub stmts: Vec<Node>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_abstract: false,
            is_final: false,
            extends: None,
            implements: Vec::new(),
            stmts: Vec::new(),
        }
    }

    /// Methods declared directly in the class body
    pub fn methods(&self) -> impl Iterator<Item = &ClassMethod> {
        self.stmts.iter().filter_map(|stmt| match stmt {
            Node::ClassMethod(method) => Some(method),
            _ => None,
        })
    }

    pub fn method(&self, name: &str) -> Option<&ClassMethod> {
        self.methods().find(|method| method.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMethod {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub by_ref: bool,
    pub params: Vec<Param>,
    /// `None` for a method without body (abstract)
    pub stmts: Option<Vec<Node>>,
}

impl ClassMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            is_final: false,
            by_ref: false,
            params: Vec::new(),
            stmts: Some(Vec::new()),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub default: Option<Literal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassConst {
    pub name: String,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Namespace(Namespace),
    Class(Class),
    ClassMethod(ClassMethod),
    Property(Property),
    ClassConst(ClassConst),
    Throw(Expr),
    Expression(Expr),
}

// Helper methods
impl Node {
    /// Short human-readable kind, used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Namespace(_) => "namespace",
            Node::Class(_) => "class",
            Node::ClassMethod(_) => "method",
            Node::Property(_) => "property",
            Node::ClassConst(_) => "constant",
            Node::Throw(_) => "throw",
            Node::Expression(_) => "expression",
        }
    }

    /// Check whether the node owns a statement list the traversal descends into
    pub fn has_children(&self) -> bool {
        match self {
            Node::Namespace(_) | Node::Class(_) => true,
            Node::ClassMethod(method) => method.stmts.is_some(),
            _ => false,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Node::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Node::Namespace(namespace) => Some(namespace),
            _ => None,
        }
    }
}

/// Find the first class of a tree, looking inside namespaces
pub fn find_class(nodes: &[Node]) -> Option<&Class> {
    nodes.iter().find_map(|node| match node {
        Node::Class(class) => Some(class),
        Node::Namespace(namespace) => find_class(&namespace.stmts),
        _ => None,
    })
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Namespace(ns) => match &ns.name {
                Some(name) => write!(f, "namespace {name}"),
                None => write!(f, "namespace"),
            },
            Node::Class(class) => write!(f, "class {}", class.name),
            Node::ClassMethod(method) => write!(f, "method {}", method.name),
            Node::Property(property) => write!(f, "property ${}", property.name),
            Node::ClassConst(constant) => write!(f, "const {}", constant.name),
            Node::Throw(_) => write!(f, "throw"),
            Node::Expression(_) => write!(f, "<expression>"),
        }
    }
}
