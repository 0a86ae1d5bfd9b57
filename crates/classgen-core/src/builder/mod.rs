/*!
# Class Builder

Builds a syntax tree from a class descriptor.

A descriptor is the reflected shape of an existing class: name, parent,
interfaces, constants, properties and method signatures. The resulting tree
holds the class wrapped in its namespace (or bare, for a global class).
Method bodies are never populated; abstract methods get no body at all.
*/

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ast::{
    Class, ClassConst, ClassMethod, ClassName, Expr, Literal, Name, Namespace, Node, Param,
    Property, SyntaxTree, TypeHint, Visibility,
};
use crate::Result;

/// Reflected description of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: ClassName,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub parent: Option<ClassName>,
    #[serde(default)]
    pub interfaces: Vec<ClassName>,
    /// Sorted by name so the emitted order is deterministic
    #[serde(default)]
    pub constants: BTreeMap<String, Literal>,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: ClassName) -> Self {
        Self {
            name,
            is_abstract: false,
            is_final: false,
            parent: None,
            interfaces: Vec::new(),
            constants: BTreeMap::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    /// Declared with the class, as opposed to added at runtime
    #[serde(default)]
    pub has_default: bool,
    /// Only read when `has_default` is set; a missing value means null
    #[serde(default)]
    pub default: Option<Literal>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            has_default: false,
            default: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub returns_reference: bool,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            is_final: false,
            returns_reference: false,
            parameters: Vec::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(default)]
    pub by_reference: bool,
    #[serde(default)]
    pub type_hint: Option<ParameterType>,
    #[serde(default)]
    pub default: Option<DefaultValue>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            by_reference: false,
            type_hint: None,
            default: None,
        }
    }
}

/// Coarse parameter type: `"array"`, `"callable"` or `{"class": "Foo\\Bar"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Array,
    Callable,
    Class(ClassName),
}

/// A parameter default: `{"literal": 5}` or `{"constant": "PHP_VERSION"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultValue {
    Literal(Literal),
    /// Re-emitted as a reference to the constant, never its current value
    Constant(String),
}

/// Builds syntax trees from class descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassBuilder;

impl ClassBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, descriptor: &ClassDescriptor) -> Result<SyntaxTree> {
        let mut class = Class::new(descriptor.name.short_name.clone());
        class.is_abstract = descriptor.is_abstract;
        class.is_final = descriptor.is_final;
        class.extends = descriptor.parent.as_ref().map(fully_qualified);
        class.implements = descriptor.interfaces.iter().map(fully_qualified).collect();

        for (name, value) in &descriptor.constants {
            class.stmts.push(Node::ClassConst(ClassConst {
                name: name.clone(),
                value: value.clone(),
            }));
        }
        for property in &descriptor.properties {
            class.stmts.push(Node::Property(build_property(property)));
        }
        for method in &descriptor.methods {
            class.stmts.push(Node::ClassMethod(build_method(method)?));
        }

        tracing::debug!(
            "built class {} with {} statement(s)",
            descriptor.name,
            class.stmts.len()
        );

        let class = Node::Class(class);
        Ok(match descriptor.name.namespace_as_name() {
            Some(namespace) => vec![Node::Namespace(Namespace::new(Some(namespace), vec![class]))],
            None => vec![class],
        })
    }
}

fn fully_qualified(class_name: &ClassName) -> Name {
    Name::from(class_name).into_fully_qualified()
}

fn build_property(descriptor: &PropertyDescriptor) -> Property {
    let default = descriptor
        .has_default
        .then(|| descriptor.default.clone().unwrap_or(Literal::Null));
    Property {
        name: descriptor.name.clone(),
        visibility: descriptor.visibility,
        is_static: descriptor.is_static,
        default,
    }
}

fn build_method(descriptor: &MethodDescriptor) -> Result<ClassMethod> {
    let params = descriptor
        .parameters
        .iter()
        .map(build_parameter)
        .collect::<Result<Vec<_>>>()?;
    Ok(ClassMethod {
        name: descriptor.name.clone(),
        visibility: descriptor.visibility,
        is_static: descriptor.is_static,
        is_abstract: descriptor.is_abstract,
        is_final: descriptor.is_final,
        by_ref: descriptor.returns_reference,
        params,
        stmts: if descriptor.is_abstract {
            None
        } else {
            Some(Vec::new())
        },
    })
}

fn build_parameter(descriptor: &ParameterDescriptor) -> Result<Param> {
    let type_hint = descriptor.type_hint.as_ref().map(|hint| match hint {
        ParameterType::Array => TypeHint::Array,
        ParameterType::Callable => TypeHint::Callable,
        ParameterType::Class(class) => TypeHint::Class(fully_qualified(class)),
    });
    let default = match &descriptor.default {
        Some(DefaultValue::Literal(value)) => Some(Expr::Literal(value.clone())),
        Some(DefaultValue::Constant(constant)) => Some(Expr::ConstFetch(Name::parse(constant)?)),
        None => None,
    };
    Ok(Param {
        name: descriptor.name.clone(),
        by_ref: descriptor.by_reference,
        type_hint,
        default,
    })
}
