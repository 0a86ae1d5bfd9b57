// Source code generation from the class syntax tree
// Leaf values implement ToSource; statements are laid out by the printer,
// which owns indentation.

use super::*;

const INDENT: &str = "    ";

/// Trait for types that can generate their source code representation
pub trait ToSource {
    fn to_source(&self) -> String;
}

/// Renders a whole tree to source text (without the `<?php` open tag)
pub trait PrettyPrinter {
    fn pretty_print(&self, nodes: &[Node]) -> String;
}

impl ToSource for Name {
    fn to_source(&self) -> String {
        if self.is_fully_qualified() {
            format!("{NAMESPACE_SEPARATOR}{self}")
        } else {
            self.to_string()
        }
    }
}

impl ToSource for Literal {
    fn to_source(&self) -> String {
        match self {
            Literal::Null => "null".to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Int(n) => n.to_string(),
            Literal::Float(f) => format_float(*f),
            Literal::String(s) => format!("'{}'", escape_string(s)),
            Literal::List(items) => {
                let items_str = items
                    .iter()
                    .map(|item| item.to_source())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{items_str}]")
            }
            Literal::Map(entries) => {
                let entries_str = entries
                    .iter()
                    .map(|(key, value)| format!("'{}' => {}", escape_string(key), value.to_source()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{entries_str}]")
            }
        }
    }
}

impl ToSource for Expr {
    fn to_source(&self) -> String {
        match self {
            Expr::Literal(literal) => literal.to_source(),
            Expr::ConstFetch(name) => name.to_source(),
            Expr::New { class, args } => {
                let args_str = args
                    .iter()
                    .map(|arg| arg.to_source())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("new {}({})", class.to_source(), args_str)
            }
        }
    }
}

impl ToSource for TypeHint {
    fn to_source(&self) -> String {
        match self {
            TypeHint::Array => "array".to_string(),
            TypeHint::Callable => "callable".to_string(),
            TypeHint::Class(name) => name.to_source(),
        }
    }
}

impl ToSource for Param {
    fn to_source(&self) -> String {
        let mut result = String::new();
        if let Some(type_hint) = &self.type_hint {
            result.push_str(&type_hint.to_source());
            result.push(' ');
        }
        if self.by_ref {
            result.push('&');
        }
        result.push('$');
        result.push_str(&self.name);
        if let Some(default) = &self.default {
            result.push_str(" = ");
            result.push_str(&default.to_source());
        }
        result
    }
}

impl ToSource for Node {
    fn to_source(&self) -> String {
        StandardPrinter::new().pretty_print(std::slice::from_ref(self))
    }
}

/// Default printer: one declaration per line, four-space indentation,
/// Allman braces for classes and method bodies.
#[derive(Debug, Clone, Default)]
pub struct StandardPrinter;

impl StandardPrinter {
    pub fn new() -> Self {
        Self
    }

    fn print_stmts(&self, stmts: &[Node], depth: usize, out: &mut String) {
        for (index, stmt) in stmts.iter().enumerate() {
            // Blank line between top-level declarations
            if index > 0 && depth == 0 {
                out.push('\n');
            }
            self.print_node(stmt, depth, out);
        }
    }

    fn print_node(&self, node: &Node, depth: usize, out: &mut String) {
        let indent = INDENT.repeat(depth);
        match node {
            Node::Namespace(namespace) => self.print_namespace(namespace, depth, out),
            Node::Class(class) => self.print_class(class, depth, out),
            Node::ClassMethod(method) => self.print_method(method, depth, out),
            Node::Property(property) => {
                let mut line = format!("{indent}{}", property.visibility.as_str());
                if property.is_static {
                    line.push_str(" static");
                }
                line.push_str(&format!(" ${}", property.name));
                if let Some(default) = &property.default {
                    line.push_str(&format!(" = {}", default.to_source()));
                }
                out.push_str(&line);
                out.push_str(";\n");
            }
            Node::ClassConst(constant) => {
                out.push_str(&format!(
                    "{indent}const {} = {};\n",
                    constant.name,
                    constant.value.to_source()
                ));
            }
            Node::Throw(expr) => {
                out.push_str(&format!("{indent}throw {};\n", expr.to_source()));
            }
            Node::Expression(expr) => {
                out.push_str(&format!("{indent}{};\n", expr.to_source()));
            }
        }
    }

    fn print_namespace(&self, namespace: &Namespace, depth: usize, out: &mut String) {
        let indent = INDENT.repeat(depth);
        match &namespace.name {
            Some(name) => {
                out.push_str(&format!("{indent}namespace {name};\n"));
                if !namespace.stmts.is_empty() {
                    out.push('\n');
                }
                self.print_stmts(&namespace.stmts, depth, out);
            }
            None => {
                out.push_str(&format!("{indent}namespace {{\n"));
                self.print_stmts(&namespace.stmts, depth + 1, out);
                out.push_str(&format!("{indent}}}\n"));
            }
        }
    }

    fn print_class(&self, class: &Class, depth: usize, out: &mut String) {
        let indent = INDENT.repeat(depth);
        let mut header = indent.clone();
        if class.is_abstract {
            header.push_str("abstract ");
        }
        if class.is_final {
            header.push_str("final ");
        }
        header.push_str(&format!("class {}", class.name));
        if let Some(parent) = &class.extends {
            header.push_str(&format!(" extends {}", parent.to_source()));
        }
        if !class.implements.is_empty() {
            let interfaces = class
                .implements
                .iter()
                .map(|name| name.to_source())
                .collect::<Vec<_>>()
                .join(", ");
            header.push_str(&format!(" implements {interfaces}"));
        }
        out.push_str(&header);
        out.push('\n');
        out.push_str(&format!("{indent}{{\n"));
        self.print_stmts(&class.stmts, depth + 1, out);
        out.push_str(&format!("{indent}}}\n"));
    }

    fn print_method(&self, method: &ClassMethod, depth: usize, out: &mut String) {
        let indent = INDENT.repeat(depth);
        let mut header = indent.clone();
        if method.is_final {
            header.push_str("final ");
        }
        if method.is_abstract {
            header.push_str("abstract ");
        }
        header.push_str(method.visibility.as_str());
        if method.is_static {
            header.push_str(" static");
        }
        header.push_str(" function ");
        if method.by_ref {
            header.push('&');
        }
        let params = method
            .params
            .iter()
            .map(|param| param.to_source())
            .collect::<Vec<_>>()
            .join(", ");
        header.push_str(&format!("{}({})", method.name, params));

        match &method.stmts {
            None => {
                out.push_str(&header);
                out.push_str(";\n");
            }
            Some(stmts) => {
                out.push_str(&header);
                out.push('\n');
                out.push_str(&format!("{indent}{{\n"));
                self.print_stmts(stmts, depth + 1, out);
                out.push_str(&format!("{indent}}}\n"));
            }
        }
    }
}

impl PrettyPrinter for StandardPrinter {
    fn pretty_print(&self, nodes: &[Node]) -> String {
        let mut out = String::new();
        self.print_stmts(nodes, 0, &mut out);
        out
    }
}

/// Escape a string for a single-quoted literal
fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_string()
    } else if f == f64::INFINITY {
        "INF".to_string()
    } else if f == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        // Debug keeps the fractional part: 1.0 stays "1.0"
        format!("{f:?}")
    }
}
