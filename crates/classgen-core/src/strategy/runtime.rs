use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use parking_lot::RwLock;

/// Open tag prefixed to generated source files
pub const OPEN_TAG: &str = "<?php";

/// The host that loads generated classes.
///
/// Class definitions are process-wide: once a class is defined it stays
/// defined. Defining it again replaces the previous definition, so callers
/// generating the same class from several threads must serialize by class
/// name.
pub trait ClassRuntime {
    /// Whether the class is already defined
    fn is_defined(&self, class_name: &str) -> bool;

    /// Whether source can be evaluated directly, without going through a file
    fn can_evaluate(&self) -> bool;

    /// Define the classes declared in the given source (without open tag)
    fn evaluate(&self, code: &str) -> Result<()>;

    /// Load a source file once; loading an already loaded file is a no-op
    fn require(&self, path: &Path) -> Result<bool>;
}

impl<R: ClassRuntime + ?Sized> ClassRuntime for Arc<R> {
    fn is_defined(&self, class_name: &str) -> bool {
        (**self).is_defined(class_name)
    }

    fn can_evaluate(&self) -> bool {
        (**self).can_evaluate()
    }

    fn evaluate(&self, code: &str) -> Result<()> {
        (**self).evaluate(code)
    }

    fn require(&self, path: &Path) -> Result<bool> {
        (**self).require(path)
    }
}

impl<R: ClassRuntime + ?Sized> ClassRuntime for &R {
    fn is_defined(&self, class_name: &str) -> bool {
        (**self).is_defined(class_name)
    }

    fn can_evaluate(&self) -> bool {
        (**self).can_evaluate()
    }

    fn evaluate(&self, code: &str) -> Result<()> {
        (**self).evaluate(code)
    }

    fn require(&self, path: &Path) -> Result<bool> {
        (**self).require(path)
    }
}

/// Class registry that "defines" classes by reading their declarations.
///
/// Nothing is executed: evaluating code records the classes, interfaces and
/// traits it declares under their fully-qualified names.
#[derive(Debug)]
pub struct InMemoryRuntime {
    eval_enabled: bool,
    defined: RwLock<HashSet<String>>,
    required: RwLock<HashSet<PathBuf>>,
}

impl InMemoryRuntime {
    pub fn new() -> Self {
        Self {
            eval_enabled: true,
            defined: RwLock::new(HashSet::new()),
            required: RwLock::new(HashSet::new()),
        }
    }

    /// A runtime refusing direct evaluation; code must be loaded from files
    pub fn without_eval() -> Self {
        Self {
            eval_enabled: false,
            ..Self::new()
        }
    }

    /// Names of all defined classes, sorted
    pub fn defined_classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self.defined.read().iter().cloned().collect();
        classes.sort();
        classes
    }

    fn define_all(&self, code: &str) -> Result<()> {
        let declared = declared_classes(code);
        if declared.is_empty() {
            bail!("no class declaration found in evaluated code");
        }
        let mut defined = self.defined.write();
        for class in declared {
            if defined.contains(&class) {
                tracing::debug!("redefined class {}", class);
            } else {
                tracing::debug!("defined class {}", class);
                defined.insert(class);
            }
        }
        Ok(())
    }
}

impl Default for InMemoryRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRuntime for InMemoryRuntime {
    fn is_defined(&self, class_name: &str) -> bool {
        self.defined
            .read()
            .contains(class_name.trim_start_matches('\\'))
    }

    fn can_evaluate(&self) -> bool {
        self.eval_enabled
    }

    fn evaluate(&self, code: &str) -> Result<()> {
        if !self.eval_enabled {
            return Err(anyhow!("evaluation is disabled in this runtime"));
        }
        self.define_all(code)
    }

    fn require(&self, path: &Path) -> Result<bool> {
        let path = path
            .canonicalize()
            .with_context(|| format!("failed to open '{}'", path.display()))?;
        if self.required.read().contains(&path) {
            return Ok(true);
        }

        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let code = source.trim_start().strip_prefix(OPEN_TAG).unwrap_or(&source);
        self.define_all(code)?;
        self.required.write().insert(path);
        Ok(true)
    }
}

/// Fully-qualified names of the classes, interfaces and traits declared in
/// a piece of source, in declaration order
pub fn declared_classes(code: &str) -> Vec<String> {
    let tokens = tokenize(code);
    let mut namespace = String::new();
    let mut declared = Vec::new();

    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        match token.text.as_str() {
            "namespace" if !token.after_scope_operator => {
                namespace = match tokens.get(index + 1) {
                    Some(next) if !next.text.is_empty() && next.text != "{" => {
                        index += 1;
                        next.text.trim_matches('\\').to_string()
                    }
                    _ => String::new(),
                };
            }
            "class" | "interface" | "trait" if !token.after_scope_operator => {
                let anonymous = index > 0 && tokens[index - 1].text == "new";
                if let (false, Some(next)) = (anonymous, tokens.get(index + 1)) {
                    index += 1;
                    if namespace.is_empty() {
                        declared.push(next.text.clone());
                    } else {
                        declared.push(format!("{namespace}\\{}", next.text));
                    }
                }
            }
            _ => {}
        }
        index += 1;
    }
    declared
}

#[derive(Debug)]
struct Token {
    text: String,
    /// Preceded by `::`, as in `Foo::class`
    after_scope_operator: bool,
}

/// Splits source into name tokens and braces, skipping string literals
fn tokenize(code: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut previous = ' ';
    let mut start_previous = ' ';
    let mut chars = code.chars();

    let flush = |current: &mut String, tokens: &mut Vec<Token>, start_previous: char| {
        if !current.is_empty() {
            tokens.push(Token {
                text: std::mem::take(current),
                after_scope_operator: start_previous == ':',
            });
        }
    };

    while let Some(c) = chars.next() {
        if c.is_alphanumeric() || c == '_' || c == '\\' || (c as u32) > 0x7e {
            if current.is_empty() {
                start_previous = previous;
            }
            current.push(c);
        } else {
            flush(&mut current, &mut tokens, start_previous);
            match c {
                '\'' | '"' => {
                    let mut escaped = false;
                    for inner in chars.by_ref() {
                        if escaped {
                            escaped = false;
                        } else if inner == '\\' {
                            escaped = true;
                        } else if inner == c {
                            break;
                        }
                    }
                }
                '{' => tokens.push(Token {
                    text: "{".to_string(),
                    after_scope_operator: false,
                }),
                _ => {}
            }
        }
        previous = c;
    }
    flush(&mut current, &mut tokens, start_previous);
    tokens
}
