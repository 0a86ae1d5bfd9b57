//! Classgen CLI - command-line front end for classgen
//!
//! Parses command lines into [`CliCommand`]s and runs them against a
//! [`ClassgenConfig`]: inflecting class names, recovering user class names and
//! generating classes from JSON descriptors.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use classgen_core::ast::Literal;
use classgen_core::visitor::NodeVisitor;
use classgen_core::{
    BaseGeneratorStrategy, ClassBuilder, ClassDescriptor, ClassExtension, ClassImplementor,
    ClassName, ClassRenamer, ClassgenConfig, FileLocator, FileWriterGeneratorStrategy,
    GeneratorStrategy, Inflector, MethodDisabler, MethodNameFilter, NodeTraverser, Options,
    PublicMethodsFilter,
};

/// Build the command line definition
pub fn build_cli() -> Command {
    Command::new("classgen")
        .version(classgen_core::VERSION)
        .about("Generate classes from class descriptors and inflect generated class names")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("JSON configuration file")
                .global(true),
        )
        .arg(
            Arg::new("namespace")
                .long("namespace")
                .value_name("NAMESPACE")
                .help("Namespace of generated classes")
                .global(true),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .value_name("DIR")
                .help("Directory of generated class files")
                .global(true),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("inflect")
                .about("Print the generated class name of a class")
                .arg(class_arg())
                .arg(option_arg()),
        )
        .subcommand(
            Command::new("user-name")
                .about("Print the user class name of a (generated) class name")
                .arg(class_arg()),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate a class from a JSON class descriptor")
                .arg(
                    Arg::new("descriptor")
                        .value_name("DESCRIPTOR")
                        .help("JSON class descriptor file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("rename")
                        .long("rename")
                        .value_name("FQCN")
                        .help("Rename the class"),
                )
                .arg(
                    Arg::new("extends")
                        .long("extends")
                        .value_name("FQCN")
                        .help("Set the parent class"),
                )
                .arg(
                    Arg::new("implements")
                        .long("implements")
                        .value_name("FQCN")
                        .help("Replace the implemented interfaces (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("disable")
                        .long("disable")
                        .value_name("METHOD")
                        .help("Disable a method (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("public-only")
                        .long("public-only")
                        .help("Drop every non-public method")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("inflect")
                        .long("inflect")
                        .help("Rename the class to its generated class name")
                        .action(ArgAction::SetTrue),
                )
                .arg(option_arg())
                .arg(
                    Arg::new("write")
                        .long("write")
                        .help("Write the class to the generated classes directory")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn class_arg() -> Arg {
    Arg::new("class")
        .value_name("CLASS")
        .help("Fully-qualified class name")
        .required(true)
        .index(1)
}

fn option_arg() -> Arg {
    Arg::new("option")
        .short('o')
        .long("option")
        .value_name("KEY=VALUE")
        .help("Generation option; JSON values are parsed, anything else is a string")
        .action(ArgAction::Append)
}

/// What to generate from a descriptor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateRequest {
    pub descriptor: PathBuf,
    pub rename: Option<String>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub disable: Vec<String>,
    pub public_only: bool,
    pub inflect: bool,
    pub options: Options,
    pub write: bool,
}

/// Parsed subcommands
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Inflect { class: String, options: Options },
    UserName { class: String },
    Generate(GenerateRequest),
}

impl CliCommand {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        match matches.subcommand() {
            Some(("inflect", sub)) => Ok(CliCommand::Inflect {
                class: required(sub, "class")?,
                options: parse_options(sub)?,
            }),
            Some(("user-name", sub)) => Ok(CliCommand::UserName {
                class: required(sub, "class")?,
            }),
            Some(("generate", sub)) => Ok(CliCommand::Generate(GenerateRequest {
                descriptor: required(sub, "descriptor")?.into(),
                rename: sub.get_one::<String>("rename").cloned(),
                extends: sub.get_one::<String>("extends").cloned(),
                implements: many(sub, "implements"),
                disable: many(sub, "disable"),
                public_only: sub.get_flag("public-only"),
                inflect: sub.get_flag("inflect"),
                options: parse_options(sub)?,
                write: sub.get_flag("write"),
            })),
            Some((other, _)) => Err(anyhow!("Unknown command: {other}")),
            None => Err(anyhow!("No command given")),
        }
    }
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| anyhow!("Missing argument: {id}"))
}

fn many(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn parse_options(matches: &ArgMatches) -> Result<Options> {
    many(matches, "option")
        .iter()
        .map(|option| parse_option(option))
        .collect()
}

/// Parse `key=value`; the value is read as JSON when possible
pub fn parse_option(option: &str) -> Result<(String, Literal)> {
    let (key, value) = option
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid option '{option}': expected KEY=VALUE"))?;
    if key.is_empty() {
        return Err(anyhow!("Invalid option '{option}': empty key"));
    }
    let value = serde_json::from_str::<Literal>(value)
        .unwrap_or_else(|_| Literal::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Value of a global argument, given before or after the subcommand
fn global_value<'a>(matches: &'a ArgMatches, id: &str) -> Option<&'a String> {
    matches
        .subcommand()
        .and_then(|(_, sub)| sub.get_one::<String>(id))
        .or_else(|| matches.get_one::<String>(id))
}

/// Whether `--debug` was given anywhere on the command line
pub fn debug_requested(matches: &ArgMatches) -> bool {
    matches.get_flag("debug")
        || matches
            .subcommand()
            .is_some_and(|(_, sub)| sub.get_flag("debug"))
}

/// Load the configuration file (if any) and apply command line overrides
pub fn load_config(matches: &ArgMatches) -> Result<ClassgenConfig> {
    let mut config = match global_value(matches, "config") {
        Some(path) => ClassgenConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {path}"))?,
        None => ClassgenConfig::default(),
    };
    if let Some(namespace) = global_value(matches, "namespace") {
        config.generated_namespace = namespace.clone();
    }
    if let Some(dir) = global_value(matches, "output-dir") {
        config.generated_classes_dir = dir.into();
    }
    Ok(config)
}

/// Runs commands against a configuration
pub struct Cli {
    config: ClassgenConfig,
}

impl Cli {
    pub fn new(config: ClassgenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassgenConfig {
        &self.config
    }

    /// Run a command, returning its output
    pub fn handle_command(&self, command: CliCommand) -> Result<String> {
        match command {
            CliCommand::Inflect { class, options } => {
                let class = parse_class_name(&class)?;
                Ok(self
                    .config
                    .inflector()
                    .generated_class_name(&class.to_string(), &options))
            }
            CliCommand::UserName { class } => {
                let class = parse_class_name(&class)?;
                Ok(self.config.inflector().user_class_name(&class.to_string()))
            }
            CliCommand::Generate(request) => self.generate(request),
        }
    }

    fn generate(&self, request: GenerateRequest) -> Result<String> {
        let descriptor = ClassDescriptor::from_file(&request.descriptor).with_context(|| {
            format!("failed to load descriptor {}", request.descriptor.display())
        })?;
        let tree = ClassBuilder::new().build(&descriptor)?;

        let original = descriptor.name.clone();
        let mut target = match &request.rename {
            Some(name) => parse_class_name(name)?,
            None => original.clone(),
        };
        if request.inflect {
            let inflected = self
                .config
                .inflector()
                .generated_class_name(&target.to_string(), &request.options);
            target = parse_class_name(&inflected)?;
        }

        let mut visitors: Vec<Box<dyn NodeVisitor>> = Vec::new();
        if target != original {
            visitors.push(Box::new(ClassRenamer::new(original, target.clone())));
        }
        if let Some(parent) = &request.extends {
            visitors.push(Box::new(ClassExtension::new(
                target.clone(),
                &parse_class_name(parent)?,
            )));
        }
        if !request.implements.is_empty() {
            let interfaces = request
                .implements
                .iter()
                .map(|name| parse_class_name(name))
                .collect::<Result<Vec<_>>>()?;
            visitors.push(Box::new(ClassImplementor::new(target.clone(), &interfaces)));
        }
        if request.public_only {
            visitors.push(Box::new(MethodDisabler::new(PublicMethodsFilter)));
        }
        if !request.disable.is_empty() {
            visitors.push(Box::new(MethodDisabler::new(MethodNameFilter::new(
                &request.disable,
            ))));
        }

        let mut traverser = NodeTraverser::new();
        for visitor in visitors {
            traverser.add_visitor(visitor);
        }
        let tree = traverser.traverse(tree)?;
        for stats in traverser.stats().values() {
            tracing::debug!(
                "{}: {} node(s), {} replacement(s), {} removal(s)",
                stats.visitor_name,
                stats.nodes_entered,
                stats.replacements,
                stats.removals
            );
        }

        if request.write {
            std::fs::create_dir_all(&self.config.generated_classes_dir)?;
            let locator = self.config.file_locator()?;
            let path = locator.generated_class_file_name(&target.to_string());
            FileWriterGeneratorStrategy::new(locator).generate(&tree)?;
            tracing::info!("generated {}", target);
            Ok(format!("Wrote {} to {}", target, path.display()))
        } else {
            let code = BaseGeneratorStrategy::new().generate(&tree)?;
            Ok(format!("<?php\n\n{code}"))
        }
    }
}

fn parse_class_name(name: &str) -> Result<ClassName> {
    ClassName::parse(name).with_context(|| format!("invalid class name '{name}'"))
}

/// Parse the command line, load the configuration and run the command
pub fn run(matches: &ArgMatches) -> Result<String> {
    let config = load_config(matches)?;
    let command = CliCommand::from_matches(matches)?;
    Cli::new(config).handle_command(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option() {
        assert_eq!(
            parse_option("count=3").unwrap(),
            ("count".to_string(), Literal::Int(3))
        );
        assert_eq!(
            parse_option("flag=true").unwrap(),
            ("flag".to_string(), Literal::Bool(true))
        );
        assert_eq!(
            parse_option("name=foo").unwrap(),
            ("name".to_string(), Literal::from("foo"))
        );
        assert_eq!(
            parse_option("empty=").unwrap(),
            ("empty".to_string(), Literal::from(""))
        );
        assert!(parse_option("novalue").is_err());
        assert!(parse_option("=value").is_err());
    }

    #[test]
    fn test_from_matches() {
        let matches = build_cli()
            .try_get_matches_from([
                "classgen",
                "generate",
                "foo.json",
                "--implements",
                "A",
                "--implements",
                "B",
                "--public-only",
                "-o",
                "x=1",
            ])
            .unwrap();
        let request = match CliCommand::from_matches(&matches).unwrap() {
            CliCommand::Generate(request) => request,
            other => panic!("expected generate, got {other:?}"),
        };
        assert_eq!(request.descriptor, PathBuf::from("foo.json"));
        assert_eq!(request.implements, vec!["A", "B"]);
        assert!(request.public_only);
        assert!(!request.write);
        assert_eq!(request.options["x"], Literal::Int(1));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }
}
