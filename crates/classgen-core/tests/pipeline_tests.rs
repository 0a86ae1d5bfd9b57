use std::sync::Arc;

use classgen_core::ast::Visibility;
use classgen_core::builder::MethodDescriptor;
use classgen_core::visitor::{inspect, traverse};
use classgen_core::*;
use pretty_assertions::assert_eq;

fn class_name(name: &str) -> ClassName {
    ClassName::parse(name).unwrap()
}

fn descriptor() -> ClassDescriptor {
    let mut descriptor = ClassDescriptor::new(class_name("App\\Foo"));
    descriptor.interfaces = vec![class_name("Countable")];
    descriptor.methods = vec![
        MethodDescriptor::new("publicMethod"),
        MethodDescriptor::new("protectedMethod").with_visibility(Visibility::Protected),
        MethodDescriptor::new("privateMethod").with_visibility(Visibility::Private),
    ];
    descriptor
}

#[test]
fn test_replacing_interfaces_of_a_built_class() {
    let tree = ClassBuilder::new().build(&descriptor()).unwrap();
    let mut implementor = ClassImplementor::new(class_name("App\\Foo"), &[class_name("Iterable")]);
    let tree = traverse(&mut implementor, tree).unwrap();

    let code = BaseGeneratorStrategy::new().generate(&tree).unwrap();
    assert!(code.contains("implements Iterable"), "{code}");
    assert!(!code.contains("Countable"), "{code}");
    assert!(code.starts_with("namespace App;"), "{code}");
    assert!(code.contains("protected function protectedMethod()"), "{code}");
}

#[test]
fn test_generate_write_and_autoload() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClassgenConfig {
        generated_classes_dir: dir.path().to_path_buf(),
        ..ClassgenConfig::default()
    };
    let inflector = config.inflector();
    let mut options = Options::new();
    options.insert("public_only".to_string(), true.into());
    let generated = class_name(&inflector.generated_class_name("App\\Foo", &options));
    assert!(inflector.is_generated_class_name(&generated.to_string()));
    assert_eq!(inflector.user_class_name(&generated.to_string()), "App\\Foo");

    let tree = ClassBuilder::new().build(&descriptor()).unwrap();
    let mut traverser = NodeTraverser::new()
        .with_visitor(Box::new(ClassRenamer::new(class_name("App\\Foo"), generated.clone())))
        .with_visitor(Box::new(ClassExtension::new(generated.clone(), &class_name("App\\Foo"))))
        .with_visitor(Box::new(MethodDisabler::new(PublicMethodsFilter)));
    let tree = traverser.traverse(tree).unwrap();

    let mut resolver = FqcnResolver::new();
    inspect(&mut resolver, &tree).unwrap();
    assert_eq!(resolver.fqcn().unwrap(), generated);

    let locator = config.file_locator().unwrap();
    let mut writer = FileWriterGeneratorStrategy::new(locator.clone());
    let code = writer.generate(&tree).unwrap();
    assert!(code.contains("extends \\App\\Foo"), "{code}");
    assert!(code.contains("publicMethod"));
    assert!(!code.contains("privateMethod"));
    assert!(locator
        .generated_class_file_name(&generated.to_string())
        .exists());

    let runtime = Arc::new(InMemoryRuntime::new());
    let autoloader = Autoloader::new(inflector, locator, Arc::clone(&runtime));
    assert!(!autoloader.load("App\\Foo").unwrap());
    assert!(autoloader.load(&generated.to_string()).unwrap());
    assert!(runtime.is_defined(&generated.to_string()));
    assert!(!autoloader.load(&generated.to_string()).unwrap());
}

#[test]
fn test_evaluating_a_disabled_method_class() {
    let mut descriptor = ClassDescriptor::new(class_name(&format!(
        "Fixtures\\{}",
        UniqueIdentifierGenerator::identifier("Foo")
    )));
    descriptor.methods = vec![MethodDescriptor::new("save"), MethodDescriptor::new("load")];
    let fqcn = descriptor.name.to_string();

    let tree = ClassBuilder::new().build(&descriptor).unwrap();
    let mut disabler = MethodDisabler::new(MethodNameFilter::new(["save"]));
    let tree = traverse(&mut disabler, tree).unwrap();

    let runtime = InMemoryRuntime::without_eval();
    let mut strategy = EvaluatingGeneratorStrategy::new(&runtime);
    let code = strategy.generate(&tree).unwrap();

    assert!(
        code.contains("throw new \\BadMethodCallException('Method is disabled');"),
        "{code}"
    );
    assert_eq!(code.matches("throw new").count(), 1);
    assert!(runtime.is_defined(&fqcn));
}

#[test]
fn test_ambiguous_trees_are_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let locator = DirectoryFileLocator::new(dir.path()).unwrap();
    let mut writer = FileWriterGeneratorStrategy::new(locator);
    let tree = vec![Node::Class(Class::new("Foo")), Node::Class(Class::new("Bar"))];

    let err = writer.generate(&tree).unwrap_err();
    assert!(matches!(
        err,
        ClassgenError::Visitor(VisitorError::AmbiguousTree { .. })
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
