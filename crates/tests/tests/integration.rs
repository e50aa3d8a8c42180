//! End-to-end tests for binding resolution.
//!
//! Each test builds a small registry against [`FIXTURE_CLASSES`], runs the
//! pass and checks the rewritten definitions or the reported errors.

use binder_definition::{
    Argument, BindingOrigin, BoundArgument, Factory, MethodCall, Reference, ServiceDefinition,
    TypedReference,
};
use binder_foundation::{ClassName, ServiceId};
use binder_resolve::{ErrorKind, ResolveConfig, ResolveError};
use binder_tests::{FIXTURE_CLASSES, TestHarness};

const DUMMY: &str = "fixtures.NamedArgumentsDummy";
const SENSITIVE: &str = "fixtures.CaseSensitiveClass";

fn error_messages(harness: &mut TestHarness) -> Vec<String> {
    harness
        .resolve()
        .expect_err("resolution should fail")
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Constructor gaps and setter arguments are filled from type bindings,
/// and a definition sharing the same bindings counts them as used.
#[test]
fn test_type_binding_fills_constructor_and_setter() {
    let mut harness = TestHarness::new();
    let bindings = [(SENSITIVE, BoundArgument::from(Reference::new("foo")))];

    harness
        .register(DUMMY, ServiceDefinition::new(DUMMY))
        .set_argument(1, "123")
        .add_method_call("setSensitiveClass")
        .set_bindings(bindings.clone());
    harness
        .register("foo", ServiceDefinition::new(SENSITIVE))
        .set_bindings(bindings);

    let report = harness.resolve().unwrap();
    assert_eq!(report.definitions, 2);
    assert_eq!(report.bindings_used, 1);

    let dummy = harness.definition(DUMMY);
    assert_eq!(
        dummy.arguments.to_vec(),
        vec![Argument::reference("foo"), Argument::from("123")]
    );
    assert_eq!(
        dummy.method_calls,
        vec![MethodCall::with_arguments(
            "setSensitiveClass",
            vec![Argument::reference("foo")]
        )]
    );
    assert!(harness.definition("foo").bindings.values().all(BoundArgument::is_used));
}

/// A binding no parameter consumes is reported with the service it was
/// declared on.
#[test]
fn test_unused_binding_is_reported() {
    let mut harness = TestHarness::new();
    harness
        .register(DUMMY, ServiceDefinition::new(DUMMY))
        .set_bindings([("$quz", "123")]);

    let messages = error_messages(&mut harness);
    assert_eq!(
        messages,
        vec![format!("Unused binding \"$quz\" in service \"{DUMMY}\".")]
    );
}

/// The source file of an unused binding is part of the message.
#[test]
fn test_unused_binding_names_its_file() {
    let mut harness = TestHarness::new();
    harness
        .register("mailer", ServiceDefinition::new(DUMMY))
        .set_bindings([(
            "$quz",
            BoundArgument::new("123").with_file("config/services.yaml"),
        )]);

    assert_eq!(
        error_messages(&mut harness),
        vec![
            "Unused binding \"$quz\" in service \"mailer\" (declared in \"config/services.yaml\")."
                .to_owned()
        ]
    );
}

/// A class whose ancestor cannot be loaded fails resolution, and its
/// bindings end up unused.
#[test]
fn test_missing_parent_class() {
    let mut harness = TestHarness::new();
    harness
        .register(
            "fixtures.ParentNotExists",
            ServiceDefinition::new("fixtures.ParentNotExists"),
        )
        .set_bindings([("$quz", "123")]);

    let errors = harness.resolve().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.0[0].kind(), ErrorKind::UnusedBinding);
    assert_eq!(errors.0[1].kind(), ErrorKind::MissingClass);
    assert_eq!(
        errors.0[1].to_string(),
        "Invalid service \"fixtures.ParentNotExists\": class NotExists not found."
    );
}

/// A child definition inherits a class that does not exist.
#[test]
fn test_missing_class_through_parent_definition() {
    let mut harness = TestHarness::new();
    harness.register("base", ServiceDefinition::new("NotExists"));
    harness
        .register("child", ServiceDefinition::child("base"))
        .set_bindings([("$apiKey", "123")]);

    let messages = error_messages(&mut harness);
    assert_eq!(
        messages,
        vec![
            "Unused binding \"$apiKey\" in service \"child\".".to_owned(),
            "Invalid service \"child\": class NotExists not found (via child -> base).".to_owned(),
        ]
    );
}

/// Child definitions bind against the class inherited from their parent.
#[test]
fn test_child_definition_uses_parent_class() {
    let mut harness = TestHarness::new();
    harness.register("base", ServiceDefinition::new(DUMMY)).set_abstract(true);
    harness
        .register("child", ServiceDefinition::child("base"))
        .set_bindings([("$apiKey", "secret"), ("$hostName", "example.org")]);

    harness.resolve().unwrap();
    let child = harness.definition("child");
    assert_eq!(child.arguments.get(0), None);
    assert_eq!(child.arguments.get(1), Some(&Argument::from("secret")));
    assert_eq!(child.arguments.get(2), Some(&Argument::from("example.org")));
}

/// An unregistered parent is a missing class error carrying the chain.
#[test]
fn test_unknown_parent_definition() {
    let mut harness = TestHarness::new();
    harness
        .register("child", ServiceDefinition::child("ghost"))
        .set_bindings([("$apiKey", "123")]);

    let errors = harness.resolve().unwrap_err();
    let missing: Vec<_> = errors.of_kind(ErrorKind::MissingClass).collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(
        missing[0].to_string(),
        "Invalid service \"child\": definition \"ghost\" does not exist (via child -> ghost)."
    );
}

/// Explicit typed references are kept; autowire placeholders are replaced.
#[test]
fn test_typed_reference_support() {
    let mut harness = TestHarness::new();
    let bindings = [(SENSITIVE, BoundArgument::from(Reference::new("foo")))];
    let explicit = TypedReference::new("bar", SENSITIVE);

    harness
        .register("def1", ServiceDefinition::new(DUMMY))
        .add_argument(explicit.clone())
        .set_bindings(bindings.clone());
    harness
        .register("def2", ServiceDefinition::new(DUMMY))
        .add_argument(TypedReference::placeholder(SENSITIVE))
        .set_bindings(bindings);

    harness.resolve().unwrap();
    assert_eq!(
        harness.definition("def1").arguments.get(0),
        Some(&Argument::TypedReference(explicit))
    );
    assert_eq!(
        harness.definition("def2").arguments.get(0),
        Some(&Argument::reference("foo"))
    );
}

/// Untyped setter parameters bind by name.
#[test]
fn test_scalar_setter() {
    let mut harness = TestHarness::new();
    harness
        .register("foo", ServiceDefinition::new("fixtures.ScalarSetter"))
        .add_method_call("setDefaultLocale")
        .set_bindings([("$defaultLocale", "fr")]);

    harness.resolve().unwrap();
    assert_eq!(
        harness.definition("foo").method_calls,
        vec![MethodCall::with_arguments(
            "setDefaultLocale",
            vec![Argument::from("fr")]
        )]
    );
}

/// Method names match regardless of case.
#[test]
fn test_method_names_are_case_insensitive() {
    let mut harness = TestHarness::new();
    harness
        .register("foo", ServiceDefinition::new("fixtures.ScalarSetter"))
        .add_method_call("SETDEFAULTLOCALE")
        .set_bindings([("$defaultLocale", "fr")]);

    harness.resolve().unwrap();
    assert_eq!(
        harness.definition("foo").method_calls[0].arguments.get(0),
        Some(&Argument::from("fr"))
    );
}

/// Calling a setter the class does not declare is an invalid injection
/// target, and the definition is left as it was.
#[test]
fn test_non_existing_setter() {
    let mut harness = TestHarness::new();
    harness
        .register(DUMMY, ServiceDefinition::new(DUMMY))
        .add_method_call("setLogger")
        .set_bindings([("$apiKey", "123")]);
    let original = harness.definition(DUMMY).clone();

    let errors = harness.resolve().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.0[0],
        ResolveError::InvalidInjectionTarget {
            service: ServiceId::from(DUMMY),
            class: ClassName::from(DUMMY),
            method: "setLogger".to_owned(),
        }
    );
    assert_eq!(
        errors.to_string(),
        format!("Invalid service \"{DUMMY}\": method \"{DUMMY}::setLogger()\" does not exist.")
    );
    assert_eq!(harness.definition(DUMMY).arguments, original.arguments);
}

/// Classes forwarding unknown calls accept any setter.
#[test]
fn test_magic_call_accepts_undeclared_setters() {
    let mut harness = TestHarness::new();
    harness
        .register("proxy", ServiceDefinition::new("fixtures.MagicProxy"))
        .add_method_call("setAnything")
        .set_bindings([("$unused", "x")]);

    let errors = harness.resolve().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.0[0].kind(), ErrorKind::UnusedBinding);
}

/// `Type $name` beats `$name` for a typed parameter; untyped parameters
/// fall back to the name binding.
#[test]
fn test_tuple_binding() {
    let mut harness = TestHarness::new();
    harness
        .register(DUMMY, ServiceDefinition::new(DUMMY))
        .add_method_call("setSensitiveClass")
        .add_method_call("setAnotherC")
        .set_bindings([
            ("$c", BoundArgument::from(Reference::new("bar"))),
            (
                "fixtures.CaseSensitiveClass $c",
                BoundArgument::from(Reference::new("foo")),
            ),
        ]);

    harness.resolve().unwrap();
    let dummy = harness.definition(DUMMY);
    assert_eq!(dummy.arguments.get(0), Some(&Argument::reference("foo")));
    assert_eq!(
        dummy.method_calls,
        vec![
            MethodCall::with_arguments("setSensitiveClass", vec![Argument::reference("foo")]),
            MethodCall::with_arguments("setAnotherC", vec![Argument::reference("bar")]),
        ]
    );
}

/// Keys written with or without a space before `$` are the same tuple.
#[test]
fn test_compact_tuple_key() {
    let mut harness = TestHarness::new();
    harness
        .register(DUMMY, ServiceDefinition::new(DUMMY))
        .set_bindings([("fixtures.CaseSensitiveClass$c", BoundArgument::from(Reference::new("foo")))]);

    harness.resolve().unwrap();
    assert_eq!(
        harness.definition(DUMMY).arguments.get(0),
        Some(&Argument::reference("foo"))
    );
}

/// Explicit values are never overwritten and do not consume bindings.
#[test]
fn test_explicit_arguments_win() {
    let mut harness = TestHarness::new();
    harness
        .register(DUMMY, ServiceDefinition::new(DUMMY))
        .set_argument(1, "explicit")
        .set_bindings([("$apiKey", "bound")]);

    let errors = harness.resolve().unwrap_err();
    assert_eq!(
        errors.0[0].binding_key().map(ToString::to_string),
        Some("$apiKey".to_owned())
    );
    assert_eq!(
        harness.definition(DUMMY).arguments.get(1),
        Some(&Argument::from("explicit"))
    );
}

/// Service factories are introspected for constructor bindings.
#[test]
fn test_service_factory() {
    let mut harness = TestHarness::new();
    harness.register("logger.factory", ServiceDefinition::new("fixtures.LoggerFactory"));
    harness
        .register("logger", ServiceDefinition::new(SENSITIVE))
        .set_factory(Factory::Service {
            service: ServiceId::from("logger.factory"),
            method: "create".to_owned(),
        })
        .set_bindings([("$channel", "app")]);

    harness.resolve().unwrap();
    assert_eq!(
        harness.definition("logger").arguments.to_vec(),
        vec![Argument::from("app")]
    );
}

/// A factory method the factory class lacks is an invalid target.
#[test]
fn test_missing_factory_method() {
    let mut harness = TestHarness::new();
    harness
        .register("logger", ServiceDefinition::new(SENSITIVE))
        .set_factory(Factory::Static {
            class: ClassName::from("fixtures.LoggerFactory"),
            method: "build".to_owned(),
        })
        .set_bindings([("$channel", "app")]);

    let errors = harness.resolve().unwrap_err();
    assert_eq!(errors.of_kind(ErrorKind::InvalidInjectionTarget).count(), 1);
}

/// Bindings inherited from defaults are only reported when asked for.
#[test]
fn test_inherited_unused_bindings() {
    let build = || {
        let mut harness = TestHarness::new();
        harness
            .register("foo", ServiceDefinition::new(SENSITIVE))
            .set_bindings([(
                "$locale",
                BoundArgument::new("en").with_origin(BindingOrigin::Defaults),
            )]);
        harness
    };

    build().resolve().unwrap();

    let config = ResolveConfig {
        report_inherited_unused: true,
        ..ResolveConfig::default()
    };
    let errors = build().resolve_with(config).unwrap_err();
    assert_eq!(errors.of_kind(ErrorKind::UnusedBinding).count(), 1);
}

/// Abstract definitions are not rewritten.
#[test]
fn test_abstract_definition_is_skipped() {
    let mut harness = TestHarness::new();
    harness
        .register("template", ServiceDefinition::new(DUMMY))
        .set_abstract(true)
        .set_bindings([("$apiKey", "123")]);

    let result = harness.resolve();
    assert!(harness.definition("template").arguments.is_empty());
    assert_eq!(result.unwrap_err().len(), 1);
}

/// Inline definitions resolve against their own bindings.
#[test]
fn test_inline_definition() {
    let mut inner = ServiceDefinition::new("fixtures.ScalarSetter");
    inner
        .add_method_call("setDefaultLocale")
        .set_bindings([("$defaultLocale", "de")]);

    let mut harness = TestHarness::new();
    harness
        .register("outer", ServiceDefinition::new(DUMMY))
        .add_argument(inner);

    harness.resolve().unwrap();
    let Some(Argument::Definition(inner)) = harness.definition("outer").arguments.get(0) else {
        panic!("inline definition missing");
    };
    assert_eq!(inner.method_calls[0].arguments.get(0), Some(&Argument::from("de")));
}

/// A bound value that is itself a definition is resolved once substituted.
#[test]
fn test_bound_inline_definition_is_resolved() {
    let mut setter = ServiceDefinition::new("fixtures.ScalarSetter");
    setter
        .add_method_call("setDefaultLocale")
        .set_bindings([("$defaultLocale", "fr")]);

    let mut harness = TestHarness::new();
    harness
        .register(DUMMY, ServiceDefinition::new(DUMMY))
        .set_bindings([("$apiKey", BoundArgument::new(setter))]);

    harness.resolve().unwrap();
    let Some(Argument::Definition(inner)) = harness.definition(DUMMY).arguments.get(1) else {
        panic!("bound definition not substituted");
    };
    assert_eq!(
        inner.method_calls,
        vec![MethodCall::with_arguments(
            "setDefaultLocale",
            vec![Argument::from("fr")]
        )]
    );
}

/// Bindings carried by a substituted definition are accounted for.
#[test]
fn test_bound_inline_definition_reports_unused_bindings() {
    let mut setter = ServiceDefinition::new("fixtures.ScalarSetter");
    setter
        .add_method_call("setDefaultLocale")
        .set_bindings([("$defaultLocale", "fr"), ("$neverUsed", "x")]);

    let mut harness = TestHarness::new();
    harness
        .register(DUMMY, ServiceDefinition::new(DUMMY))
        .set_bindings([("$apiKey", BoundArgument::new(setter))]);

    assert_eq!(
        error_messages(&mut harness),
        vec![format!("Unused binding \"$neverUsed\" in service \"{DUMMY}\".")]
    );
}

/// A bound definition calling a setter its class lacks fails the whole
/// enclosing definition, which stays uncompiled.
#[test]
fn test_bound_inline_definition_with_non_existing_setter() {
    let mut setter = ServiceDefinition::new("fixtures.ScalarSetter");
    setter
        .add_method_call("setDefaultLocale")
        .add_method_call("setLogger")
        .set_bindings([("$defaultLocale", "fr")]);

    let mut harness = TestHarness::new();
    harness
        .register(DUMMY, ServiceDefinition::new(DUMMY))
        .set_bindings([("$apiKey", BoundArgument::new(setter))]);

    let errors = harness.resolve().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.0[0],
        ResolveError::InvalidInjectionTarget {
            service: ServiceId::from(DUMMY),
            class: ClassName::from("fixtures.ScalarSetter"),
            method: "setLogger".to_owned(),
        }
    );
    assert!(harness.definition(DUMMY).arguments.is_empty());
}

/// An empty string marks a constructor slot still to be filled.
#[test]
fn test_blank_argument_is_filled() {
    let mut harness = TestHarness::new();
    harness
        .register(DUMMY, ServiceDefinition::new(DUMMY))
        .set_argument(1, "")
        .set_bindings([("$apiKey", "bound")]);

    harness.resolve().unwrap();
    assert_eq!(
        harness.definition(DUMMY).arguments.get(1),
        Some(&Argument::from("bound"))
    );
}

/// A far sparse position neither overflows nor stalls the pass.
#[test]
fn test_far_argument_position() {
    let mut harness = TestHarness::new();
    harness
        .register(DUMMY, ServiceDefinition::new(DUMMY))
        .set_argument(usize::MAX, "x")
        .set_bindings([("$apiKey", "bound")]);

    harness.resolve().unwrap();
    let dummy = harness.definition(DUMMY);
    assert_eq!(dummy.arguments.get(1), Some(&Argument::from("bound")));
    assert_eq!(dummy.arguments.get(usize::MAX), Some(&Argument::from("x")));
}

/// Every problem in the registry is reported in one run, unused bindings first.
#[test]
fn test_errors_are_aggregated() {
    let mut harness = TestHarness::new();
    harness
        .register("a", ServiceDefinition::new(DUMMY))
        .add_method_call("setLogger")
        .set_bindings([("$quz", "1")]);
    harness
        .register("b", ServiceDefinition::new(DUMMY))
        .set_bindings([("$nope", "2")]);

    let errors = harness.resolve().unwrap_err();
    let kinds: Vec<ErrorKind> = errors.iter().map(ResolveError::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ErrorKind::UnusedBinding,
            ErrorKind::UnusedBinding,
            ErrorKind::InvalidInjectionTarget,
        ]
    );
    assert!(errors.to_string().starts_with("3 binding resolution errors:"));
}

/// Registries and class metadata load from JSON documents.
#[test]
fn test_json_fixtures() {
    let definitions = r#"{
        "mailer": {
            "class": "fixtures.NamedArgumentsDummy",
            "arguments": {"1": {"string": "123"}},
            "method_calls": [{"method": "setSensitiveClass"}],
            "bindings": {
                "fixtures.CaseSensitiveClass": {"value": {"reference": {"id": "foo"}}},
                "$hostName": {"value": {"string": "localhost"}}
            }
        }
    }"#;

    let mut harness = TestHarness::from_json(definitions, FIXTURE_CLASSES);
    let report = harness.resolve().unwrap();
    assert_eq!(report.substitutions, 3);

    let mailer = harness.definition("mailer");
    assert_eq!(
        mailer.arguments.to_vec(),
        vec![
            Argument::reference("foo"),
            Argument::from("123"),
            Argument::from("localhost"),
        ]
    );
}
