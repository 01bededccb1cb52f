//! Core invariants of type identity, scope resolution and the build driver.

mod common;

use proptest::prelude::*;

use pyrite::ast::Span;
use pyrite::compiler::{FailureKind, ModuleStatus};
use pyrite::frontend::scope::{BlockScope, GlobalScope, Scope};
use pyrite::frontend::symbols::{GlobalVariable, LocalKind, Symbol, TopLevelFunction};
use pyrite::frontend::types::{Type, TypeRegistry};
use pyrite::{CollectingSink, Compiler, CompileError, ModuleId, ModuleSource};

const BUILTINS: [&str; 5] = ["int", "str", "bool", "float", "None"];

fn int() -> Type {
    Type::builtin("int", 4)
}

fn str_type() -> Type {
    Type::builtin("str", 8)
}

// =============================================================================
// Type identity
// =============================================================================

#[test]
fn builtins_resolve_with_their_name_as_id() {
    let registry = TypeRegistry::with_builtins();
    for name in BUILTINS {
        let ty = registry.resolve_by_name(name).unwrap();
        assert_eq!(ty.id(), name);
        assert!(ty.is_builtin());
        assert!(ty.owner().is_none());
    }
}

#[test]
fn user_type_id_is_owner_then_name() {
    let owner = ModuleId::new("mod_01");
    let foo = Type::user("Foo", &owner, 8);
    assert_eq!(foo.id(), "mod_01_Foo");
    assert_eq!(foo, Type::user("Foo", &ModuleId::new("mod_01"), 8));
    assert_ne!(foo, Type::user("Foo", &ModuleId::new("mod_02"), 8));
}

proptest! {
    #[test]
    fn user_types_compare_by_identity(owner in "[a-z]{3}_[0-9a-f]{4}", name in "[A-Z][A-Za-z0-9]{0,10}") {
        let a = Type::user(name.clone(), &ModuleId::new(owner.clone()), 8);
        let b = Type::user(name.clone(), &ModuleId::new(owner.clone()), 8);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.id(), format!("{owner}_{name}"));
        prop_assert_ne!(&a, &Type::builtin(name, 8));
    }
}

// =============================================================================
// Scope resolution
// =============================================================================

#[test]
fn duplicate_argument_is_rejected_before_binding() {
    let args = vec![
        ("x".to_string(), int(), Span::new(6, 7)),
        ("x".to_string(), str_type(), Span::new(14, 15)),
    ];
    let err = TopLevelFunction::with_arguments("f", Span::default(), int(), args).unwrap_err();
    let err = CompileError::from(err);
    assert_eq!(err.message(), "Duplicate argument 'x'");
    assert_eq!(err.as_semantic().unwrap().span, Span::new(14, 15));

    let mut function = TopLevelFunction::new("f", Span::default(), int());
    function.add_argument("x", int(), Span::default()).unwrap();
    assert!(function.add_argument("x", str_type(), Span::default()).is_err());
    assert_eq!(function.arguments().len(), 1);
    assert_eq!(function.arguments()[0].ty, int());
}

proptest! {
    #[test]
    fn arguments_shadow_globals(name in "[a-z_][a-z0-9_]{0,8}") {
        let mut globals = GlobalScope::new();
        globals
            .add_variable(GlobalVariable { name: name.clone(), ty: str_type(), span: Span::default() })
            .unwrap();
        let mut function = TopLevelFunction::new("f", Span::default(), int());
        function.add_argument(name.clone(), int(), Span::default()).unwrap();

        let scope = Scope::Function { scope: function.scope(), parent: &globals };
        let block = BlockScope::new();
        let chain = Scope::Block { scope: &block, parent: &scope };
        for s in [&scope, &chain] {
            match s.lookup(&name) {
                Some(Symbol::Local(var)) => {
                    prop_assert_eq!(var.kind, LocalKind::Argument);
                    prop_assert_eq!(&var.ty, &int());
                }
                other => prop_assert!(false, "expected the argument, got {:?}", other),
            }
        }
        prop_assert!(matches!(Scope::Global(&globals).lookup(&name), Some(Symbol::Global(_))));
    }
}

#[test]
fn local_assigned_later_still_shadows_the_global() {
    let options = common::Project::new("late_local").options();
    let mut compiler = Compiler::new(&options);
    let early_read = "x: str = 'g'\n\ndef f() -> int:\n    y = x\n    x = 1\n    return x\n";
    compiler.register_module(ModuleSource::Inline(early_read.to_string()));
    compiler.register_module(ModuleSource::Inline(
        "x: str = 'g'\n\ndef f() -> int:\n    x = 1\n    y = x\n    return y\n".to_string(),
    ));
    let mut sink = CollectingSink::default();
    let report = compiler.build(&mut sink);

    assert_eq!(report.outcomes[0].status, ModuleStatus::Failed(FailureKind::Semantic));
    let (_, pyrite::BuildError::Compile(err)) = &sink.failures[0] else {
        panic!("expected a compile error");
    };
    let semantic = err.as_semantic().unwrap();
    assert_eq!(semantic.message, "Local variable 'x' referenced before assignment");
    assert_eq!(semantic.line(early_read), 4);

    assert_eq!(report.outcomes[1].status, ModuleStatus::Compiled);
    let body = compiler.modules()[1].globals().function("f").unwrap().body();
    assert_eq!(body.lookup("y").unwrap().ty, int());
}

#[test]
fn unbound_identifier_points_at_its_node() {
    let source = "def f() -> int:\n    return nowhere\n";
    let options = common::Project::new("unbound").options();
    let mut compiler = Compiler::new(&options);
    compiler.register_module(ModuleSource::Inline(source.to_string()));
    let mut sink = CollectingSink::default();
    compiler.build(&mut sink);

    let (_, err) = &sink.failures[0];
    let pyrite::BuildError::Compile(err) = err else {
        panic!("expected a compile error, got {err:?}");
    };
    let semantic = err.as_semantic().unwrap();
    assert_eq!(semantic.message, "Unresolved symbol 'nowhere'");
    assert_eq!(&source[semantic.span.start..semantic.span.end], "nowhere");
    assert_eq!(semantic.line(source), 2);
}

// =============================================================================
// Driver
// =============================================================================

#[test]
fn build_continues_after_a_syntax_error() {
    let options = common::Project::new("continue").options();
    let mut compiler = Compiler::new(&options);
    compiler.register_module(ModuleSource::Inline("a: int = 1\n".into()));
    compiler.register_module(ModuleSource::Inline("def broken(:\n".into()));
    compiler.register_module(ModuleSource::Inline("c: str = 'ok'\n".into()));

    let mut sink = CollectingSink::default();
    let report = compiler.build(&mut sink);

    let statuses: Vec<_> = report.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![
            ModuleStatus::Compiled,
            ModuleStatus::Failed(FailureKind::Compile),
            ModuleStatus::Compiled,
        ]
    );
    assert!(compiler.modules()[2].is_compiled());
    assert_eq!(sink.failures.len(), 1);
}

#[test]
fn missing_return_type_registers_nothing() {
    let options = common::Project::new("noreturn").options();
    let mut compiler = Compiler::new(&options);
    compiler.register_module(ModuleSource::Inline("def f(x: int):\n    return x\n".into()));
    let mut sink = CollectingSink::default();
    let report = compiler.build(&mut sink);

    assert_eq!(report.outcomes[0].status, ModuleStatus::Failed(FailureKind::Semantic));
    let (_, pyrite::BuildError::Compile(err)) = &sink.failures[0] else {
        panic!("expected a compile error");
    };
    assert_eq!(err.message(), "Function 'f' is missing return type");
    assert!(compiler.modules()[0].globals().function("f").is_none());
}

#[test]
fn inline_source_loads_byte_for_byte() {
    let code = "x: int = 1\r\n# trailing\r\n";
    let options = common::Project::new("verbatim").options();
    let mut module = pyrite::Module::new(ModuleSource::Inline(code.to_string()));
    // Whether or not the carriage returns parse, the text is kept as given.
    let _ = module.load(&options);
    assert_eq!(module.source_text().unwrap().as_bytes(), code.as_bytes());
}
