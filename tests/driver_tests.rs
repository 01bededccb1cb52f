//! End-to-end builds over files on disk: discovery, ordering, imports and failure isolation.

mod common;

use common::Project;
use pyrite::compiler::{BuildReport, FailureKind, ModuleStatus};
use pyrite::frontend::symbols::Symbol;
use pyrite::{BuildError, CollectingSink, Compiler, CompilerOptions};

fn build<'a>(options: &'a CompilerOptions, entry: &str) -> (Compiler<'a>, BuildReport, CollectingSink) {
    let mut compiler = Compiler::new(options);
    compiler.add_source_file(entry, true);
    let mut sink = CollectingSink::default();
    let report = compiler.build(&mut sink);
    (compiler, report, sink)
}

fn messages(sink: &CollectingSink) -> Vec<String> {
    sink.failures
        .iter()
        .map(|(_, err)| match err {
            BuildError::Compile(err) => err.message().to_string(),
            BuildError::User(err) => err.message.clone(),
        })
        .collect()
}

#[test]
fn imports_bind_modules_functions_and_types() {
    let project = Project::new("imports");
    project.file(
        "util.py",
        "LIMIT: int = 10\n\nclass Point:\n    x: int\n    y: int\n\ndef double(n: int) -> int:\n    return n * 2\n",
    );
    project.file(
        "main.py",
        "import util\nfrom util import double, Point, LIMIT\n\ndef main() -> int:\n    p: Point = Point()\n    return util.double(2) + double(LIMIT) + util.LIMIT\n",
    );
    let options = project.options();
    let (compiler, report, sink) = build(&options, "main.py");

    assert!(report.is_success(), "{:?}", messages(&sink));
    assert_eq!(report.outcomes.len(), 2);

    let main = compiler.entry().unwrap();
    let util = &compiler.modules()[1];
    assert!(matches!(main.globals().lookup("util"), Some(Symbol::Module(_))));
    assert!(matches!(main.globals().lookup("double"), Some(Symbol::External(_))));
    assert!(matches!(main.globals().lookup("LIMIT"), Some(Symbol::Global(_))));

    let point = main.types().resolve_by_name("Point").unwrap();
    assert_eq!(point.owner(), Some(util.id()));
    assert_eq!(point, util.types().resolve_by_name("Point").unwrap());
    assert_eq!(point.id(), format!("{}_Point", util.id()));

    let body = main.globals().function("main").unwrap().body();
    assert_eq!(body.lookup("p").unwrap().ty, *point);
}

#[test]
fn dependencies_compile_first_and_are_shared() {
    let project = Project::new("diamond");
    project.file("shared.py", "def one() -> int:\n    return 1\n");
    project.file("a.py", "import shared\n\ndef a() -> int:\n    return shared.one()\n");
    project.file("b.py", "from shared import one\n\ndef b() -> int:\n    return one()\n");
    project.file("main.py", "import a\nimport b\n\ndef main() -> int:\n    return a.a() + b.b()\n");
    let options = project.options();
    let (compiler, report, sink) = build(&options, "main.py");

    assert!(report.is_success(), "{:?}", messages(&sink));
    assert_eq!(compiler.modules().len(), 4);
    let shared: Vec<_> = report
        .outcomes
        .iter()
        .filter(|o| o.display_path.ends_with("shared.py"))
        .collect();
    assert_eq!(shared.len(), 1);
}

#[test]
fn packages_and_include_paths() {
    let project = Project::new("packages");
    project.file("geometry/__init__.py", "def area(w: int, h: int) -> int:\n    return w * h\n");
    project.file("vendor/extra.py", "def answer() -> int:\n    return 42\n");
    project.file(
        "main.py",
        "import geometry\nfrom extra import answer\n\nsize: int = geometry.area(2, 3) + answer()\n",
    );
    let options = project.options().with_include_paths([project.root().join("vendor")]);
    let (_, report, sink) = build(&options, "main.py");
    assert!(report.is_success(), "{:?}", messages(&sink));
    assert_eq!(report.compiled_count(), 3);
}

#[test]
fn dotted_imports_bind_the_top_level_package() {
    let project = Project::new("dotted");
    project.file("geometry/shapes.py", "def area(w: int, h: int) -> int:\n    return w * h\n");
    project.file("geometry/lines.py", "UNIT: int = 1\n");
    project.file(
        "main.py",
        "import geometry.shapes\nimport geometry.lines\nimport geometry.shapes as s\n\nsize: int = geometry.shapes.area(2, 3) + s.area(1, geometry.lines.UNIT)\n",
    );
    project.file("typo.py", "import geometry.shapes\n\nx: int = geometry.shapes.volume()\n");
    let options = project.options();

    let (compiler, report, sink) = build(&options, "main.py");
    assert!(report.is_success(), "{:?}", messages(&sink));
    let main = compiler.entry().unwrap();
    let Some(Symbol::Module(geometry)) = main.globals().lookup("geometry") else {
        panic!("geometry is not bound to a module");
    };
    assert!(geometry.module.is_none());
    let subs: Vec<_> = geometry.submodules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(subs, vec!["shapes", "lines"]);
    assert!(matches!(main.globals().lookup("s"), Some(Symbol::Module(_))));
    assert!(main.globals().lookup("geometry.shapes").is_none());

    let (_, _, sink) = build(&options, "typo.py");
    assert_eq!(messages(&sink), vec!["Module 'shapes' has no attribute 'volume'"]);
}

#[test]
fn package_and_submodule_share_one_binding() {
    let project = Project::new("package_sub");
    project.file("geometry/__init__.py", "NAME: str = 'geo'\n");
    project.file("geometry/shapes.py", "def area(w: int, h: int) -> int:\n    return w * h\n");
    project.file(
        "main.py",
        "import geometry.shapes\nimport geometry\n\nname: str = geometry.NAME\nsize: int = geometry.shapes.area(1, 1)\n",
    );
    let options = project.options();
    let (compiler, report, sink) = build(&options, "main.py");

    assert!(report.is_success(), "{:?}", messages(&sink));
    let main = compiler.entry().unwrap();
    assert_eq!(main.globals().modules().len(), 1);
    let geometry = main.globals().module("geometry").unwrap();
    assert!(geometry.module.is_some());
    assert!(geometry.submodule("shapes").is_some());
}

#[test]
fn failed_dependency_fails_its_importer() {
    let project = Project::new("depfail");
    project.file("bad.py", "def f() -> int:\n    return missing\n");
    project.file("main.py", "import bad\n\nx: int = 1\n");
    let options = project.options();
    let (_, report, sink) = build(&options, "main.py");

    assert_eq!(report.outcomes[0].status, ModuleStatus::Failed(FailureKind::Compile));
    assert_eq!(report.outcomes[1].status, ModuleStatus::Failed(FailureKind::Semantic));
    let messages = messages(&sink);
    assert_eq!(messages[0], "Imported module 'bad' failed to compile");
    assert_eq!(messages[1], "Unresolved symbol 'missing'");
}

#[test]
fn import_cycle_fails_every_module_on_it() {
    let project = Project::new("cycle");
    project.file("a.py", "import b\n\nx: int = 1\n");
    project.file("b.py", "import a\n\ny: int = 2\n");
    project.file("main.py", "import a\n");
    let options = project.options();
    let (_, report, sink) = build(&options, "main.py");

    assert_eq!(report.failed().count(), 3);
    let messages = messages(&sink);
    assert_eq!(messages[0], "Imported module 'a' failed to compile");
    assert!(messages[1].starts_with("Circular import detected: "), "{}", messages[1]);
    assert!(messages[2].starts_with("Circular import detected: "), "{}", messages[2]);
    assert!(messages[1].ends_with("a.py"), "{}", messages[1]);
}

#[test]
fn unresolvable_imports() {
    let project = Project::new("unresolved");
    project.file("util.py", "def helper() -> int:\n    return 1\n");
    project.file("ghost.py", "import nowhere\n");
    project.file("names.py", "from util import helper, nope\n");
    let options = project.options();

    let (_, _, sink) = build(&options, "ghost.py");
    assert_eq!(messages(&sink), vec!["No module named 'nowhere'"]);

    let (_, report, sink) = build(&options, "names.py");
    assert_eq!(messages(&sink), vec!["Cannot import name 'nope' from 'util'"]);
    assert!(report.outcomes[1].status == ModuleStatus::Compiled);
}

#[test]
fn missing_entry_file_is_a_user_error() {
    let project = Project::new("missing");
    let options = project.options();
    let (_, report, sink) = build(&options, "absent.py");
    assert_eq!(report.outcomes[0].status, ModuleStatus::Failed(FailureKind::User));
    assert!(messages(&sink)[0].starts_with("Cannot read module"));
}

#[test]
fn configured_stdlib_modules_are_built() {
    let project = Project::new("include");
    project.file("main.py", "x: int = 1\n");
    let options = project.options().with_stdlib_include(["math"]);
    let (compiler, report, sink) = build(&options, "main.py");

    assert!(report.is_success(), "{:?}", messages(&sink));
    assert!(compiler.modules()[0].source().is_stdlib());
    assert_eq!(report.outcomes[0].display_path, "<stdlib>/math.py");
}
