use syvora_diagnostic::termcolor::NoColor;
use syvora_diagnostic::{Config, SourceFile};

use crate::compiler::Compiler;
use crate::diagnostics::IntoDiagnostic;

fn test_compiles(source: &str, should_compile: bool) {
    let file = SourceFile::new("test.sy", source);
    let result = Compiler::default().compile(&file);

    match (result, should_compile) {
        (Err(err), true) => panic!("failed to compile: {source:?}: {err}"),
        (Ok(_), false) => panic!("unexpectedly compiled: {source:?}"),
        _ => {}
    }
}

fn render_error(source: &str) -> String {
    let file = SourceFile::new("test.sy", source);
    let Err(err) = Compiler::default().compile(&file) else {
        panic!("unexpectedly compiled: {source:?}");
    };

    let mut out = NoColor::new(vec![]);
    err.into_diagnostic(&file)
        .write_to_stream(&Config::default(), &mut out)
        .unwrap();

    String::from_utf8(out.into_inner()).unwrap()
}

#[test]
fn empty_source() {
    test_compiles("", false);
}

#[test]
fn add_function() {
    test_compiles("fn add(a: Int, b: Int) -> Int {\n    return a + b\n}", true);
}

#[test]
fn main_prints() {
    test_compiles(
        "fn square(x: Int) -> Int {\n    return x * x\n}\n\nfn main() {\n    print_arg(arg: square(x: 7))\n}",
        true,
    );
}

#[test]
fn statements_need_newlines() {
    test_compiles("fn main() {\n    print_arg(arg: 1)\n    print_arg(arg: 2)\n}", true);
    test_compiles("fn main() {\n    print_arg(arg: 1) print_arg(arg: 2)\n}", false);
}

#[test]
fn comments_and_blank_lines() {
    test_compiles(
        "// entry point\n\nfn main() {\n    /* say hi */\n    print_arg(arg: 1)\n\n}\n",
        true,
    );
}

#[test]
fn missing_return() {
    test_compiles("fn f() -> Int {\n}", false);
}

#[test]
fn wrong_labels() {
    test_compiles(
        "fn add(a: Int, b: Int) -> Int {\n    return a + b\n}\nfn main() {\n    print_arg(arg: add(x: 1, y: 2))\n}",
        false,
    );
}

#[test]
fn imports_rejected() {
    test_compiles("import Foundation", false);
}

#[test]
fn unterminated_string() {
    test_compiles("fn main() {\n    \"oops\n}", false);
}

#[test]
fn syntax_error_rendering() {
    insta::assert_snapshot!(render_error("fn main() {\n    print_arg(arg: 1\n}"), @r###"
    error: expected symbol `)`, but got symbol `}`
    In test.sy:3:1
    │ }
    │ ^
    "###);
}

#[test]
fn backend_error_rendering() {
    assert_eq!(
        render_error("fn main() {\n    missing()\n}"),
        "error: function `missing` is not defined\nIn test.sy:2:5\n│     missing()\n│     ^\n"
    );
}
