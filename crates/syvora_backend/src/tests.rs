use syvora_diagnostic::SourceFile;
use syvora_frontend::parse;
use target_lexicon::Triple;

use crate::{compile, BackendError, BackendResult, CompiledModule};

#[track_caller]
fn compile_source(source: &str) -> BackendResult<CompiledModule> {
    let file = SourceFile::new("test.sy", source);
    let module = parse(&file).expect("failed to parse");
    compile(&module, Triple::host(), "test")
}

#[track_caller]
fn ir(source: &str) -> String {
    match compile_source(source) {
        Ok(compiled) => compiled.ir,
        Err(err) => panic!("failed to compile: {err}"),
    }
}

#[track_caller]
fn error(source: &str) -> BackendError {
    match compile_source(source) {
        Ok(_) => panic!("expected an error"),
        Err(err) => err,
    }
}

#[test]
fn two_argument_function() {
    let ir = ir("fn add(a: Int, b: Int) -> Int {\n    return a + b\n}");

    assert!(ir.contains("function %add_a-b(i64, i64) -> i64"));
    assert!(ir.contains("stack_store"));
    assert!(ir.contains("stack_load.i64"));
    assert!(ir.contains("iadd"));
}

#[test]
fn multiplication_before_addition() {
    let ir = ir("fn f() -> Int {\n    return 2 + 3 * 4\n}");

    let imul = ir.find("imul").unwrap();
    let iadd = ir.find("iadd").unwrap();
    assert!(imul < iadd);
}

#[test]
fn zero_argument_name() {
    let ir = ir("fn main() {\n}");
    assert!(ir.contains("function %main_()"));
}

#[test]
fn call_earlier_function() {
    let ir = ir("fn one() -> Int {\n    return 1\n}\nfn two() -> Int {\n    return one() + one()\n}");

    // One call inside the built-in, two in `two`.
    assert_eq!(ir.matches("call fn").count(), 3);
}

#[test]
fn call_later_function() {
    let err = error("fn two() -> Int {\n    return one()\n}\nfn one() -> Int {\n    return 1\n}");
    assert!(matches!(err, BackendError::FunctionNotDefined { low_level_name, .. } if low_level_name == "one_"));
}

#[test]
fn undefined_function() {
    let err = error("fn main() {\n    missing(x: 1)\n}");
    assert!(matches!(err, BackendError::FunctionNotDefined { name, low_level_name, .. }
        if name == "missing" && low_level_name == "missing_x"));
}

#[test]
fn reordered_labels() {
    let err = error(
        "fn sub(a: Int, b: Int) -> Int {\n    return a - b\n}\nfn main() {\n    sub(b: 1, a: 2)\n}",
    );
    assert!(matches!(err, BackendError::FunctionNotDefined { low_level_name, .. } if low_level_name == "sub_b-a"));
}

#[test]
fn parameter_named_like_a_mangled_function() {
    let ir = ir("fn f(x: Int) -> Int {\n    return x\n}\nfn g(f_x: Int) -> Int {\n    return f(x: f_x)\n}");
    assert!(ir.contains("function %g_f_x(i64) -> i64"));
}

#[test]
fn mangled_name_collision_with_other_labels() {
    let err = error("fn a_b(c: Int) {\n}\nfn main() {\n    a(b_c: 1)\n}");
    assert!(matches!(err, BackendError::ArgumentLabelMismatch { expected, found, .. }
        if expected == "c" && found == "b_c"));
}

#[test]
fn mangled_name_collision_with_other_arity() {
    let err = error("fn f_x() {\n}\nfn main() {\n    f(x_: 1)\n}");
    assert!(matches!(err, BackendError::ArgumentCountMismatch { expected: 0, found: 1, .. }));
}

#[test]
fn missing_return_expression() {
    let err = error("fn f() -> Int {\n}");
    assert!(matches!(err, BackendError::MissingReturnExpression { name, .. } if name == "f"));
}

#[test]
fn unexpected_return_expression() {
    let err = error("fn f() {\n    return 1\n}");
    assert!(matches!(err, BackendError::UnexpectedReturnExpression { name, .. } if name == "f"));
}

#[test]
fn print_builtin() {
    let ir = ir("fn main() {\n    print_arg(arg: 42)\n}");

    assert!(ir.contains("function %print_arg_arg(i64)"));
    assert!(ir.contains("function %main_()"));
    assert!(ir.contains("iconst.i64 42"));
}

#[test]
fn print_is_void() {
    let err = error("fn f() -> Int {\n    return print_arg(arg: 1)\n}");
    assert!(matches!(err, BackendError::VoidValue { .. }));
}

#[test]
fn children_are_evaluated() {
    let ir = ir("fn main() {\n    print_arg(arg: 1) {\n        print_arg(arg: 2)\n    }\n}");

    // One call inside the built-in, two in `main`.
    assert_eq!(ir.matches("call fn").count(), 3);
}

#[test]
fn parameters_are_scoped_to_their_function() {
    let err = error("fn f(a: Int) {\n}\nfn g() -> Int {\n    return a\n}");
    assert!(matches!(err, BackendError::VariableNotDefined { name, .. } if name == "a"));
}

#[test]
fn function_is_not_a_value() {
    let err = error("fn one() -> Int {\n    return 1\n}\nfn f() -> Int {\n    return one_\n}");
    assert!(matches!(err, BackendError::NotAValue { name, .. } if name == "one_"));
}

#[test]
fn unknown_types() {
    let err = error("fn f(a: Text) {\n}");
    assert!(matches!(err, BackendError::UnknownType { name, .. } if name == "Text"));

    let err = error("fn f() -> Math.Int {\n    return 1\n}");
    assert!(matches!(err, BackendError::UnknownType { name, .. } if name == "Math.Int"));
}

#[test]
fn float_arithmetic() {
    let ir = ir("fn scale(x: Float) -> Float {\n    return -x * 2.5\n}");

    assert!(ir.contains("function %scale_x(f64) -> f64"));
    assert!(ir.contains("fneg"));
    assert!(ir.contains("fmul"));
}

#[test]
fn comparisons_and_logic() {
    let ir = ir("fn between(a: Int, b: Int) -> Bool {\n    return a < b && !(b >= 10)\n}");

    assert!(ir.contains("-> i8"));
    assert!(ir.contains("icmp slt"));
    assert!(ir.contains("icmp sge"));
    assert!(ir.contains("bxor_imm"));
    assert!(ir.contains("band"));
}

#[test]
fn mismatched_operands() {
    let err = error("fn f() -> Int {\n    return 1 + 2.0\n}");
    assert!(matches!(err, BackendError::OperandTypeMismatch { op: "+", .. }));
}

#[test]
fn unsupported_operators() {
    let err = error("fn f() -> Int {\n    return 1 ... 2\n}");
    assert!(matches!(err, BackendError::UnsupportedOperator { op: "...", .. }));

    let err = error("fn f() -> Float {\n    return 1.0 % 2.0\n}");
    assert!(matches!(err, BackendError::UnsupportedOperator { op: "%", .. }));

    let err = error("fn f() -> Bool {\n    return -true\n}");
    assert!(matches!(err, BackendError::UnsupportedOperator { op: "-", .. }));
}

#[test]
fn if_not_yet_supported() {
    let err = error("fn f(a: Bool) {\n    if a {\n        print_arg(arg: 1)\n    }\n}");
    assert!(matches!(err, BackendError::NotYetSupported { .. }));
    assert_eq!(err.to_string(), "if expressions are not yet supported");
}

#[test]
fn semantic_errors_have_spans() {
    let source = "fn main() {\n    missing()\n}";
    let err = error(source);
    let span = err.span().unwrap();
    assert_eq!(&source[span.start..span.end], "missing()");
}

#[test]
fn emits_object() {
    let compiled = compile_source("fn main() {\n    print_arg(arg: 42)\n}").unwrap();
    let bytes = compiled.object.emit().unwrap();
    assert!(!bytes.is_empty());
}
