//! End-to-end interpretation tests

mod common;

use common::*;
#[allow(unused_imports)]
use common::{assert_eq, assert_ne};
use puny_runtime::{error_codes, CaptureBuffer, Dialect, ExecState, Puny, World};
use rstest::rstest;

// ============================================================================
// basic dialect
// ============================================================================

#[test]
fn test_let_then_print() {
    assert_eq!(run_basic("10 LET X = 5\n20 PRINT X\n"), "5\n");
    let world = run_world(Dialect::Basic, "10 LET X = 5\n20 PRINT X\n");
    assert_eq!(world.variable("X"), Some(5));
}

#[rstest]
#[case::plus_chain("10 PRINT 1 + 2 + 3", "6\n")]
#[case::minus_is_right_associative("10 PRINT 10 - 2 - 3", "11\n")]
#[case::division_is_right_associative("10 PRINT 64 / 8 / 2", "16\n")]
#[case::no_precedence("10 PRINT 2 * 3 + 4", "14\n")]
#[case::truncating_division("10 PRINT 7 / 2", "3\n")]
#[case::negative_result("10 PRINT 2 - 5", "-3\n")]
fn test_arithmetic(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(run_basic(source), expected);
}

#[test]
fn test_reassignment_overwrites() {
    let source = "10 LET X = 1\n20 LET X = X + 1\n30 PRINT X\n";
    assert_eq!(run_basic(source), "2\n");
}

#[test]
fn test_chained_let_is_rejected() {
    let diag = run_err(Dialect::Basic, "10 LET A = LET B = 1\n");
    assert_eq!(diag.code, error_codes::MISPLACED_STATEMENT);
}

#[test]
fn test_statements_run_in_source_order() {
    let source = "20 PRINT 2\n10 PRINT 1\n";
    assert_eq!(run_basic(source), "2\n1\n");
}

#[test]
fn test_bare_expressions_print_nothing() {
    assert_eq!(run_basic("10 LET X = 3\n20 X\n30 X * 2\n"), "");
}

#[rstest]
#[case::divide_by_zero("10 PRINT 1 / 0", error_codes::DIVIDE_BY_ZERO)]
#[case::undefined("10 PRINT Y", error_codes::UNDEFINED_VARIABLE)]
#[case::overflow("10 PRINT 9223372036854775807 + 1", error_codes::INTEGER_OVERFLOW)]
#[case::literal_too_large("10 PRINT 9223372036854775808", error_codes::INTEGER_OUT_OF_RANGE)]
fn test_basic_errors(#[case] source: &str, #[case] code: &str) {
    assert_error_code(Dialect::Basic, source, code);
}

#[test]
fn test_error_stops_the_run() {
    let out = CaptureBuffer::new();
    let result = Puny::new(Dialect::Basic).run_with_writer(
        "10 PRINT 1\n20 PRINT 1 / 0\n30 PRINT 3\n",
        out.clone(),
    );
    assert!(result.is_err());
    assert_eq!(out.contents(), "1\n");
}

#[test]
fn test_deeply_nested_program_is_a_diagnostic() {
    let source = format!("10 PRINT 1{}\n", " + 1".repeat(100_000));
    let diag = run_err(Dialect::Basic, &source);
    assert_eq!(diag.code, error_codes::NESTING_TOO_DEEP);
    assert_eq!(diag.line, 1);
}

#[test]
fn test_chain_within_nesting_limit_runs() {
    let source = format!("10 PRINT 1{}\n", " + 1".repeat(200));
    assert_eq!(run_basic(&source), "201\n");
}

// ============================================================================
// funcs dialect
// ============================================================================

#[test]
fn test_define_then_call() {
    let world = run_world(Dialect::Funcs, "def add(a, b):\nadd(1, 2)\n");
    assert!(world.function("add").is_some());
    // Parameters are bound in a scope clone, not in the caller
    assert_eq!(world.variable("a"), None);
}

#[test]
fn test_funcs_program_prints_nothing() {
    assert_eq!(run_funcs("def f(x):\nf(1 + 2)\n"), "");
}

#[rstest]
#[case::unknown("f(1)", error_codes::UNKNOWN_FUNCTION)]
#[case::call_before_definition("f(1)\ndef f(x):", error_codes::UNKNOWN_FUNCTION)]
#[case::too_few("def f(a, b):\nf(1)", error_codes::ARITY_MISMATCH)]
#[case::too_many("def f():\nf(1)", error_codes::ARITY_MISMATCH)]
#[case::unbound_argument("def f(a):\nf(x)", error_codes::UNDEFINED_VARIABLE)]
#[case::integer_parameter("def f(1):", error_codes::INVALID_PARAMETER)]
#[case::duplicate_parameter("def f(a, a):", error_codes::DUPLICATE_PARAMETER)]
fn test_funcs_errors(#[case] source: &str, #[case] code: &str) {
    assert_error_code(Dialect::Funcs, source, code);
}

#[test]
fn test_redefinition_replaces_and_warns() {
    let warnings = Puny::new(Dialect::Funcs)
        .run_with_writer("def f(a):\ndef f(a, b):\nf(1, 2)\n", std::io::sink())
        .unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, error_codes::FUNCTION_REDEFINED);
    assert_eq!(warnings[0].line, 2);
}

#[test]
fn test_call_scope_sees_caller_variables() {
    let mut world = World::with_writer(std::io::sink());
    world.set_variable("G", 9);
    Puny::new(Dialect::Funcs)
        .execute("def f(a):\n", &mut world)
        .unwrap();
    let call = match Puny::new(Dialect::Funcs).parse("f(G)").unwrap() {
        puny_runtime::ParseTree::Funcs(mut roots) => match roots.remove(0) {
            puny_runtime::Expr::FuncCall(call) => call,
            other => panic!("Expected call, got {:?}", other),
        },
        other => panic!("Expected funcs tree, got {:?}", other),
    };
    let scope = world.enter_call(&call).unwrap();
    assert_eq!(scope.variable("a"), Some(9));
    assert_eq!(scope.variable("G"), Some(9));
    assert!(scope.shares_functions_with(&world));
    assert!(scope.shares_code_with(&world));
}

// ============================================================================
// World
// ============================================================================

#[test]
fn test_scope_clone_isolates_variables() {
    let mut world = run_world(Dialect::Basic, "10 LET X = 1\n");
    let mut scope = world.clone();
    scope.set_variable("X", 100);
    world.set_variable("Z", 7);
    assert_eq!(world.variable("X"), Some(1));
    assert_eq!(scope.variable("Z"), None);
    assert!(scope.shares_code_with(&world));
    assert!(scope.shares_functions_with(&world));
}

#[test]
fn test_clone_shares_function_table() {
    let mut world = World::with_writer(std::io::sink());
    let scope = world.clone();
    Puny::new(Dialect::Funcs)
        .execute("def late(a):\n", &mut world)
        .unwrap();
    assert!(scope.function("late").is_some());
}

#[test]
fn test_step_through_program() {
    let runtime = Puny::new(Dialect::Basic);
    let analysis = runtime.check("10 LET X = 1\n20 LET X = X + 1\n").unwrap();
    let mut world = World::with_writer(std::io::sink());
    world.load(analysis.program);

    assert_eq!(world.state(), ExecState::Ready);
    assert_eq!(world.current().map(|s| s.line), Some(10));
    assert_eq!(world.step().unwrap(), ExecState::Ready);
    assert_eq!(world.variable("X"), Some(1));
    assert_eq!(world.step().unwrap(), ExecState::Halted);
    assert_eq!(world.variable("X"), Some(2));
    assert_eq!(world.current(), None);
}

#[test]
fn test_scope_clone_prints_to_the_same_sink() {
    let out = CaptureBuffer::new();
    let mut world = World::with_writer(out.clone());
    let mut scope = world.clone();
    let runtime = Puny::new(Dialect::Basic);
    runtime.execute("10 PRINT 4\n", &mut scope).unwrap();
    runtime.execute("10 PRINT 5\n", &mut world).unwrap();
    assert_eq!(out.contents(), "4\n5\n");
}
