//! Shared test utilities
//!
//! Helpers for running programs of either dialect and inspecting their
//! output or diagnostics.

#![allow(dead_code)]

use puny_runtime::{CaptureBuffer, Diagnostic, Dialect, Puny, World};

// Re-export testing utilities
pub use pretty_assertions::{assert_eq, assert_ne};

/// Run a basic program and return what it printed
pub fn run_basic(source: &str) -> String {
    run_ok(Dialect::Basic, source)
}

/// Run a funcs program and return what it printed
pub fn run_funcs(source: &str) -> String {
    run_ok(Dialect::Funcs, source)
}

fn run_ok(dialect: Dialect, source: &str) -> String {
    let out = CaptureBuffer::new();
    match Puny::new(dialect).run_with_writer(source, out.clone()) {
        Ok(_) => out.contents(),
        Err(diags) => panic!("Expected success, got {:#?}", diags),
    }
}

/// Run a program and return the world it left behind
pub fn run_world(dialect: Dialect, source: &str) -> World {
    let mut world = World::with_writer(std::io::sink());
    if let Err(diags) = Puny::new(dialect).execute(source, &mut world) {
        panic!("Expected success, got {:#?}", diags);
    }
    world
}

/// Run a program that must fail and return its single error diagnostic
pub fn run_err(dialect: Dialect, source: &str) -> Diagnostic {
    match Puny::new(dialect)
        .with_file("test")
        .run_with_writer(source, std::io::sink())
    {
        Ok(_) => panic!("Expected an error for {:?}", source),
        Err(mut diags) => {
            assert_eq!(diags.len(), 1, "Expected exactly one diagnostic: {:#?}", diags);
            diags.remove(0)
        }
    }
}

/// Assert that a program fails with the given error code
pub fn assert_error_code(dialect: Dialect, source: &str, code: &str) {
    let diag = run_err(dialect, source);
    assert_eq!(diag.code, code, "Unexpected diagnostic: {}", diag);
}
