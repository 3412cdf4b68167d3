//! REPL command implementation

use anyhow::Result;
use puny_runtime::{Diagnostic, DiagnosticLevel, Dialect, ReplCore, World};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};

/// Run the interactive REPL
///
/// If `no_history` is true, history is neither loaded nor saved.
pub fn run(dialect: Dialect, no_history: bool, config: &crate::config::Config) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut repl = ReplCore::new(dialect);

    let history_path = config.get_history_path();
    if !no_history {
        if let Some(ref path) = history_path {
            let _ = rl.load_history(path); // Missing file on first run
        }
    }

    println!("Puny v{} REPL ({} dialect)", puny_runtime::VERSION, dialect);
    println!("Commands: :quit (or :q), :reset, :vars, :help");
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match trimmed {
                    ":quit" | ":q" => {
                        println!("Goodbye!");
                        break;
                    }
                    ":reset" => {
                        repl.reset();
                        println!("REPL state reset");
                        continue;
                    }
                    ":help" | ":h" => {
                        print_help(repl.dialect());
                        continue;
                    }
                    ":vars" | ":v" => {
                        print_vars(repl.world());
                        continue;
                    }
                    _ => {}
                }

                let _ = rl.add_history_entry(&line);

                let result = repl.eval_line(&line);
                if !result.stdout.is_empty() {
                    print!("{}", result.stdout);
                    io::stdout().flush()?;
                }
                for diag in &result.diagnostics {
                    println!("{}", format_diagnostic(diag));
                }
                if !result.diagnostics.iter().any(Diagnostic::is_error) {
                    if let Some(value) = result.value {
                        println!("{}", value);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                println!("Use :quit or :q to exit");
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if !no_history {
        if let Some(path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.save_history(&path);
        }
    }

    Ok(())
}

fn print_help(dialect: Dialect) {
    println!("Puny REPL Commands:");
    println!("  :quit, :q         Exit the REPL");
    println!("  :reset            Clear all variables and functions");
    println!("  :help, :h         Show this help message");
    println!("  :vars, :v         List variables and functions");
    println!();
    match dialect {
        Dialect::Basic => {
            println!("Enter numbered lines:");
            println!("  >> 10 LET X = 6");
            println!("  >> 20 PRINT X * 7");
        }
        Dialect::Funcs => {
            println!("Define and call functions:");
            println!("  >> def add(a, b):");
            println!("  >> add(1, 2 + 3)");
        }
    }
}

/// One-line form of a diagnostic: `error[PN0005]: Division by zero (1:10)`
fn format_diagnostic(diag: &Diagnostic) -> String {
    let level = match diag.level {
        DiagnosticLevel::Error => "error",
        DiagnosticLevel::Warning => "warning",
    };
    format!(
        "{}[{}]: {} ({}:{})",
        level, diag.code, diag.message, diag.line, diag.column
    )
}

fn print_vars(world: &World) {
    let variables = world.variables();
    let functions = world.function_names();
    if variables.is_empty() && functions.is_empty() {
        println!("No variables defined.");
        return;
    }

    for (name, value) in &variables {
        println!("{:<16} {}", name, value);
    }
    for name in &functions {
        let arity = world
            .function(name)
            .map(|def| def.parameters.items.len())
            .unwrap_or(0);
        println!("{:<16} <function/{}>", name, arity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puny_runtime::Span;

    #[test]
    fn test_format_diagnostic() {
        let mut diag = Diagnostic::error("Division by zero", Span::new(9, 14));
        diag.code = "PN0005".to_string();
        diag.line = 1;
        diag.column = 10;
        assert_eq!(
            format_diagnostic(&diag),
            "error[PN0005]: Division by zero (1:10)"
        );
    }
}
