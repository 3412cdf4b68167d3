use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use puny_runtime::Dialect;
use std::io;

mod commands;
mod config;

/// Puny: two toy dialects on one scanner and parser framework.
///
/// The `funcs` dialect defines and calls functions; the `basic` dialect runs
/// numbered LET and PRINT lines.
///
/// EXAMPLES:
///     puny run prog.bas            Run a program
///     puny check prog.py           Parse and analyze without running
///     puny tokens prog.bas         Dump the token stream
///     puny repl --dialect basic    Start interactive REPL
///
/// ENVIRONMENT VARIABLES:
///     PUNY_DIALECT       Dialect used when --dialect is not given
///     PUNY_DIAGNOSTICS   Set to 'json' for JSON diagnostics by default
///     PUNY_HISTORY_FILE  REPL history location
///     PUNY_NO_HISTORY    Set to disable REPL history
///     NO_COLOR           Set to disable colored output
#[derive(Parser)]
#[command(name = "puny")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Dialect selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DialectArg {
    Funcs,
    Basic,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Funcs => Dialect::Funcs,
            DialectArg::Basic => Dialect::Basic,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a source file
    ///
    /// Scans, parses, analyzes and executes the file. PRINT output goes to
    /// stdout, diagnostics to stderr.
    ///
    /// EXAMPLES:
    ///     puny run prog.bas                  Run a program
    ///     puny run prog.txt --dialect basic  Force the dialect
    ///     puny run prog.bas --json           Output diagnostics as JSON
    #[command(visible_alias = "r")]
    Run {
        /// Path to the source file
        file: String,
        /// Dialect (default: from config, then file extension, then funcs)
        #[arg(long, short = 'd', value_enum)]
        dialect: Option<DialectArg>,
        /// Output diagnostics in JSON format
        #[arg(long)]
        json: bool,
        /// Verbose output with timing information
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Parse and analyze a source file without running it
    ///
    /// EXAMPLES:
    ///     puny check prog.py           Check for errors
    ///     puny check prog.py --json    Output as JSON
    #[command(visible_alias = "c")]
    Check {
        /// Path to the source file
        file: String,
        #[arg(long, short = 'd', value_enum)]
        dialect: Option<DialectArg>,
        /// Output diagnostics in JSON format
        #[arg(long)]
        json: bool,
        /// Verbose output with timing information
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Dump the parse tree to JSON
    ///
    /// EXAMPLES:
    ///     puny ast prog.py              Print the tree
    ///     puny ast prog.py > tree.json  Save to file
    Ast {
        /// Path to the source file
        file: String,
        #[arg(long, short = 'd', value_enum)]
        dialect: Option<DialectArg>,
    },

    /// Dump the token stream
    ///
    /// EXAMPLES:
    ///     puny tokens prog.bas          One token per line
    ///     puny tokens prog.bas --all    Include whitespace tokens
    ///     puny tokens prog.bas --json   Tokens as a JSON array
    Tokens {
        /// Path to the source file
        file: String,
        #[arg(long, short = 'd', value_enum)]
        dialect: Option<DialectArg>,
        /// Include ignorable whitespace tokens
        #[arg(long)]
        all: bool,
        /// Output tokens as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive REPL
    ///
    /// REPL COMMANDS:
    ///     :help, :h      Show help
    ///     :quit, :q      Exit REPL
    ///     :reset         Clear all variables and functions
    ///     :vars          List defined variables and functions
    ///
    /// EXAMPLES:
    ///     puny repl                     Start the funcs REPL
    ///     puny repl --dialect basic     Start the basic REPL
    ///     puny repl --no-history        Disable history persistence
    Repl {
        #[arg(long, short = 'd', value_enum)]
        dialect: Option<DialectArg>,
        /// Disable history persistence
        #[arg(long)]
        no_history: bool,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     puny completions bash > ~/.bash_completions/puny.bash
    ///     puny completions zsh > ~/.zfunc/_puny
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cli_config = config::Config::from_env();

    match cli.command {
        Commands::Run {
            file,
            dialect,
            json,
            verbose,
        } => {
            let ctx = commands::Context::load(&file, dialect.map(Into::into), json, &cli_config)?;
            commands::run::run(&file, &ctx, verbose)?;
        }
        Commands::Check {
            file,
            dialect,
            json,
            verbose,
        } => {
            let ctx = commands::Context::load(&file, dialect.map(Into::into), json, &cli_config)?;
            commands::check::run(&file, &ctx, verbose)?;
        }
        Commands::Ast { file, dialect } => {
            let ctx = commands::Context::load(&file, dialect.map(Into::into), false, &cli_config)?;
            commands::ast::run(&file, &ctx)?;
        }
        Commands::Tokens {
            file,
            dialect,
            all,
            json,
        } => {
            let ctx = commands::Context::load(&file, dialect.map(Into::into), json, &cli_config)?;
            commands::tokens::run(&file, &ctx, all)?;
        }
        Commands::Repl {
            dialect,
            no_history,
        } => {
            let dialect = commands::repl_dialect(dialect.map(Into::into))?;
            let disable_history = no_history || cli_config.no_history;
            commands::repl::run(dialect, disable_history, &cli_config)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}
