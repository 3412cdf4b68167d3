pub mod ast;
pub mod check;
pub mod repl;
pub mod run;
pub mod tokens;

use anyhow::{Context as _, Result};
use puny_config::{ColorSetting, ConfigLoader, DiagnosticFormat};
use puny_runtime::{
    sort_diagnostics, ColorMode, Diagnostic, DiagnosticFormatter, Dialect, Puny, RuntimeResult,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Settings shared by the file-based commands
#[derive(Debug, Clone)]
pub struct Context {
    pub dialect: Dialect,
    pub json: bool,
    /// Directory holding the puny.toml in effect, if any
    pub project_root: Option<PathBuf>,
    formatter: DiagnosticFormatter,
}

impl Context {
    /// Resolve settings for `file`
    ///
    /// Dialect precedence: flag, PUNY_DIALECT, puny.toml, file extension,
    /// then funcs.
    pub fn load(
        file: &str,
        dialect: Option<Dialect>,
        json: bool,
        cli_config: &crate::config::Config,
    ) -> Result<Self> {
        let config = ConfigLoader::new()
            .load_from_directory(&std::env::current_dir()?)
            .context("Failed to load puny.toml")?;

        let dialect = dialect
            .or_else(|| config.dialect().and_then(Dialect::from_name))
            .or_else(|| Dialect::from_extension(Path::new(file)))
            .unwrap_or_default();

        let color = if cli_config.no_color {
            ColorMode::Never
        } else {
            match config.color() {
                ColorSetting::Auto => ColorMode::Auto,
                ColorSetting::Always => ColorMode::Always,
                ColorSetting::Never => ColorMode::Never,
            }
        };

        Ok(Self {
            dialect,
            json: json || config.diagnostic_format() == DiagnosticFormat::Json,
            project_root: config.project_root().map(Path::to_path_buf),
            formatter: DiagnosticFormatter::new(color),
        })
    }

    #[cfg(test)]
    pub fn for_tests(dialect: Dialect, formatter: DiagnosticFormatter) -> Self {
        Self {
            dialect,
            json: false,
            project_root: None,
            formatter,
        }
    }

    /// Runtime reporting diagnostics against `file`
    pub fn runtime(&self, file: &str) -> Puny {
        Puny::new(self.dialect).with_file(file)
    }

    /// Print diagnostics to stderr, one JSON object per line in JSON mode
    ///
    /// Errors come first, then everything else by position.
    pub fn report(&self, diagnostics: &[Diagnostic]) -> Result<()> {
        let diagnostics = sorted(diagnostics);
        if self.json {
            for diag in &diagnostics {
                eprintln!("{}", diag.to_json_compact()?);
            }
        } else {
            self.formatter.emit_all(&diagnostics);
        }
        Ok(())
    }

    /// Print the resolved dialect and project file to stderr
    pub fn print_settings(&self) {
        eprintln!("{:<8} {}", "dialect", self.dialect);
        match &self.project_root {
            Some(root) => eprintln!("{:<8} {}", "config", root.join("puny.toml").display()),
            None => eprintln!("{:<8} none", "config"),
        }
    }

    /// Unwrap a phase result, reporting its diagnostics on failure
    pub fn or_report<T>(&self, result: RuntimeResult<T>, what: &str) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(diagnostics) => {
                self.report(&diagnostics)?;
                Err(anyhow::anyhow!("{} failed", what))
            }
        }
    }
}

fn sorted(diagnostics: &[Diagnostic]) -> Vec<Diagnostic> {
    let mut diagnostics = diagnostics.to_vec();
    sort_diagnostics(&mut diagnostics);
    diagnostics
}

/// Dialect for the REPL: flag, then config, then funcs
pub fn repl_dialect(dialect: Option<Dialect>) -> Result<Dialect> {
    if let Some(dialect) = dialect {
        return Ok(dialect);
    }
    let config = ConfigLoader::new()
        .load_from_directory(&std::env::current_dir()?)
        .context("Failed to load puny.toml")?;
    Ok(config
        .dialect()
        .and_then(Dialect::from_name)
        .unwrap_or_default())
}

/// Read a source file
pub fn read_source(file_path: &str) -> Result<String> {
    fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))
}

/// Per-phase timings printed to stderr with `--verbose`
pub struct PhaseTimer {
    verbose: bool,
    start: Instant,
}

impl PhaseTimer {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            start: Instant::now(),
        }
    }

    /// Run `phase`, printing its duration when verbose
    pub fn time<T>(&self, name: &str, phase: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = phase();
        if self.verbose {
            eprintln!("{:<8} {:.2}ms", name, start.elapsed().as_secs_f64() * 1000.0);
        }
        result
    }

    pub fn finish(&self) {
        if self.verbose {
            eprintln!(
                "Total time: {:.2}ms",
                self.start.elapsed().as_secs_f64() * 1000.0
            );
        }
    }
}
