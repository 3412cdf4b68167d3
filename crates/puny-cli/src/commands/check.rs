//! Check command - parse and analyze without executing

use super::{read_source, Context, PhaseTimer};
use anyhow::{Context as _, Result};

/// Parse and analyze a source file, reporting warnings and the first error
pub fn run(file_path: &str, ctx: &Context, verbose: bool) -> Result<()> {
    let source = read_source(file_path)?;
    let runtime = ctx.runtime(file_path);
    let timer = PhaseTimer::new(verbose);
    if verbose {
        ctx.print_settings();
    }

    let tree = timer.time("parse", || runtime.parse(&source));
    let tree = ctx
        .or_report(tree, "Parsing")
        .with_context(|| format!("Checking {} failed", file_path))?;

    let analysis = timer.time("analyze", || runtime.analyze(&source, tree));
    timer.finish();
    let analysis = ctx
        .or_report(analysis, "Analysis")
        .with_context(|| format!("Checking {} failed", file_path))?;

    ctx.report(&analysis.warnings)?;
    if !ctx.json {
        match analysis.warnings.len() {
            0 => println!("{}: No errors found", file_path),
            n => println!("{}: No errors found ({} warning(s))", file_path, n),
        }
    }
    Ok(())
}
