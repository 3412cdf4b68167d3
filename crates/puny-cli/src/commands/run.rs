//! Run command - execute a source file

use super::{read_source, Context, PhaseTimer};
use anyhow::{Context as _, Result};
use puny_runtime::World;

/// Run a source file
///
/// PRINT output goes to stdout. Warnings are reported before execution starts;
/// the first error stops the run.
pub fn run(file_path: &str, ctx: &Context, verbose: bool) -> Result<()> {
    let source = read_source(file_path)?;
    let runtime = ctx.runtime(file_path);
    let timer = PhaseTimer::new(verbose);
    if verbose {
        ctx.print_settings();
    }

    let tree = timer.time("parse", || runtime.parse(&source));
    let tree = ctx.or_report(tree, "Parsing")?;

    let analysis = timer.time("analyze", || runtime.analyze(&source, tree));
    let analysis = ctx.or_report(analysis, "Analysis")?;
    ctx.report(&analysis.warnings)?;

    let mut world = World::new();
    let executed = timer.time("execute", || {
        runtime.execute_program(&source, analysis.program, &mut world)
    });
    timer.finish();

    ctx.or_report(executed, "Execution")
        .with_context(|| format!("Failed to run {}", file_path))
}
