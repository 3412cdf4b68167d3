//! AST dump command - output the parse tree as JSON

use super::{read_source, Context};
use anyhow::Result;
use puny_runtime::VersionedTree;

/// Parse the source file and print the versioned tree to stdout
pub fn run(file_path: &str, ctx: &Context) -> Result<()> {
    let source = read_source(file_path)?;
    let tree = ctx.or_report(ctx.runtime(file_path).parse(&source), "Parsing")?;

    let json = VersionedTree::new(tree).to_json()?;
    println!("{}", json);
    Ok(())
}
