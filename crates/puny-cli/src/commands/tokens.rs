//! Tokens command - dump the scanner output

use super::{read_source, Context};
use anyhow::Result;
use puny_runtime::{LineIndex, Token};

/// Print the token stream of a source file
///
/// Ignorable tokens are omitted unless `all` is set.
pub fn run(file_path: &str, ctx: &Context, all: bool) -> Result<()> {
    let source = read_source(file_path)?;
    let tokens = ctx.or_report(ctx.runtime(file_path).tokenize(&source), "Scanning")?;
    let tokens: Vec<Token> = tokens
        .into_iter()
        .filter(|t| all || !t.kind.is_ignorable())
        .collect();

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        let index = LineIndex::new(&source);
        for token in &tokens {
            println!("{}", format_token(token, &index));
        }
    }
    Ok(())
}

/// `line:column  KIND  "lexeme"`
fn format_token(token: &Token, index: &LineIndex) -> String {
    let (line, column) = index.locate(token.span.start);
    format!(
        "{:<8} {:<8} {:?}",
        format!("{}:{}", line, column),
        token.kind.as_str(),
        token.lexeme
    )
}
