mod ast;
mod combinators;

pub use ast::{CommandLine, OutputRedirect, ParsedCommand, Pipeline, SequenceItem, Token, WriteMode};

use std::path::PathBuf;

use crate::error::ParseError;
use combinators::parse_tokens;

// ── Public API ────────────────────────────────────────────────────────────

/// Parse an entire input line into a [`CommandLine`].
///
/// Parsing is done in two passes: nom turns the text into [`Token`]s, then
/// the token stream is split on `;`, then `&&`, then `|`. Empty segments
/// between separators are dropped, so a line of only whitespace and
/// separators yields an empty `CommandLine`.
///
/// Quoting is not supported; every separator character is structural.
pub fn parse(input: &str) -> Result<CommandLine, ParseError> {
    let (rest, tokens) = parse_tokens(input).map_err(|e| ParseError::Unexpected(e.to_string()))?;
    if !rest.is_empty() {
        return Err(ParseError::Unexpected(rest.to_string()));
    }

    let mut items = Vec::new();
    for segment in tokens.split(|t| *t == Token::Semi) {
        let mut pipelines = Vec::new();
        for chain in segment.split(|t| *t == Token::And) {
            let mut commands = Vec::new();
            for stage in chain.split(|t| *t == Token::Pipe) {
                if let Some(cmd) = build_command(stage)? {
                    commands.push(cmd);
                }
            }
            if !commands.is_empty() {
                pipelines.push(Pipeline { commands });
            }
        }
        if !pipelines.is_empty() {
            items.push(SequenceItem { pipelines });
        }
    }

    Ok(CommandLine { items })
}

/// Classify the tokens of one pipe stage. Redirection operators consume the
/// following word; the last redirection of each direction wins. A stage with
/// no words is a no-op and yields `None`.
fn build_command(tokens: &[Token]) -> Result<Option<ParsedCommand>, ParseError> {
    let mut argv = Vec::new();
    let mut stdin = None;
    let mut stdout = None;

    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        match token {
            Token::Word(w) => argv.push(w.clone()),
            Token::RedirIn => stdin = Some(redirect_target(iter.next(), "<")?),
            Token::RedirOut => {
                stdout = Some(OutputRedirect {
                    path: redirect_target(iter.next(), ">")?,
                    mode: WriteMode::Truncate,
                });
            }
            Token::RedirAppend => {
                stdout = Some(OutputRedirect {
                    path: redirect_target(iter.next(), ">>")?,
                    mode: WriteMode::Append,
                });
            }
            Token::Semi | Token::And | Token::Pipe => unreachable!("separators are split out before classification"),
        }
    }

    if argv.is_empty() {
        if stdin.is_some() || stdout.is_some() {
            tracing::debug!("dropping redirection-only command");
        }
        return Ok(None);
    }

    Ok(Some(ParsedCommand { argv, stdin, stdout }))
}

fn redirect_target(token: Option<&Token>, operator: &'static str) -> Result<PathBuf, ParseError> {
    match token {
        Some(Token::Word(w)) => Ok(PathBuf::from(w)),
        _ => Err(ParseError::MissingRedirectTarget { operator }),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
