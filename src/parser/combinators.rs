use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{char, multispace0},
    combinator::{map, not, recognize, value},
    multi::{many0, many1},
    sequence::{preceded, terminated},
    IResult,
    Parser,
};

use super::ast::Token;

// ── Low-level nom parsers ──────────────────────────────────────────────────

/// Parse one operator. Two-character operators must come first.
pub fn parse_operator(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::And, tag("&&")),
        value(Token::RedirAppend, tag(">>")),
        value(Token::Semi, char(';')),
        value(Token::Pipe, char('|')),
        value(Token::RedirOut, char('>')),
        value(Token::RedirIn, char('<')),
    ))
    .parse(input)
}

/// A run of word characters. A single `&` that does not start `&&` is an
/// ordinary character.
fn parse_word_chunk(input: &str) -> IResult<&str, &str> {
    alt((
        is_not(" \t\r\n;|<>&"),
        terminated(tag("&"), not(char('&'))),
    ))
    .parse(input)
}

pub fn parse_word(input: &str) -> IResult<&str, Token> {
    map(recognize(many1(parse_word_chunk)), |w: &str| Token::Word(w.to_string())).parse(input)
}

// ── Token stream ──────────────────────────────────────────────────────────

/// Split a line into structural tokens, skipping whitespace.
pub fn parse_tokens(input: &str) -> IResult<&str, Vec<Token>> {
    let (input, tokens) = many0(preceded(multispace0, alt((parse_operator, parse_word)))).parse(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, tokens))
}
