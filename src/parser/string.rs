use nom::{character::complete::char, Slice};

use super::result::{IResult, Span, SyntaxError};

/// Double-quoted label value with `\\`, `\"` and `\n` escapes.
pub fn string_literal(input: Span) -> IResult<String> {
    let (mut rest, _) = char('"')(input)?;
    let mut value = String::new();

    loop {
        let mut chars = rest.fragment().chars();
        let consumed = match chars.next() {
            None => {
                return Err(nom::Err::Failure(SyntaxError::new(
                    "unterminated string literal".to_owned(),
                    rest,
                )))
            }
            Some('"') => return Ok((rest.slice(1..), value)),
            Some('\\') => {
                match chars.next() {
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some('n') => value.push('\n'),
                    _ => {
                        return Err(nom::Err::Failure(SyntaxError::new(
                            "invalid escape sequence".to_owned(),
                            rest,
                        )))
                    }
                }
                2
            }
            Some(c) => {
                value.push(c);
                c.len_utf8()
            }
        };
        rest = rest.slice(consumed..);
    }
}

/// Reverses the escaping of HELP text, where only `\\` and `\n` are special.
pub fn unescape_help(text: &str) -> String {
    let mut help = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            help.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => help.push('\\'),
            Some('n') => help.push('\n'),
            Some(other) => {
                help.push('\\');
                help.push(other);
            }
            None => help.push('\\'),
        }
    }
    help
}
