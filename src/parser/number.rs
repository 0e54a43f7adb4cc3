use nom::{
    bytes::complete::is_not,
    character::complete::{char, digit1},
    combinator::{opt, recognize},
    sequence::pair,
};

use super::result::{IResult, Span, SyntaxError};
use crate::model::{SampleValue, Timestamp};

pub fn sample_value(input: Span) -> IResult<SampleValue> {
    let (rest, token) = match is_not::<_, _, SyntaxError>(" \t")(input) {
        Ok((rest, token)) => (rest, token),
        Err(_) => {
            return Err(nom::Err::Failure(SyntaxError::partial(
                "sample", "value", input,
            )))
        }
    };
    match float_literal(token.fragment()) {
        Some(value) => Ok((rest, value)),
        None => Err(nom::Err::Failure(SyntaxError::new(
            format!("invalid sample value '{}'", token.fragment()),
            token,
        ))),
    }
}

pub fn timestamp(input: Span) -> IResult<Timestamp> {
    let (rest, token) = recognize(pair(opt(char('-')), digit1))(input)?;
    match token.fragment().parse::<Timestamp>() {
        Ok(ts) => Ok((rest, ts)),
        Err(_) => Err(nom::Err::Failure(SyntaxError::new(
            format!("timestamp '{}' is out of range", token.fragment()),
            token,
        ))),
    }
}

fn float_literal(s: &str) -> Option<SampleValue> {
    match s {
        "NaN" => Some(f64::NAN),
        "Inf" | "+Inf" => Some(f64::INFINITY),
        "-Inf" => Some(f64::NEG_INFINITY),
        // Rust also accepts spellings like "inf" or "infinity" that the format does not.
        s if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => None,
        s => s.parse::<SampleValue>().ok(),
    }
}
