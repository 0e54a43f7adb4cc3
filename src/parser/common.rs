use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char as nom_char, space0},
    combinator::recognize,
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded},
};

use super::result::{IResult, Span, SyntaxError};

pub fn label_identifier(input: Span) -> IResult<String> {
    // [a-zA-Z_][a-zA-Z0-9_]*
    let (rest, m) = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)?;
    Ok((rest, String::from(*m.fragment())))
}

pub fn metric_identifier(input: Span) -> IResult<String> {
    // [a-zA-Z_:][a-zA-Z0-9_:]*
    let (rest, m) = recognize(pair(
        alt((alpha1, tag("_"), tag(":"))),
        many0(alt((alphanumeric1, tag("_"), tag(":")))),
    ))(input)?;
    Ok((rest, String::from(*m.fragment())))
}

pub fn separated_list<'a, F, O>(
    opener: char,
    closer: char,
    sep: char,
    element_parser: F,
    wherein: &'static str,
    expected: &'static str,
) -> impl FnMut(Span<'a>) -> IResult<Vec<O>>
where
    F: Clone + Copy + FnMut(Span<'a>) -> IResult<O>,
{
    // |  OPENER element_list CLOSER
    // |  OPENER element_list SEP CLOSER
    // |  OPENER CLOSER

    move |input: Span<'a>| {
        let (rest, _) = nom_char(opener)(input)?;

        let (rest, elements) =
            match separated_list1(nom_char(sep), maybe_padded(element_parser))(rest) {
                Ok((r, ms)) => (r, ms),
                Err(nom::Err::Error(_)) => (rest, vec![]),
                Err(e) => return Err(e),
            };

        // Chop off a possible trailing separator, but only if element list is not empty.
        let rest = match elements.len() {
            0 => rest,
            _ => match maybe_lpadded(nom_char(sep))(rest) {
                Ok((r, _)) => r,
                Err(_) => rest,
            },
        };

        match maybe_lpadded(nom_char(closer))(rest) {
            Ok((r, _)) => Ok((r, elements)),
            Err(_) => Err(nom::Err::Failure(SyntaxError::partial(
                wherein, expected, rest,
            ))),
        }
    }
}

pub fn maybe_padded<'a, F, O>(f: F) -> impl FnMut(Span<'a>) -> IResult<O>
where
    F: FnMut(Span<'a>) -> IResult<O>,
{
    delimited(space0, f, space0)
}

pub fn maybe_lpadded<'a, F, O>(f: F) -> impl FnMut(Span<'a>) -> IResult<O>
where
    F: FnMut(Span<'a>) -> IResult<O>,
{
    preceded(space0, f)
}
