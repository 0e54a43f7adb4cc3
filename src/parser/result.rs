use nom;

use nom_locate::LocatedSpan;

pub type Span<'a> = LocatedSpan<&'a str>;

pub type IResult<'a, O> = nom::IResult<Span<'a>, O, SyntaxError<'a>>;

/// Low-level error produced by the nom combinators of this module.
#[derive(Debug, PartialEq)]
pub struct SyntaxError<'a> {
    message: String,
    wherein: Span<'a>,
}

impl<'a> SyntaxError<'a> {
    pub fn new(message: String, wherein: Span<'a>) -> Self {
        Self { message, wherein }
    }

    pub fn partial(wherein: &str, expected: &str, input: Span<'a>) -> Self {
        Self::new(
            format!(
                "unexpected {} in {}, expected {}",
                unexpected(input.fragment()),
                wherein,
                expected
            ),
            input,
        )
    }

    pub fn message(&self) -> &String {
        &self.message
    }

    pub fn column(&self) -> usize {
        self.wherein.get_utf8_column()
    }
}

fn unexpected(found: &str) -> String {
    match found.chars().next() {
        None => String::from("end of line"),
        Some(c) => format!("'{}'", c),
    }
}

impl<'a> nom::error::ParseError<Span<'a>> for SyntaxError<'a> {
    fn from_error_kind(input: Span<'a>, kind: nom::error::ErrorKind) -> Self {
        Self::new(format!("parse error {:?}", kind), input)
    }

    fn append(_input: Span<'a>, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: Span<'a>, c: char) -> Self {
        Self::new(format!("expected '{}'", c), input)
    }
}

impl<'a> From<nom::Err<SyntaxError<'a>>> for SyntaxError<'a> {
    fn from(err: nom::Err<SyntaxError<'a>>) -> Self {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
            nom::Err::Incomplete(_) => unreachable!(),
        }
    }
}
