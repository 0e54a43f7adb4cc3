use thiserror::Error;

/// A scrape that cannot be forwarded because its text is not valid exposition format.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("malformed line {line_no}: {reason}: {line:?}")]
    Malformed {
        line_no: usize,
        line: String,
        reason: String,
    },
}

impl ParseError {
    pub fn malformed<L: Into<String>, R: Into<String>>(line_no: usize, line: L, reason: R) -> Self {
        ParseError::Malformed {
            line_no,
            line: line.into(),
            reason: reason.into(),
        }
    }
}
