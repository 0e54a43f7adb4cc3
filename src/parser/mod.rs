//! Decoding of the Prometheus text exposition format.

mod common;
mod duration;
mod error;
mod families;
mod line;
mod number;
mod result;
mod string;

pub use duration::parse_duration;
pub use error::ParseError;
pub use families::Families;

/// Returns a lazy, single-pass sequence of the metric families in `raw`.
pub fn parse(raw: &str) -> Families<'_> {
    Families::new(raw)
}
