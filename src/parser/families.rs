use std::convert::TryFrom;
use std::iter::Enumerate;
use std::str::Lines;

use super::error::ParseError;
use super::line::{parse_line, Line};
use crate::model::{MetricFamily, MetricKind};

/// Lazily groups exposition lines into metric families.
///
/// The first malformed line ends the sequence with an error, so collecting
/// into `Result<Vec<_>, _>` gives all-or-nothing semantics.
pub struct Families<'a> {
    lines: Enumerate<Lines<'a>>,
    current: Option<MetricFamily>,
    done: bool,
}

impl<'a> Families<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            lines: raw.lines().enumerate(),
            current: None,
            done: false,
        }
    }

    /// Makes `name` the current family, handing back the one it replaces.
    fn switch_to(&mut self, name: &str) -> Option<MetricFamily> {
        let same = self
            .current
            .as_ref()
            .map_or(false, |family| family.name() == name);
        if same {
            return None;
        }
        self.current
            .replace(MetricFamily::new(name.to_owned(), MetricKind::Untyped))
    }

    fn fail(&mut self, err: ParseError) -> Option<Result<MetricFamily, ParseError>> {
        self.done = true;
        self.current = None;
        Some(Err(err))
    }
}

impl<'a> Iterator for Families<'a> {
    type Item = Result<MetricFamily, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        while let Some((idx, line)) = self.lines.next() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let parsed = match parse_line(line) {
                Ok(parsed) => parsed,
                Err(e) => {
                    let reason = format!("{} at column {}", e.message(), e.column());
                    return self.fail(ParseError::malformed(idx + 1, line, reason));
                }
            };

            let finished = match parsed {
                Line::Comment => None,
                Line::Help(name, help) => {
                    let finished = self.switch_to(&name);
                    if let Some(family) = self.current.as_mut() {
                        family.set_help(help);
                    }
                    finished
                }
                Line::Type(name, kind) => {
                    let kind = match MetricKind::try_from(kind.as_str()) {
                        Ok(kind) => kind,
                        Err(_) => {
                            let reason = format!("unknown metric type '{}'", kind);
                            return self.fail(ParseError::malformed(idx + 1, line, reason));
                        }
                    };
                    let finished = self.switch_to(&name);
                    if let Some(family) = self.current.as_mut() {
                        family.set_kind(kind);
                    }
                    finished
                }
                Line::Sample(sample) => {
                    let accepted = self
                        .current
                        .as_ref()
                        .map_or(false, |family| family.accepts(sample.name()));
                    let finished = match accepted {
                        true => None,
                        false => self.current.replace(MetricFamily::new(
                            sample.name().clone(),
                            MetricKind::Untyped,
                        )),
                    };
                    if let Some(family) = self.current.as_mut() {
                        family.push(sample);
                    }
                    finished
                }
            };

            if let Some(family) = finished {
                return Some(Ok(family));
            }
        }

        self.done = true;
        self.current.take().map(Ok)
    }
}
