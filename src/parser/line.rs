use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, char as nom_char, space0, space1},
    combinator::{cut, opt, rest as rest_of_line},
    sequence::tuple,
};

use super::common::{label_identifier, maybe_lpadded, metric_identifier, separated_list};
use super::number::{sample_value, timestamp};
use super::result::{IResult, Span, SyntaxError};
use super::string::{string_literal, unescape_help};
use crate::model::{LabelName, LabelValue, Labels, MetricName, Sample};

/// A single non-blank line of the exposition text.
#[derive(Debug, PartialEq)]
pub enum Line {
    Help(MetricName, String),
    Type(MetricName, String),
    Sample(Sample),
    Comment,
}

/// Parses one line, which must already be trimmed and non-empty.
pub fn parse_line(line: &str) -> Result<Line, SyntaxError> {
    let (rest, parsed) = alt((comment_line, sample_line))(Span::new(line))?;
    if !rest.fragment().is_empty() {
        return Err(SyntaxError::partial("line", "end of line", rest));
    }
    Ok(parsed)
}

fn comment_line(input: Span) -> IResult<Line> {
    let (rest, _) = nom_char('#')(input)?;
    let (rest, _) = space0(rest)?;
    alt((help_comment, type_comment, plain_comment))(rest)
}

fn help_comment(input: Span) -> IResult<Line> {
    // HELP metric_identifier [docstring]
    let (rest, (_, _, name)) = tuple((tag("HELP"), space1, cut(metric_identifier)))(input)?;
    if rest.fragment().is_empty() {
        return Ok((rest, Line::Help(name, String::new())));
    }

    let (rest, _) = cut(space1)(rest)?;
    let (rest, text) = rest_of_line(rest)?;
    Ok((rest, Line::Help(name, unescape_help(text.fragment()))))
}

fn type_comment(input: Span) -> IResult<Line> {
    // TYPE metric_identifier kind
    let (rest, (_, _, name, _, kind)) = tuple((
        tag("TYPE"),
        space1,
        cut(metric_identifier),
        cut(space1),
        cut(alpha1),
    ))(input)?;
    Ok((rest, Line::Type(name, String::from(*kind.fragment()))))
}

fn plain_comment(input: Span) -> IResult<Line> {
    let (rest, _) = rest_of_line(input)?;
    Ok((rest, Line::Comment))
}

fn sample_line(input: Span) -> IResult<Line> {
    // metric_identifier [label_set] value [timestamp]
    let (rest, name) = match metric_identifier(input) {
        Ok(res) => res,
        Err(_) => {
            return Err(nom::Err::Failure(SyntaxError::partial(
                "sample",
                "metric name",
                input,
            )))
        }
    };

    let (rest, labels) = opt(maybe_lpadded(label_set))(rest)?;
    let (rest, _) = space0(rest)?;
    let (rest, value) = sample_value(rest)?;

    let (rest, ts) = match space1::<_, SyntaxError>(rest) {
        Ok((after_space, _)) => match timestamp(after_space) {
            Ok((r, ts)) => (r, Some(ts)),
            Err(nom::Err::Error(_)) => {
                return Err(nom::Err::Failure(SyntaxError::partial(
                    "sample",
                    "timestamp",
                    after_space,
                )))
            }
            Err(e) => return Err(e),
        },
        Err(_) => (rest, None),
    };

    Ok((
        rest,
        Line::Sample(Sample::new(name, labels.unwrap_or_default(), value, ts)),
    ))
}

fn label_set(input: Span) -> IResult<Labels> {
    // LEFT_BRACE label_list RIGHT_BRACE
    //   | LEFT_BRACE label_list COMMA RIGHT_BRACE
    //   | LEFT_BRACE RIGHT_BRACE
    let (rest, pairs) = separated_list('{', '}', ',', label_pair, "label set", "label")(input)?;

    let mut labels = Labels::with_capacity(pairs.len());
    for (name, value) in pairs {
        if labels.contains_key(&name) {
            return Err(nom::Err::Failure(SyntaxError::new(
                format!("duplicate label '{}'", name),
                input,
            )));
        }
        labels.insert(name, value);
    }
    Ok((rest, labels))
}

fn label_pair(input: Span) -> IResult<(LabelName, LabelValue)> {
    // label_identifier EQL string_literal
    let (rest, name) = label_identifier(input)?;
    let (rest, _) = cut(maybe_lpadded(nom_char('=')))(rest)?;
    let (rest, value) = cut(maybe_lpadded(string_literal))(rest)?;
    Ok((rest, (name, value)))
}
