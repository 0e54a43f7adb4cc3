//! Flattening of metric families into Graphite push records.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::{Labels, LabelsTrait, MetricFamily, PushRecord, Timestamp};

lazy_static! {
    static ref INVALID_PATH_CHARS: Regex =
        Regex::new(r"[^a-zA-Z0-9_-]").expect("path sanitizing pattern must compile");
}

/// Replaces every character Graphite does not accept inside a path node with `_`.
pub fn sanitize(s: &str) -> Cow<'_, str> {
    INVALID_PATH_CHARS.replace_all(s, "_")
}

/// Builds the dotted path of a sample: the name followed by its label pairs ordered by label name.
pub fn metric_path(prefix: &str, name: &str, labels: &Labels) -> String {
    let mut path = String::with_capacity(prefix.len() + name.len() + 1);

    for segment in prefix.split('.').filter(|s| !s.is_empty()) {
        path.push_str(&sanitize(segment));
        path.push('.');
    }
    path.push_str(&sanitize(name));

    for (label_name, label_value) in labels.sorted() {
        path.push('.');
        path.push_str(&sanitize(label_name));
        path.push('.');
        path.push_str(&sanitize(label_value));
    }
    path
}

/// One record per sample, in family order and then sample order.
///
/// Samples without their own timestamp are stamped with `now`.
pub fn convert<'a, I>(families: I, prefix: &str, now: Timestamp) -> Vec<PushRecord>
where
    I: IntoIterator<Item = &'a MetricFamily>,
{
    families
        .into_iter()
        .flat_map(|family| family.samples())
        .map(|sample| {
            PushRecord::new(
                metric_path(prefix, sample.name(), sample.labels()),
                sample.value(),
                sample.timestamp().unwrap_or(now),
            )
        })
        .collect()
}
