use super::sample::Sample;
use super::MetricName;
use crate::error::{Error, Result};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Summary,
    Histogram,
    Untyped,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Summary => "summary",
            MetricKind::Histogram => "histogram",
            MetricKind::Untyped => "untyped",
        }
    }
}

impl std::convert::TryFrom<&str> for MetricKind {
    type Error = Error;

    fn try_from(kind: &str) -> Result<Self> {
        match kind {
            "counter" => Ok(MetricKind::Counter),
            "gauge" => Ok(MetricKind::Gauge),
            "summary" => Ok(MetricKind::Summary),
            "histogram" => Ok(MetricKind::Histogram),
            "untyped" => Ok(MetricKind::Untyped),
            _ => Err(Error::new("unknown metric type")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    name: MetricName,
    kind: MetricKind,
    help: String,
    samples: Vec<Sample>,
}

impl MetricFamily {
    pub fn new(name: MetricName, kind: MetricKind) -> Self {
        assert!(name.len() > 0);
        Self {
            name,
            kind,
            help: String::new(),
            samples: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &MetricName {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    #[inline]
    pub fn help(&self) -> &str {
        &self.help
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn set_kind(&mut self, kind: MetricKind) {
        self.kind = kind;
    }

    pub fn set_help(&mut self, help: String) {
        self.help = help;
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Whether a sample called `name` is part of this family.
    ///
    /// Summaries and histograms expose their series under suffixed names.
    pub fn accepts(&self, name: &str) -> bool {
        let suffix = match name.strip_prefix(self.name.as_str()) {
            Some(suffix) => suffix,
            None => return false,
        };

        match self.kind {
            MetricKind::Summary => ["", "_sum", "_count"].contains(&suffix),
            MetricKind::Histogram => ["_bucket", "_sum", "_count"].contains(&suffix),
            _ => suffix.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_kind_try_from() {
        #[rustfmt::skip]
        let tests = [
            ("counter", MetricKind::Counter),
            ("gauge", MetricKind::Gauge),
            ("summary", MetricKind::Summary),
            ("histogram", MetricKind::Histogram),
            ("untyped", MetricKind::Untyped),
        ];

        for (input, expected) in &tests {
            assert_eq!(*expected, MetricKind::try_from(*input).unwrap());
            assert_eq!(*input, expected.as_str());
        }

        assert!(MetricKind::try_from("gaugehistogram").is_err());
        assert!(MetricKind::try_from("Counter").is_err());
    }

    #[test]
    fn test_accepts() {
        #[rustfmt::skip]
        let tests = [
            (MetricKind::Counter, "rpc", true),
            (MetricKind::Counter, "rpc_total", false),
            (MetricKind::Gauge, "rpc", true),
            (MetricKind::Untyped, "rpc_sum", false),
            (MetricKind::Summary, "rpc", true),
            (MetricKind::Summary, "rpc_sum", true),
            (MetricKind::Summary, "rpc_count", true),
            (MetricKind::Summary, "rpc_bucket", false),
            (MetricKind::Histogram, "rpc", false),
            (MetricKind::Histogram, "rpc_bucket", true),
            (MetricKind::Histogram, "rpc_sum", true),
            (MetricKind::Histogram, "rpc_count", true),
            (MetricKind::Histogram, "rpcs_count", false),
            (MetricKind::Gauge, "other", false),
        ];

        for (kind, name, expected) in &tests {
            let family = MetricFamily::new("rpc".into(), *kind);
            assert_eq!(
                *expected,
                family.accepts(name),
                "while matching {} against {:?}",
                name,
                kind
            );
        }
    }
}
