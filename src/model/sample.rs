use super::labels::Labels;
use super::timestamp::Timestamp;
use super::{MetricName, SampleValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    name: MetricName,
    labels: Labels,
    value: SampleValue,
    timestamp: Option<Timestamp>,
}

impl Sample {
    pub fn new(
        name: MetricName,
        labels: Labels,
        value: SampleValue,
        timestamp: Option<Timestamp>,
    ) -> Self {
        assert!(name.len() > 0);
        Self {
            name,
            labels,
            value,
            timestamp,
        }
    }

    #[inline]
    pub fn name(&self) -> &MetricName {
        &self.name
    }

    #[inline]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn label(&self, name: &str) -> Option<&String> {
        self.labels.get(name)
    }

    #[inline]
    pub fn value(&self) -> SampleValue {
        self.value
    }

    #[inline]
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }
}
