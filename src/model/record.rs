use super::timestamp::Timestamp;
use super::SampleValue;

/// One line of the Graphite plaintext protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct PushRecord {
    pub path: String,
    pub value: SampleValue,
    pub timestamp: Timestamp,
}

impl PushRecord {
    pub fn new(path: String, value: SampleValue, timestamp: Timestamp) -> Self {
        Self {
            path,
            value,
            timestamp,
        }
    }
}
