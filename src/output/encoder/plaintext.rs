use super::encoder::Encoder;
use crate::model::{PushRecord, TimestampTrait};

/// Graphite plaintext protocol: `path value timestamp`, timestamp in whole seconds.
pub struct PlaintextEncoder {}

impl PlaintextEncoder {
    pub fn new() -> Self {
        Self {}
    }
}

impl Encoder for PlaintextEncoder {
    fn encode(&self, record: &PushRecord) -> Vec<u8> {
        format!(
            "{} {} {}",
            record.path,
            record.value,
            record.timestamp.to_secs()
        )
        .into_bytes()
    }
}
