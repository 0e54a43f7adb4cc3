use crate::model::PushRecord;

pub trait Encoder {
    fn encode(&self, record: &PushRecord) -> Vec<u8>;
}
