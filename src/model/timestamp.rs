use chrono::prelude::*;

// Unix timestamp in milliseconds.
pub type Timestamp = i64;

pub trait TimestampTrait {
    fn now() -> Self;
    fn to_secs(&self) -> i64;
}

impl TimestampTrait for Timestamp {
    fn now() -> Self {
        Utc::now().timestamp_millis()
    }

    // Floors towards negative infinity so pre-epoch values stay monotonic.
    #[inline]
    fn to_secs(&self) -> i64 {
        self.div_euclid(1000)
    }
}
