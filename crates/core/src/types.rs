/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Current UTC time, used to stamp envelopes at construction.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}
