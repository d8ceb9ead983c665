/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Entity primary keys are UUIDs (v4), generated server-side.
pub type EntityId = uuid::Uuid;
