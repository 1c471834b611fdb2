use thiserror::Error;

/// Errors raised by the stats engine.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The scope window is empty or inverted. No partial result is produced.
    #[error("invalid scope: end {end_ts} must be after start {start_ts}")]
    InvalidScope { start_ts: i64, end_ts: i64 },

    /// The scope is wider than a second count can represent.
    #[error("scope {start_ts}..{end_ts} is too wide")]
    ScopeTooWide { start_ts: i64, end_ts: i64 },

    /// The day calendar has no day for this timestamp.
    #[error("no calendar day for timestamp {0}")]
    DayKey(i64),

    /// The day calendar returned a window that does not contain the cursor.
    #[error("day window for {key} ({start_ts}..{end_ts}) does not advance past {cursor}")]
    DayWindow {
        key: String,
        start_ts: i64,
        end_ts: i64,
        cursor: i64,
    },
}

/// Errors raised while loading cards or rating segments from disk.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported input format for {0} (expected .json or .csv)")]
    UnsupportedFormat(String),
}
