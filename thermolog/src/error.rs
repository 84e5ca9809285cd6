//! Error types for the thermolog reading store.

use thiserror::Error;

/// The main error type for all thermolog operations.
///
/// This enum covers every error condition a store or retrieval operation can
/// surface, from file I/O through database schema problems to malformed
/// timestamps read back from persisted data.
///
/// "Not found" is deliberately absent: a device or id lookup with no match is
/// a legitimate result and is reported as an empty list or the reserved zero
/// [`DeviceId`](crate::device::DeviceId), never as an error.
#[derive(Error, Debug)]
pub enum ThermologError {
    /// A destination or source file could not be opened, read, or written.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error in the relational backend, including schema setup.
    #[error("database error: {0}")]
    Db(#[from] DbError),

    /// Persisted data failed validation on read-back.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A timestamp could not be encoded or decoded.
    #[error("time conversion error: {0}")]
    Time(#[from] TimeError),

    /// A caller tried to persist a reading that still carries the sentinel
    /// value or the default timestamp.
    #[error("reading for device '{name}' has no value or timestamp")]
    UnfilledReading {
        /// Name of the device the rejected reading belongs to.
        name: String,
    },

    /// The requested query window exceeds the representable duration range.
    #[error("time window of {seconds} seconds is too large")]
    WindowTooLarge {
        /// The requested window length in seconds.
        seconds: u64,
    },
}

/// File I/O failures, always carrying the path involved.
#[derive(Error, Debug)]
pub enum IoError {
    /// The destination could not be created or opened.
    #[error("failed to create or open file '{path}': {source}")]
    Create {
        /// The path that could not be created or opened.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing to an open destination failed.
    #[error("writing to '{path}' failed: {source}")]
    Write {
        /// The path being written.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading from a source failed.
    #[error("failed to read from '{path}': {source}")]
    Read {
        /// The path being read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the relational backend.
///
/// [`DbError::Schema`] is distinct from [`DbError::Open`] so callers can tell
/// "bad path" apart from "this file exists but is not one of our stores".
#[derive(Error, Debug)]
pub enum DbError {
    /// The database file could not be opened or created.
    #[error("failed to open database '{path}': {source}")]
    Open {
        /// The database path.
        path: String,
        /// The underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },

    /// The required tables could not be created or queried.
    #[error("setting up tables in '{path}' failed: {source}")]
    Schema {
        /// The database path.
        path: String,
        /// The underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },

    /// A device row could not be inserted.
    #[error("could not insert device data for '{name}' / '{origin}' into database: {source}")]
    DeviceInsert {
        /// The device name.
        name: String,
        /// The device origin.
        origin: String,
        /// The underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },

    /// A reading row could not be inserted.
    #[error("could not insert new device reading into database: {source}")]
    ReadingInsert {
        /// The underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },

    /// A query against an open database failed.
    #[error("failed to retrieve data from database query: {source}")]
    Query {
        /// The underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },
}

/// Validation failures for persisted data read back from a store.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A line in a flat-file store does not have the expected field layout.
    #[error("line {line} of '{path}' is not a valid reading record: '{text}'")]
    MalformedLine {
        /// The file containing the bad line.
        path: String,
        /// One-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// A stored reading value is not a valid integer.
    #[error("'{text}' is not a valid reading value")]
    Value {
        /// The offending substring.
        text: String,
    },

    /// A stored reading kind is not one of the known literals.
    #[error("'{text}' is not a valid reading kind")]
    Kind {
        /// The offending substring.
        text: String,
    },
}

/// Errors from the timestamp codec.
///
/// Decoding is strict: each variant names the field of the canonical
/// `YYYY-MM-DD HH:MM:SS` representation that failed validation.
#[derive(Error, Debug)]
pub enum TimeError {
    /// The input does not have the canonical length and separators.
    #[error("'{input}' does not match the pattern 'YYYY-MM-DD HH:MM:SS'")]
    Pattern {
        /// The rejected input.
        input: String,
    },

    /// The year field is not a number.
    #[error("'{text}' is not a valid year")]
    Year {
        /// The offending substring.
        text: String,
    },

    /// The month field is not a number in 1..=12.
    #[error("'{text}' is not a valid month")]
    Month {
        /// The offending substring.
        text: String,
    },

    /// The day field is not a number in 1..=31.
    #[error("'{text}' is not a valid day")]
    Day {
        /// The offending substring.
        text: String,
    },

    /// The hour field is not a number in 0..=23.
    #[error("'{text}' is not a valid hour")]
    Hour {
        /// The offending substring.
        text: String,
    },

    /// The minute field is not a number in 0..=59.
    #[error("'{text}' is not a valid minute")]
    Minute {
        /// The offending substring.
        text: String,
    },

    /// The second field is not a number in 0..=59.
    #[error("'{text}' is not a valid second")]
    Second {
        /// The offending substring.
        text: String,
    },

    /// The fields are individually valid but do not name a representable
    /// local time (for example day 31 in a 30-day month, or a time skipped
    /// by a daylight saving transition).
    #[error("'{input}' is not a representable local time")]
    Unrepresentable {
        /// The rejected input.
        input: String,
    },

    /// The instant cannot be written in the fixed-width canonical format.
    #[error("year {year} cannot be represented in the format 'YYYY-MM-DD HH:MM:SS'")]
    UnrepresentableYear {
        /// The out-of-range year.
        year: i32,
    },
}

/// Type alias for `Result<T, ThermologError>`.
pub type Result<T> = std::result::Result<T, ThermologError>;
