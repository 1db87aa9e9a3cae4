//! Error types for the diagnosis crate.
//!
//! The diagnosis engine itself is infallible: detectors are total functions
//! over a snapshot. Errors only arise at the edges, when telemetry rows are
//! parsed, configuration is loaded, or results are written. The `thiserror`
//! crate is used for ergonomic error definitions.

use thiserror::Error;

/// Errors that can occur while parsing a telemetry CSV row into a snapshot.
///
/// Line numbers are 1-based and count the header line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotParseError {
    /// The row did not have the expected number of comma-separated fields.
    #[error("Line {line}: expected {expected} fields, got {got}")]
    WrongFieldCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    /// A field could not be parsed as a number.
    #[error("Line {line}: invalid number '{value}' in column {column}")]
    InvalidNumber {
        line: usize,
        column: &'static str,
        value: String,
    },

    /// The sequence state code is outside 0..=5.
    #[error("Line {line}: invalid sequence state code {value}")]
    InvalidSequenceState { line: usize, value: i64 },

    /// The plug info code is outside 0..=2.
    #[error("Line {line}: invalid plug info code {value}")]
    InvalidPlugInfo { line: usize, value: i64 },

    /// The input contained no header line.
    #[error("Input is empty: missing header line")]
    MissingHeader,
}

/// Errors raised while loading or validating an engine configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration document could not be deserialized.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A configuration value is outside its permitted range.
    #[error("Invalid value for '{field}': {description}")]
    InvalidValue {
        field: &'static str,
        description: String,
    },
}

/// Main error type for the diagnosis crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObcError {
    /// Error while parsing telemetry input.
    #[error("Parsing error: {0}")]
    Parse(#[from] SnapshotParseError),

    /// Error in the engine configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A fault code outside 0x01..=0x0C was requested.
    #[error("Invalid fault code: 0x{0:02X}")]
    InvalidFaultCode(u8),

    /// A fault code string could not be parsed.
    #[error("Unrecognised fault code '{0}'")]
    UnrecognisedFaultCode(String),

    /// A fault status encoding outside 0..=2 was found.
    #[error("Invalid fault status encoding: {0}")]
    InvalidFaultStatus(u8),

    /// I/O error while reading input or writing results.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ObcError {
    fn from(err: std::io::Error) -> Self {
        ObcError::Io(err.to_string())
    }
}
