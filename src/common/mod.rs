use std::fmt;

/// Errors that are reported back to the user as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// Record form failed validation. Message is shown verbatim.
    Validation(String),
    /// Command text could not be parsed
    Parse(String),
    UnsupportedFormat(String),
    /// Malformed row in a data file
    InvalidRecord(String),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrackerError::Validation(s) => write!(f, "{s}"),
            TrackerError::Parse(s) => write!(f, "Unable to parse command: {s}"),
            TrackerError::UnsupportedFormat(s) => write!(f, "Unsupported export format '{s}'"),
            TrackerError::InvalidRecord(s) => write!(f, "Invalid record: {s}"),
        }
    }
}

impl std::error::Error for TrackerError {}
