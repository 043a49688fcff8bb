use thiserror::Error;

/// Anything that can go wrong while loading a model or replaying a trace.
///
/// Every error aborts the run; there is no partial result.
#[derive(Debug, Error)]
pub enum TracerError {
    /// A model line that matches none of the patterns of its section.
    #[error("invalid format in the {section} section: {line:?}")]
    InvalidFormat { section: String, line: String },

    /// A non-numeric token in the selection values of a fired edge.
    #[error("transition format error at trace line {line_number}: {token:?}")]
    TransitionFormat { line_number: usize, token: String },

    /// A missing `.` line at the end of a trace sub-list.
    #[error("expecting a line with '.' at trace line {line_number} but got {found:?}")]
    TerminatorMissing { line_number: usize, found: String },

    /// A reference to a table entry that does not exist.
    #[error("{what} index {index} is out of range (there are only {count})")]
    IndexOutOfRange {
        what: &'static str,
        index: i64,
        count: usize,
    },

    /// A trace token that is not what the state grammar requires.
    #[error("expecting {expected} at trace line {line_number} but got {found:?}")]
    UnexpectedToken {
        line_number: usize,
        expected: &'static str,
        found: String,
    },

    /// The configuration does not fit the loaded model.
    #[error("configuration does not match the model: {0}")]
    ConfigurationMismatch(String),

    /// Reading an input stream or writing the report failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TracerError {
    pub(crate) fn invalid_format(section: &str, line: &str) -> Self {
        TracerError::InvalidFormat {
            section: section.to_string(),
            line: line.to_string(),
        }
    }
}
