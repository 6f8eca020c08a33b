//! Error types for the VTK writer.

use thiserror::Error;

/// Main error type for VTK export operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Numeric type name not present in the type table
    #[error("Unsupported data type: {0}")]
    UnsupportedType(String),

    /// Arrays that must agree in length or element width do not
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Array shape does not describe its data
    #[error("Invalid array shape: {0}")]
    InvalidShape(String),

    /// Grid category needs geometry that was not supplied
    #[error("Missing geometry for {grid}: {what}")]
    MissingGeometry { grid: &'static str, what: &'static str },

    /// Piece attributes incompatible with the grid category
    #[error("Invalid piece for {grid}: {reason}")]
    InvalidPiece { grid: &'static str, reason: String },

    /// Component count other than 1 or 3
    #[error("Invalid number of components: {0} (expected 1 or 3)")]
    InvalidComponents(usize),

    /// Comment text that cannot be placed inside `<!-- -->`
    #[error("Invalid comment: {0:?}")]
    InvalidComment(String),

    /// Close requested for an element that is not on top of the stack
    #[error("Tag mismatch: expected </{expected}>, open element is {found:?}")]
    TagMismatch { expected: String, found: Option<String> },

    /// Operation called out of order
    #[error("Protocol violation: {0}")]
    Protocol(String),

    /// Elements still open when the document was finished
    #[error("Unclosed elements at save: {0:?}")]
    UnclosedElements(Vec<String>),

    /// Appended blocks do not match the declared data arrays
    #[error("Ledger mismatch: {declared} arrays declared ({declared_bytes} bytes), {appended} blocks appended ({appended_bytes} bytes){}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    LedgerMismatch {
        declared: usize,
        appended: usize,
        declared_bytes: u64,
        appended_bytes: u64,
        detail: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a protocol violation error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a shape mismatch error.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }
}

/// Result type alias for VTK export operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::TagMismatch { expected: "Piece".into(), found: Some("UnstructuredGrid".into()) };
        assert!(e.to_string().contains("</Piece>"));
        assert!(e.to_string().contains("UnstructuredGrid"));

        let e = Error::LedgerMismatch {
            declared: 2,
            appended: 1,
            declared_bytes: 64,
            appended_bytes: 32,
            detail: None,
        };
        assert!(e.to_string().contains("2 arrays declared"));
        assert!(e.to_string().contains("1 blocks appended"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
