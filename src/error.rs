use thiserror::Error;

/// Result type alias for FIAD operations
pub type Result<T> = std::result::Result<T, FiadError>;

/// Errors that can occur when converting between FIAD directories and disk images
#[derive(Debug, Error)]
pub enum FiadError {
    /// I/O error occurred while reading or writing host files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes handed to the header parser do not start with a TIFILES header
    #[error("Invalid TIFILES header: {0}")]
    InvalidHeaderFormat(String),

    /// A TIFILES header was detected but its fields are inconsistent
    #[error("Malformed TIFILES header at offset 0x{offset:02X}: {message}")]
    MalformedHeader {
        /// Header offset of the offending field
        offset: usize,
        /// Error message
        message: String,
    },

    /// File not found in the disk image directory
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Failure reported by the disk-image engine
    #[error("Engine failure: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Invalid filename
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

impl FiadError {
    /// Create a malformed header error with context
    pub fn malformed<S: Into<String>>(offset: usize, message: S) -> Self {
        FiadError::MalformedHeader {
            offset,
            message: message.into(),
        }
    }

    /// Wrap an engine error
    pub fn engine<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FiadError::Engine(Box::new(err))
    }
}
