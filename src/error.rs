/// Errors generated by this crate
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The page uses an encoding that cannot be decoded in batches.
    /// Callers are expected to fall back to a non-vectorized path or abort.
    UnsupportedEncoding(String),
    /// A dictionary-encoded page was found but no dictionary was set for the column chunk.
    MissingDictionary(String),
    /// An operation was requested on a type or decode mode that forbids it.
    UnsupportedOperation(String),
    /// When the page is known to be out of spec (short read, invalid run header, ...)
    OutOfSpec(String),
    /// An argument passed by the caller is invalid, e.g. a vector too small for the batch.
    InvalidParameter(String),
}

impl Error {
    pub(crate) fn oos<I: Into<String>>(message: I) -> Self {
        Self::OutOfSpec(message.into())
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::UnsupportedEncoding(message) => {
                write!(fmt, "unsupported encoding: {}", message)
            }
            Error::MissingDictionary(message) => {
                write!(fmt, "missing dictionary: {}", message)
            }
            Error::UnsupportedOperation(message) => {
                write!(fmt, "unsupported operation: {}", message)
            }
            Error::OutOfSpec(message) => {
                write!(fmt, "File out of specification: {}", message)
            }
            Error::InvalidParameter(message) => {
                write!(fmt, "Invalid parameter: {}", message)
            }
        }
    }
}

impl From<std::array::TryFromSliceError> for Error {
    fn from(e: std::array::TryFromSliceError) -> Error {
        Error::OutOfSpec(format!("Can't deserialize to parquet native type: {}", e))
    }
}

/// A specialized `Result` for Parquet errors.
pub type Result<T> = std::result::Result<T, Error>;
