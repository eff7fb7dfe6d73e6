use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

/// Error kinds for typestore operations.
///
/// Construction-time kinds (`InvalidPath`, `InvalidId`, `InvalidFieldPath`)
/// never touch the remote store. Transport kinds (`WriteError`, `ReadError`)
/// are produced by a [`RemoteStore`](crate::store::RemoteStore) and surface
/// to the caller unchanged.
///
/// # Examples
///
/// ```rust,ignore
/// use typestore::errors::{StoreError, ErrorKind, StoreResult};
///
/// fn example() -> StoreResult<()> {
///     Err(StoreError::new("Document not found", ErrorKind::NotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Path model errors
    /// The collection path is empty or malformed
    InvalidPath,
    /// The document id is empty or malformed
    InvalidId,
    /// The field path is empty or has empty segments
    InvalidFieldPath,

    // Remote store errors
    /// The remote store could not apply a write
    WriteError,
    /// The remote store could not serve a read
    ReadError,
    /// The target document of an update does not exist
    NotFound,

    // Codec errors
    /// Read data violates the codec invariants (e.g. an unresolved server value)
    CorruptData,
    /// A value does not match the declared schema of its field
    ValidationError,
    /// The field is not declared in the schema
    InvalidFieldName,
    /// A required field is missing
    MissingRequiredField,
    /// Error mapping a record to/from a document
    ObjectMappingError,
    /// Error encoding or decoding the JSON wire form
    EncodingError,

    // Client errors
    /// The operation is not valid in the current context
    InvalidOperation,
    /// The client has been shut down
    StoreClosed,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidPath => write!(f, "Invalid path"),
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::InvalidFieldPath => write!(f, "Invalid field path"),
            ErrorKind::WriteError => write!(f, "Write error"),
            ErrorKind::ReadError => write!(f, "Read error"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::CorruptData => write!(f, "Corrupt data"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidFieldName => write!(f, "Invalid field name"),
            ErrorKind::MissingRequiredField => write!(f, "Missing required field"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::StoreClosed => write!(f, "Store closed"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type of every fallible typestore operation.
///
/// `StoreError` carries a message, an [`ErrorKind`], an optional cause and
/// the backtrace captured at construction.
///
/// # Examples
///
/// ```rust,ignore
/// use typestore::errors::{StoreError, ErrorKind};
///
/// let cause = StoreError::new("connection reset", ErrorKind::WriteError);
/// let err = StoreError::new_with_cause("Failed to add document", ErrorKind::WriteError, cause);
/// ```
#[derive(Clone)]
pub struct StoreError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<StoreError>>,
    backtrace: Backtrace,
}

impl StoreError {
    /// Creates a new `StoreError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        StoreError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Backtrace::new(),
        }
    }

    /// Creates a new `StoreError` chained to the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: StoreError) -> Self {
        StoreError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Backtrace::new(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&StoreError> {
        self.cause.as_deref()
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// Shorthand for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(feature = "serde")]
impl serde::de::Error for StoreError {
    fn custom<T: Display>(msg: T) -> Self {
        StoreError::new(&msg.to_string(), ErrorKind::EncodingError)
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for StoreError {
    fn custom<T: Display>(msg: T) -> Self {
        StoreError::new(&msg.to_string(), ErrorKind::EncodingError)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::new(&format!("JSON error: {}", err), ErrorKind::EncodingError)
    }
}

impl From<chrono::ParseError> for StoreError {
    fn from(err: chrono::ParseError) -> Self {
        StoreError::new(
            &format!("Timestamp parsing error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<String> for StoreError {
    fn from(msg: String) -> Self {
        StoreError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for StoreError {
    fn from(msg: &str) -> Self {
        StoreError::new(msg, ErrorKind::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_new_creates_error() {
        let error = StoreError::new("An error occurred", ErrorKind::WriteError);
        assert_eq!(error.message(), "An error occurred");
        assert_eq!(error.kind(), &ErrorKind::WriteError);
        assert!(error.cause().is_none());
    }

    #[test]
    fn store_error_with_cause_keeps_chain() {
        let cause = StoreError::new("connection reset", ErrorKind::ReadError);
        let error = StoreError::new_with_cause("Failed to read", ErrorKind::ReadError, cause);
        assert_eq!(error.cause().map(|c| c.message()), Some("connection reset"));
        assert!(error.source().is_some());
    }

    #[test]
    fn store_error_display_is_message_only() {
        let error = StoreError::new("Document not found", ErrorKind::NotFound);
        assert_eq!(format!("{}", error), "Document not found");
    }

    #[test]
    fn store_error_debug_prints_cause() {
        let cause = StoreError::new("inner", ErrorKind::WriteError);
        let error = StoreError::new_with_cause("outer", ErrorKind::WriteError, cause);
        let formatted = format!("{:?}", error);
        assert!(formatted.contains("outer"));
        assert!(formatted.contains("Caused by:"));
    }

    #[test]
    fn store_error_source_is_none_without_cause() {
        let error = StoreError::new("plain", ErrorKind::InvalidPath);
        assert!(error.source().is_none());
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::CorruptData.to_string(), "Corrupt data");
        assert_eq!(ErrorKind::StoreClosed.to_string(), "Store closed");
        assert_eq!(ErrorKind::InvalidFieldPath.to_string(), "Invalid field path");
    }

    #[test]
    fn json_error_maps_to_encoding_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: StoreError = err.into();
        assert_eq!(error.kind(), &ErrorKind::EncodingError);
    }

    #[test]
    fn string_maps_to_internal_error() {
        let error: StoreError = "boom".into();
        assert_eq!(error.kind(), &ErrorKind::InternalError);
    }
}
