//! hashbatch error types.
//!
//! Every failure is terminal for its request and surfaces on the wire as a
//! bare `500` with an empty body. The code is kept for logging only.

use std::fmt;

/// Error codes for the three request failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum HashBatchErrorCode {
    /// The transport failed while the request payload was being drained.
    ReadError,
    /// The payload is not a well-formed batch of items.
    DecodeError,
    /// The response could not be serialized.
    EncodeError,
}

impl HashBatchErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadError => "ReadError",
            Self::DecodeError => "DecodeError",
            Self::EncodeError => "EncodeError",
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// All codes map to the same status so that callers cannot tell the
    /// failure classes apart from the response alone.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        http::StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl fmt::Display for HashBatchErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed batch hashing request.
#[derive(Debug)]
pub struct HashBatchError {
    /// The error code.
    pub code: HashBatchErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for HashBatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashBatchError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for HashBatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl HashBatchError {
    /// Create a new `HashBatchError` with a custom message.
    #[must_use]
    pub fn with_message(code: HashBatchErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // -- Convenience constructors --

    /// Failure while reading the request body.
    #[must_use]
    pub fn read(message: impl Into<String>) -> Self {
        Self::with_message(HashBatchErrorCode::ReadError, message)
    }

    /// The request body is not a batch of items.
    #[must_use]
    pub fn decode(source: serde_json::Error) -> Self {
        Self::with_message(
            HashBatchErrorCode::DecodeError,
            format!("malformed batch payload: {source}"),
        )
        .with_source(source)
    }

    /// The response could not be serialized.
    #[must_use]
    pub fn encode(source: serde_json::Error) -> Self {
        Self::with_message(
            HashBatchErrorCode::EncodeError,
            format!("failed to serialize response: {source}"),
        )
        .with_source(source)
    }
}
