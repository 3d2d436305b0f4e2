/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 *
 * Messages and codes follow the Node.js `Buffer` error surface so callers
 * can match on either the variant, the `code()` string or the JS-style kind.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Buffer operation result
pub type BufferResult<T> = Result<T, BufferError>;

/// JS error class an error maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// `RangeError`: offsets, lengths or values outside their domain
    Range,
    /// `TypeError`: wrong argument kind or unknown encoding
    Type,
    /// Plain `Error` (transcoder failures)
    Generic,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Range => write!(f, "RangeError"),
            ErrorKind::Type => write!(f, "TypeError"),
            ErrorKind::Generic => write!(f, "Error"),
        }
    }
}

/// Buffer errors with serialization support
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum BufferError {
    #[error("The value of \"{name}\" is out of range. It must be {range}. Received {received}")]
    #[diagnostic(
        code(buffer::out_of_range),
        help("Check the offset, length or value against the width of the accessed field.")
    )]
    OutOfRange {
        name: String,
        range: String,
        received: String,
    },

    #[error("{}", bounds_message(.name))]
    #[diagnostic(
        code(buffer::out_of_bounds),
        help("The buffer is smaller than the requested access width.")
    )]
    BufferOutOfBounds { name: Option<String> },

    #[error("The \"{name}\" argument must be {expected}. Received {received}")]
    #[diagnostic(code(buffer::invalid_arg_type))]
    InvalidArgType {
        name: String,
        expected: String,
        received: String,
    },

    #[error("The argument '{name}' {reason}. Received {received}")]
    #[diagnostic(code(buffer::invalid_arg_value))]
    InvalidArgValue {
        name: String,
        reason: String,
        received: String,
    },

    #[error("Unknown encoding: {0}")]
    #[diagnostic(
        code(buffer::unknown_encoding),
        help("Use utf8, utf16le, latin1, ascii, hex, base64 or base64url.")
    )]
    UnknownEncoding(String),

    #[error("Buffer size must be a multiple of {0}-bits")]
    #[diagnostic(code(buffer::invalid_buffer_size))]
    InvalidBufferSize(u8),

    #[error("Unable to transcode Buffer [{0}]")]
    #[diagnostic(
        code(buffer::transcode_failed),
        help("The source bytes are not valid in the source encoding or not representable in the target.")
    )]
    Transcode(String),

    #[error("{0}")]
    #[diagnostic(code(buffer::coercion_failed))]
    Coercion(String),
}

fn bounds_message(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("\"{}\" is outside of buffer bounds", name),
        None => "Attempt to access memory outside buffer bounds".to_string(),
    }
}

impl BufferError {
    /// Offset/value outside an inclusive or half-open range
    pub fn out_of_range(
        name: impl Into<String>,
        range: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        BufferError::OutOfRange {
            name: name.into(),
            range: range.into(),
            received: received.into(),
        }
    }

    pub fn invalid_arg_type(
        name: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        BufferError::InvalidArgType {
            name: name.into(),
            expected: expected.into(),
            received: received.into(),
        }
    }

    pub fn invalid_arg_value(
        name: impl Into<String>,
        reason: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        BufferError::InvalidArgValue {
            name: name.into(),
            reason: reason.into(),
            received: received.into(),
        }
    }

    /// JS error class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BufferError::OutOfRange { .. }
            | BufferError::BufferOutOfBounds { .. }
            | BufferError::InvalidBufferSize(_) => ErrorKind::Range,
            BufferError::InvalidArgType { .. }
            | BufferError::InvalidArgValue { .. }
            | BufferError::UnknownEncoding(_)
            | BufferError::Coercion(_) => ErrorKind::Type,
            BufferError::Transcode(_) => ErrorKind::Generic,
        }
    }

    /// Node.js error code
    pub fn code(&self) -> &'static str {
        match self {
            BufferError::OutOfRange { .. } => "ERR_OUT_OF_RANGE",
            BufferError::BufferOutOfBounds { .. } => "ERR_BUFFER_OUT_OF_BOUNDS",
            BufferError::InvalidArgType { .. } => "ERR_INVALID_ARG_TYPE",
            BufferError::InvalidArgValue { .. } => "ERR_INVALID_ARG_VALUE",
            BufferError::UnknownEncoding(_) => "ERR_UNKNOWN_ENCODING",
            BufferError::InvalidBufferSize(_) => "ERR_INVALID_BUFFER_SIZE",
            BufferError::Transcode(_) => "U_ILLEGAL_ARGUMENT_ERROR",
            BufferError::Coercion(_) => "ERR_INVALID_ARG_TYPE",
        }
    }

    #[inline]
    pub fn is_range_error(&self) -> bool {
        self.kind() == ErrorKind::Range
    }

    #[inline]
    pub fn is_type_error(&self) -> bool {
        self.kind() == ErrorKind::Type
    }
}
