//! Error types for dbmap.
//!
//! Every error carries the name of the operation that produced it so the
//! rendered message reads `operation: detail`. Nothing in dbmap retries;
//! callers must treat an `Err` as "do not use the accompanying output".

use std::error::Error as StdError;
use std::fmt;

/// Boxed error used at the boundary with external collaborators
/// (row cursors, column converters).
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The primary error type for all dbmap operations.
#[derive(Debug)]
pub enum Error {
    /// Input the core does not support (dialect, key type, empty payload).
    Unsupported {
        op: &'static str,
        kind: UnsupportedKind,
        message: String,
    },
    /// Cached or declared structure is inconsistent.
    Structure { op: &'static str, message: String },
    /// A record could not be mapped (unclassifiable or unmapped primary key,
    /// unknown field).
    Mapping { op: &'static str, message: String },
    /// A value could not be converted between SQL and Rust representations.
    Conversion(ConversionError),
    /// The row cursor reported a failure. Propagated untouched.
    Scan { op: &'static str, source: BoxError },
}

/// What kind of unsupported input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedKind {
    /// Dialect outside the recognized set for the requested operation.
    Dialect,
    /// Primary key field type that is neither text nor a signed integer.
    PrimaryKeyType,
    /// Empty batch, empty key/value payload, or nothing left to write.
    EmptyInput,
    /// Page number or page size out of range.
    Page,
}

#[derive(Debug)]
pub struct ConversionError {
    pub op: &'static str,
    /// Column or field being converted, when known.
    pub column: Option<String>,
    pub message: String,
    pub source: Option<BoxError>,
}

impl Error {
    pub fn unsupported(op: &'static str, kind: UnsupportedKind, message: impl Into<String>) -> Self {
        Error::Unsupported {
            op,
            kind,
            message: message.into(),
        }
    }

    pub fn structure(op: &'static str, message: impl Into<String>) -> Self {
        Error::Structure {
            op,
            message: message.into(),
        }
    }

    pub fn mapping(op: &'static str, message: impl Into<String>) -> Self {
        Error::Mapping {
            op,
            message: message.into(),
        }
    }

    pub fn conversion(op: &'static str, message: impl Into<String>) -> Self {
        Error::Conversion(ConversionError {
            op,
            column: None,
            message: message.into(),
            source: None,
        })
    }

    pub fn scan(op: &'static str, source: BoxError) -> Self {
        Error::Scan { op, source }
    }

    /// Attach the column a conversion failure happened on.
    pub fn with_column(self, column: impl Into<String>) -> Self {
        match self {
            Error::Conversion(mut err) => {
                err.column = Some(column.into());
                Error::Conversion(err)
            }
            other => other,
        }
    }

    /// The operation that produced this error.
    pub fn op(&self) -> &'static str {
        match self {
            Error::Unsupported { op, .. }
            | Error::Structure { op, .. }
            | Error::Mapping { op, .. }
            | Error::Scan { op, .. } => op,
            Error::Conversion(err) => err.op,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported { .. })
    }

    pub fn unsupported_kind(&self) -> Option<UnsupportedKind> {
        match self {
            Error::Unsupported { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unsupported { op, message, .. } => write!(f, "{}: unsupported: {}", op, message),
            Error::Structure { op, message } => write!(f, "{}: structure error: {}", op, message),
            Error::Mapping { op, message } => write!(f, "{}: mapping error: {}", op, message),
            Error::Conversion(err) => write!(f, "{}", err),
            Error::Scan { op, source } => write!(f, "{}: scan failed: {}", op, source),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(
                f,
                "{}: conversion error on `{}`: {}",
                self.op, column, self.message
            )?,
            None => write!(f, "{}: conversion error: {}", self.op, self.message)?,
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source)?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Conversion(err) => err
                .source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn StdError + 'static)),
            Error::Scan { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl StdError for ConversionError {}

/// Result type alias for dbmap operations.
pub type Result<T> = std::result::Result<T, Error>;
