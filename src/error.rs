//! Error types for the pdfcolor engine.

use thiserror::Error;

/// Primary error type for color-space parsing and construction.
///
/// Every variant is fatal to the parse or construction that raised it.
/// Recoverable problems (out-of-range black points, bad gamma values,
/// inverted Lab ranges) are corrected in place and reported through the
/// `log` facade instead.
#[derive(Error, Debug)]
pub enum ColorError {
    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        expected: &'static str,
        got: &'static str,
    },

    #[error("unrecognized color space: {0}")]
    UnrecognizedColorSpace(String),

    #[error("{space} is missing the required {entry} entry")]
    MissingEntry {
        space: &'static str,
        entry: &'static str,
    },

    #[error("invalid WhitePoint components for {0}, no fallback available")]
    InvalidWhitePoint(&'static str),

    #[error("ICCBased color space with N = {0} has no device fallback")]
    UnsupportedIccComponents(i64),

    #[error("indexed color space hival {0} out of range")]
    InvalidHighValue(i64),

    #[error("unrecognized indexed lookup table: {0}")]
    MalformedLookup(&'static str),

    #[error("malformed color space array: {0}")]
    MalformedArray(&'static str),

    #[error("PDF object {0} not found")]
    ObjectNotFound(u32),

    #[error("circular indirect reference")]
    CircularReference,

    #[error("tint transform function: {0}")]
    TintFunction(String),

    #[error("decode error: {0}")]
    DecodeError(String),
}

/// Convenience Result type alias for [`ColorError`].
pub type Result<T> = std::result::Result<T, ColorError>;
