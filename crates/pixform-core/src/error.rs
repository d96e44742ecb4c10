//! Error types for pipeline construction and execution.

use thiserror::Error;

/// Result type alias using [`TransformError`].
pub type Result<T> = std::result::Result<T, TransformError>;

/// Errors that can occur while building or executing a transformation pipeline.
///
/// Every variant is fatal: an execution either yields a complete output or
/// one of these errors, never a partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// A unit string does not match `<number><unit>`.
    #[error("Cannot parse {0:?}")]
    Parse(String),

    /// The unit parsed but makes no sense where it was used
    /// (e.g. an angle where a length is required).
    #[error("Unsupported unit {unit:?} for {expected}")]
    UnsupportedUnit {
        unit: String,
        expected: &'static str,
    },

    /// Options are missing or contradict each other.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// The drawing surface or its 2D context could not be obtained.
    #[error("Failed to acquire a drawing surface: {0}")]
    SurfaceAcquisition(String),

    /// The planned output exceeds the maximum edge length.
    #[error("Output size {width}x{height} exceeds the maximum edge length of {max_edge}px")]
    OutputTooLarge {
        width: f64,
        height: f64,
        max_edge: u32,
    },

    /// The source image could not be loaded or decoded.
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    /// The finished surface could not be encoded.
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// The drawing surface rejected an operation.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error while writing a download.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        TransformError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransformError::Parse("abc".to_string());
        assert_eq!(err.to_string(), "Cannot parse \"abc\"");

        let err = TransformError::UnsupportedUnit {
            unit: "deg".to_string(),
            expected: "a length",
        };
        assert_eq!(err.to_string(), "Unsupported unit \"deg\" for a length");

        let err = TransformError::OutputTooLarge {
            width: 20000.0,
            height: 10.0,
            max_edge: 16384,
        };
        assert_eq!(
            err.to_string(),
            "Output size 20000x10 exceeds the maximum edge length of 16384px"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TransformError = io.into();
        assert!(matches!(err, TransformError::Io(msg) if msg == "missing"));
    }
}
