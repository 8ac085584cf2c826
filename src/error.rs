//! Error types for the area engine

use std::fmt;
use std::io;

/// Result type for area engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in area engine operations
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(io::Error),

    /// Polygon failed validation before any geometry ran
    InvalidPolygon(String),

    /// No metadata exists for the requested image identifier
    ImageNotFound(String),

    /// Metadata exists but carries no usable bounds or CRS
    GeoreferenceMissing,

    /// The auto-detector could not produce a usable polygon
    SegmentationFailure(String),

    /// Malformed metadata or detection catalog
    Catalog(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::InvalidPolygon(msg) => write!(f, "Invalid polygon: {}", msg),
            Error::ImageNotFound(id) => write!(f, "Image not found: {}", id),
            Error::GeoreferenceMissing => write!(f, "Image has no usable georeference"),
            Error::SegmentationFailure(msg) => write!(f, "Segmentation failed: {}", msg),
            Error::Catalog(msg) => write!(f, "Catalog error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Catalog(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidPolygon("need at least 3 points".to_string());
        assert_eq!(err.to_string(), "Invalid polygon: need at least 3 points");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_image_not_found_carries_id() {
        let err = Error::ImageNotFound("site_04.tif".to_string());
        assert!(err.to_string().contains("site_04.tif"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Catalog(_)));
    }
}
