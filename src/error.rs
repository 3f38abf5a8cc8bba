//! Error types for unnote library.

use std::io;
use thiserror::Error;

pub use crate::graph::ResolveError;

/// Result type alias for unnote operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while opening or rendering a note.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a zip container.
    #[error("Unknown file format: not a note container")]
    UnknownFormat,

    /// The archive could not be read.
    #[error("Container error: {0}")]
    Container(String),

    /// A required archive entry is absent.
    #[error("Missing archive entry: {0}")]
    MissingEntry(String),

    /// The session bytes are not a recognized serialized graph.
    #[error("Format error: {0}")]
    Format(String),

    /// A keypath could not be resolved against the object graph.
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Image decoding failed.
    #[error("Image decoding error: {0}")]
    Codec(String),

    /// A schema value (class name, identifier, key) is not known.
    #[error("Unknown schema value: {0}")]
    UnknownSchemaValue(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The requested operation is not supported.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Error while serializing rendered output.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => {
                Error::MissingEntry("entry not found in archive".to_string())
            }
            _ => Error::Container(err.to_string()),
        }
    }
}

impl From<plist::Error> for Error {
    fn from(err: plist::Error) -> Self {
        Error::Format(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Codec(err.to_string())
    }
}

impl Error {
    /// Whether this error is confined to a single stroke, object or run.
    ///
    /// Such errors are logged and the unit is skipped; they never abort a
    /// page render.
    pub fn is_localized(&self) -> bool {
        matches!(
            self,
            Error::Resolve(_)
                | Error::Codec(_)
                | Error::UnknownSchemaValue(_)
                | Error::MissingEntry(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(err.to_string(), "Unknown file format: not a note container");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_zip_not_found_is_missing_entry() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::MissingEntry(_)));
    }

    #[test]
    fn test_localized_classification() {
        assert!(Error::Codec("bad jpeg".into()).is_localized());
        assert!(!Error::Format("no $objects".into()).is_localized());
        assert!(!Error::NotImplemented("printing".into()).is_localized());
    }
}
