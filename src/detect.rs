//! Container and session format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Zip local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Binary property list magic: bplist
const BPLIST_MAGIC: &[u8] = b"bplist";
const BPLIST_VERSION_LEN: usize = 2; // e.g., "00"

/// Container format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFormat {
    /// Container kind (always "zip" for supported notes)
    pub container: String,
}

impl std::fmt::Display for NoteFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "note ({})", self.container)
    }
}

/// Detect the container format from a file path.
///
/// # Example
/// ```no_run
/// use unnote::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("lecture.note").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<NoteFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 4];
    reader
        .read_exact(&mut header)
        .map_err(|_| Error::UnknownFormat)?;
    detect_format_from_bytes(&header)
}

/// Detect the container format from the leading bytes of a file.
///
/// # Returns
/// * `Ok(NoteFormat)` if the data starts with a zip local file header
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<NoteFormat> {
    if !data.starts_with(ZIP_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    Ok(NoteFormat {
        container: "zip".to_string(),
    })
}

/// Check whether session bytes are a binary property list.
///
/// XML and JSON property lists are rejected: the producing application
/// only ever writes the binary form.
pub fn is_binary_plist(data: &[u8]) -> bool {
    data.len() >= BPLIST_MAGIC.len() + BPLIST_VERSION_LEN
        && data.starts_with(BPLIST_MAGIC)
        && data[BPLIST_MAGIC.len()..BPLIST_MAGIC.len() + BPLIST_VERSION_LEN]
            .iter()
            .all(u8::is_ascii_digit)
}

/// Check if a file looks like a note container.
pub fn is_note<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes look like a note container.
pub fn is_note_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
