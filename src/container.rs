//! Zip container holding the session descriptor and embedded media.
//!
//! Layout: the first entry's top-level folder names the note root;
//! `<root>/Session.plist` is required, `<root>/metadata.plist` is optional,
//! and media files live under `<root>/<relativePath>`.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use std::sync::Mutex;

use zip::ZipArchive;

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};

/// Session descriptor entry name.
pub const SESSION_ENTRY: &str = "Session.plist";

/// Optional metadata entry name.
pub const METADATA_ENTRY: &str = "metadata.plist";

/// Upper bound on buffer space reserved from an entry's declared size.
const MAX_PREALLOCATION: u64 = 1 << 24;

/// Readable, seekable archive source.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// An open note container.
///
/// The underlying zip handle stays open for the lifetime of the value and
/// is closed when it is dropped. Entry reads are serialized internally so
/// the container can be shared between threads.
pub struct NoteArchive {
    zip: Mutex<ZipArchive<Box<dyn ReadSeek>>>,
    root: String,
    entry_count: usize,
}

impl fmt::Debug for NoteArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteArchive")
            .field("root", &self.root)
            .field("entry_count", &self.entry_count)
            .finish()
    }
}

impl NoteArchive {
    /// Open a container file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_source(Box::new(BufReader::new(file)))
    }

    /// Open a container held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        detect_format_from_bytes(&data)?;
        Self::from_source(Box::new(Cursor::new(data)))
    }

    fn from_source(source: Box<dyn ReadSeek>) -> Result<Self> {
        let mut zip = ZipArchive::new(source).map_err(|e| match e {
            zip::result::ZipError::Io(io) => Error::Io(io),
            other => Error::Container(format!("unreadable archive: {}", other)),
        })?;

        if zip.is_empty() {
            return Err(Error::Container("archive has no entries".to_string()));
        }

        let root = {
            let first = zip.by_index(0)?;
            root_folder(first.name())?
        };
        log::debug!("Note root folder: {}", root);

        let entry_count = zip.len();
        Ok(Self {
            zip: Mutex::new(zip),
            root,
            entry_count,
        })
    }

    /// Name of the root folder (the note title).
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Number of entries in the archive.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Read `<root>/<relative>` into memory.
    pub fn read_entry(&self, relative: &str) -> Result<Vec<u8>> {
        let name = self.entry_name(relative)?;
        let mut zip = self
            .zip
            .lock()
            .map_err(|_| Error::Container("archive lock poisoned".to_string()))?;

        let mut file = match zip.by_name(&name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Err(Error::MissingEntry(name)),
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::with_capacity(file.size().min(MAX_PREALLOCATION) as usize);
        file.read_to_end(&mut data)?;
        if (data.len() as u64) < file.size() {
            return Err(Error::Container(format!(
                "short read of '{}': {} of {} bytes",
                name,
                data.len(),
                file.size()
            )));
        }
        Ok(data)
    }

    /// Read the session descriptor.
    pub fn session(&self) -> Result<Vec<u8>> {
        self.read_entry(SESSION_ENTRY)
    }

    /// Read the optional metadata entry.
    pub fn metadata(&self) -> Result<Option<Vec<u8>>> {
        match self.read_entry(METADATA_ENTRY) {
            Ok(data) => Ok(Some(data)),
            Err(Error::MissingEntry(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn entry_name(&self, relative: &str) -> Result<String> {
        let relative = relative.trim_start_matches('/');
        if relative.is_empty() || relative.split('/').any(|part| part == "..") {
            return Err(Error::Container(format!(
                "invalid entry path '{}'",
                relative
            )));
        }
        Ok(format!("{}/{}", self.root, relative))
    }
}

/// Top-level path segment of an entry name.
fn root_folder(entry: &str) -> Result<String> {
    match entry.split('/').next() {
        Some(root) if !root.is_empty() => Ok(root.to_string()),
        _ => Err(Error::Container(format!(
            "cannot determine root folder from entry '{}'",
            entry
        ))),
    }
}
