//! On-disk snapshots of camera detection configuration.
//!
//! Each (location, camera) pair owns a directory below the storage root,
//! keyed by location name then camera address, holding up to three files per
//! detection type: the as-fetched document, the saved enabled original, and
//! the disabled copy that was written back. File names derive only from the
//! detection name and variant tag so a later invocation finds the same
//! files.
//!
//! The store assumes a single running instance; concurrent invocations over
//! the same root are undefined behavior.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::detection::DetectionType;

/// The role of a persisted document snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Variant {
    /// The document as last fetched from the camera
    Current,
    /// The enabled original saved before pausing
    On,
    /// The disabled copy written back while pausing
    Off,
}

impl Variant {
    fn file_name(self, detection: DetectionType) -> String {
        match self {
            Variant::Current => format!("{}.xml", detection),
            Variant::On => format!("{}-on.xml", detection),
            Variant::Off => format!("{}-off.xml", detection),
        }
    }
}

pub(crate) struct ConfigStore {
    root: PathBuf,
}

impl ConfigStore {
    pub(crate) fn new<P: AsRef<Path>>(root: P) -> Self {
        ConfigStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The directory holding one camera's snapshots
    pub(crate) fn snapshot_dir(&self, location: &str, camera_addr: &str) -> PathBuf {
        self.root.join(location).join(camera_addr)
    }

    /// Reads a saved snapshot; `Ok(None)` if it was never written
    pub(crate) fn read_variant(
        &self,
        location: &str,
        camera_addr: &str,
        detection: DetectionType,
        variant: Variant,
    ) -> io::Result<Option<Vec<u8>>> {
        let path = self
            .snapshot_dir(location, camera_addr)
            .join(variant.file_name(detection));
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Writes a snapshot, creating the camera's directory as needed.
    /// Returns the path written, for logging.
    pub(crate) fn write_variant(
        &self,
        location: &str,
        camera_addr: &str,
        detection: DetectionType,
        variant: Variant,
        bytes: &[u8],
    ) -> io::Result<PathBuf> {
        let dir = self.snapshot_dir(location, camera_addr);
        fs::create_dir_all(&dir)?;
        let path = dir.join(variant.file_name(detection));
        fs::write(&path, bytes)?;
        Ok(path)
    }
}
