//! Single mutex-protected scratch file shared by every connection handler.
//!
//! Grounded on the original server's `file_mutex`-guarded append/readback
//! around a single on-disk path: every handler appends under the lock, then
//! reads the whole file back under the same lock, so a reader never
//! observes a torn write from a concurrent handler.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use aesd_shared::errors::ServerError;

pub struct Sink {
    path: PathBuf,
    file: Mutex<File>,
}

impl Sink {
    /// Opens (creating if absent, truncating if present) the sink at `path`.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, ServerError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| ServerError::Sink {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Appends `bytes` to the sink and returns its full contents afterward.
    pub fn append_and_read_all(&self, bytes: &[u8]) -> Result<Vec<u8>, ServerError> {
        let mut file = self.file.lock().expect("sink mutex poisoned");
        let result = (|| -> std::io::Result<Vec<u8>> {
            file.seek(SeekFrom::End(0))?;
            file.write_all(bytes)?;
            file.flush()?;
            file.seek(SeekFrom::Start(0))?;
            let mut out = Vec::new();
            file.read_to_end(&mut out)?;
            Ok(out)
        })();
        result.map_err(|source| ServerError::Sink {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Sink {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            log::warn!("failed to remove sink `{}`: {err}", self.path.display());
        }
    }
}
