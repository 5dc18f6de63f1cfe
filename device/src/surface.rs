//! Mutex-guarded read/write/seek/ioctl surface over a [`CircularLog`].
//!
//! Grounded on the original character driver's `aesd_dev` (one `struct
//! aesd_dev` per device, one `mutex` guarding `buffer` and
//! `partial_write_buffer`) and on the Windows ring's "one shared resource,
//! one lock" shape — generalized here to also carry per-handle seek state
//! via an explicit cursor argument rather than file-descriptor-private
//! state, since a plain `std::sync::Mutex` has no notion of open handles.

use std::sync::Mutex;

use aesd_shared::errors::DeviceError;
use aesd_shared::whence::Whence;

use crate::framer::WriteFramer;
use crate::log::CircularLog;

/// A seek-to-command-and-offset directive, as carried by the inline
/// `AESDCHAR_IOCSEEKTO:<cmd>,<offset>` protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekTo {
    /// Logical index of the target entry, oldest-first.
    pub cmd: usize,
    /// Byte offset within that entry.
    pub cmd_offset: usize,
}

struct DeviceState {
    log: CircularLog,
    framer: WriteFramer,
}

/// The shared, mutex-guarded backing store for the connection handlers.
///
/// One `DeviceSurface` is shared (via `Arc`) across every accepted
/// connection; each connection tracks its own read cursor locally and
/// passes it into `read`/`seek`.
pub struct DeviceSurface {
    state: Mutex<DeviceState>,
}

impl DeviceSurface {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(DeviceState {
                log: CircularLog::new(capacity),
                framer: WriteFramer::new(),
            }),
        }
    }

    /// Frames `bytes` into the log, committing any newline-terminated
    /// entries it completes. Returns the number of bytes consumed, which on
    /// success is always `bytes.len()` (mirroring the original driver's
    /// `retval = count` on a successful `write`).
    pub fn write(&self, bytes: &[u8]) -> Result<usize, DeviceError> {
        let mut state = self.state.lock().expect("device mutex poisoned");
        state.framer.push(bytes, &mut state.log)?;
        Ok(bytes.len())
    }

    /// Reads the full virtual-concatenation content from `cursor` onward,
    /// up to `max_len` bytes. Returns the bytes read and the new cursor
    /// position the caller should remember for its next read.
    pub fn read(&self, cursor: usize, max_len: usize) -> (Vec<u8>, usize) {
        let state = self.state.lock().expect("device mutex poisoned");
        let total = state.log.total_size();
        if cursor >= total {
            return (Vec::new(), cursor);
        }
        let mut out = Vec::new();
        let mut pos = cursor;
        while pos < total && out.len() < max_len {
            let Some((entry, within)) = state.log.locate(pos) else {
                break;
            };
            let bytes = entry.as_bytes();
            let take = (bytes.len() - within).min(max_len - out.len());
            out.extend_from_slice(&bytes[within..within + take]);
            pos += take;
        }
        (out, pos)
    }

    /// Applies a POSIX-style seek relative to `cursor`, returning the new
    /// absolute cursor.
    pub fn seek(&self, cursor: usize, whence: Whence, offset: i64) -> Result<usize, DeviceError> {
        let state = self.state.lock().expect("device mutex poisoned");
        let total = state.log.total_size() as i64;
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => cursor as i64,
            Whence::End => total,
        };
        let target = base + offset;
        if target < 0 || target > total {
            return Err(DeviceError::InvalidArg(format!(
                "seek target {target} out of range [0, {total}]"
            )));
        }
        Ok(target as usize)
    }

    /// Resolves a `SeekTo` directive to an absolute virtual-concatenation
    /// cursor, per the oldest-first logical indexing resolved in
    /// SPEC_FULL.md.
    pub fn ioctl_seek(&self, seek: SeekTo) -> Result<usize, DeviceError> {
        let state = self.state.lock().expect("device mutex poisoned");
        let base = state.log.cmd_to_offset(seek.cmd)?;
        let entry_len = state.log.entry_size(seek.cmd)?;
        if seek.cmd_offset >= entry_len {
            return Err(DeviceError::InvalidArg(format!(
                "cmd_offset {} out of range for entry of size {entry_len}",
                seek.cmd_offset
            )));
        }
        Ok(base + seek.cmd_offset)
    }

    /// Drops every live entry and resets the pending write frame.
    pub fn clear(&self) {
        let mut state = self.state.lock().expect("device mutex poisoned");
        state.log.clear();
        state.framer = WriteFramer::new();
    }
}
