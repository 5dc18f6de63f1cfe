//! Accumulates partial writes into newline-terminated entries.
//!
//! Mirrors the original character driver's `partial_write_buffer`: writes
//! that don't end in `\n` are held and prefixed onto the next write, rather
//! than being committed as-is.

use aesd_shared::constants::MAX_WRITE;
use aesd_shared::errors::FramerError;

use crate::entry::Entry;
use crate::log::CircularLog;

/// Holds bytes written but not yet newline-terminated.
pub struct WriteFramer {
    pending: Vec<u8>,
    limit: usize,
}

impl WriteFramer {
    pub fn new() -> Self {
        Self::with_limit(MAX_WRITE)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            pending: Vec::new(),
            limit,
        }
    }

    /// Appends `bytes` to the pending frame, committing each complete
    /// `\n`-terminated entry it completes into `log`. Bytes after the last
    /// newline in `bytes` remain pending for the next call.
    ///
    /// On `FrameTooLarge`, the entire pending frame (including the bytes
    /// that triggered the overflow) is discarded — there is no partial
    /// recovery, matching SPEC_FULL.md's resolution of the framer's
    /// unbounded-accumulation open question.
    pub fn push(&mut self, bytes: &[u8], log: &mut CircularLog) -> Result<(), FramerError> {
        let mut start = 0;
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'\n' {
                self.pending.extend_from_slice(&bytes[start..=i]);
                let committed = std::mem::take(&mut self.pending);
                log.append(Entry::new(committed));
                start = i + 1;
            }
        }
        self.pending.extend_from_slice(&bytes[start..]);
        if self.pending.len() >= self.limit {
            self.pending.clear();
            return Err(FramerError::FrameTooLarge { limit: self.limit });
        }
        Ok(())
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl Default for WriteFramer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_write_with_newline_commits_immediately() {
        let mut log = CircularLog::new(10);
        let mut framer = WriteFramer::new();
        framer.push(b"hello\n", &mut log).unwrap();
        assert_eq!(log.total_size(), 6);
        assert_eq!(framer.pending_len(), 0);
    }

    #[test]
    fn split_write_accumulates_then_commits() {
        let mut log = CircularLog::new(10);
        let mut framer = WriteFramer::new();
        framer.push(b"hel", &mut log).unwrap();
        assert_eq!(log.total_size(), 0);
        framer.push(b"lo\n", &mut log).unwrap();
        assert_eq!(log.total_size(), 6);
    }

    #[test]
    fn one_write_with_two_newlines_commits_two_entries() {
        let mut log = CircularLog::new(10);
        let mut framer = WriteFramer::new();
        framer.push(b"a\nb\n", &mut log).unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn trailing_partial_remains_pending_across_entries() {
        let mut log = CircularLog::new(10);
        let mut framer = WriteFramer::new();
        framer.push(b"a\nbc", &mut log).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(framer.pending_len(), 2);
        framer.push(b"d\n", &mut log).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.iter().nth(1).unwrap().as_bytes(), b"bcd\n");
    }

    #[test]
    fn oversized_pending_frame_errors_and_discards() {
        let mut log = CircularLog::new(10);
        let mut framer = WriteFramer::with_limit(4);
        let err = framer.push(b"toolong", &mut log).unwrap_err();
        assert_eq!(err, FramerError::FrameTooLarge { limit: 4 });
        assert_eq!(framer.pending_len(), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn pending_frame_reaching_the_limit_exactly_errors() {
        // psize must stay in [0, limit); reaching `limit` itself is already
        // too large, not merely "one more byte" too large.
        let mut log = CircularLog::new(10);
        let mut framer = WriteFramer::with_limit(4);
        let err = framer.push(b"abcd", &mut log).unwrap_err();
        assert_eq!(err, FramerError::FrameTooLarge { limit: 4 });
        assert_eq!(framer.pending_len(), 0);
    }
}
