//! Fixed-capacity ring of owned, variable-length entries.
//!
//! Single-writer/single-reader discipline: callers serialize access
//! themselves (the device surface does this with one `Mutex`). The log
//! carries no interior mutability and no unsafe code — eviction is just
//! `Option::take`/assignment, so there is no way to leak or double-free a
//! slot's buffer the way the C drafts this was distilled from could.

use aesd_shared::errors::LogError;

use crate::entry::Entry;

/// A fixed-capacity ring of entries with overwrite-on-full semantics.
///
/// Invariants (see module docs for the eviction/ownership argument):
/// - `head, tail` are always in `[0, capacity)`.
/// - `full` implies `head == tail`; `!full && head == tail` means empty.
/// - live entries, walked from `tail` forward for `len()` steps, are in
///   insertion order.
pub struct CircularLog {
    entries: Vec<Option<Entry>>,
    head: usize,
    tail: usize,
    full: bool,
}

impl CircularLog {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "log capacity must be nonzero");
        Self {
            entries: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            full: false,
        }
    }

    fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of live entries currently held.
    pub fn len(&self) -> usize {
        if self.full {
            self.capacity()
        } else if self.head >= self.tail {
            self.head - self.tail
        } else {
            self.capacity() - (self.tail - self.head)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `entry` as the newest live entry, evicting the oldest if the
    /// log is already full.
    pub fn append(&mut self, entry: Entry) {
        if self.full {
            self.entries[self.head] = None; // drop the evicted buffer
            self.tail = (self.tail + 1) % self.capacity();
        }
        self.entries[self.head] = Some(entry);
        self.head = (self.head + 1) % self.capacity();
        if self.head == self.tail {
            self.full = true;
        }
    }

    /// Resolves a virtual-concatenation byte offset to the entry that
    /// contains it and the byte offset within that entry.
    ///
    /// Returns `None` for `offset >= total_size()` (EOF, not an error).
    pub fn locate(&self, offset: usize) -> Option<(&Entry, usize)> {
        let mut cum = 0usize;
        for entry in self.iter() {
            if offset < cum + entry.size() {
                return Some((entry, offset - cum));
            }
            cum += entry.size();
        }
        None
    }

    /// Virtual-concatenation offset of the first byte of the `index`-th live
    /// entry, counting from the oldest (logical, oldest-first numbering).
    pub fn cmd_to_offset(&self, index: usize) -> Result<usize, LogError> {
        let live = self.len();
        if index >= live {
            return Err(LogError::OutOfRange { index, live });
        }
        Ok(self.iter().take(index).map(Entry::size).sum())
    }

    /// Size of the `index`-th live entry, oldest-first.
    pub fn entry_size(&self, index: usize) -> Result<usize, LogError> {
        let live = self.len();
        self.iter()
            .nth(index)
            .map(Entry::size)
            .ok_or(LogError::OutOfRange { index, live })
    }

    /// Sum of the sizes of all live entries.
    pub fn total_size(&self) -> usize {
        self.iter().map(Entry::size).sum()
    }

    /// Iterates live entries in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        let len = self.len();
        let capacity = self.capacity();
        let tail = self.tail;
        (0..len).map(move |i| {
            self.entries[(tail + i) % capacity]
                .as_ref()
                .expect("live slot within [tail, tail+len) must be occupied")
        })
    }

    /// Drops all live entries and resets to empty.
    pub fn clear(&mut self) {
        for slot in &mut self.entries {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.full = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(s: &str) -> Entry {
        Entry::new(s.as_bytes().to_vec())
    }

    #[test]
    fn basic_framing() {
        let mut log = CircularLog::new(10);
        log.append(entry("hello\n"));
        assert_eq!(log.total_size(), 6);
        let (e, b) = log.locate(0).unwrap();
        assert_eq!(b, 0);
        assert_eq!(e.as_bytes(), b"hello\n");
        assert!(log.locate(6).is_none());
    }

    #[test]
    fn wrap_around() {
        let mut log = CircularLog::new(3);
        for s in ["a\n", "b\n", "c\n", "d\n"] {
            log.append(entry(s));
        }
        assert_eq!(log.total_size(), 6);
        let concat: Vec<u8> = log.iter().flat_map(|e| e.as_bytes().to_vec()).collect();
        assert_eq!(concat, b"b\nc\nd\n");
    }

    #[test]
    fn locate_tie_break_at_boundary() {
        let mut log = CircularLog::new(10);
        log.append(entry("ab\n"));
        log.append(entry("cd\n"));
        // offset 3 is the boundary: belongs to the second entry, not the first.
        let (e, b) = log.locate(3).unwrap();
        assert_eq!(e.as_bytes(), b"cd\n");
        assert_eq!(b, 0);
    }

    #[test]
    fn cmd_to_offset_and_entry_size() {
        let mut log = CircularLog::new(3);
        for s in ["a\n", "b\n", "c\n", "d\n"] {
            log.append(entry(s));
        }
        // oldest-first: live entries are b, c, d
        assert_eq!(log.cmd_to_offset(0).unwrap(), 0);
        assert_eq!(log.cmd_to_offset(1).unwrap(), 2);
        assert_eq!(log.entry_size(1).unwrap(), 2);
        assert!(log.cmd_to_offset(3).is_err());
    }

    #[test]
    fn overwrite_keeps_only_last_cap_entries() {
        let mut log = CircularLog::new(3);
        for i in 0..5u32 {
            log.append(Entry::new(format!("{i}\n").into_bytes()));
        }
        let kept: Vec<String> = log
            .iter()
            .map(|e| String::from_utf8(e.as_bytes().to_vec()).unwrap())
            .collect();
        assert_eq!(kept, vec!["2\n", "3\n", "4\n"]);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = CircularLog::new(3);
        log.append(entry("a\n"));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.total_size(), 0);
    }
}
