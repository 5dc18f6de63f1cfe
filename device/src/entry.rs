/// An owned, newline-terminated byte sequence stored in the circular log.
///
/// Entries always own heap-allocated storage. There is no path that stores a
/// pointer to a caller's stack buffer into the log: callers hand over a
/// `Vec<u8>` and `Entry` takes it from there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    bytes: Vec<u8>,
}

impl Entry {
    /// Wraps `bytes` as an entry.
    ///
    /// # Panics
    /// Panics if `bytes` is empty or does not end in `\n`, or contains an
    /// interior `\n` — the framer is the only constructor callers should use
    /// in production code; this exists so tests can build fixtures directly.
    pub fn new(bytes: Vec<u8>) -> Self {
        assert!(!bytes.is_empty(), "entry must not be empty");
        assert_eq!(bytes[bytes.len() - 1], b'\n', "entry must end in a newline");
        assert!(
            !bytes[..bytes.len() - 1].contains(&b'\n'),
            "entry must not contain an interior newline"
        );
        Self { bytes }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
