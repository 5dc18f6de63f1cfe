use thiserror::Error;

/// Failures from the circular log's command-indexed lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogError {
    /// `cmd` did not address a live entry: either the index is beyond the
    /// number of live entries, or (for a byte offset within an entry) the
    /// offset is at or past that entry's size.
    #[error("command index {index} out of range ({live} live entries)")]
    OutOfRange { index: usize, live: usize },
}
