use thiserror::Error;

/// Failures from accumulating bytes into a pending, not-yet-committed entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramerError {
    /// The pending frame reached `MAX_WRITE` bytes without a terminating
    /// newline. The pending frame is discarded; the caller must resend
    /// from the start of a line.
    #[error("pending write frame exceeded {limit} bytes without a newline")]
    FrameTooLarge { limit: usize },
}
