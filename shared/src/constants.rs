/// Default capacity of the circular log: the number of newline-terminated
/// entries retained before the oldest is evicted.
pub const LOG_CAPACITY: usize = 10;

/// Default bound on the write framer's pending (not-yet-newline-terminated)
/// buffer, in bytes. A write that would grow the pending frame past this
/// bound without completing a line fails with `FrameTooLarge`.
pub const MAX_WRITE: usize = 1024;

/// Default TCP port the line server listens on.
pub const DEFAULT_PORT: u16 = 9000;

/// Default path of the server-side sink file.
pub const DEFAULT_SINK_PATH: &str = "/var/tmp/aesdsocketdata";

/// Default path of the PID file written in daemon mode.
pub const DEFAULT_PID_PATH: &str = "/var/run/aesdsocket.pid";

/// Size, in bytes, of the fixed receive buffer used by each connection handler.
pub const RECV_BUFFER_SIZE: usize = 1024;

/// Interval at which the timestamp producer appends a line to the sink.
pub const TIMESTAMP_INTERVAL_SECS: u64 = 10;

/// Literal prefix recognized at the start of a line to mean "seek, don't append".
pub const IOCTL_SEEK_PREFIX: &str = "AESDCHAR_IOCSEEKTO:";

/// strftime-style format string for the line the timestamp producer emits.
pub const TIMESTAMP_FORMAT: &str = "timestamp:%a, %d %b %Y %H:%M:%S %z\n";
