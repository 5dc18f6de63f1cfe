use std::path::PathBuf;

use aesd_shared::constants::{DEFAULT_PID_PATH, DEFAULT_PORT, DEFAULT_SINK_PATH};
use clap::Parser;

/// A line-oriented TCP server that appends received data to a shared sink
/// and echoes the sink's full contents back after every write.
#[derive(Debug, Parser)]
#[command(name = "aesdsocket", version, about)]
pub struct Config {
    /// Fork into the background after startup.
    #[arg(short = 'd', long = "daemon")]
    pub daemon: bool,

    /// TCP port to listen on.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path to the shared sink file. Truncated at startup, removed at
    /// shutdown.
    #[arg(long, default_value = DEFAULT_SINK_PATH)]
    pub sink: PathBuf,

    /// Path to write the daemon's pid to. Only written when `--daemon` is
    /// set.
    #[arg(long, default_value = DEFAULT_PID_PATH)]
    pub pid_file: PathBuf,

    /// Disable the background timestamp producer.
    #[arg(long)]
    pub no_timestamps: bool,

    /// Directory to write log files to. Logs also go to stderr.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}
