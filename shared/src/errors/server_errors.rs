use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the TCP line server's own plumbing: the sink,
/// the accept loop, and process bootstrap. Most of these are logged and
/// the affected operation is abandoned; `Fatal`-shaped initialization
/// failures abort startup with a non-zero exit code.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error on sink `{path}`: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind listener on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to daemonize: {0}")]
    Daemonize(String),
}

impl From<ServerError> for std::io::Error {
    fn from(err: ServerError) -> Self {
        match &err {
            ServerError::Sink { source, .. } | ServerError::Bind { source, .. } => {
                std::io::Error::new(source.kind(), err.to_string())
            }
            ServerError::Daemonize(_) => std::io::Error::other(err.to_string()),
        }
    }
}
