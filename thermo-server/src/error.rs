//! Error types for the thermo server.

use thiserror::Error;

/// Errors that stop the server or a single connection.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that was requested.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to a client failed.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
}
