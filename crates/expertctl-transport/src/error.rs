use std::net::SocketAddr;
use std::time::Duration;

/// Errors that can occur in UDP transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// An I/O error occurred on the socket.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No datagram arrived before the deadline.
    #[error("no status datagram on port {port} within {timeout:?}")]
    Timeout { port: u16, timeout: Duration },

    /// The kernel accepted fewer bytes than the datagram holds.
    #[error("short send ({sent} of {expected} bytes)")]
    ShortSend { sent: usize, expected: usize },
}

pub type Result<T> = std::result::Result<T, TransportError>;
