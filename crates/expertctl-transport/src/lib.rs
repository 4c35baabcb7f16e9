//! UDP transport for the amplifier protocol.
//!
//! Status datagrams are broadcast by the amplifier to a well-known port that
//! several processes may want to watch at once, so the listener binds with
//! address and port reuse. Commands go out from an ephemeral socket to the
//! command port. Nothing here interprets the bytes.

pub mod error;
pub mod traits;
pub mod udp;

pub use error::{Result, TransportError};
pub use traits::{CommandSink, Datagram};
pub use udp::{CommandSender, StatusListener, TransportConfig};

/// Port the amplifier broadcasts status datagrams to.
pub const STATUS_PORT: u16 = 45454;

/// Port the amplifier accepts commands on.
pub const COMMAND_PORT: u16 = 45455;

/// Receive buffer, comfortably above the 598-byte status datagram.
pub const DEFAULT_RECV_BUFFER: usize = 2048;
