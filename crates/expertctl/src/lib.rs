//! Control Devialet Expert amplifiers over their UDP protocol.
//!
//! # Crate Structure
//!
//! - [`codec`] — Status decoding, command encoding, checksum, volume and channel tables
//! - [`transport`] — UDP status listener and command sender
//! - [`session`] — Controller with discovery, IP cache and repeated sends (behind `session` feature)

/// Re-export codec types.
pub mod codec {
    pub use expertctl_codec::*;
}

/// Re-export transport types.
pub mod transport {
    pub use expertctl_transport::*;
}

/// Re-export session types (requires `session` feature).
#[cfg(feature = "session")]
pub mod session {
    pub use expertctl_session::*;
}
