//! Controller session for Devialet Expert amplifiers.
//!
//! A [`Controller`] ties the codec to the UDP transport: it finds the
//! amplifier (explicit address, cached address or discovery), decodes its
//! status broadcasts, and sends commands as fixed-size bursts with a
//! per-session sequence counter.

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod repeat;

pub use cache::{IpCache, CACHE_FILE_NAME};
pub use config::{RepeatPolicy, SessionConfig, DEFAULT_REPEAT_COUNT, DEFAULT_TIMEOUT};
pub use controller::Controller;
pub use error::{Result, SessionError};
pub use repeat::SequenceCounter;
