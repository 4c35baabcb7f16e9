//! Protocol codec for Devialet Expert amplifiers.
//!
//! The amplifier speaks a reverse-engineered UDP protocol:
//! - Status datagrams broadcast on port 45454 describe power, mute, volume,
//!   the selected input and the input table.
//! - Command datagrams sent to port 45455 change that state. They are never
//!   acknowledged.
//!
//! Both directions are signed with CRC-16/CCITT-FALSE. Everything in this
//! crate is a pure function over bytes.

pub mod channel;
pub mod checksum;
pub mod command;
pub mod error;
pub mod status;
pub mod volume;

pub use channel::{
    accessible_channels, encode_channel, is_accessible, ChannelEncoding, CHANNEL_MAP, PHONO,
};
pub use checksum::{crc16, verify_trailing};
pub use command::{Command, CommandFrame, CommandKind, COMMAND_LEN};
pub use error::{CodecError, Result};
pub use status::{StatusSnapshot, FULL_STATUS_LEN, MIN_STATUS_LEN};
pub use volume::{encode_db, payload_to_db, raw_to_db, VOLUME_MAX_DB, VOLUME_MIN_DB};
