//! Command datagram encoding.
//!
//! Wire format (142 bytes, everything not listed is zero):
//!
//! ```text
//! offset  field
//! 0..2    header 0x44 0x72
//! 3       sequence counter
//! 5       sequence counter >> 1
//! 6       value (on/off flag where applicable)
//! 7       command kind
//! 8..10   payload
//! 12..14  CRC-16/CCITT-FALSE of bytes 0..12, big endian
//! ```
//!
//! The amplifier never acknowledges a command, so the same frame is sent
//! several times. Each transmission carries its own sequence value, which
//! means the checksum has to be recomputed by [`CommandFrame::stamp`] before
//! every send.

use crate::channel::encode_channel;
use crate::checksum::crc16;
use crate::error::Result;
use crate::volume::encode_db;

/// Size of every command datagram.
pub const COMMAND_LEN: usize = 142;

/// Fixed header bytes.
pub const COMMAND_HEADER: [u8; 2] = [0x44, 0x72];

const SEQUENCE_OFFSET: usize = 3;
const SEQUENCE_HALF_OFFSET: usize = 5;
const VALUE_OFFSET: usize = 6;
const KIND_OFFSET: usize = 7;
const PAYLOAD_OFFSET: usize = 8;
const CHECKSUM_OFFSET: usize = 12;

/// The command-kind byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandKind {
    Power = 0x01,
    Volume = 0x04,
    Channel = 0x05,
    Mute = 0x07,
}

impl CommandKind {
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Power => "power",
            CommandKind::Volume => "volume",
            CommandKind::Channel => "channel",
            CommandKind::Mute => "mute",
        }
    }
}

/// A high-level command with typed parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `true` leaves standby, `false` enters it.
    Power(bool),
    Mute(bool),
    /// Target volume in dB, clamped to the accepted range.
    Volume(f64),
    /// Status channel index to select.
    Channel(u8),
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Power(_) => CommandKind::Power,
            Command::Mute(_) => CommandKind::Mute,
            Command::Volume(_) => CommandKind::Volume,
            Command::Channel(_) => CommandKind::Channel,
        }
    }

    /// Encode into an unstamped frame.
    ///
    /// Fails only for channels without a known encoding.
    pub fn encode(&self) -> Result<CommandFrame> {
        let frame = match *self {
            Command::Power(on) => CommandFrame::new(CommandKind::Power, u8::from(on), [0, 0]),
            Command::Mute(on) => CommandFrame::new(CommandKind::Mute, u8::from(on), [0, 0]),
            Command::Volume(db) => {
                CommandFrame::new(CommandKind::Volume, 0, encode_db(db).to_be_bytes())
            }
            Command::Channel(index) => {
                CommandFrame::new(CommandKind::Channel, 0, encode_channel(index)?)
            }
        };
        Ok(frame)
    }
}

/// One outbound command datagram.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandFrame {
    buf: [u8; COMMAND_LEN],
}

impl CommandFrame {
    /// Build a frame from its kind, value byte and payload.
    pub fn new(kind: CommandKind, value: u8, payload: [u8; 2]) -> Self {
        let mut buf = [0u8; COMMAND_LEN];
        buf[..2].copy_from_slice(&COMMAND_HEADER);
        buf[VALUE_OFFSET] = value;
        buf[KIND_OFFSET] = kind as u8;
        buf[PAYLOAD_OFFSET..PAYLOAD_OFFSET + 2].copy_from_slice(&payload);
        Self { buf }
    }

    /// Write the sequence bytes and the checksum that covers them.
    pub fn stamp(&mut self, sequence: u8) {
        self.buf[SEQUENCE_OFFSET] = sequence;
        self.buf[SEQUENCE_HALF_OFFSET] = sequence >> 1;
        let crc = crc16(&self.buf[..CHECKSUM_OFFSET]);
        self.buf[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&crc.to_be_bytes());
    }

    pub fn kind_byte(&self) -> u8 {
        self.buf[KIND_OFFSET]
    }

    pub fn value(&self) -> u8 {
        self.buf[VALUE_OFFSET]
    }

    pub fn payload(&self) -> [u8; 2] {
        [self.buf[PAYLOAD_OFFSET], self.buf[PAYLOAD_OFFSET + 1]]
    }

    pub fn sequence(&self) -> u8 {
        self.buf[SEQUENCE_OFFSET]
    }

    pub fn checksum(&self) -> u16 {
        u16::from_be_bytes([self.buf[CHECKSUM_OFFSET], self.buf[CHECKSUM_OFFSET + 1]])
    }

    /// Returns true if the stored checksum matches bytes 0..12.
    pub fn checksum_ok(&self) -> bool {
        self.checksum() == crc16(&self.buf[..CHECKSUM_OFFSET])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl std::fmt::Debug for CommandFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandFrame")
            .field("kind", &format_args!("{:#04x}", self.kind_byte()))
            .field("value", &self.value())
            .field("payload", &format_args!("{:02x?}", self.payload()))
            .field("sequence", &self.sequence())
            .field("checksum", &format_args!("{:#06x}", self.checksum()))
            .finish()
    }
}
