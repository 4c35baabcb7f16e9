//! Input channel selection.
//!
//! Status datagrams report the active input as an index 0-14. Selecting an
//! input needs a payload that is not derived from that index alone: each
//! reachable index maps to a command value found by probing the device, and
//! Phono only responds to a literal byte pair.

use crate::error::{CodecError, Result};

/// Number of channel slots in a status datagram.
pub const CHANNEL_SLOTS: usize = 15;

/// Status index of the Phono input.
pub const PHONO: u8 = 1;

/// How a channel selection is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEncoding {
    /// Command value packed as `0x4000 | (value << 5)`.
    Linear(i8),
    /// Literal payload bytes.
    Fixed([u8; 2]),
}

/// Status index to command encoding, for every input reachable over UDP.
pub const CHANNEL_MAP: &[(u8, ChannelEncoding)] = &[
    // Optical 1; command values -10..=-1 all select it
    (0, ChannelEncoding::Linear(-1)),
    // Phono; bytes captured from the official app
    (PHONO, ChannelEncoding::Fixed([0x3F, 0x80])),
    // UPnP
    (2, ChannelEncoding::Linear(0)),
    // Roon Ready
    (3, ChannelEncoding::Linear(3)),
    // AirPlay
    (4, ChannelEncoding::Linear(4)),
    // Spotify
    (5, ChannelEncoding::Linear(5)),
    // Air; command values 9..=20 all select it
    (14, ChannelEncoding::Linear(14)),
];

/// Look up the encoding for a status channel index.
pub fn channel_encoding(index: u8) -> Option<ChannelEncoding> {
    CHANNEL_MAP
        .iter()
        .find(|(candidate, _)| *candidate == index)
        .map(|(_, encoding)| *encoding)
}

/// Returns true if the channel can be selected over the network.
pub fn is_accessible(index: u8) -> bool {
    channel_encoding(index).is_some()
}

/// Sorted list of selectable channel indices.
pub fn accessible_channels() -> Vec<u8> {
    let mut channels: Vec<u8> = CHANNEL_MAP.iter().map(|(index, _)| *index).collect();
    channels.sort_unstable();
    channels
}

impl ChannelEncoding {
    /// The two payload bytes for this encoding.
    ///
    /// Command values above 7 have their low byte shifted right by one.
    pub fn payload(self) -> [u8; 2] {
        match self {
            ChannelEncoding::Fixed(bytes) => bytes,
            ChannelEncoding::Linear(value) => {
                let packed = (0x4000_i32 | (i32::from(value) << 5)) as u16;
                let [high, low] = packed.to_be_bytes();
                if value > 7 {
                    [high, low >> 1]
                } else {
                    [high, low]
                }
            }
        }
    }
}

/// Encode the payload that selects status channel `index`.
pub fn encode_channel(index: u8) -> Result<[u8; 2]> {
    channel_encoding(index)
        .map(ChannelEncoding::payload)
        .ok_or_else(|| CodecError::InaccessibleChannel {
            channel: index,
            accessible: accessible_channels(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_payloads() {
        assert_eq!(encode_channel(0).unwrap(), [0xFF, 0xE0]);
        assert_eq!(encode_channel(2).unwrap(), [0x40, 0x00]);
        assert_eq!(encode_channel(3).unwrap(), [0x40, 0x60]);
        assert_eq!(encode_channel(4).unwrap(), [0x40, 0x80]);
        assert_eq!(encode_channel(5).unwrap(), [0x40, 0xA0]);
    }

    #[test]
    fn large_command_value_shifts_low_byte() {
        // 0x4000 | (14 << 5) = 0x41C0, low byte 0xC0 >> 1
        assert_eq!(encode_channel(14).unwrap(), [0x41, 0x60]);
    }

    #[test]
    fn phono_uses_literal_bytes() {
        assert_eq!(encode_channel(PHONO).unwrap(), [0x3F, 0x80]);
        assert_eq!(
            channel_encoding(PHONO),
            Some(ChannelEncoding::Fixed([0x3F, 0x80]))
        );
        // The linear rule would give something else for command value 1.
        assert_ne!(ChannelEncoding::Linear(1).payload(), [0x3F, 0x80]);
    }

    #[test]
    fn unmapped_channel_names_accessible_set() {
        let err = encode_channel(7).unwrap_err();
        match &err {
            CodecError::InaccessibleChannel {
                channel,
                accessible,
            } => {
                assert_eq!(*channel, 7);
                assert_eq!(accessible, &vec![0, 1, 2, 3, 4, 5, 14]);
            }
        }
        assert!(err.to_string().contains("[0, 1, 2, 3, 4, 5, 14]"));
    }

    #[test]
    fn accessibility() {
        assert!(is_accessible(14));
        assert!(!is_accessible(6));
        assert!(!is_accessible(200));
    }
}
