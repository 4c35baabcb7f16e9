//! Status datagram decoding.
//!
//! The amplifier broadcasts a fixed-layout datagram (598 bytes on current
//! firmware) on the status port. Every field sits at an absolute offset:
//!
//! ```text
//! offset   size     field
//! 19       31       device name, NUL padded
//! 52       15 x 17  channel slots: enabled digit + 16-byte NUL padded name
//! 562      1        bit 7: power
//! 563      1        bit 1: mute, bits 2-7: active channel index
//! 565      1        volume, dB = raw / 2 - 97.5
//! len - 2  2        CRC-16/CCITT-FALSE (big endian) of all preceding bytes
//! ```
//!
//! Decoding never fails. Fields past the end of a short datagram come back
//! as `None`, and a bad checksum only clears [`StatusSnapshot::checksum_ok`].

use std::collections::BTreeMap;
use std::net::IpAddr;

use tracing::trace;

use crate::channel::CHANNEL_SLOTS;
use crate::checksum::verify_trailing;
use crate::volume::raw_to_db;

/// Smallest datagram that carries the device name and the first channel slot.
pub const MIN_STATUS_LEN: usize = 52;

/// Size of a full status datagram.
pub const FULL_STATUS_LEN: usize = 598;

const NAME_RANGE: std::ops::Range<usize> = 19..50;
const CHANNEL_TABLE_OFFSET: usize = 52;
const CHANNEL_SLOT_LEN: usize = 17;
const POWER_OFFSET: usize = 562;
const MUTE_CHANNEL_OFFSET: usize = 563;
const VOLUME_OFFSET: usize = 565;

const POWER_MASK: u8 = 0x80;
const MUTE_MASK: u8 = 0x02;
const CHANNEL_MASK: u8 = 0xFC;

/// Decoded view of one status datagram.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    /// Address the datagram came from.
    pub source: IpAddr,
    /// Device name with padding removed.
    pub device_name: String,
    /// Enabled input channels by index.
    pub channels: BTreeMap<u8, String>,
    /// `true` when the amplifier is on, `false` in standby.
    pub power: Option<bool>,
    pub muted: Option<bool>,
    /// Index of the selected input.
    pub channel: Option<u8>,
    pub volume_db: Option<f64>,
    pub volume_raw: Option<u8>,
    /// Whether the trailing checksum matched the datagram body.
    pub checksum_ok: bool,
}

impl StatusSnapshot {
    /// Decode a status datagram received from `source`.
    pub fn decode(source: IpAddr, datagram: &[u8]) -> Self {
        let name_end = NAME_RANGE.end.min(datagram.len());
        let device_name = datagram
            .get(NAME_RANGE.start..name_end)
            .map(trim_padding)
            .unwrap_or_default();

        let power = datagram
            .get(POWER_OFFSET)
            .map(|byte| byte & POWER_MASK != 0);

        let mute_channel = datagram.get(MUTE_CHANNEL_OFFSET).copied();
        let muted = mute_channel.map(|byte| byte & MUTE_MASK != 0);
        let channel = mute_channel.map(|byte| (byte & CHANNEL_MASK) >> 2);

        let volume_raw = datagram.get(VOLUME_OFFSET).copied();
        let volume_db = volume_raw.map(raw_to_db);

        let checksum_ok = verify_trailing(datagram);
        if !checksum_ok {
            trace!(len = datagram.len(), "status checksum mismatch");
        }

        Self {
            source,
            device_name,
            channels: decode_channels(datagram),
            power,
            muted,
            channel,
            volume_db,
            volume_raw,
            checksum_ok,
        }
    }

    /// Name of the active channel, if both the index and its slot are known.
    pub fn channel_name(&self) -> Option<&str> {
        self.channel
            .and_then(|index| self.channels.get(&index))
            .map(String::as_str)
    }
}

fn decode_channels(datagram: &[u8]) -> BTreeMap<u8, String> {
    let mut channels = BTreeMap::new();
    for index in 0..CHANNEL_SLOTS {
        let start = CHANNEL_TABLE_OFFSET + index * CHANNEL_SLOT_LEN;
        let Some(slot) = datagram.get(start..start + CHANNEL_SLOT_LEN) else {
            break;
        };

        let enabled = match char::from(slot[0]).to_digit(10) {
            Some(flag) => flag != 0,
            None => {
                trace!(index, flag = slot[0], "channel slot flag is not a digit");
                false
            }
        };
        if enabled {
            channels.insert(index as u8, trim_padding(&slot[1..]));
        }
    }
    channels
}

fn trim_padding(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_matches('\0').to_string()
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::checksum::crc16;

    const SOURCE: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10));

    fn put_name(buf: &mut [u8], name: &str) {
        buf[NAME_RANGE.start..NAME_RANGE.start + name.len()].copy_from_slice(name.as_bytes());
    }

    fn put_slot(buf: &mut [u8], index: usize, enabled: bool, name: &str) {
        let start = CHANNEL_TABLE_OFFSET + index * CHANNEL_SLOT_LEN;
        buf[start] = if enabled { b'1' } else { b'0' };
        buf[start + 1..start + 1 + name.len()].copy_from_slice(name.as_bytes());
    }

    fn sign(buf: &mut [u8]) {
        let split = buf.len() - 2;
        let crc = crc16(&buf[..split]);
        buf[split..].copy_from_slice(&crc.to_be_bytes());
    }

    fn full_datagram() -> Vec<u8> {
        let mut buf = vec![0u8; FULL_STATUS_LEN];
        put_name(&mut buf, "Expert 220 Pro");
        for index in 0..CHANNEL_SLOTS {
            put_slot(&mut buf, index, false, "");
        }
        put_slot(&mut buf, 0, true, "Optical 1");
        put_slot(&mut buf, 1, true, "Phono");
        put_slot(&mut buf, 3, false, "Disabled In");
        put_slot(&mut buf, 5, true, "Spotify");
        buf[POWER_OFFSET] = 0x80;
        buf[MUTE_CHANNEL_OFFSET] = 5 << 2;
        buf[VOLUME_OFFSET] = 155;
        sign(&mut buf);
        buf
    }

    #[test]
    fn decodes_full_datagram() {
        let status = StatusSnapshot::decode(SOURCE, &full_datagram());

        assert_eq!(status.source, SOURCE);
        assert_eq!(status.device_name, "Expert 220 Pro");
        assert_eq!(status.power, Some(true));
        assert_eq!(status.muted, Some(false));
        assert_eq!(status.channel, Some(5));
        assert_eq!(status.channel_name(), Some("Spotify"));
        assert_eq!(status.volume_raw, Some(155));
        assert_eq!(status.volume_db, Some(-20.0));
        assert!(status.checksum_ok);
    }

    #[test]
    fn disabled_slots_are_omitted() {
        let status = StatusSnapshot::decode(SOURCE, &full_datagram());
        let indices: Vec<u8> = status.channels.keys().copied().collect();
        assert_eq!(indices, vec![0, 1, 5]);
        assert_eq!(status.channels[&1], "Phono");
        assert!(!status.channels.contains_key(&3));
    }

    #[test]
    fn power_and_mute_bits() {
        let mut buf = full_datagram();
        buf[POWER_OFFSET] = 0x80;
        buf[MUTE_CHANNEL_OFFSET] = 0b0000_0010;
        let status = StatusSnapshot::decode(SOURCE, &buf);
        assert_eq!(status.power, Some(true));
        assert_eq!(status.muted, Some(true));
        assert_eq!(status.channel, Some(0));

        buf[POWER_OFFSET] = 0x7F;
        let status = StatusSnapshot::decode(SOURCE, &buf);
        assert_eq!(status.power, Some(false));
    }

    #[test]
    fn short_datagram_leaves_state_unknown() {
        let full = full_datagram();
        let status = StatusSnapshot::decode(SOURCE, &full[..562]);

        assert_eq!(status.power, None);
        assert_eq!(status.muted, None);
        assert_eq!(status.channel, None);
        assert_eq!(status.volume_db, None);
        assert_eq!(status.volume_raw, None);
        assert_eq!(status.device_name, "Expert 220 Pro");
        assert_eq!(status.channels.len(), 3);
        assert!(!status.checksum_ok);
    }

    #[test]
    fn fields_appear_as_length_allows() {
        let full = full_datagram();

        let status = StatusSnapshot::decode(SOURCE, &full[..563]);
        assert_eq!(status.power, Some(true));
        assert_eq!(status.muted, None);

        let status = StatusSnapshot::decode(SOURCE, &full[..565]);
        assert_eq!(status.channel, Some(5));
        assert_eq!(status.volume_db, None);

        let status = StatusSnapshot::decode(SOURCE, &full[..566]);
        assert_eq!(status.volume_db, Some(-20.0));
    }

    #[test]
    fn minimum_datagram_keeps_only_name() {
        let full = full_datagram();
        let status = StatusSnapshot::decode(SOURCE, &full[..MIN_STATUS_LEN]);
        assert_eq!(status.device_name, "Expert 220 Pro");
        assert!(status.channels.is_empty());
        assert_eq!(status.power, None);
    }

    #[test]
    fn tiny_datagram_does_not_panic() {
        let status = StatusSnapshot::decode(SOURCE, &[0x01, 0x02, 0x03]);
        assert_eq!(status.device_name, "");
        assert!(status.channels.is_empty());
        assert!(!status.checksum_ok);
    }

    #[test]
    fn checksum_failure_keeps_decoded_fields() {
        let mut buf = full_datagram();
        let last = buf.len() - 1;
        buf[last] ^= 0xFF;
        let status = StatusSnapshot::decode(SOURCE, &buf);
        assert!(!status.checksum_ok);
        assert_eq!(status.power, Some(true));
        assert_eq!(status.volume_db, Some(-20.0));
    }

    #[test]
    fn non_digit_flag_is_disabled() {
        let mut buf = full_datagram();
        buf[CHANNEL_TABLE_OFFSET] = b'x';
        let status = StatusSnapshot::decode(SOURCE, &buf);
        assert!(!status.channels.contains_key(&0));
    }
}
