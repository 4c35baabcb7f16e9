//! CRC-16/CCITT-FALSE, the checksum the amplifier uses to sign every datagram.

/// Generator polynomial (x^16 + x^12 + x^5 + 1).
pub const POLYNOMIAL: u16 = 0x1021;

/// Initial register value.
pub const INITIAL: u16 = 0xFFFF;

/// Compute the CRC-16/CCITT-FALSE checksum of `data`.
///
/// No reflection, no final XOR. An empty input yields `0`.
pub fn crc16(data: &[u8]) -> u16 {
    if data.is_empty() {
        return 0;
    }

    let mut crc = INITIAL;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Check a datagram whose last two bytes hold the big-endian checksum of
/// everything before them.
///
/// Datagrams shorter than the checksum itself never validate.
pub fn verify_trailing(datagram: &[u8]) -> bool {
    let Some(split) = datagram.len().checked_sub(2) else {
        return false;
    };
    let (body, trailer) = datagram.split_at(split);
    let received = u16::from_be_bytes([trailer[0], trailer[1]]);
    received == crc16(body)
}
