//! Volume conversion between decibels and the amplifier's two encodings.
//!
//! Status datagrams report volume as a single byte in half-dB steps. Volume
//! commands carry a 16-bit payload built by a recursive step encoding that
//! was recovered from packet captures; it is reproduced here as found.

/// Lowest volume accepted by [`encode_db`].
pub const VOLUME_MIN_DB: f64 = -96.0;

/// Highest volume accepted by [`encode_db`].
pub const VOLUME_MAX_DB: f64 = 0.0;

/// Offset between the raw status byte (halved) and decibels.
const RAW_OFFSET_DB: f64 = 97.5;

/// Encoded magnitude of exactly 0.5 dB, the base case of the recursion.
const HALF_DB_PAYLOAD: u16 = 0x3F00;

/// Sign flag set on the payload for negative volumes.
pub const NEGATIVE_FLAG: u16 = 0x8000;

/// Convert the raw status byte to decibels.
pub fn raw_to_db(raw: u8) -> f64 {
    f64::from(raw) / 2.0 - RAW_OFFSET_DB
}

/// Clamp a requested volume into `[VOLUME_MIN_DB, VOLUME_MAX_DB]`.
///
/// Returns the clamped value and whether it was capped at the top. Flooring
/// at the bottom is silent. NaN maps to the floor.
pub fn clamp_db(db: f64) -> (f64, bool) {
    if db.is_nan() {
        (VOLUME_MIN_DB, false)
    } else if db > VOLUME_MAX_DB {
        (VOLUME_MAX_DB, true)
    } else if db < VOLUME_MIN_DB {
        (VOLUME_MIN_DB, false)
    } else {
        (db, false)
    }
}

/// Encode a volume in decibels into the 16-bit command payload.
///
/// The value is clamped first, then its magnitude is rounded to the nearest
/// half dB (the device resolution) and fed through [`encode_magnitude`].
/// Negative volumes carry [`NEGATIVE_FLAG`].
pub fn encode_db(db: f64) -> u16 {
    let (db, _) = clamp_db(db);
    let magnitude = (db.abs() * 2.0).round() / 2.0;
    let payload = encode_magnitude(magnitude);
    if db < 0.0 && magnitude > 0.0 {
        payload | NEGATIVE_FLAG
    } else {
        payload
    }
}

/// Recursive magnitude encoding.
///
/// `0` encodes to `0`, `0.5` to `0x3F00`; anything larger adds a step of
/// `256 >> ceil(1 + log2(m))` to the encoding of `m - 0.5`. Only terminates
/// for multiples of 0.5.
fn encode_magnitude(magnitude: f64) -> u16 {
    let magnitude = magnitude.abs();
    if magnitude == 0.0 {
        0
    } else if magnitude == 0.5 {
        HALF_DB_PAYLOAD
    } else {
        step_for(magnitude) + encode_magnitude(magnitude - 0.5)
    }
}

fn step_for(magnitude: f64) -> u16 {
    let shift = (1.0 + magnitude.log2()).ceil().max(0.0) as u32;
    256u16.checked_shr(shift).unwrap_or(0)
}

/// Inverse of [`encode_db`] for payloads it can produce.
///
/// Walks the half-dB ladder from 0.5 dB upwards until the encoded magnitude
/// matches. Returns `None` for payloads that are not on the ladder.
pub fn payload_to_db(payload: u16) -> Option<f64> {
    let negative = payload & NEGATIVE_FLAG != 0;
    let target = payload & !NEGATIVE_FLAG;
    let sign = if negative { -1.0 } else { 1.0 };

    if target == 0 {
        return if negative { None } else { Some(0.0) };
    }

    let mut magnitude = 0.5;
    let mut encoded = HALF_DB_PAYLOAD;
    while encoded < target && magnitude < -VOLUME_MIN_DB {
        magnitude += 0.5;
        encoded += step_for(magnitude);
    }
    (encoded == target).then_some(sign * magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_byte_decodes_in_half_db_steps() {
        assert_eq!(raw_to_db(0), -97.5);
        assert_eq!(raw_to_db(155), -20.0);
        assert_eq!(raw_to_db(195), 0.0);
        assert_eq!(raw_to_db(255), 30.0);
    }

    #[test]
    fn known_payloads() {
        assert_eq!(encode_db(0.0), 0x0000);
        assert_eq!(encode_db(-0.5), 0xBF00);
        assert_eq!(encode_db(-1.0), 0xBF80);
        assert_eq!(encode_db(-3.5), 0xC060);
        assert_eq!(encode_db(-10.0), 0xC120);
        assert_eq!(encode_db(-20.0), 0xC1A0);
        assert_eq!(encode_db(-49.0), 0xC244);
        assert_eq!(encode_db(-96.0), 0xC2C0);
    }

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(encode_db(5.0), encode_db(0.0));
        assert_eq!(encode_db(-200.0), encode_db(-96.0));
        assert_eq!(clamp_db(5.0), (0.0, true));
        assert_eq!(clamp_db(-200.0), (-96.0, false));
        assert_eq!(clamp_db(-20.0), (-20.0, false));
    }

    #[test]
    fn decode_of_encode_is_within_half_db() {
        for db in [0.0, -0.5, -1.0, -20.0, -49.0, -96.0] {
            let decoded = payload_to_db(encode_db(db)).expect("payload on ladder");
            assert!((decoded - db).abs() <= 0.5, "{db} decoded as {decoded}");
        }
    }

    #[test]
    fn off_step_values_quantize() {
        assert_eq!(encode_db(-20.2), encode_db(-20.0));
        assert_eq!(encode_db(-20.3), encode_db(-20.5));
    }

    #[test]
    fn payloads_strictly_increase_with_magnitude() {
        let mut previous = 0u16;
        for step in 1..=192 {
            let payload = encode_magnitude(f64::from(step) * 0.5);
            assert!(payload > previous, "step {step}");
            previous = payload;
        }
    }

    #[test]
    fn tiny_negative_rounds_to_unsigned_zero() {
        assert_eq!(encode_db(-0.2), 0x0000);
        assert_eq!(encode_db(f64::NAN), encode_db(-96.0));
    }

    #[test]
    fn off_ladder_payload_is_rejected() {
        assert_eq!(payload_to_db(0x3F01), None);
        assert_eq!(payload_to_db(0x8000), None);
    }
}
