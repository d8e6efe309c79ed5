//! Range predicates over raw MIDI integers.
//!
//! Every predicate is total: values of the wrong range simply fail.

/// Largest value carried by a pair of data bytes.
pub const MAX_MULTI_BYTE_VALUE: u16 = 16_383;

pub fn is_byte(value: i32) -> bool {
    (0..=255).contains(&value)
}

/// High bit set: the leading byte of a message.
pub fn is_status_byte(value: i32) -> bool {
    is_byte(value) && value >= 128
}

/// High bit clear: a payload byte.
pub fn is_data_byte(value: i32) -> bool {
    is_byte(value) && value <= 127
}

pub fn is_multi_byte_value(value: i32) -> bool {
    (0..=i32::from(MAX_MULTI_BYTE_VALUE)).contains(&value)
}

pub fn is_channel_number(value: i32) -> bool {
    (0..=15).contains(&value)
}

/// Combines two data bytes into a 14-bit value.
pub fn calculate_multi_byte_value(msb: u8, lsb: u8) -> u16 {
    u16::from(msb) * 128 + u16::from(lsb)
}

/// Splits a 14-bit value into `(msb, lsb)`.
pub fn msb_and_lsb(value: u16) -> (u8, u8) {
    let value = value.min(MAX_MULTI_BYTE_VALUE);
    ((value / 128) as u8, (value % 128) as u8)
}
