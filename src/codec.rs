// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Register value conversions
//!
//! Modbus transfers every register as a big-endian 16 bit word. Values
//! wider than a word span consecutive registers.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

use crate::frame::Word;

/// Extracts bits 8 to 15 of `word`.
#[must_use]
pub const fn get_high_byte(word: Word) -> u8 {
    (word >> 8) as u8
}

/// Extracts bits 0 to 7 of `word`.
#[must_use]
pub const fn get_low_byte(word: Word) -> u8 {
    (word & 0xFF) as u8
}

/// Builds a word with the high byte set to `high` and the low byte set to `low`.
#[must_use]
pub const fn get_int16_from_int8(high: u8, low: u8) -> Word {
    ((high as Word) << 8) | low as Word
}

/// Splits `word` into its big-endian bytes.
#[must_use]
pub fn set_int16_to_int8(word: Word) -> [u8; 2] {
    let mut bytes = [0; 2];
    BigEndian::write_u16(&mut bytes, word);
    bytes
}

/// Joins two registers, the first one holding the most significant word.
#[must_use]
pub fn get_int32_from_int16(words: &[Word; 2]) -> u32 {
    BigEndian::read_u32(&words_to_bytes(words))
}

/// Splits `value` into two registers, most significant word first.
#[must_use]
pub fn set_int32_to_int16(value: u32) -> [Word; 2] {
    let mut bytes = [0; 4];
    BigEndian::write_u32(&mut bytes, value);
    bytes_to_words(&bytes)
}

/// Reads a float stored in `ABCD` byte order.
#[must_use]
pub fn get_float_abcd(words: &[Word; 2]) -> f32 {
    BigEndian::read_f32(&words_to_bytes(words))
}

/// Stores `value` in `ABCD` byte order.
#[must_use]
pub fn set_float_abcd(value: f32) -> [Word; 2] {
    let mut bytes = [0; 4];
    BigEndian::write_f32(&mut bytes, value);
    bytes_to_words(&bytes)
}

/// Reads a float stored in `DCBA` byte order.
#[must_use]
pub fn get_float_dcba(words: &[Word; 2]) -> f32 {
    LittleEndian::read_f32(&words_to_bytes(words))
}

/// Stores `value` in `DCBA` byte order.
#[must_use]
pub fn set_float_dcba(value: f32) -> [Word; 2] {
    let mut bytes = [0; 4];
    LittleEndian::write_f32(&mut bytes, value);
    bytes_to_words(&bytes)
}

fn words_to_bytes(words: &[Word; 2]) -> [u8; 4] {
    let mut bytes = [0; 4];
    BigEndian::write_u16_into(words, &mut bytes);
    bytes
}

fn bytes_to_words(bytes: &[u8; 4]) -> [Word; 2] {
    let mut words = [0; 2];
    BigEndian::read_u16_into(bytes, &mut words);
    words
}
