//! Four-character codec codes.
//!
//! A code packs four characters into a 32-bit integer, least-significant byte
//! first. Each character contributes its low 8 bits, and decoding maps every
//! byte back to the Unicode scalar with the same value, so any string of four
//! chars in `U+0000..=U+00FF` survives an encode/decode round trip.

use std::{fmt, str::FromStr};

use crate::error::VideoIoError;

const BYTE_SHIFTS: [u32; 4] = [0, 8, 16, 24];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FourCc(u32);

impl FourCc {
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    pub const fn code(self) -> u32 {
        self.0
    }

    /// Pack `text` into a code. Returns `None` unless `text` is exactly four
    /// characters long.
    pub fn encode(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let mut code = 0u32;
        for shift in BYTE_SHIFTS {
            let ch = chars.next()?;
            code |= (u32::from(ch) & 0xff) << shift;
        }
        if chars.next().is_some() {
            return None;
        }
        Some(Self(code))
    }

    /// Unpack the code into its four characters. Never fails; bytes outside
    /// the printable range come back as control or Latin-1 characters.
    pub fn decode(self) -> String {
        BYTE_SHIFTS
            .iter()
            .map(|shift| char::from(((self.0 >> shift) & 0xff) as u8))
            .collect()
    }

    /// Interpret a FOURCC capture property value.
    ///
    /// OpenCV reports the code as a signed `int` widened to `f64`, so the
    /// value is truncated to an integer and reinterpreted bit for bit.
    pub fn from_property(value: f64) -> Self {
        Self(value as i64 as u32)
    }

    /// The code as OpenCV stores it in a property: a signed 32-bit integer.
    pub fn to_property(self) -> f64 {
        f64::from(self.0 as i32)
    }
}

impl FromStr for FourCc {
    type Err = VideoIoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::encode(s).ok_or_else(|| VideoIoError::InvalidCodec(s.to_string()))
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.decode())
    }
}

impl From<u32> for FourCc {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

impl From<FourCc> for i32 {
    fn from(code: FourCc) -> Self {
        code.0 as i32
    }
}

impl From<FourCc> for f64 {
    fn from(code: FourCc) -> Self {
        code.to_property()
    }
}
