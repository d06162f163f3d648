//! Fixed-width field encoders
//!
//! Every field in a MASAV record occupies an exact byte count with no
//! delimiters. The two primitives here are shared by all record
//! builders; each is a total, deterministic function: same input and
//! width always produce the same fixed-length output.
//!
//! Overflow rules differ by field class:
//! - **Numeric** fields NEVER truncate. A value wider than its field is
//!   an explicit [`EncodingError`]. A silently truncated amount or
//!   account number misroutes real money.
//! - **Text** fields truncate (or pad with spaces) after
//!   transliteration; whether an overlong recipient name is truncated or
//!   rejected is the caller's policy, decided before this layer.

use crate::hebrew::{self, HebrewEncoding};
use thiserror::Error;

/// Field alignment for space-padded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    /// Hebrew text is right-aligned in its field.
    Right,
}

/// Fixed-width encoding errors
#[derive(Debug, Error, PartialEq)]
pub enum EncodingError {
    #[error("Numeric overflow in {field}: {value} does not fit in {width} digits")]
    NumericOverflow {
        field: &'static str,
        value: u64,
        width: usize,
    },

    #[error("Non-digit character in {field}: {value:?}")]
    NonNumeric { field: &'static str, value: String },

    #[error("'{record}' record assembled to {actual} bytes, expected {expected}")]
    RecordLength {
        record: char,
        actual: usize,
        expected: usize,
    },
}

/// Declarative description of one fixed-width field, so record layouts
/// read as tables instead of ad hoc padding calls.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub width: usize,
}

impl FieldSpec {
    pub const fn new(name: &'static str, width: usize) -> Self {
        Self { name, width }
    }

    /// Render an unsigned integer as zero-padded ASCII digits.
    pub fn numeric(&self, value: u64) -> Result<Vec<u8>, EncodingError> {
        let digits = value.to_string();
        if digits.len() > self.width {
            return Err(EncodingError::NumericOverflow {
                field: self.name,
                value,
                width: self.width,
            });
        }
        let mut out = vec![b'0'; self.width];
        out[self.width - digits.len()..].copy_from_slice(digits.as_bytes());
        Ok(out)
    }

    /// Render a digits-only string zero-padded to the field width.
    /// The string form is used where leading zeros are significant
    /// (institution id, sequence number).
    pub fn numeric_str(&self, value: &str) -> Result<Vec<u8>, EncodingError> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EncodingError::NonNumeric {
                field: self.name,
                value: value.to_string(),
            });
        }
        if value.len() > self.width {
            // Validation upstream should have caught this; still never truncate.
            return Err(EncodingError::NumericOverflow {
                field: self.name,
                value: value.parse().unwrap_or(u64::MAX),
                width: self.width,
            });
        }
        let mut out = vec![b'0'; self.width];
        out[self.width - value.len()..].copy_from_slice(value.as_bytes());
        Ok(out)
    }

    /// Transliterate text into the legacy code page, then truncate or
    /// space-pad to exactly the field width.
    pub fn text(&self, value: &str, align: Align, encoding: HebrewEncoding) -> Vec<u8> {
        let mut bytes = hebrew::encode_str(value, encoding);
        bytes.truncate(self.width);
        let pad = self.width - bytes.len();
        match align {
            Align::Left => {
                bytes.extend(std::iter::repeat_n(b' ', pad));
                bytes
            }
            Align::Right => {
                let mut out = vec![b' '; pad];
                out.extend(bytes);
                out
            }
        }
    }

    /// A filler field: `width` repetitions of `fill`.
    pub fn filler(&self, fill: u8) -> Vec<u8> {
        vec![fill; self.width]
    }
}
