//! Legacy Hebrew code-page transliteration
//!
//! The MASAV host does not accept UTF-8. Hebrew text in a record must be
//! transliterated into one of two legacy single-byte encodings from the
//! official tables ("טבלאות לעברית עבור מסב"):
//!
//! - **Code A**: Hebrew letters mapped onto ASCII: `א` → `&` (0x26),
//!   `ב`..`ת` → `A`..`Z` (0x41-0x5A), final forms occupying their
//!   alphabetical positions.
//! - **Code B**: Hebrew letters mapped onto bytes 0x80-0x9A.
//!
//! ASCII printable characters pass through unchanged. Every other
//! character becomes [`FALLBACK_BYTE`]: replaced, never dropped, so the
//! byte count of the input is always preserved.

use serde::{Deserialize, Serialize};

/// Byte substituted for any character with no mapping in the selected
/// code page. Substitution keeps field widths intact.
pub const FALLBACK_BYTE: u8 = b' ';

/// Which of the two official MASAV Hebrew encodings to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HebrewEncoding {
    /// קוד עברי א - ASCII mapping (the common choice)
    #[default]
    CodeA,
    /// קוד עברי ב - high-byte mapping (0x80-0x9A)
    CodeB,
}

impl HebrewEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            HebrewEncoding::CodeA => "code-a",
            HebrewEncoding::CodeB => "code-b",
        }
    }
}

// Hebrew block: א (U+05D0) .. ת (U+05EA), 27 letters including finals.
const ALEF: u32 = 0x05D0;
const TAV: u32 = 0x05EA;

// Code A bytes indexed by (codepoint - ALEF). א is '&'; the rest run
// A..Z with final forms in their Unicode (alphabetical) positions.
const CODE_A: [u8; 27] = [
    b'&', // א
    b'A', // ב
    b'B', // ג
    b'C', // ד
    b'D', // ה
    b'E', // ו
    b'F', // ז
    b'G', // ח
    b'H', // ט
    b'I', // י
    b'J', // ך (final kaf)
    b'K', // כ
    b'L', // ל
    b'M', // ם (final mem)
    b'N', // מ
    b'O', // ן (final nun)
    b'P', // נ
    b'Q', // ס
    b'R', // ע
    b'S', // ף (final pe)
    b'T', // פ
    b'U', // ץ (final tsadi)
    b'V', // צ
    b'W', // ק
    b'X', // ר
    b'Y', // ש
    b'Z', // ת
];

/// Transliterate one character into the given code page, or return the
/// fallback byte when it has no mapping.
pub fn encode_char(c: char, encoding: HebrewEncoding) -> u8 {
    let cp = c as u32;
    if (ALEF..=TAV).contains(&cp) {
        let idx = (cp - ALEF) as usize;
        return match encoding {
            HebrewEncoding::CodeA => CODE_A[idx],
            // Code B runs contiguously from 0x80
            HebrewEncoding::CodeB => 0x80 + idx as u8,
        };
    }
    // ASCII printable passes through (digits, spaces, punctuation, Latin)
    if (0x20..0x7F).contains(&cp) {
        return cp as u8;
    }
    FALLBACK_BYTE
}

/// Transliterate a string into single-byte form. Output length in bytes
/// equals input length in characters.
pub fn encode_str(text: &str, encoding: HebrewEncoding) -> Vec<u8> {
    text.chars().map(|c| encode_char(c, encoding)).collect()
}

/// Decode one MASAV byte back to a character, auto-selecting the code
/// page: bytes 0x80-0x9A can only be Code B; on the Code A side only the
/// letter bytes are reversed when asked for.
pub fn decode_byte(b: u8, encoding: HebrewEncoding) -> char {
    match encoding {
        HebrewEncoding::CodeB => {
            if (0x80..=0x9A).contains(&b) {
                return char::from_u32(ALEF + (b - 0x80) as u32).unwrap_or(' ');
            }
            b as char
        }
        HebrewEncoding::CodeA => {
            if let Some(idx) = CODE_A.iter().position(|&m| m == b) {
                return char::from_u32(ALEF + idx as u32).unwrap_or(' ');
            }
            b as char
        }
    }
}

/// Decode a field of MASAV bytes, detecting the code page: any byte in
/// the 0x80-0x9A range means Code B, otherwise Code A is assumed.
pub fn decode_field(bytes: &[u8]) -> String {
    let encoding = if bytes.iter().any(|b| (0x80..=0x9A).contains(b)) {
        HebrewEncoding::CodeB
    } else {
        HebrewEncoding::CodeA
    };
    bytes
        .iter()
        .map(|&b| decode_byte(b, encoding))
        .collect::<String>()
        .trim()
        .to_string()
}
