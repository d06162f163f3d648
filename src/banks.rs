//! Israeli bank code registry
//!
//! MASAV routes by the Bank of Israel clearing number. A transfer naming
//! a code outside this set would be rejected by the clearing house, so
//! the validation pass checks membership up front.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Bank of Israel clearing participants: (code, name).
/// Codes are two digits on the wire; stored here without padding.
static BANKS: &[(u8, &str)] = &[
    (4, "Bank Yahav"),
    (9, "Israel Postal Bank"),
    (10, "Bank Leumi"),
    (11, "Israel Discount Bank"),
    (12, "Bank Hapoalim"),
    (13, "Union Bank of Israel"),
    (14, "Bank Otsar Ha-Hayal"),
    (17, "Mercantile Discount Bank"),
    (18, "One Zero Digital Bank"),
    (20, "Mizrahi Tefahot Bank"),
    (22, "Citibank Israel"),
    (23, "HSBC Israel"),
    (26, "Bank Yerushalayim"),
    (31, "First International Bank"),
    (34, "Bank Arabi Israeli"),
    (46, "Bank Massad"),
    (52, "Bank Poaley Agudat Israel"),
    (54, "Bank of Jerusalem Finance"),
];

static BANKS_BY_CODE: Lazy<HashMap<u8, &'static str>> =
    Lazy::new(|| BANKS.iter().copied().collect());

/// Whether a digits-only bank code belongs to a known clearing
/// participant. Non-numeric input is simply unknown.
pub fn is_known_bank(code: &str) -> bool {
    code.parse::<u8>()
        .map(|c| BANKS_BY_CODE.contains_key(&c))
        .unwrap_or(false)
}

/// Look up a bank's display name by code.
pub fn bank_name(code: &str) -> Option<&'static str> {
    code.parse::<u8>().ok().and_then(|c| BANKS_BY_CODE.get(&c).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_banks() {
        assert!(is_known_bank("12")); // Hapoalim
        assert!(is_known_bank("10")); // Leumi
        assert!(is_known_bank("04")); // leading zero accepted
        assert!(is_known_bank("4"));
    }

    #[test]
    fn test_unknown_banks() {
        assert!(!is_known_bank("99"));
        assert!(!is_known_bank("00"));
        assert!(!is_known_bank(""));
        assert!(!is_known_bank("ab"));
    }

    #[test]
    fn test_bank_name() {
        assert_eq!(bank_name("12"), Some("Bank Hapoalim"));
        assert_eq!(bank_name("99"), None);
    }
}
