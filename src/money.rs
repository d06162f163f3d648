//! Money Conversion Module
//!
//! Unified conversion between the internal agorot representation and the
//! client-facing string/Decimal representation. All conversions MUST go
//! through this module.
//!
//! ## Design Principles
//! 1. Integer minor units internally: no floating-point drift, ever
//! 2. Explicit Error Handling: no silent truncation or rounding
//! 3. The scale is fixed at 2 (ILS has 100 agorot to the shekel)

use crate::core_types::Agorot;
use rust_decimal::prelude::*;
use thiserror::Error;

/// Decimal places of the Israeli new shekel.
pub const SCALE: u32 = 2;

const MULTIPLIER: u64 = 100;

// ============================================================================
// Error Types
// ============================================================================

/// Money conversion errors
#[derive(Debug, Error, PartialEq)]
pub enum MoneyError {
    #[error("Precision overflow: {provided} decimal places, ILS allows {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Amount too large, would overflow")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),
}

// ============================================================================
// Parse: Client → Internal (String/Decimal → Agorot)
// ============================================================================

/// Convert a client amount string (e.g., "1500.00", "72") to agorot.
///
/// # Errors
/// * `PrecisionOverflow` - more than 2 decimal places
/// * `InvalidAmount` - zero or negative
/// * `Overflow` - result would overflow u64
/// * `InvalidFormat` - malformed string
pub fn parse_amount(amount_str: &str) -> Result<Agorot, MoneyError> {
    let amount_str = amount_str.trim();
    if amount_str.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }

    // Signs are rejected outright; MASAV amounts are unsigned.
    if amount_str.starts_with('-') || amount_str.starts_with('+') {
        return Err(MoneyError::InvalidAmount);
    }

    let parts: Vec<&str> = amount_str.split('.').collect();
    let (whole, frac) = match parts.len() {
        1 => (parts[0], ""),
        2 => {
            // Strict: both sides of the dot must be non-empty.
            // This rejects ambiguous forms like ".5" and "5."
            if parts[0].is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing leading zero (e.g., use 0.5 instead of .5)".into(),
                ));
            }
            if parts[1].is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing fractional part (e.g., use 5.0 instead of 5.)".into(),
                ));
            }
            (parts[0], parts[1])
        }
        _ => return Err(MoneyError::InvalidFormat("multiple decimal points".into())),
    };

    // Precision validation: REJECT sub-agora fractions (no silent rounding!)
    if frac.len() > SCALE as usize {
        return Err(MoneyError::PrecisionOverflow {
            provided: frac.len() as u32,
            max: SCALE,
        });
    }

    let whole_num: u64 = whole.parse::<u64>().map_err(|e| {
        let err_str = e.to_string();
        if err_str.contains("too large") || err_str.contains("overflow") {
            MoneyError::Overflow
        } else {
            MoneyError::InvalidFormat(format!("invalid character in whole part: {}", whole))
        }
    })?;

    let frac_num: u64 = if frac.is_empty() {
        0
    } else {
        let frac_padded = format!("{:0<width$}", frac, width = SCALE as usize);
        frac_padded
            .parse::<u64>()
            .map_err(|_| MoneyError::InvalidFormat("invalid fractional part".into()))?
    };

    let amount = whole_num
        .checked_mul(MULTIPLIER)
        .and_then(|v| v.checked_add(frac_num))
        .ok_or(MoneyError::Overflow)?;

    if amount == 0 {
        return Err(MoneyError::InvalidAmount);
    }

    Ok(amount)
}

/// Convert a Decimal to agorot.
///
/// Used at the CSV/JSON boundary where `rust_decimal::Decimal` is the
/// deserialization type.
pub fn parse_decimal(decimal: Decimal) -> Result<Agorot, MoneyError> {
    if decimal.is_sign_negative() || decimal.is_zero() {
        return Err(MoneyError::InvalidAmount);
    }

    let normalized = decimal.normalize();
    if normalized.scale() > SCALE {
        return Err(MoneyError::PrecisionOverflow {
            provided: normalized.scale(),
            max: SCALE,
        });
    }

    let result = normalized * Decimal::from(MULTIPLIER);
    result.to_u64().ok_or(MoneyError::Overflow)
}

// ============================================================================
// Format: Internal → Client (Agorot → String)
// ============================================================================

/// Format agorot as a shekel string with two decimal places, e.g.
/// `150000` → `"1500.00"`. For logs and summaries only; file encoding
/// goes through the fixed-width encoders instead.
pub fn format_amount(value: Agorot) -> String {
    format!("{}.{:02}", value / MULTIPLIER, value % MULTIPLIER)
}

// ============================================================================
// Unit Tests
// ============================================================================
