//! Core types used throughout the generator
//!
//! These are fundamental type aliases used by all modules.
//! They provide semantic meaning and enable future type evolution.

/// Amount in agorot, the integer minor units of the Israeli new shekel.
///
/// # Constraints:
/// - **Always positive** in a detail record (validated before encoding)
/// - **13 digit ceiling**: the detail amount field is 13 characters wide,
///   so any value above 9_999_999_999_999 is an encoding overflow
///
/// All arithmetic on amounts is integer arithmetic; floating point never
/// touches money anywhere in this crate.
pub type Agorot = u64;

/// Reference number carried in a detail record (אסמכתא).
///
/// # Usage:
/// - Case-linked payments use the case number
/// - Manual transfers get a synthetic 1-based batch position
///
/// Rendered zero-padded into a 20-character field, so any u64 fits.
pub type Reference = u64;

/// Identifier of the row a transfer originated from, for reporting back
/// to the caller. Opaque to the generator itself.
pub type SourceId = u64;
