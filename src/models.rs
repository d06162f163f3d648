//! Domain model for MASAV file generation
//!
//! Everything the generator consumes or produces lives here:
//! organization settings, the canonical transfer record both source
//! flows converge on, export options, and the generated file summary.
//!
//! All inputs are plain immutable values. The generator holds no cached
//! handles and mutates nothing it is given.

use crate::core_types::{Agorot, Reference, SourceId};
use crate::hebrew::HebrewEncoding;
use crate::money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Organization Settings
// ============================================================================

/// The submitting organization's MASAV registration details.
///
/// Numeric fields are kept as strings because leading zeros are
/// significant on the wire; the validation pass enforces exact digit
/// counts before any encoding is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSettings {
    /// Institution id assigned by the clearing house, exactly 8 digits.
    pub institution_id: String,
    /// Display name, transliterated into the header record.
    pub institution_name: String,
    /// Organization's own bank, exactly 2 digits.
    pub bank_code: String,
    /// Organization's own branch, exactly 3 digits.
    pub branch_code: String,
    /// Organization's own account, 1 to 20 digits.
    pub account_number: String,
    /// Batch sequence, exactly 3 digits; uniqueness per submitted batch
    /// is the caller's responsibility.
    pub sequence_number: String,
    /// Which legacy Hebrew code page to emit.
    #[serde(default)]
    pub hebrew_encoding: HebrewEncoding,
}

// ============================================================================
// Canonical Transfer Record
// ============================================================================

/// Where a transfer came from. Record builders never branch on this;
/// it exists for reporting back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Approved payment joined with its case and bank details.
    CasePayment,
    /// One-off transfer entered directly with bank details.
    ManualTransfer,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::CasePayment => "case_payment",
            SourceKind::ManualTransfer => "manual_transfer",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical transfer, immutable for the life of one generation call.
///
/// Created once by the adapter (see [`crate::adapter`]) from either
/// source shape; everything downstream (validation, record building,
/// totals) consumes only this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    /// Beneficiary/account holder name, pre-transliteration.
    pub recipient_name: String,
    /// National id number, up to 9 digits; zeros on the wire when absent.
    pub id_number: Option<String>,
    /// Positive amount in agorot.
    pub amount: Agorot,
    /// Beneficiary bank, 1-2 digits (zero-padded to 2 on the wire).
    pub bank_code: String,
    /// Beneficiary branch, 1-3 digits.
    pub branch_code: String,
    /// Beneficiary account, digits only, at most 9 on the wire.
    pub account_number: String,
    /// Record reference (אסמכתא): case number or synthetic batch position.
    pub reference: Reference,
    pub source_kind: SourceKind,
    pub source_id: SourceId,
}

impl fmt::Display for TransferRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transfer[{}:{}] {} {}/{}/{} amount={}",
            self.source_kind,
            self.source_id,
            self.recipient_name,
            self.bank_code,
            self.branch_code,
            self.account_number,
            money::format_amount(self.amount),
        )
    }
}

// ============================================================================
// Export Options
// ============================================================================

/// Submission category. Affects filename routing only; execution-date
/// selection stays with the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Regular,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Regular => "regular",
            Urgency::Urgent => "urgent",
        }
    }
}

/// Policy for recipient names longer than the 16-byte name field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Keep the leading 16 encoded bytes (the legacy behavior).
    #[default]
    Truncate,
    /// Report a violation instead of shortening the name.
    Reject,
}

/// Output file extension. The content is identical in all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileExtension {
    #[default]
    Txt,
    Dat,
    Msv,
}

impl FileExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileExtension::Txt => "txt",
            FileExtension::Dat => "dat",
            FileExtension::Msv => "msv",
        }
    }
}

/// Options for one generation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportOptions {
    #[serde(default)]
    pub urgency: Urgency,
    /// Value date for the payments; defaults to the creation date.
    pub execution_date: Option<NaiveDate>,
    /// File creation date; defaults to today. Injectable so repeated
    /// calls with identical inputs are byte-identical.
    pub creation_date: Option<NaiveDate>,
    #[serde(default)]
    pub file_extension: FileExtension,
    #[serde(default)]
    pub name_policy: NamePolicy,
    /// When false, the transfer validation pass is skipped (settings are
    /// always validated). Defaults to true.
    #[serde(default = "default_true")]
    pub validate_before_export: bool,
    /// Echoed on the summary for the caller's post-export status
    /// transition. The generator itself never flips transfer state.
    #[serde(default)]
    pub mark_as_transferred: bool,
}

fn default_true() -> bool {
    true
}

impl ExportOptions {
    pub fn new() -> Self {
        Self {
            validate_before_export: true,
            ..Default::default()
        }
    }
}

// ============================================================================
// Generated File
// ============================================================================

/// A fully assembled MASAV file plus its summary metadata.
///
/// Invariants, verified by the assembler rather than assumed:
/// - `total_amount` equals the exact sum of detail-record amounts
/// - `lines.len()` equals `total_record_count` + 3 (header, trailer, EOF)
/// - every line is exactly [`crate::records::RECORD_LEN`] bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasavFile {
    /// Ordered 128-byte records, without line terminators.
    pub lines: Vec<Vec<u8>>,
    /// Number of detail ('1') records.
    pub total_record_count: usize,
    /// Independently recomputed sum of detail amounts, in agorot.
    pub total_amount: Agorot,
    pub filename: String,
    pub urgency: Urgency,
    pub execution_date: NaiveDate,
    /// Carried through from [`ExportOptions::mark_as_transferred`].
    pub mark_as_transferred: bool,
}

impl MasavFile {
    /// The complete file buffer: every record followed by CRLF,
    /// including the last.
    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.lines.len() * 130);
        for line in &self.lines {
            out.extend_from_slice(line);
            out.extend_from_slice(b"\r\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TransferRecord {
        TransferRecord {
            recipient_name: "כהן דוד".to_string(),
            id_number: None,
            amount: 150_000,
            bank_code: "12".to_string(),
            branch_code: "123".to_string(),
            account_number: "456789".to_string(),
            reference: 1001,
            source_kind: SourceKind::CasePayment,
            source_id: 7,
        }
    }

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::CasePayment.to_string(), "case_payment");
        assert_eq!(SourceKind::ManualTransfer.to_string(), "manual_transfer");
    }

    #[test]
    fn test_transfer_display_shows_amount_in_shekels() {
        let s = record().to_string();
        assert!(s.contains("amount=1500.00"), "got: {}", s);
        assert!(s.contains("12/123/456789"), "got: {}", s);
    }

    #[test]
    fn test_export_options_defaults() {
        let opts = ExportOptions::new();
        assert_eq!(opts.urgency, Urgency::Regular);
        assert_eq!(opts.name_policy, NamePolicy::Truncate);
        assert_eq!(opts.file_extension, FileExtension::Txt);
        assert!(opts.validate_before_export);
        assert!(!opts.mark_as_transferred);
    }

    #[test]
    fn test_options_deserialize_defaults() {
        // A caller sending `{}` gets validation on, regular urgency
        let opts: ExportOptions = serde_json::from_str("{}").unwrap();
        assert!(opts.validate_before_export);
        assert_eq!(opts.urgency, Urgency::Regular);
    }

    #[test]
    fn test_file_bytes_crlf_terminated() {
        let file = MasavFile {
            lines: vec![vec![b'K'; 128], vec![b'9'; 128]],
            total_record_count: 0,
            total_amount: 0,
            filename: "x.txt".to_string(),
            urgency: Urgency::Regular,
            execution_date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            mark_as_transferred: false,
        };
        let bytes = file.bytes();
        assert_eq!(bytes.len(), 2 * 130);
        assert_eq!(&bytes[128..130], b"\r\n");
        assert_eq!(&bytes[258..260], b"\r\n");
    }
}
