//! Batch validation
//!
//! Two independent passes run before any encoding:
//!
//! 1. **Settings pass**: exact digit-count checks on every
//!    [`OrganizationSettings`] field. Any failure is fatal for the whole
//!    batch; no partial file is ever produced.
//! 2. **Transfer pass**: per-transfer account/bank/amount/name checks.
//!
//! Violations are ACCUMULATED, not returned one at a time: a rejected
//! submission delays payouts, so the caller must see every defect in a
//! single round trip.

use crate::banks;
use crate::models::{NamePolicy, OrganizationSettings, TransferRecord};
use crate::records;
use serde::Serialize;
use std::fmt;

// ============================================================================
// Violations
// ============================================================================

/// What a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum Scope {
    Organization,
    /// Zero-based position of the offending transfer in the batch.
    Transfer(usize),
}

/// One defect found during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub scope: Scope,
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            Scope::Organization => write!(f, "organization.{}: {}", self.field, self.message),
            Scope::Transfer(i) => write!(f, "transfer[{}].{}: {}", i, self.field, self.message),
        }
    }
}

/// Ordered list of all violations found in one pass. Empty means the
/// batch may proceed to encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    fn push(&mut self, scope: Scope, field: &'static str, message: impl Into<String>) {
        self.violations.push(Violation {
            scope,
            field,
            message: message.into(),
        });
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.violations.len())?;
        for v in &self.violations {
            write!(f, "\n  {}", v)?;
        }
        Ok(())
    }
}

// ============================================================================
// Field predicates
// ============================================================================

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_exact_digits(s: &str, n: usize) -> bool {
    s.len() == n && is_digits(s)
}

/// Widest account number accepted from a source system. The wire field
/// is 9 digits; anything between 10 and 20 digits is caught later as an
/// encoding overflow rather than silently shortened.
pub const ACCOUNT_NUMBER_MAX_LEN: usize = 20;

/// Agorot ceiling for the 13-digit detail amount field.
pub const MAX_AMOUNT_AGOROT: u64 = 9_999_999_999_999;

const ID_NUMBER_MAX_LEN: usize = 9;

// ============================================================================
// Settings pass
// ============================================================================

/// Validate organization settings. Every field is checked; all failures
/// are reported together.
pub fn validate_settings(settings: &OrganizationSettings) -> ValidationReport {
    let mut report = ValidationReport::default();
    let scope = Scope::Organization;

    if !is_exact_digits(&settings.institution_id, 8) {
        report.push(
            scope,
            "institution_id",
            format!("must be exactly 8 digits, got {:?}", settings.institution_id),
        );
    }
    if settings.institution_name.trim().is_empty() {
        report.push(scope, "institution_name", "must not be empty");
    }
    if !is_exact_digits(&settings.bank_code, 2) {
        report.push(
            scope,
            "bank_code",
            format!("must be exactly 2 digits, got {:?}", settings.bank_code),
        );
    }
    if !is_exact_digits(&settings.branch_code, 3) {
        report.push(
            scope,
            "branch_code",
            format!("must be exactly 3 digits, got {:?}", settings.branch_code),
        );
    }
    if !is_digits(&settings.account_number)
        || settings.account_number.len() > ACCOUNT_NUMBER_MAX_LEN
    {
        report.push(
            scope,
            "account_number",
            format!(
                "must be 1-{} digits, got {:?}",
                ACCOUNT_NUMBER_MAX_LEN, settings.account_number
            ),
        );
    }
    if !is_exact_digits(&settings.sequence_number, 3) {
        report.push(
            scope,
            "sequence_number",
            format!("must be exactly 3 digits, got {:?}", settings.sequence_number),
        );
    }

    report
}

// ============================================================================
// Transfer pass
// ============================================================================

/// Validate every transfer in the batch, collecting all violations
/// across all transfers into one report.
pub fn validate_transfers(
    transfers: &[TransferRecord],
    name_policy: NamePolicy,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (index, transfer) in transfers.iter().enumerate() {
        validate_one(transfer, index, name_policy, &mut report);
    }
    report
}

fn validate_one(
    transfer: &TransferRecord,
    index: usize,
    name_policy: NamePolicy,
    report: &mut ValidationReport,
) {
    let scope = Scope::Transfer(index);

    if !is_digits(&transfer.bank_code) || transfer.bank_code.len() > 2 {
        report.push(
            scope,
            "bank_code",
            format!("must be 1-2 digits, got {:?}", transfer.bank_code),
        );
    } else if !banks::is_known_bank(&transfer.bank_code) {
        report.push(
            scope,
            "bank_code",
            format!("unknown bank code {:?}", transfer.bank_code),
        );
    }

    if !is_digits(&transfer.branch_code) || transfer.branch_code.len() > 3 {
        report.push(
            scope,
            "branch_code",
            format!("must be 1-3 digits, got {:?}", transfer.branch_code),
        );
    }

    if !is_digits(&transfer.account_number) {
        report.push(
            scope,
            "account_number",
            format!("must be digits only, got {:?}", transfer.account_number),
        );
    } else if transfer.account_number.len() > ACCOUNT_NUMBER_MAX_LEN {
        report.push(
            scope,
            "account_number",
            format!(
                "must be at most {} digits, got {}",
                ACCOUNT_NUMBER_MAX_LEN,
                transfer.account_number.len()
            ),
        );
    }

    if transfer.amount == 0 {
        report.push(scope, "amount", "must be positive");
    } else if transfer.amount > MAX_AMOUNT_AGOROT {
        report.push(
            scope,
            "amount",
            format!(
                "{} agorot exceeds the 13-digit field maximum {}",
                transfer.amount, MAX_AMOUNT_AGOROT
            ),
        );
    }

    if transfer.recipient_name.trim().is_empty() {
        report.push(scope, "recipient_name", "must not be empty");
    } else if name_policy == NamePolicy::Reject
        && transfer.recipient_name.chars().count() > records::NAME_WIDTH
    {
        report.push(
            scope,
            "recipient_name",
            format!(
                "{} characters exceeds the {}-character name field",
                transfer.recipient_name.chars().count(),
                records::NAME_WIDTH
            ),
        );
    }

    if let Some(id) = &transfer.id_number {
        if !is_digits(id) || id.len() > ID_NUMBER_MAX_LEN {
            report.push(
                scope,
                "id_number",
                format!("must be 1-{} digits, got {:?}", ID_NUMBER_MAX_LEN, id),
            );
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
