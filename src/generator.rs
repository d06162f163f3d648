//! File assembler and public entry point
//!
//! Control flow: caller → adapter → validation (abort with the full
//! violation list, or continue) → record builders → assembly.
//!
//! The assembler recomputes the control totals by summing the canonical
//! records itself (caller-supplied totals are never trusted) and
//! returns either a complete, internally consistent buffer or an error.
//! There is no observable intermediate state, and nothing here mutates
//! caller-side rows; marking transfers as exported is the caller's
//! post-confirmation side effect.

use crate::adapter::{self, TransferSource};
use crate::core_types::Agorot;
use crate::encoding::EncodingError;
use crate::models::{ExportOptions, MasavFile, OrganizationSettings, TransferRecord, Urgency};
use crate::money;
use crate::records;
use crate::validation::{self, ValidationReport};
use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Error Types
// ============================================================================

/// Everything that can stop a generation call. No variant ever comes
/// with a partial file.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Malformed organization settings. Fatal for the whole batch;
    /// zero transfers are processed.
    #[error("organization settings invalid: {0}")]
    Configuration(ValidationReport),

    /// One or more malformed transfers. Every defect across the whole
    /// batch is reported at once.
    #[error("transfer validation failed: {0}")]
    Validation(ValidationReport),

    /// A value cannot be represented within its fixed field width.
    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    /// Empty transfer list. An empty submission has no meaning to the
    /// clearing house, so it is rejected outright.
    #[error("no transfers in batch")]
    EmptyBatch,
}

impl GenerateError {
    /// The violation report, when this error carries one.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            GenerateError::Configuration(r) | GenerateError::Validation(r) => Some(r),
            _ => None,
        }
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Generate a MASAV file from canonical transfer records.
///
/// The single synchronous public surface: the case-transfers flow and
/// the manual-transfers flow both land here (via [`generate_from_sources`]
/// when they start from raw source shapes).
pub fn generate(
    settings: &OrganizationSettings,
    transfers: &[TransferRecord],
    options: &ExportOptions,
) -> Result<MasavFile, GenerateError> {
    // Settings gate first: a bad institution id blocks everything,
    // before a single transfer is looked at.
    let settings_report = validation::validate_settings(settings);
    if !settings_report.is_empty() {
        return Err(GenerateError::Configuration(settings_report));
    }

    if transfers.is_empty() {
        return Err(GenerateError::EmptyBatch);
    }

    if options.validate_before_export {
        let report = validation::validate_transfers(transfers, options.name_policy);
        if !report.is_empty() {
            info!(
                violations = report.len(),
                transfers = transfers.len(),
                "batch rejected by validation"
            );
            return Err(GenerateError::Validation(report));
        }
    }

    let creation_date = options.creation_date.unwrap_or_else(today);
    let execution_date = options.execution_date.unwrap_or(creation_date);

    // Independent control totals: summed here from the canonical
    // records, regardless of anything the caller computed. The sum is
    // checked; with validation skipped, pathological amounts could
    // otherwise wrap before the trailer width check sees them.
    let total_amount: Agorot = transfers
        .iter()
        .try_fold(0u64, |acc, t| acc.checked_add(t.amount))
        .ok_or(EncodingError::NumericOverflow {
            field: "total_amount",
            value: u64::MAX,
            width: 15,
        })?;
    let total_record_count = transfers.len();

    let mut lines = Vec::with_capacity(total_record_count + 3);
    lines.push(records::build_header(settings, execution_date, creation_date)?);
    for transfer in transfers {
        debug!(%transfer, "encoding detail record");
        lines.push(records::build_detail(settings, transfer)?);
    }
    lines.push(records::build_trailer(
        settings,
        execution_date,
        total_record_count,
        total_amount,
    )?);
    lines.push(records::build_eof());

    // Verify the invariants instead of assuming them.
    debug_assert_eq!(lines.len(), total_record_count + 3);
    debug_assert!(lines.iter().all(|l| l.len() == records::RECORD_LEN));

    let filename = build_filename(settings, execution_date, options);

    info!(
        %filename,
        transfers = total_record_count,
        total = %money::format_amount(total_amount),
        urgency = options.urgency.as_str(),
        "MASAV file assembled"
    );

    Ok(MasavFile {
        lines,
        total_record_count,
        total_amount,
        filename,
        urgency: options.urgency,
        execution_date,
        mark_as_transferred: options.mark_as_transferred,
    })
}

/// Adapter-first entry point: normalize raw source shapes, then
/// generate. Case payments, manual transfers, and mixed batches all go
/// through the same path.
pub fn generate_from_sources(
    settings: &OrganizationSettings,
    sources: &[TransferSource],
    options: &ExportOptions,
) -> Result<MasavFile, GenerateError> {
    let transfers = adapter::normalize(sources);
    generate(settings, &transfers, options)
}

// ============================================================================
// Helpers
// ============================================================================

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Deterministic filename: institution id, execution date, sequence,
/// urgent suffix when applicable.
fn build_filename(
    settings: &OrganizationSettings,
    execution_date: NaiveDate,
    options: &ExportOptions,
) -> String {
    let urgent = match options.urgency {
        Urgency::Regular => "",
        Urgency::Urgent => "_urgent",
    };
    format!(
        "MASAV_{}_{}_{}{}.{}",
        settings.institution_id,
        execution_date.format("%y%m%d"),
        settings.sequence_number,
        urgent,
        options.file_extension.as_str(),
    )
}

// ============================================================================
// Unit Tests
// ============================================================================
