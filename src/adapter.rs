//! Transfer source adapter
//!
//! Two domain shapes feed the generator: payments joined with their case
//! and bank details, and manually entered one-off transfers that already
//! carry bank details. Both converge on [`TransferRecord`] here, before
//! any validation or encoding runs; record builders never see the
//! difference.

use crate::core_types::{Agorot, SourceId};
use crate::models::{SourceKind, TransferRecord};
use crate::money::{self, MoneyError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Beneficiary bank account, as stored per case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_code: String,
    pub branch_code: String,
    pub account_number: String,
    pub account_holder_name: String,
}

/// One transfer as the surrounding application knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferSource {
    /// Approved payment: Payment ⋈ Case ⋈ BankDetails.
    CasePayment {
        payment_id: SourceId,
        case_number: u64,
        amount: Agorot,
        bank_details: BankDetails,
    },
    /// Manually entered transfer with inline bank details.
    Manual {
        transfer_id: SourceId,
        recipient_name: String,
        id_number: Option<String>,
        amount: Agorot,
        bank_code: String,
        branch_code: String,
        account_number: String,
    },
}

impl TransferSource {
    /// Construct a case-payment source from its joined rows.
    pub fn case_payment(
        payment_id: SourceId,
        case_number: u64,
        amount: Agorot,
        bank_details: BankDetails,
    ) -> Self {
        TransferSource::CasePayment {
            payment_id,
            case_number,
            amount,
            bank_details,
        }
    }

    /// Construct a manual-transfer source.
    #[allow(clippy::too_many_arguments)]
    pub fn manual(
        transfer_id: SourceId,
        recipient_name: impl Into<String>,
        id_number: Option<String>,
        amount: Agorot,
        bank_code: impl Into<String>,
        branch_code: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        TransferSource::Manual {
            transfer_id,
            recipient_name: recipient_name.into(),
            id_number,
            amount,
            bank_code: bank_code.into(),
            branch_code: branch_code.into(),
            account_number: account_number.into(),
        }
    }
}

/// Normalize a batch of sources into canonical records, preserving input
/// order. `position` is the 1-based place in the batch; manual transfers
/// have no case number, so it becomes their wire reference.
pub fn normalize(sources: &[TransferSource]) -> Vec<TransferRecord> {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| adapt_one(source, i as u64 + 1))
        .collect()
}

fn adapt_one(source: &TransferSource, position: u64) -> TransferRecord {
    match source {
        TransferSource::CasePayment {
            payment_id,
            case_number,
            amount,
            bank_details,
        } => TransferRecord {
            recipient_name: bank_details.account_holder_name.clone(),
            id_number: None,
            amount: *amount,
            bank_code: bank_details.bank_code.clone(),
            branch_code: bank_details.branch_code.clone(),
            account_number: bank_details.account_number.clone(),
            reference: *case_number,
            source_kind: SourceKind::CasePayment,
            source_id: *payment_id,
        },
        TransferSource::Manual {
            transfer_id,
            recipient_name,
            id_number,
            amount,
            bank_code,
            branch_code,
            account_number,
        } => TransferRecord {
            recipient_name: recipient_name.clone(),
            id_number: id_number.clone(),
            amount: *amount,
            bank_code: bank_code.clone(),
            branch_code: branch_code.clone(),
            account_number: account_number.clone(),
            reference: position,
            source_kind: SourceKind::ManualTransfer,
            source_id: *transfer_id,
        },
    }
}

/// Raw batch row shape, amounts as decimal shekels. Rows carrying a
/// case number become case payments; the rest become manual transfers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRow {
    pub recipient_name: String,
    #[serde(default)]
    pub id_number: Option<String>,
    pub amount: Decimal,
    pub bank_code: String,
    pub branch_code: String,
    pub account_number: String,
    #[serde(default)]
    pub case_number: Option<u64>,
}

impl TransferRow {
    /// Convert a parsed row into a source. `row_id` is the 1-based data
    /// row number, used as the source id when the row carries none of
    /// its own. The shekel amount is converted to agorot here, strictly.
    pub fn into_source(self, row_id: u64) -> Result<TransferSource, MoneyError> {
        let amount = money::parse_decimal(self.amount)?;
        Ok(match self.case_number {
            Some(case_number) => TransferSource::CasePayment {
                payment_id: row_id,
                case_number,
                amount,
                bank_details: BankDetails {
                    bank_code: self.bank_code,
                    branch_code: self.branch_code,
                    account_number: self.account_number,
                    account_holder_name: self.recipient_name,
                },
            },
            None => TransferSource::Manual {
                transfer_id: row_id,
                recipient_name: self.recipient_name,
                id_number: self.id_number,
                amount,
                bank_code: self.bank_code,
                branch_code: self.branch_code,
                account_number: self.account_number,
            },
        })
    }
}
