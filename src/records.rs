//! MASAV record builders
//!
//! Four record types, all exactly [`RECORD_LEN`] bytes:
//! `K` header, `1` detail (one per transfer), `5` trailer, `9` EOF.
//! Field positions follow the official clearing-house layout; the
//! project's own decoder ([`crate::decoder`]) reads the same offsets
//! back, which keeps the two ends honest against each other.
//!
//! Builders are pure `(settings, record) -> line` functions: no I/O, no
//! hidden state, and every produced line is length-checked before it is
//! returned.

use crate::core_types::Agorot;
use crate::encoding::{Align, EncodingError, FieldSpec};
use crate::models::{OrganizationSettings, TransferRecord};
use chrono::NaiveDate;

/// Record length on the wire, excluding the CRLF terminator.
pub const RECORD_LEN: usize = 128;

/// Width of the beneficiary-name field in a detail record.
pub const NAME_WIDTH: usize = 16;

/// Currency code for ILS, the only currency MASAV clears.
const CURRENCY: &[u8; 2] = b"00";

/// Transaction type 006: regular credit (זיכוי רגיל).
const TRANSACTION_TYPE: &[u8; 3] = b"006";

// Field tables. Widths sum to RECORD_LEN per record type; the builders
// verify that at runtime as well.
const INSTITUTION_ID: FieldSpec = FieldSpec::new("institution_id", 8);
const DATE: FieldSpec = FieldSpec::new("date", 6);
const SEQUENCE: FieldSpec = FieldSpec::new("sequence_number", 3);
const INSTITUTION_NAME: FieldSpec = FieldSpec::new("institution_name", 30);
const BANK: FieldSpec = FieldSpec::new("bank_code", 2);
const BRANCH: FieldSpec = FieldSpec::new("branch_code", 3);
const ACCOUNT_TYPE: FieldSpec = FieldSpec::new("account_type", 4);
const ACCOUNT: FieldSpec = FieldSpec::new("account_number", 9);
const ID_NUMBER: FieldSpec = FieldSpec::new("id_number", 9);
const NAME: FieldSpec = FieldSpec::new("recipient_name", NAME_WIDTH);
const AMOUNT: FieldSpec = FieldSpec::new("amount", 13);
const REFERENCE: FieldSpec = FieldSpec::new("reference", 20);
const PAYMENT_PERIOD: FieldSpec = FieldSpec::new("payment_period", 8);
const TOTAL_AMOUNT: FieldSpec = FieldSpec::new("total_amount", 15);
const RECORD_COUNT: FieldSpec = FieldSpec::new("record_count", 7);

fn format_date(date: NaiveDate) -> Vec<u8> {
    date.format("%y%m%d").to_string().into_bytes()
}

fn check_len(record: char, line: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
    if line.len() != RECORD_LEN {
        return Err(EncodingError::RecordLength {
            record,
            actual: line.len(),
            expected: RECORD_LEN,
        });
    }
    Ok(line)
}

/// Build the header ('K') record, the first line of the file.
pub fn build_header(
    settings: &OrganizationSettings,
    execution_date: NaiveDate,
    creation_date: NaiveDate,
) -> Result<Vec<u8>, EncodingError> {
    let mut line = Vec::with_capacity(RECORD_LEN);
    line.push(b'K');
    line.extend(INSTITUTION_ID.numeric_str(&settings.institution_id)?);
    line.extend_from_slice(CURRENCY);
    line.extend(format_date(execution_date));
    line.push(b'0');
    line.extend(SEQUENCE.numeric_str(&settings.sequence_number)?);
    line.push(b'0');
    line.extend(format_date(creation_date));
    // Sending institution: leading 5 digits of the institution id
    let sending = &settings.institution_id[..settings.institution_id.len().min(5)];
    line.extend(FieldSpec::new("sending_institution", 5).numeric_str(sending)?);
    line.extend(FieldSpec::new("filler", 6).filler(b'0'));
    line.extend(INSTITUTION_NAME.text(
        &settings.institution_name,
        Align::Right,
        settings.hebrew_encoding,
    ));
    line.extend(FieldSpec::new("filler", 56).filler(b' '));
    line.extend_from_slice(b"KOT");
    check_len('K', line)
}

/// Build one detail ('1') record. Transfers are encoded in the exact
/// order supplied after validation; no reordering here.
pub fn build_detail(
    settings: &OrganizationSettings,
    transfer: &TransferRecord,
) -> Result<Vec<u8>, EncodingError> {
    let mut line = Vec::with_capacity(RECORD_LEN);
    line.push(b'1');
    line.extend(INSTITUTION_ID.numeric_str(&settings.institution_id)?);
    line.extend_from_slice(CURRENCY);
    line.extend(FieldSpec::new("filler", 6).filler(b'0'));
    line.extend(BANK.numeric_str(&transfer.bank_code)?);
    line.extend(BRANCH.numeric_str(&transfer.branch_code)?);
    line.extend(ACCOUNT_TYPE.filler(b'0'));
    line.extend(ACCOUNT.numeric_str(&transfer.account_number)?);
    line.push(b'0');
    match &transfer.id_number {
        Some(id) => line.extend(ID_NUMBER.numeric_str(id)?),
        None => line.extend(ID_NUMBER.filler(b'0')),
    }
    line.extend(NAME.text(
        &transfer.recipient_name,
        Align::Right,
        settings.hebrew_encoding,
    ));
    line.extend(AMOUNT.numeric(transfer.amount)?);
    line.extend(REFERENCE.numeric(transfer.reference)?);
    line.extend(PAYMENT_PERIOD.filler(b'0'));
    line.extend_from_slice(TRANSACTION_TYPE);
    line.extend_from_slice(TRANSACTION_TYPE);
    line.extend(FieldSpec::new("filler", 18).filler(b'0'));
    line.extend(FieldSpec::new("filler", 2).filler(b' '));
    check_len('1', line)
}

/// Build the trailer ('5') record carrying the control totals.
/// `record_count` and `total_amount` come from the assembler's own
/// summation, never from the caller.
pub fn build_trailer(
    settings: &OrganizationSettings,
    execution_date: NaiveDate,
    record_count: usize,
    total_amount: Agorot,
) -> Result<Vec<u8>, EncodingError> {
    let mut line = Vec::with_capacity(RECORD_LEN);
    line.push(b'5');
    line.extend(INSTITUTION_ID.numeric_str(&settings.institution_id)?);
    line.extend_from_slice(CURRENCY);
    line.extend(format_date(execution_date));
    line.push(b'0');
    line.extend(SEQUENCE.numeric_str(&settings.sequence_number)?);
    line.extend(TOTAL_AMOUNT.numeric(total_amount)?);
    line.extend(FieldSpec::new("filler", 15).filler(b'0'));
    line.extend(RECORD_COUNT.numeric(record_count as u64)?);
    line.extend(FieldSpec::new("filler", 7).filler(b'0'));
    line.extend(FieldSpec::new("filler", 63).filler(b' '));
    check_len('5', line)
}

/// The end-of-file sentinel: 128 nines.
pub fn build_eof() -> Vec<u8> {
    vec![b'9'; RECORD_LEN]
}
