//! MASAV file read-back
//!
//! Parses a generated buffer back into structured summaries, the
//! reverse of [`crate::records`]. Used by the CLI `inspect` mode and by
//! the integration tests to cross-check the generator against an
//! independent reading of the same offsets.
//!
//! Only the fields a human reviews before submission are extracted;
//! fillers are not round-tripped.

use crate::core_types::Agorot;
use crate::hebrew;
use crate::money;
use crate::records::RECORD_LEN;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("line {line}: invalid length {actual}, expected {expected}")]
    BadLineLength {
        line: usize,
        actual: usize,
        expected: usize,
    },

    #[error("line {line}: unknown record type {record:?}")]
    UnknownRecordType { line: usize, record: char },

    #[error("line {line}: non-numeric {field} field")]
    BadNumericField { line: usize, field: &'static str },
}

/// Header summary (record type 'K').
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedHeader {
    pub institution_id: String,
    pub institution_name: String,
    pub execution_date: String,
    pub sequence_number: String,
}

/// One detail record (type '1').
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedDetail {
    pub recipient_name: String,
    pub id_number: Option<String>,
    pub bank_code: String,
    pub branch_code: String,
    pub account_number: String,
    pub amount: Agorot,
    pub reference: String,
}

/// Trailer control totals (record type '5').
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedTrailer {
    pub total_amount: Agorot,
    pub record_count: u64,
}

/// A decoded file: header, details in file order, trailer, EOF marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedFile {
    pub header: Option<DecodedHeader>,
    pub details: Vec<DecodedDetail>,
    pub trailer: Option<DecodedTrailer>,
    pub eof_seen: bool,
}

impl DecodedFile {
    /// Do the trailer's control totals agree with the detail records?
    pub fn totals_consistent(&self) -> bool {
        match &self.trailer {
            None => false,
            Some(t) => {
                let sum: Agorot = self.details.iter().map(|d| d.amount).sum();
                t.total_amount == sum && t.record_count == self.details.len() as u64
            }
        }
    }
}

impl fmt::Display for DecodedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(h) = &self.header {
            writeln!(
                f,
                "HEADER  institution={} ({}) date={} seq={}",
                h.institution_id, h.institution_name, h.execution_date, h.sequence_number
            )?;
        }
        for (i, d) in self.details.iter().enumerate() {
            write!(
                f,
                "DETAIL #{} {} bank={} branch={} account={} amount={} ref={}",
                i + 1,
                d.recipient_name,
                d.bank_code,
                d.branch_code,
                d.account_number,
                money::format_amount(d.amount),
                d.reference
            )?;
            if let Some(id) = &d.id_number {
                write!(f, " id={}", id)?;
            }
            writeln!(f)?;
        }
        if let Some(t) = &self.trailer {
            writeln!(
                f,
                "TRAILER records={} total={}",
                t.record_count,
                money::format_amount(t.total_amount)
            )?;
        }
        Ok(())
    }
}

/// Decode a complete file buffer (CRLF-separated 128-byte records).
pub fn decode(buffer: &[u8]) -> Result<DecodedFile, DecodeError> {
    let mut file = DecodedFile {
        header: None,
        details: Vec::new(),
        trailer: None,
        eof_seen: false,
    };

    for (idx, line) in buffer.split(|&b| b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        if line.len() != RECORD_LEN {
            return Err(DecodeError::BadLineLength {
                line: line_no,
                actual: line.len(),
                expected: RECORD_LEN,
            });
        }

        match line[0] {
            b'K' => file.header = Some(decode_header(line)),
            b'1' => file.details.push(decode_detail(line, line_no)?),
            b'5' => file.trailer = Some(decode_trailer(line, line_no)?),
            b'9' => file.eof_seen = true,
            other => {
                return Err(DecodeError::UnknownRecordType {
                    line: line_no,
                    record: other as char,
                });
            }
        }
    }

    Ok(file)
}

fn ascii(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn numeric(bytes: &[u8], line: usize, field: &'static str) -> Result<u64, DecodeError> {
    ascii(bytes)
        .parse()
        .map_err(|_| DecodeError::BadNumericField { line, field })
}

fn decode_header(line: &[u8]) -> DecodedHeader {
    DecodedHeader {
        institution_id: ascii(&line[1..9]),
        institution_name: hebrew::decode_field(&line[39..69]),
        execution_date: ascii(&line[11..17]),
        sequence_number: ascii(&line[18..21]),
    }
}

fn decode_detail(line: &[u8], line_no: usize) -> Result<DecodedDetail, DecodeError> {
    let id_raw = ascii(&line[36..45]);
    let id_number = match id_raw.trim_start_matches('0') {
        "" => None,
        trimmed => Some(trimmed.to_string()),
    };
    Ok(DecodedDetail {
        recipient_name: hebrew::decode_field(&line[45..61]),
        id_number,
        bank_code: ascii(&line[17..19]),
        branch_code: ascii(&line[19..22]),
        account_number: ascii(&line[26..35]),
        amount: numeric(&line[61..74], line_no, "amount")?,
        reference: ascii(&line[74..94]).trim_start_matches('0').to_string(),
    })
}

fn decode_trailer(line: &[u8], line_no: usize) -> Result<DecodedTrailer, DecodeError> {
    Ok(DecodedTrailer {
        total_amount: numeric(&line[21..36], line_no, "total_amount")?,
        record_count: numeric(&line[51..58], line_no, "record_count")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::models::{ExportOptions, OrganizationSettings, SourceKind, TransferRecord};
    use chrono::NaiveDate;

    fn settings() -> OrganizationSettings {
        OrganizationSettings {
            institution_id: "12345678".to_string(),
            institution_name: "קרן חסד".to_string(),
            bank_code: "12".to_string(),
            branch_code: "123".to_string(),
            account_number: "456789".to_string(),
            sequence_number: "007".to_string(),
            hebrew_encoding: Default::default(),
        }
    }

    fn transfer() -> TransferRecord {
        TransferRecord {
            recipient_name: "כהן דוד".to_string(),
            id_number: Some("123456789".to_string()),
            amount: 150_000,
            bank_code: "12".to_string(),
            branch_code: "123".to_string(),
            account_number: "456789".to_string(),
            reference: 1001,
            source_kind: SourceKind::CasePayment,
            source_id: 1,
        }
    }

    fn options() -> ExportOptions {
        ExportOptions {
            execution_date: NaiveDate::from_ymd_opt(2026, 8, 30),
            creation_date: NaiveDate::from_ymd_opt(2026, 8, 30),
            ..ExportOptions::new()
        }
    }

    #[test]
    fn test_decode_generated_file() {
        let file = generate(&settings(), &[transfer()], &options()).unwrap();
        let decoded = decode(&file.bytes()).unwrap();

        let header = decoded.header.as_ref().unwrap();
        assert_eq!(header.institution_id, "12345678");
        assert_eq!(header.institution_name, "קרן חסד");
        assert_eq!(header.sequence_number, "007");
        assert_eq!(header.execution_date, "260830");

        assert_eq!(decoded.details.len(), 1);
        let d = &decoded.details[0];
        assert_eq!(d.recipient_name, "כהן דוד");
        assert_eq!(d.amount, 150_000);
        assert_eq!(d.bank_code, "12");
        assert_eq!(d.branch_code, "123");
        assert_eq!(d.account_number, "000456789");
        assert_eq!(d.id_number.as_deref(), Some("123456789"));
        assert_eq!(d.reference, "1001");

        assert!(decoded.eof_seen);
        assert!(decoded.totals_consistent());
    }

    #[test]
    fn test_decode_rejects_short_line() {
        let err = decode(b"K123\r\n").unwrap_err();
        assert!(matches!(err, DecodeError::BadLineLength { actual: 4, .. }));
    }

    #[test]
    fn test_decode_rejects_unknown_record_type() {
        let line = [b'X'; RECORD_LEN];
        let mut buf = line.to_vec();
        buf.extend_from_slice(b"\r\n");
        let err = decode(&buf).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownRecordType {
                line: 1,
                record: 'X'
            }
        );
    }

    #[test]
    fn test_totals_inconsistent_without_trailer() {
        let file = generate(&settings(), &[transfer()], &options()).unwrap();
        // Keep only header + detail + EOF
        let mut lines = file.lines.clone();
        lines.remove(2);
        let mut buf = Vec::new();
        for l in &lines {
            buf.extend_from_slice(l);
            buf.extend_from_slice(b"\r\n");
        }
        let decoded = decode(&buf).unwrap();
        assert!(decoded.trailer.is_none());
        assert!(!decoded.totals_consistent());
    }
}
