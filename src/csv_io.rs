//! CSV / YAML I/O: load settings and transfer batches for the CLI
//!
//! The generator core takes plain in-memory inputs; this module is the
//! thin loading layer in front of it. Organization settings come from a
//! YAML file, transfer batches from a headered CSV with one row per
//! transfer:
//!
//! ```text
//! recipient_name,id_number,amount,bank_code,branch_code,account_number,case_number
//! כהן דוד,,1500.00,12,123,456789,1001
//! לוי שרה,123456789,72.50,10,20,33445,
//! ```
//!
//! Rows with a case number become case payments; rows without become
//! manual transfers. Amounts are decimal shekels, converted to agorot
//! at this boundary.

use crate::adapter::{TransferRow, TransferSource};
use crate::models::OrganizationSettings;
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

const CSV_COLUMNS: usize = 7;

/// Load organization settings from a YAML file.
pub fn load_settings(path: &Path) -> Result<OrganizationSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse settings yaml {}", path.display()))
}

/// Load a transfer batch from CSV, preserving row order. The row number
/// (1-based, data rows only) doubles as the source id for rows that
/// carry none of their own.
pub fn load_transfers(path: &Path) -> Result<Vec<TransferSource>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut sources = Vec::new();
    for (row_num, line) in reader.lines().skip(1).enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let source = parse_row(&line, row_num as u64 + 1)
            .with_context(|| format!("{}: data row {}", path.display(), row_num + 1))?;
        sources.push(source);
    }
    Ok(sources)
}

fn parse_row(line: &str, row_id: u64) -> Result<TransferSource> {
    let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
    if parts.len() != CSV_COLUMNS {
        bail!("expected {} columns, got {}", CSV_COLUMNS, parts.len());
    }

    let row = TransferRow {
        recipient_name: parts[0].to_string(),
        id_number: match parts[1] {
            "" => None,
            id => Some(id.to_string()),
        },
        amount: Decimal::from_str(parts[2])
            .with_context(|| format!("invalid amount {:?}", parts[2]))?,
        bank_code: parts[3].to_string(),
        branch_code: parts[4].to_string(),
        account_number: parts[5].to_string(),
        case_number: match parts[6] {
            "" => None,
            case => Some(
                case.parse()
                    .with_context(|| format!("invalid case number {:?}", case))?,
            ),
        },
    };
    row.into_source(row_id)
        .with_context(|| format!("unusable amount {:?}", parts[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_payment_row() {
        let source = parse_row("כהן דוד,,1500.00,12,123,456789,1001", 1).unwrap();
        match source {
            TransferSource::CasePayment {
                case_number,
                amount,
                bank_details,
                ..
            } => {
                assert_eq!(case_number, 1001);
                assert_eq!(amount, 150_000);
                assert_eq!(bank_details.account_holder_name, "כהן דוד");
                assert_eq!(bank_details.bank_code, "12");
            }
            other => panic!("expected CasePayment, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_manual_row() {
        let source = parse_row("לוי שרה,123456789,72.50,10,20,33445,", 4).unwrap();
        match source {
            TransferSource::Manual {
                transfer_id,
                id_number,
                amount,
                ..
            } => {
                assert_eq!(transfer_id, 4);
                assert_eq!(id_number.as_deref(), Some("123456789"));
                assert_eq!(amount, 7_250);
            }
            other => panic!("expected Manual, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_row_rejects_bad_shapes() {
        assert!(parse_row("too,few,columns", 1).is_err());
        assert!(parse_row("a,,not-money,12,123,456,", 1).is_err());
        assert!(parse_row("a,,-5,12,123,456,", 1).is_err());
        assert!(parse_row("a,,100,12,123,456,case", 1).is_err());
    }

    #[test]
    fn test_settings_yaml_roundtrip() {
        let yaml = r#"
institution_id: "12345678"
institution_name: "קרן חסד"
bank_code: "12"
branch_code: "123"
account_number: "456789"
sequence_number: "001"
hebrew_encoding: code-b
"#;
        let settings: OrganizationSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.institution_id, "12345678");
        assert_eq!(
            settings.hebrew_encoding,
            crate::hebrew::HebrewEncoding::CodeB
        );
    }
}
