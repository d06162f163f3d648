//! End-to-end QA suite for MASAV file generation.
//!
//! Exercises the full pipeline (sources → adapter → validation →
//! records → assembly) against pinned byte fixtures and the read-back
//! decoder.

use chrono::NaiveDate;
use masav_engine::decoder;
use masav_engine::models::{ExportOptions, NamePolicy, Urgency};
use masav_engine::validation::Scope;
use masav_engine::{
    BankDetails, GenerateError, HebrewEncoding, OrganizationSettings, SourceKind, TransferRecord,
    TransferSource, generate, generate_from_sources,
};

const RECORD_LEN: usize = 128;

fn org_settings() -> OrganizationSettings {
    OrganizationSettings {
        institution_id: "12345678".to_string(),
        institution_name: "קרן חסד".to_string(),
        bank_code: "12".to_string(),
        branch_code: "123".to_string(),
        account_number: "456789".to_string(),
        sequence_number: "001".to_string(),
        hebrew_encoding: HebrewEncoding::CodeA,
    }
}

/// Helper to create a valid canonical transfer.
fn make_transfer(amount: u64, reference: u64) -> TransferRecord {
    TransferRecord {
        recipient_name: "כהן דוד".to_string(),
        id_number: None,
        amount,
        bank_code: "12".to_string(),
        branch_code: "123".to_string(),
        account_number: "456789".to_string(),
        reference,
        source_kind: SourceKind::CasePayment,
        source_id: reference,
    }
}

fn opts() -> ExportOptions {
    ExportOptions {
        execution_date: NaiveDate::from_ymd_opt(2026, 8, 30),
        creation_date: NaiveDate::from_ymd_opt(2026, 8, 30),
        ..ExportOptions::new()
    }
}

#[test]
fn qa_tc_trailer_totals_match_details() {
    let transfers: Vec<_> = (1..=25)
        .map(|i| make_transfer(i * 77, i))
        .collect();
    let expected_total: u64 = transfers.iter().map(|t| t.amount).sum();

    let file = generate(&org_settings(), &transfers, &opts()).unwrap();
    assert_eq!(file.total_amount, expected_total);
    assert_eq!(file.total_record_count, 25);

    // Cross-check through the independent read-back path
    let decoded = decoder::decode(&file.bytes()).unwrap();
    assert_eq!(decoded.details.len(), 25);
    assert_eq!(decoded.trailer.as_ref().unwrap().total_amount, expected_total);
    assert_eq!(decoded.trailer.as_ref().unwrap().record_count, 25);
    assert!(decoded.totals_consistent());
}

#[test]
fn qa_tc_line_structure_and_widths() {
    let transfers = vec![make_transfer(150_000, 1), make_transfer(7_200, 2)];
    let file = generate(&org_settings(), &transfers, &opts()).unwrap();

    // detail lines + header/trailer/EOF overhead
    assert_eq!(file.lines.len(), file.total_record_count + 3);
    for line in &file.lines {
        assert_eq!(line.len(), RECORD_LEN);
    }
    assert_eq!(file.lines[0][0], b'K');
    assert_eq!(file.lines[1][0], b'1');
    assert_eq!(file.lines[2][0], b'1');
    assert_eq!(file.lines[3][0], b'5');
    assert!(file.lines[4].iter().all(|&b| b == b'9'));

    // Buffer is CRLF-terminated after every record, including the last
    let bytes = file.bytes();
    assert_eq!(bytes.len(), file.lines.len() * (RECORD_LEN + 2));
    assert_eq!(&bytes[bytes.len() - 2..], b"\r\n");
}

#[test]
fn qa_tc_pinned_detail_fixture() {
    // Reference fixture: recipient "כהן דוד", bank "12", branch "123",
    // account "456789", amount 1500.00 ILS, reference 1001, Code A.
    let file = generate(&org_settings(), &[make_transfer(150_000, 1001)], &opts()).unwrap();
    let expected: Vec<u8> = [
        &b"1"[..],
        b"12345678",
        b"00",
        b"000000",
        b"12",
        b"123",
        b"0000",
        b"000456789",
        b"0",
        b"000000000",
        b"         KDO CEC",
        b"0000000150000",
        b"00000000000000001001",
        b"00000000",
        b"006",
        b"006",
        b"000000000000000000",
        b"  ",
    ]
    .concat();
    assert_eq!(file.lines[1], expected);
}

#[test]
fn qa_tc_idempotent_generation() {
    let transfers = vec![make_transfer(150_000, 1), make_transfer(31, 2)];
    let a = generate(&org_settings(), &transfers, &opts()).unwrap();
    let b = generate(&org_settings(), &transfers, &opts()).unwrap();
    assert_eq!(a.bytes(), b.bytes());
    assert_eq!(a.filename, b.filename);
}

#[test]
fn qa_tc_validation_accumulates_all_defects() {
    let mut bad_account = make_transfer(100, 1);
    bad_account.account_number = "45ab9".to_string();
    let mut zero_amount = make_transfer(100, 2);
    zero_amount.amount = 0;
    let mut unknown_bank = make_transfer(100, 3);
    unknown_bank.bank_code = "99".to_string();

    let err = generate(
        &org_settings(),
        &[bad_account, zero_amount, unknown_bank],
        &opts(),
    )
    .unwrap_err();

    let report = match err {
        GenerateError::Validation(report) => report,
        other => panic!("expected Validation, got {:?}", other),
    };
    assert_eq!(report.len(), 3);
    assert_eq!(report.violations[0].scope, Scope::Transfer(0));
    assert_eq!(report.violations[1].scope, Scope::Transfer(1));
    assert_eq!(report.violations[2].scope, Scope::Transfer(2));
}

#[test]
fn qa_tc_account_number_length_boundary() {
    // 20 digits: passes validation (the encoder later refuses anything
    // wider than its 9-digit wire field, explicitly, not by truncation)
    let mut t20 = make_transfer(100, 1);
    t20.account_number = "1".repeat(20);
    let report = masav_engine::validation::validate_transfers(
        std::slice::from_ref(&t20),
        NamePolicy::Truncate,
    );
    assert!(report.is_empty());

    let mut t21 = make_transfer(100, 2);
    t21.account_number = "1".repeat(21);
    let err = generate(&org_settings(), &[t21], &opts()).unwrap_err();
    assert!(matches!(err, GenerateError::Validation(_)));

    let mut t_alpha = make_transfer(100, 3);
    t_alpha.account_number = "1234x".to_string();
    let err = generate(&org_settings(), &[t_alpha], &opts()).unwrap_err();
    assert!(matches!(err, GenerateError::Validation(_)));
}

#[test]
fn qa_tc_seven_digit_institution_blocks_everything() {
    let mut settings = org_settings();
    settings.institution_id = "1234567".to_string();

    // The batch contains a transfer that would also fail, but with a
    // configuration error, zero transfers are processed.
    let mut bad = make_transfer(100, 1);
    bad.amount = 0;

    let err = generate(&settings, &[bad], &opts()).unwrap_err();
    let report = match err {
        GenerateError::Configuration(report) => report,
        other => panic!("expected Configuration, got {:?}", other),
    };
    assert_eq!(report.len(), 1);
    assert_eq!(report.violations[0].scope, Scope::Organization);
    assert_eq!(report.violations[0].field, "institution_id");
}

#[test]
fn qa_tc_empty_batch_pinned_as_error() {
    let err = generate(&org_settings(), &[], &opts()).unwrap_err();
    assert!(matches!(err, GenerateError::EmptyBatch));
}

#[test]
fn qa_tc_name_policy_truncate_vs_reject() {
    let mut long_name = make_transfer(100, 1);
    long_name.recipient_name = "שם ארוך מאוד שלא נכנס לשדה".to_string();

    // Truncate (default): generation succeeds, name is 16 bytes on the wire
    let file = generate(&org_settings(), std::slice::from_ref(&long_name), &opts()).unwrap();
    assert_eq!(file.lines[1][45..61].len(), 16);

    // Reject: explicit violation
    let reject_opts = ExportOptions {
        name_policy: NamePolicy::Reject,
        ..opts()
    };
    let err = generate(&org_settings(), &[long_name], &reject_opts).unwrap_err();
    let report = match err {
        GenerateError::Validation(report) => report,
        other => panic!("expected Validation, got {:?}", other),
    };
    assert_eq!(report.violations[0].field, "recipient_name");
}

#[test]
fn qa_tc_mixed_sources_one_file() {
    let sources = vec![
        TransferSource::case_payment(
            11,
            1001,
            150_000,
            BankDetails {
                bank_code: "12".to_string(),
                branch_code: "123".to_string(),
                account_number: "456789".to_string(),
                account_holder_name: "כהן דוד".to_string(),
            },
        ),
        TransferSource::manual(
            12,
            "לוי שרה",
            Some("123456789".to_string()),
            7_250,
            "10",
            "20",
            "33445",
        ),
    ];

    let file = generate_from_sources(&org_settings(), &sources, &opts()).unwrap();
    assert_eq!(file.total_record_count, 2);
    assert_eq!(file.total_amount, 157_250);

    let decoded = decoder::decode(&file.bytes()).unwrap();
    // Case payment carries its case number; manual gets batch position 2
    assert_eq!(decoded.details[0].reference, "1001");
    assert_eq!(decoded.details[1].reference, "2");
    assert_eq!(decoded.details[1].id_number.as_deref(), Some("123456789"));
    assert_eq!(decoded.details[1].recipient_name, "לוי שרה");
}

#[test]
fn qa_tc_code_b_hebrew_round_trips() {
    let mut settings = org_settings();
    settings.hebrew_encoding = HebrewEncoding::CodeB;

    let file = generate(&settings, &[make_transfer(100, 1)], &opts()).unwrap();
    // Name bytes land in the 0x80-0x9A range
    assert!(file.lines[1][45..61].iter().any(|&b| b >= 0x80));

    let decoded = decoder::decode(&file.bytes()).unwrap();
    assert_eq!(decoded.details[0].recipient_name, "כהן דוד");
    assert_eq!(decoded.header.unwrap().institution_name, "קרן חסד");
}

#[test]
fn qa_tc_urgent_filename_routing() {
    let urgent = ExportOptions {
        urgency: Urgency::Urgent,
        ..opts()
    };
    let file = generate(&org_settings(), &[make_transfer(100, 1)], &urgent).unwrap();
    assert_eq!(file.filename, "MASAV_12345678_260830_001_urgent.txt");
    assert_eq!(file.urgency, Urgency::Urgent);
}
