//! masav_engine - MASAV bank-transfer file generator
//!
//! Renders approved payouts into the fixed-width file format of the
//! Israeli interbank clearing house (MASAV): 128-byte CRLF-terminated
//! records, legacy single-byte Hebrew, zero-padded unsigned numerics,
//! and control totals the assembler recomputes itself.
//!
//! # Modules
//!
//! - [`core_types`] - Semantic type aliases (Agorot, Reference)
//! - [`money`] - ILS amounts as integer agorot, strict parsing
//! - [`hebrew`] - MASAV Code A / Code B transliteration
//! - [`encoding`] - Table-driven fixed-width field encoders
//! - [`banks`] - Known Israeli bank code registry
//! - [`models`] - Settings, canonical transfer record, options, output
//! - [`adapter`] - Case-payment / manual-transfer normalization
//! - [`validation`] - Accumulating settings + transfer validation
//! - [`records`] - K/1/5/9 record builders
//! - [`generator`] - File assembly and the `generate` entry point
//! - [`decoder`] - Read-back inspection of a generated buffer
//! - [`csv_io`] - CSV batch / YAML settings loading for the CLI

// Core types - must be first!
pub mod core_types;

// Pure encoding layers
pub mod encoding;
pub mod hebrew;
pub mod money;

// Domain
pub mod adapter;
pub mod banks;
pub mod models;
pub mod validation;

// File building
pub mod decoder;
pub mod generator;
pub mod records;

// CLI plumbing
pub mod config;
pub mod csv_io;
pub mod logging;

// Convenient re-exports at crate root
pub use adapter::{BankDetails, TransferSource};
pub use core_types::{Agorot, Reference, SourceId};
pub use generator::{GenerateError, generate, generate_from_sources};
pub use hebrew::HebrewEncoding;
pub use models::{
    ExportOptions, FileExtension, MasavFile, NamePolicy, OrganizationSettings, SourceKind,
    TransferRecord, Urgency,
};
pub use validation::{Scope, ValidationReport, Violation};
