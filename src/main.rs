//! masav_engine CLI
//!
//! Two modes:
//!
//! ```text
//! masav_engine generate --transfers batch.csv [--settings org.yaml]
//!                       [--date YYYY-MM-DD] [--urgent] [--out DIR]
//! masav_engine inspect <file>
//! ```
//!
//! `generate` loads the organization settings and a CSV batch, runs the
//! generator, and writes the file into the output directory. On a
//! validation failure the full violation report is printed as JSON and
//! the process exits non-zero; no partial file is written.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::{error, info};

use masav_engine::config::AppConfig;
use masav_engine::logging::init_logging;
use masav_engine::models::{ExportOptions, Urgency};
use masav_engine::{GenerateError, csv_io, generate_from_sources};

// ============================================================
// Argument scanning
// ============================================================

fn arg_value(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn arg_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn get_env(args: &[String]) -> String {
    arg_value(args, "--env").unwrap_or_else(|| "dev".to_string())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match AppConfig::load(&get_env(&args)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    let _guard = init_logging(&config);

    info!(version = env!("CARGO_PKG_VERSION"), "masav_engine starting");

    let result = match args.first().map(String::as_str) {
        Some("generate") => run_generate(&config, &args),
        Some("inspect") => run_inspect(&args),
        _ => {
            eprintln!(
                "usage: masav_engine generate --transfers <batch.csv> [--settings <org.yaml>] \
                 [--date YYYY-MM-DD] [--urgent] [--out <dir>]\n\
                 \x20      masav_engine inspect <file>"
            );
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================
// generate
// ============================================================

fn run_generate(config: &AppConfig, args: &[String]) -> Result<()> {
    let transfers_path = arg_value(args, "--transfers")
        .context("--transfers <batch.csv> is required")?;
    let settings_path =
        arg_value(args, "--settings").unwrap_or_else(|| config.export.settings_path.clone());
    let out_dir = arg_value(args, "--out").unwrap_or_else(|| config.export.output_dir.clone());

    let settings = csv_io::load_settings(Path::new(&settings_path))?;
    let sources = csv_io::load_transfers(Path::new(&transfers_path))?;
    info!(
        transfers = sources.len(),
        settings = %settings_path,
        "batch loaded"
    );

    let execution_date = match arg_value(args, "--date") {
        Some(d) => Some(
            NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                .with_context(|| format!("invalid --date {:?}, expected YYYY-MM-DD", d))?,
        ),
        None => None,
    };

    let options = ExportOptions {
        urgency: if arg_flag(args, "--urgent") {
            Urgency::Urgent
        } else {
            Urgency::Regular
        },
        execution_date,
        file_extension: config.export.file_extension,
        name_policy: config.export.name_policy,
        ..ExportOptions::new()
    };

    let file = match generate_from_sources(&settings, &sources, &options) {
        Ok(file) => file,
        Err(err) => {
            // Machine-readable report so the surrounding workflow can
            // surface every defect in one round trip.
            if let Some(report) = err.report() {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            return Err(report_error(err));
        }
    };

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output dir {}", out_dir))?;
    let out_path = PathBuf::from(&out_dir).join(&file.filename);
    fs::write(&out_path, file.bytes())
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    info!(path = %out_path.display(), "file written");
    println!(
        "{}  transfers={}  total={} ILS",
        out_path.display(),
        file.total_record_count,
        masav_engine::money::format_amount(file.total_amount)
    );
    Ok(())
}

fn report_error(err: GenerateError) -> anyhow::Error {
    match &err {
        GenerateError::Configuration(_) => {
            anyhow::Error::from(err).context("organization settings rejected, no file produced")
        }
        GenerateError::Validation(_) => {
            anyhow::Error::from(err).context("batch rejected, no file produced")
        }
        _ => anyhow::Error::from(err),
    }
}

// ============================================================
// inspect
// ============================================================

fn run_inspect(args: &[String]) -> Result<()> {
    let path = match args.get(1) {
        Some(p) => p,
        None => bail!("usage: masav_engine inspect <file>"),
    };
    let buffer =
        fs::read(path).with_context(|| format!("Failed to read {}", path))?;
    let decoded = masav_engine::decoder::decode(&buffer)?;
    print!("{}", decoded);
    if decoded.totals_consistent() {
        println!("control totals: OK");
    } else {
        println!("control totals: MISMATCH");
        bail!("trailer control totals do not match the detail records");
    }
    Ok(())
}
