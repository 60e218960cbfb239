// ==============================================================================
// output.rs - Report Output Generation
// ==============================================================================
// Description: Write filtered variant rows as a TSV report or JSON
// Author: Matt Barham
// Created: 2026-10-17
// Modified: 2026-10-17
// Version: 1.0.0
// ==============================================================================

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

use crate::config::ConfigError;
use crate::models::{AlleleFrequencies, SelectionRow};

/// Report columns, in order
pub const REPORT_COLUMNS: [&str; 9] = [
    "INPUT",
    "ALLELES",
    "STRAND",
    "ID",
    "FREQUENCIES",
    "CONSEQUENCES",
    "BIOTYPE",
    "HGSV@GENE_ID",
    "PHENOTYPES",
];

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated report with header line
    #[default]
    Tsv,
    /// JSON array of row objects
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur while writing a report
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TSV writing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Header line of the TSV report
pub fn report_header() -> String {
    REPORT_COLUMNS.join("\t")
}

/// Concatenate gnomAD frequencies without separator
pub fn render_frequencies(frequencies: &AlleleFrequencies) -> String {
    frequencies
        .iter()
        .filter_map(|entry| entry.gnomade.as_ref())
        .map(render_number)
        .collect()
}

/// Integers print as integers; floats go through `format_float`
pub fn render_number(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() => format_float(value),
        _ => number.to_string(),
    }
}

/// Shortest round-trip digits, positional for 1e-4 <= |x| < 1e16 and
/// exponent notation (at least two exponent digits) otherwise. Integral
/// values keep a ".0" suffix.
///
/// # Examples
/// - 0.0001 -> "0.0001"
/// - 1e-5 -> "1e-05"
/// - 3.981e-6 -> "3.981e-06"
/// - 2.0 -> "2.0"
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    // `{:e}` yields the shortest round-trip mantissa, e.g. "3.981e-6"
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let sign = if value.is_sign_negative() { "-" } else { "" };

    // Position of the decimal point relative to the first digit
    let point = exponent + 1;

    if point <= -4 || point > 16 {
        let (first, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() {
            String::new()
        } else {
            format!(".{}", rest)
        };
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}{}{}e{}{:02}", sign, first, fraction, exponent_sign, exponent.abs());
    }

    let body = if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else {
        let point = point as usize;
        if point >= digits.len() {
            format!("{}{}.0", digits, "0".repeat(point - digits.len()))
        } else {
            format!("{}.{}", &digits[..point], &digits[point..])
        }
    };
    format!("{}{}", sign, body)
}

/// Write rows in the requested format
pub fn write_report<W: Write>(
    writer: W,
    rows: &[SelectionRow],
    format: OutputFormat,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Tsv => write_tsv(writer, rows),
        OutputFormat::Json => write_json(writer, rows),
    }
}

/// Write the header line and one line per row
///
/// Values are written verbatim: no quoting or escaping is applied.
pub fn write_tsv<W: Write>(writer: W, rows: &[SelectionRow]) -> Result<(), OutputError> {
    let mut tsv = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    tsv.write_record(REPORT_COLUMNS)?;
    for row in rows {
        tsv.write_record(row.tsv_fields())?;
    }
    tsv.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut writer: W, rows: &[SelectionRow]) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
