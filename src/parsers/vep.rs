// ==============================================================================
// parsers/vep.rs - VEP JSON Output Parser
// ==============================================================================
// Description: Loads Ensembl VEP JSON annotations (plain or gzip-compressed)
// Author: Matt Barham
// Created: 2026-10-17
// Modified: 2026-10-17
// Version: 1.0.0
// ==============================================================================
// Format: Either a JSON array of variant records, or VEP's native --json
// output with one record object per line.
// Example:
//   [{"input":"1 69511 . A G","allele_string":"A/G","strand":1,
//     "transcript_consequences":[...],"colocated_variants":[...]}]
// ==============================================================================

use flate2::read::MultiGzDecoder;
use serde_json::Deserializer;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::models::VariantRecord;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors that can occur while loading a VEP document
#[derive(Error, Debug)]
pub enum VepParseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Document is empty")]
    EmptyDocument,
}

/// Loader for VEP JSON documents
pub struct VepParser;

impl VepParser {
    /// Parse a VEP JSON file
    ///
    /// Gzip input (including bgzip, which is multi-member) is detected by its
    /// magic number rather than the file extension.
    pub fn parse(path: impl AsRef<Path>) -> Result<Vec<VariantRecord>, VepParseError> {
        let path = path.as_ref();
        let raw = std::fs::read(path)?;
        debug!("Read {} bytes from {:?}", raw.len(), path);

        if raw.starts_with(&GZIP_MAGIC) {
            let mut decompressed = Vec::new();
            MultiGzDecoder::new(raw.as_slice()).read_to_end(&mut decompressed)?;
            debug!("Decompressed to {} bytes", decompressed.len());
            Self::parse_slice(&decompressed)
        } else {
            Self::parse_slice(&raw)
        }
    }

    /// Parse VEP records from an in-memory string
    pub fn parse_str(text: &str) -> Result<Vec<VariantRecord>, VepParseError> {
        Self::parse_slice(text.as_bytes())
    }

    /// Parse VEP records from raw bytes
    pub fn parse_slice(bytes: &[u8]) -> Result<Vec<VariantRecord>, VepParseError> {
        let first = bytes
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .ok_or(VepParseError::EmptyDocument)?;

        let records = if *first == b'[' {
            serde_json::from_slice::<Vec<VariantRecord>>(bytes)?
        } else {
            Deserializer::from_slice(bytes)
                .into_iter::<VariantRecord>()
                .collect::<Result<Vec<_>, _>>()?
        };

        debug!("Parsed {} variant records", records.len());
        Ok(records)
    }
}
