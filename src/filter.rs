// ==============================================================================
// filter.rs - Variant Significance and Rarity Filter
// ==============================================================================
// Description: Selects damaging, rare VEP variants and flattens them into rows
// Author: Matt Barham
// Created: 2026-10-17
// Modified: 2026-10-17
// Version: 1.0.0
// ==============================================================================
// Per record:
//   1. Transcript scan  - keep HIGH/MODERATE consequences not flagged by both
//                         SIFT and PolyPhen
//   2. Frequency scan   - check gnomAD exome frequencies of colocated variants
//   3. Emission         - one row per kept transcript
// ==============================================================================

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{FilterConfig, FrequencyPolicy};
use crate::models::{ColocatedVariant, SelectionRow, TranscriptConsequence, VariantRecord, PLACEHOLDER};
use crate::output::{render_frequencies, report_header};

/// Errors raised while filtering records
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Record {record}: missing required field '{field}'")]
    MissingField { record: usize, field: &'static str },
}

/// Counters collected during a filter pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Records scanned
    pub records: usize,
    /// Records with at least one kept transcript
    pub with_kept_transcripts: usize,
    /// Records dropped by the frequency scan
    pub dropped_common: usize,
    /// Records that produced rows
    pub emitted_records: usize,
    /// Rows produced
    pub rows: usize,
}

/// Transcript fields captured during the transcript scan
#[derive(Debug)]
struct KeptTranscript<'a> {
    consequence_terms: &'a [String],
    biotype: &'a str,
    hgvsp: &'a str,
    gene_id: &'a str,
    phenotypes: Vec<&'a str>,
}

/// rsID and frequency text of the captured colocated variant
#[derive(Debug, Default)]
struct RareMatch {
    id: Option<String>,
    frequencies: Option<String>,
}

pub struct VariantFilter {
    config: FilterConfig,
}

impl VariantFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Filter records and render the report, header line first
    pub fn filter_and_format(&self, records: &[VariantRecord]) -> Result<Vec<String>, FilterError> {
        let rows = self.select(records)?;

        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(report_header());
        lines.extend(rows.iter().map(SelectionRow::to_tsv_line));
        Ok(lines)
    }

    /// Filter records into report rows, in record then transcript order
    pub fn select(&self, records: &[VariantRecord]) -> Result<Vec<SelectionRow>, FilterError> {
        self.select_with_stats(records).map(|(rows, _)| rows)
    }

    pub fn select_with_stats(
        &self,
        records: &[VariantRecord],
    ) -> Result<(Vec<SelectionRow>, FilterStats), FilterError> {
        let mut rows = Vec::new();
        let mut stats = FilterStats {
            records: records.len(),
            ..FilterStats::default()
        };

        for (index, record) in records.iter().enumerate() {
            let kept = self.scan_transcripts(index, record)?;
            if kept.is_empty() {
                continue;
            }
            stats.with_kept_transcripts += 1;

            let rare_match = match &record.colocated_variants {
                Some(colocated) => match self.scan_colocated(index, colocated)? {
                    Some(rare_match) => rare_match,
                    None => {
                        debug!("Record {}: dropped by colocated variant frequencies", index);
                        stats.dropped_common += 1;
                        continue;
                    }
                },
                None => RareMatch::default(),
            };

            let emitted = Self::emit(index, record, &kept, &rare_match)?;
            stats.emitted_records += 1;
            stats.rows += emitted.len();
            rows.extend(emitted);
        }

        info!(
            "Filtered {} records: {} with damaging transcripts, {} dropped as common, {} rows",
            stats.records, stats.with_kept_transcripts, stats.dropped_common, stats.rows
        );

        Ok((rows, stats))
    }

    fn scan_transcripts<'a>(
        &self,
        index: usize,
        record: &'a VariantRecord,
    ) -> Result<Vec<KeptTranscript<'a>>, FilterError> {
        let Some(transcripts) = &record.transcript_consequences else {
            return Ok(Vec::new());
        };

        transcripts
            .iter()
            .filter(|transcript| transcript.passes())
            .map(|transcript| self.keep_transcript(index, transcript))
            .collect()
    }

    fn keep_transcript<'a>(
        &self,
        index: usize,
        transcript: &'a TranscriptConsequence,
    ) -> Result<KeptTranscript<'a>, FilterError> {
        let mut phenotypes = Vec::new();
        for entry in transcript.phenotypes.iter().flatten() {
            let source = entry.source.as_deref().ok_or(FilterError::MissingField {
                record: index,
                field: "source",
            })?;
            if self.config.is_allowed_source(source) {
                let name = entry.phenotype.as_deref().ok_or(FilterError::MissingField {
                    record: index,
                    field: "phenotype",
                })?;
                phenotypes.push(name);
            }
        }

        let consequence_terms = transcript
            .consequence_terms
            .as_deref()
            .ok_or(FilterError::MissingField {
                record: index,
                field: "consequence_terms",
            })?;

        Ok(KeptTranscript {
            consequence_terms,
            biotype: transcript.biotype.as_deref().unwrap_or(PLACEHOLDER),
            hgvsp: transcript.hgvsp.as_deref().unwrap_or(PLACEHOLDER),
            gene_id: transcript.gene_id.as_deref().unwrap_or(PLACEHOLDER),
            phenotypes,
        })
    }

    /// Returns None when the record is dropped as common
    fn scan_colocated(
        &self,
        index: usize,
        colocated: &[ColocatedVariant],
    ) -> Result<Option<RareMatch>, FilterError> {
        let mut relevant = true;
        let mut rare_match = RareMatch::default();

        for variant in colocated {
            let Some(frequencies) = &variant.frequencies else {
                continue;
            };

            let mut all_rare = true;
            for entry in frequencies.iter() {
                let number = entry.gnomade.as_ref().ok_or(FilterError::MissingField {
                    record: index,
                    field: "gnomade",
                })?;
                if number.as_f64().unwrap_or(f64::INFINITY) > self.config.max_frequency {
                    all_rare = false;
                }
            }

            if all_rare {
                let id = variant.id.clone().ok_or(FilterError::MissingField {
                    record: index,
                    field: "id",
                })?;
                debug!("Record {}: rare colocated variant {}", index, id);
                rare_match.id = Some(id);
                rare_match.frequencies = Some(render_frequencies(frequencies));
                if self.config.frequency_policy == FrequencyPolicy::LastWins {
                    relevant = true;
                }
            } else {
                relevant = false;
            }
        }

        Ok(relevant.then_some(rare_match))
    }

    fn emit(
        index: usize,
        record: &VariantRecord,
        kept: &[KeptTranscript<'_>],
        rare_match: &RareMatch,
    ) -> Result<Vec<SelectionRow>, FilterError> {
        let missing = |field| FilterError::MissingField { record: index, field };

        let input = record.input.as_deref().ok_or_else(|| missing("input"))?;
        let allele_string = record
            .allele_string
            .as_deref()
            .ok_or_else(|| missing("allele_string"))?;
        let strand = record.strand.ok_or_else(|| missing("strand"))?;
        let id = rare_match.id.as_deref().unwrap_or(PLACEHOLDER);
        let frequencies = rare_match.frequencies.as_deref().unwrap_or(PLACEHOLDER);

        Ok(kept
            .iter()
            .map(|transcript| SelectionRow {
                input: input.to_string(),
                allele_string: allele_string.to_string(),
                strand,
                id: id.to_string(),
                frequencies: frequencies.to_string(),
                consequence_terms: transcript.consequence_terms.to_vec(),
                biotype: transcript.biotype.to_string(),
                hgvsp: transcript.hgvsp.to_string(),
                gene_id: transcript.gene_id.to_string(),
                phenotypes: transcript.phenotypes.iter().map(|p| p.to_string()).collect(),
            })
            .collect())
    }
}

impl Default for VariantFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}
