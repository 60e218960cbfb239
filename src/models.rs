// ==============================================================================
// models.rs - VEP Annotation Data Models
// ==============================================================================
// Description: Data structures for VEP JSON records and filtered report rows
// Author: Matt Barham
// Created: 2026-10-17
// Modified: 2026-10-17
// Version: 1.0.0
// ==============================================================================
// Fields that the filter only reads for surviving records are modelled as
// Option and checked at the point of use (see filter.rs).
// ==============================================================================

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Placeholder written for absent values in the report
pub const PLACEHOLDER: &str = "-";

/// Severity class of a transcript consequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Impact {
    High,
    Moderate,
    Low,
    Modifier,
    /// Any value outside the VEP vocabulary
    #[serde(other)]
    Other,
}

impl Impact {
    /// Only HIGH and MODERATE consequences are reported
    pub fn is_reportable(&self) -> bool {
        matches!(self, Impact::High | Impact::Moderate)
    }
}

/// One element of the VEP output document
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariantRecord {
    /// Original input line (e.g., "1 69511 . A G")
    pub input: Option<String>,

    /// Reference/alternate alleles (e.g., "A/G")
    pub allele_string: Option<String>,

    /// Strand (1 or -1)
    pub strand: Option<i64>,

    pub transcript_consequences: Option<Vec<TranscriptConsequence>>,

    pub colocated_variants: Option<Vec<ColocatedVariant>>,
}

/// Predicted consequence of a variant on a single transcript
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscriptConsequence {
    pub impact: Impact,

    /// SIFT score (0.0-1.0, low = deleterious)
    pub sift_score: Option<f64>,

    /// PolyPhen-style prediction score (0.0-1.0)
    pub polypen_prediction: Option<f64>,

    /// Transcript biotype (e.g., "protein_coding")
    pub biotype: Option<String>,

    pub phenotypes: Option<Vec<Phenotype>>,

    /// Protein-level HGVS notation (e.g., "ENSP00000334393.3:p.Thr141Ala")
    pub hgvsp: Option<String>,

    /// Ensembl gene ID (e.g., "ENSG00000186092")
    pub gene_id: Option<String>,

    /// SO consequence terms (e.g., ["missense_variant"])
    pub consequence_terms: Option<Vec<String>>,
}

/// SIFT below this is predicted deleterious
pub const SIFT_DELETERIOUS_BELOW: f64 = 0.05;

/// PolyPhen above this is predicted damaging
pub const POLYPHEN_DAMAGING_ABOVE: f64 = 0.446;

impl TranscriptConsequence {
    /// True when both scores are present and both call the change damaging
    pub fn is_flagged_by_both_scores(&self) -> bool {
        match (self.sift_score, self.polypen_prediction) {
            (Some(sift), Some(polyphen)) => {
                sift < SIFT_DELETERIOUS_BELOW && polyphen > POLYPHEN_DAMAGING_ABOVE
            }
            _ => false,
        }
    }

    /// Impact and score filter applied to every transcript
    pub fn passes(&self) -> bool {
        self.impact.is_reportable() && !self.is_flagged_by_both_scores()
    }
}

/// Phenotype association attached to a transcript
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Phenotype {
    pub phenotype: Option<String>,

    /// Annotation source (e.g., "MIM_morbid", "Orphanet")
    pub source: Option<String>,
}

/// Previously catalogued variant overlapping the same position
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColocatedVariant {
    /// Identifier (e.g., "rs1234567" or "COSV12345")
    pub id: Option<String>,

    pub frequencies: Option<AlleleFrequencies>,
}

/// gnomAD exome frequency for one allele
#[derive(Debug, Clone, PartialEq)]
pub struct AlleleFrequency {
    pub allele: String,

    /// Kept as a JSON number so it renders the way it was written
    pub gnomade: Option<serde_json::Number>,
}

/// Per-allele frequencies of a colocated variant, in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlleleFrequencies(Vec<AlleleFrequency>);

impl AlleleFrequencies {
    pub fn iter(&self) -> std::slice::Iter<'_, AlleleFrequency> {
        self.0.iter()
    }
}

impl From<Vec<AlleleFrequency>> for AlleleFrequencies {
    fn from(entries: Vec<AlleleFrequency>) -> Self {
        Self(entries)
    }
}

#[derive(Deserialize)]
struct PopulationFrequencies {
    gnomade: Option<serde_json::Number>,
}

struct AlleleFrequenciesVisitor;

impl<'de> Visitor<'de> for AlleleFrequenciesVisitor {
    type Value = AlleleFrequencies;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of allele to population frequencies")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((allele, populations)) = map.next_entry::<String, PopulationFrequencies>()? {
            entries.push(AlleleFrequency {
                allele,
                gnomade: populations.gnomade,
            });
        }
        Ok(AlleleFrequencies(entries))
    }
}

impl<'de> Deserialize<'de> for AlleleFrequencies {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AlleleFrequenciesVisitor)
    }
}

/// One report line: a retained (variant, transcript) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionRow {
    pub input: String,
    pub allele_string: String,
    pub strand: i64,
    /// rsID of the captured colocated variant, or "-"
    pub id: String,
    /// Concatenated gnomAD frequencies, or "-"
    pub frequencies: String,
    pub consequence_terms: Vec<String>,
    pub biotype: String,
    pub hgvsp: String,
    pub gene_id: String,
    pub phenotypes: Vec<String>,
}

impl SelectionRow {
    /// Report columns in header order
    pub fn tsv_fields(&self) -> [String; 9] {
        [
            self.input.clone(),
            self.allele_string.clone(),
            self.strand.to_string(),
            self.id.clone(),
            self.frequencies.clone(),
            self.consequence_terms.join(" "),
            self.biotype.clone(),
            format!("{}@{}", self.hgvsp, self.gene_id),
            self.phenotypes.join("; "),
        ]
    }

    pub fn to_tsv_line(&self) -> String {
        self.tsv_fields().join("\t")
    }
}
