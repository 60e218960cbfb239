// ==============================================================================
// tests/end_to_end.rs - VEP Filter Integration Tests
// ==============================================================================
// Description: Drives the parser, filter and report writer on file fixtures
// Author: Matt Barham
// Created: 2026-10-17
// Modified: 2026-10-17
// Version: 1.0.0
// ==============================================================================

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;
use vep_filter::output::{write_report, OutputFormat};
use vep_filter::{VariantFilter, VepParser};

const VEP_DOCUMENT: &str = r#"[
  {
    "input": "1 69511 . A G",
    "allele_string": "A/G",
    "strand": 1,
    "transcript_consequences": [
      {"impact": "MODERATE", "biotype": "protein_coding", "gene_id": "ENSG00000186092",
       "hgvsp": "ENSP00000334393.3:p.Thr141Ala", "consequence_terms": ["missense_variant"],
       "sift_score": 0.2, "polypen_prediction": 0.9,
       "phenotypes": [{"phenotype": "Olfactory dysfunction", "source": "MIM_morbid"},
                      {"phenotype": "Smell loss", "source": "Orphanet"}]},
      {"impact": "MODIFIER", "gene_id": "ENSG00000240361", "consequence_terms": ["upstream_gene_variant"]}
    ],
    "colocated_variants": [
      {"id": "rs2691305", "frequencies": {"G": {"gnomade": 0.0001, "af": 0.0002}}}
    ]
  },
  {
    "input": "2 1000 . C T",
    "allele_string": "C/T",
    "strand": -1,
    "transcript_consequences": [
      {"impact": "HIGH", "gene_id": "ENSG2", "consequence_terms": ["stop_gained"]}
    ],
    "colocated_variants": [
      {"id": "rs55", "frequencies": {"T": {"gnomade": 0.3}}}
    ]
  },
  {
    "input": "3 5000 . G A",
    "allele_string": "G/A",
    "strand": 1
  },
  {
    "input": "4 7000 . T C",
    "allele_string": "T/C",
    "strand": 1,
    "transcript_consequences": [
      {"impact": "HIGH", "sift_score": 0.01, "polypen_prediction": 0.99, "consequence_terms": ["stop_lost"]},
      {"impact": "HIGH", "biotype": "nonsense_mediated_decay", "consequence_terms": ["stop_lost", "NMD_transcript_variant"]}
    ]
  }
]"#;

const EXPECTED_REPORT: &str = "\
INPUT\tALLELES\tSTRAND\tID\tFREQUENCIES\tCONSEQUENCES\tBIOTYPE\tHGSV@GENE_ID\tPHENOTYPES
1 69511 . A G\tA/G\t1\trs2691305\t0.0001\tmissense_variant\tprotein_coding\tENSP00000334393.3:p.Thr141Ala@ENSG00000186092\tOlfactory dysfunction
4 7000 . T C\tT/C\t1\t-\t-\tstop_lost NMD_transcript_variant\tnonsense_mediated_decay\t-@-\t
";

fn create_test_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_report_from_file() {
    let file = create_test_file(VEP_DOCUMENT);
    let records = VepParser::parse(file.path()).unwrap();

    let filter = VariantFilter::default();
    let (rows, stats) = filter.select_with_stats(&records).unwrap();

    assert_eq!(stats.records, 4);
    assert_eq!(stats.with_kept_transcripts, 3);
    assert_eq!(stats.dropped_common, 1);
    assert_eq!(stats.emitted_records, 2);
    assert_eq!(stats.rows, 2);

    let mut buffer = Vec::new();
    write_report(&mut buffer, &rows, OutputFormat::Tsv).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), EXPECTED_REPORT);
}

#[test]
fn test_formatted_lines_match_tsv_writer() {
    let records = VepParser::parse_str(VEP_DOCUMENT).unwrap();
    let lines = VariantFilter::default().filter_and_format(&records).unwrap();

    let joined: String = lines.iter().map(|line| format!("{}\n", line)).collect();
    assert_eq!(joined, EXPECTED_REPORT);
}

#[test]
fn test_cli_writes_report_to_stdout() {
    let file = create_test_file(VEP_DOCUMENT);

    let output = Command::new(env!("CARGO_BIN_EXE_vep-filter"))
        .arg(file.path())
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), EXPECTED_REPORT);
}

#[test]
fn test_cli_fails_on_malformed_input() {
    let file = create_test_file("[{\"input\": ");

    let output = Command::new(env!("CARGO_BIN_EXE_vep-filter"))
        .arg(file.path())
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_fails_on_missing_file() {
    let output = Command::new(env!("CARGO_BIN_EXE_vep-filter"))
        .arg("/nonexistent/vep_output.json")
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(!output.status.success());
}
