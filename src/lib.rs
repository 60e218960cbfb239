// ==============================================================================
// lib.rs - VEP Variant Filter Library
// ==============================================================================
// Description: Library interface for VEP annotation filtering modules
// Author: Matt Barham
// Created: 2026-10-17
// Modified: 2026-10-17
// Version: 1.0.0
// ==============================================================================

pub mod config;
pub mod filter;
pub mod models;
pub mod output;
pub mod parsers;

pub use config::{FilterConfig, FrequencyPolicy};
pub use filter::{FilterError, FilterStats, VariantFilter};
pub use models::{SelectionRow, VariantRecord};
pub use output::OutputFormat;
pub use parsers::VepParser;
