//! cxxstyle core library.
//!
//! This crate exposes programmatic APIs for scanning C-family sources for
//! naming-convention, abbreviation, header-guard, and include-order issues.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `classify`: Line classification (comment/string blanking, enum tracking).
//! - `naming`: Identifier naming rules per declaration category.
//! - `abbrev`: Forbidden-abbreviation checks with an ordered exemption chain.
//! - `includes`: Include-order validation for source and header files.
//! - `scan`: File discovery and parallel scan orchestration.
//! - `models`: Issue, severity, and summary data models.
//! - `report`: Human/JSON printers for scan results.
//! - `utils`: Supporting helpers.
//!
//! Note: All documentation comments are written in English by convention.
pub mod abbrev;
pub mod classify;
pub mod cli;
pub mod config;
pub mod includes;
pub mod models;
pub mod naming;
pub mod report;
pub mod scan;
pub mod utils;
