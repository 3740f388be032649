//! # Core Module
//!
//! The fundamental building blocks for working with CORSIKA shower output.
//!
//! - **Data Models** ([`models`]) - Particles, showers, and the header/trailer records of a run
//! - **File I/O** ([`io`]) - Format detection, the raw block stream, particle iteration,
//!   and histogram export
//! - **Binning** ([`histogram`]) - Fixed-width 2D histograms with under/overflow tracking

pub mod histogram;
pub mod io;
pub mod models;
