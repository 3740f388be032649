//! # Workflows Module
//!
//! High-level entry points that tie the reader and the accumulation engine together.
//!
//! - **Ground Distribution** ([`ground_distribution`]) - Walks every shower of a file and
//!   bins the ground particles by species, with optional early stopping and progress events.

pub mod ground_distribution;
