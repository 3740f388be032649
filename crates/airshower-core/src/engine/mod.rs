//! # Engine Module
//!
//! The accumulation layer: it decides which histogram a particle belongs to and owns the
//! state built up while walking a file.
//!
//! - **Configuration** ([`config`]) - Histogram geometry and particle selection, built and
//!   validated through [`config::DistributionConfigBuilder`]
//! - **Accumulation** ([`distribution`]) - The species classification rule and the four-panel
//!   [`distribution::GroundDistribution`]
//! - **Progress** ([`progress`]) - Callback-based progress events for front ends
//! - **Errors** ([`error`]) - The error type returned by workflows

pub mod config;
pub mod distribution;
pub mod error;
pub mod progress;
