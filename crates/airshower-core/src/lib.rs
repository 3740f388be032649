//! # airshower Core Library
//!
//! A library for reading CORSIKA air-shower particle files and turning the particles that
//! reach an observation level into 2D ground distributions.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout so that file handling, accumulation logic, and
//! user-facing procedures stay separate.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`CorsikaParticle`, `Shower`), the
//!   binary CORSIKA reader, fixed-binning histograms, and export utilities.
//!
//! - **[`engine`]: The Logic Core.** Particle classification, the per-species
//!   `GroundDistribution` accumulator, run configuration, and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into complete
//!   procedures, such as filling the ground distribution of every shower in a file.

pub mod core;
pub mod engine;
pub mod workflows;
