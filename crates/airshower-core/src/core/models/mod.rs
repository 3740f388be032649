//! Data models for the records found in a CORSIKA particle file.

pub mod particle;
pub mod pdg;
pub mod shower;
