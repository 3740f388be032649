//! Input/output for CORSIKA particle files.
//!
//! CORSIKA writes its ground particles as a sequence of fixed-size disk blocks, each holding
//! 21 sub-blocks. Sub-blocks are either tagged records (run/event headers and trailers,
//! longitudinal tables) or groups of 39 particle records. This module detects the flavour
//! of a file, streams its sub-blocks, and exposes showers and their particles on top.

pub mod block;
pub mod compression;
pub mod error;
pub mod export;
pub mod format;
pub mod particles;
pub mod raw_stream;
pub mod shower_file;

#[cfg(any(test, feature = "fixtures"))]
#[doc(hidden)]
pub mod fixtures;
