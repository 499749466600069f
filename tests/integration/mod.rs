//! Integration test modules for midisense
//!
//! - classification: raw bytes to semantic events
//! - curation: input tracking across hot-plug changes

pub mod classification;
pub mod curation;
