//! Shared utility helpers.

pub mod error;

pub use error::{ImageId, MatchFailure, SymScanError, SymScanResult};
