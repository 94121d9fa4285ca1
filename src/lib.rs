//! Scoutline - faceted filter engine for creator discovery
//!
//! Holds a partially specified creator query as a typed [`filters::FilterState`],
//! lets independent editors merge patches into single sections, counts active
//! filters across heterogeneous field shapes, and interprets free-text queries
//! into the same structure.

pub mod cli;
pub mod config;
pub mod counting;
pub mod error;
pub mod filters;
pub mod interpreter;
pub mod merge;
pub mod patterns;
pub mod session;

pub use error::{Result, ScoutlineError};
