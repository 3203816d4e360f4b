//! MoodLens Report Engine
//!
//! Serializes a session snapshot into an exportable document: JSON for
//! programmatic consumers, or a sectioned plain-text report. Field
//! coverage is the contract; both renderings are complete even for a
//! session that never accepted a sample.

pub mod report;

pub use report::*;
