//! MoodLens Session Data Model
//!
//! Wire payloads and session state types shared by the capture engine,
//! analytics core, and report engine:
//! - `EmotionSample` and the raw transport payloads it is built from
//! - `LabelSet`: the session's declared labels in canonical order
//! - Derived telemetry: statistics, notifications, performance snapshots

pub mod labels;
pub mod sample;
pub mod telemetry;

pub use labels::*;
pub use sample::*;
pub use telemetry::*;
