//! MoodLens Analytics Core
//!
//! Turns the noisy, irregular classification stream into bounded,
//! queryable session state. Every accepted sample flows through one
//! pipeline, as a single atomic unit:
//!
//! ```text
//! RawEmotionPayload
//!       │ SampleValidator (threshold drop / default confidence)
//!       ▼
//! ┌───────────────────┬────────────────────┐
//! │ RollingHistory    │ ChartWindow        │
//! │ (bounded FIFO)    │ (per-label series) │
//! └─────────┬─────────┴────────────────────┘
//!           ▼
//!   derive_statistics        high_confidence_alert
//!   (avg / max / trend)      (transient notification)
//! ```
//!
//! The insight generator runs on its own periodic cycle over the most
//! recent samples and fully replaces its previous output.

pub mod chart;
pub mod dominant;
pub mod history;
pub mod insight;
pub mod notify;
pub mod stats;
pub mod validator;

pub use chart::*;
pub use dominant::*;
pub use history::*;
pub use insight::*;
pub use notify::*;
pub use stats::*;
pub use validator::*;
