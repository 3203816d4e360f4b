//! MoodLens Capture Engine
//!
//! Schedules frame captures, talks to the inference transport, and hosts
//! the session controller that owns all mutable session state.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 SessionDriver                     │
//! │  capture tick      insight tick     expiry timers │
//! │       │                 │                 │       │
//! │       ▼                 ▼                 ▼       │
//! │  ┌────────────────────────────────────────────┐  │
//! │  │            EmotionSession                  │  │
//! │  │  validator → history → stats → chart       │  │
//! │  │            → notifications                 │  │
//! │  └────────────────────────────────────────────┘  │
//! │       │ FramePacket              ▲ RawPayload    │
//! │       ▼                          │               │
//! │   Transport ──── inference ──────┘               │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! The driver feeds the session one event at a time, so each accepted
//! sample's pipeline runs as a single atomic unit. There is deliberately
//! no frame/result correlation: under variable transport latency the most
//! recently processed sample may not belong to the most recently captured
//! frame.

pub mod driver;
pub mod frame;
pub mod probe;
pub mod session;
pub mod transport;

pub use driver::*;
pub use frame::*;
pub use probe::*;
pub use session::*;
pub use transport::*;
