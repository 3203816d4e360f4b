//! Performance snapshot collaborator.

use moodlens_session_model::PerformanceSnapshot;

/// Supplies the runtime performance figures included in exports. The
/// numbers come from outside the telemetry core (renderer, transport
/// implementation, process metrics).
pub trait PerformanceProbe: Send {
    fn snapshot(&self) -> PerformanceSnapshot;
}

/// A probe reporting all zeros, for sessions without a collaborator.
#[derive(Debug, Default)]
pub struct NullProbe;

impl PerformanceProbe for NullProbe {
    fn snapshot(&self) -> PerformanceSnapshot {
        PerformanceSnapshot::default()
    }
}

/// A probe returning a fixed snapshot, for tests and simulations.
#[derive(Debug)]
pub struct FixedProbe(pub PerformanceSnapshot);

impl PerformanceProbe for FixedProbe {
    fn snapshot(&self) -> PerformanceSnapshot {
        self.0
    }
}
