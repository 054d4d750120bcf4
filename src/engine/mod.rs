// ==========================================
// Community Dashboard Loader - engine layer
// ==========================================
// Responsibility: period resolution and run orchestration
// Flow: period → source path → load → validate → stage
// ==========================================

pub mod error;
pub mod orchestrator;
pub mod period_resolver;

pub use error::{PipelineError, PipelineResult};
pub use orchestrator::{PipelineOrchestrator, RunMode, RunSummary};
pub use period_resolver::resolve_reporting_period;
