// ==========================================
// Community Dashboard Loader - core library
// ==========================================
// Pipeline: monthly community extract (.xlsx) → validation → staging load
// Stack: Rust + calamine + SQLite
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - reporting period and record sets
pub mod domain;

// Import layer - workbook reading and validation
pub mod importer;

// Repository layer - staging transaction
pub mod repository;

// Engine layer - period resolution and pipeline orchestration
pub mod engine;

// Config layer - pipeline configuration and clock
pub mod config;

// Database infrastructure (connection setup / staging schema)
pub mod db;

// Logging
pub mod logging;

// ==========================================
// Re-exports
// ==========================================

pub use config::{Clock, FixedClock, PipelineConfig, SystemClock};
pub use domain::{RawRecordSet, ReportingPeriod, ValidatedRecordSet};
pub use engine::{PipelineError, PipelineOrchestrator, PipelineResult, RunSummary};
pub use importer::{ImportError, ImportResult};
pub use repository::{RepositoryError, RepositoryResult, StagingLoader};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "community-dashboard-loader";
