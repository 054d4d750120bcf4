// ==========================================
// Community Dashboard Loader - repository layer
// ==========================================
// Red line: no validation rules here, only the staging transaction
// ==========================================
// Responsibility: replace staging data and run the transform procedures
// Constraint: row values are always bound as parameters
// ==========================================

pub mod error;
pub mod staging_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use staging_repo::{StagingLoader, StagingReport, StagingScript, StagingStep};
