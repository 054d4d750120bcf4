// ==========================================
// Community Dashboard Loader - repository error types
// ==========================================
// Tool: thiserror derive
// Any of these aborts the staging transaction uncommitted
// ==========================================

use thiserror::Error;

/// Repository layer error
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Connection / transaction =====
    #[error("database connection failed ({path}): {message}")]
    DatabaseConnectionError { path: String, message: String },

    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    // ===== Staging script =====
    #[error("staging step failed ({step}): {message}")]
    StagingStepFailed { step: String, message: String },

    #[error("transform procedure not registered: {0}")]
    ProcedureNotFound(String),
}

/// Result alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;
