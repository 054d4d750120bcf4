// ==========================================
// Community Dashboard Loader - pipeline error
// ==========================================
// Aggregates the layer errors; `kind()` is the operator triage label
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl PipelineError {
    /// Stable label: malformed data vs late delivery vs infrastructure
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Config(_) => "config",
            PipelineError::Import(ImportError::SourceRead { .. }) => "source_read",
            PipelineError::Import(ImportError::InvalidDate { .. }) => "invalid_date",
            PipelineError::Import(ImportError::MissingPeriodData { .. }) => "missing_period_data",
            PipelineError::Import(ImportError::UnmappedValue(_)) => "unmapped_value",
            PipelineError::Import(ImportError::TypeCoercion { .. }) => "type_coercion",
            PipelineError::Repository(_) => "database",
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
