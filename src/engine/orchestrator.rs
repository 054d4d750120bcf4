// ==========================================
// Community Dashboard Loader - pipeline orchestrator
// ==========================================
// Sequence: PeriodResolver → SourceLoader → RecordValidator → StagingLoader
// Strictly linear; every error aborts the run, nothing is retried
// ==========================================

use crate::config::{Clock, PipelineConfig};
use crate::db::open_existing_sqlite_connection;
use crate::domain::{ReportingPeriod, ValidatedRecordSet};
use crate::engine::error::{PipelineError, PipelineResult};
use crate::engine::period_resolver::resolve_reporting_period;
use crate::importer::{load_source, ExcelWorkbook, RecordValidator};
use crate::repository::{RepositoryError, StagingLoader};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Load,
    DryRun,
}

// ==========================================
// RunSummary - outcome of a successful run
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub mode: RunMode,
    pub reporting_period: ReportingPeriod,
    pub source_path: PathBuf,
    pub rows_validated: usize,
    /// 0 for a dry run
    pub rows_loaded: usize,
    pub elapsed_ms: u128,
}

// ==========================================
// PipelineOrchestrator
// ==========================================
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    clock: Box<dyn Clock>,
    validator: RecordValidator,
    loader: StagingLoader,
}

impl PipelineOrchestrator {
    pub fn new(config: PipelineConfig, clock: impl Clock + 'static) -> Self {
        Self {
            validator: RecordValidator::new(config.reference_sheets.clone()),
            loader: StagingLoader::new(&config.staging),
            clock: Box::new(clock),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn reporting_period(&self) -> ReportingPeriod {
        resolve_reporting_period(self.clock.as_ref())
    }

    /// `<source_folder>/<file_name_pattern rendered for period>`
    ///
    /// Expects a config that passes `PipelineConfig::validate`.
    pub fn source_path(&self, period: ReportingPeriod) -> PathBuf {
        self.config
            .source_folder
            .join(period.file_name(&self.config.file_name_pattern))
    }

    /// Validate and load into staging.
    pub fn run(&self) -> PipelineResult<RunSummary> {
        self.execute(Uuid::new_v4().to_string(), RunMode::Load)
    }

    /// Validate only; the database is never opened.
    pub fn validate_only(&self) -> PipelineResult<RunSummary> {
        self.execute(Uuid::new_v4().to_string(), RunMode::DryRun)
    }

    #[instrument(name = "pipeline_run", skip_all, fields(run_id = %run_id, mode = ?mode))]
    fn execute(&self, run_id: String, mode: RunMode) -> PipelineResult<RunSummary> {
        let start = Instant::now();

        // an unchecked file_name_pattern would panic when rendered below
        if let Err(e) = self.config.validate() {
            let e = PipelineError::from(e);
            error!(kind = e.kind(), error = %e, "run aborted, nothing committed");
            return Err(e);
        }

        let period = self.reporting_period();
        let source_path = self.source_path(period);
        info!(period = %period, source = %source_path.display(), "run started");

        let result = self.prepare(period, &source_path).and_then(|records| {
            let rows_validated = records.len();
            let rows_loaded = match mode {
                RunMode::Load => self.stage(&records)?,
                RunMode::DryRun => 0,
            };
            Ok((rows_validated, rows_loaded))
        });

        match result {
            Ok((rows_validated, rows_loaded)) => {
                let summary = RunSummary {
                    run_id,
                    mode,
                    reporting_period: period,
                    source_path,
                    rows_validated,
                    rows_loaded,
                    elapsed_ms: start.elapsed().as_millis(),
                };
                info!(
                    rows_validated,
                    rows_loaded,
                    elapsed_ms = summary.elapsed_ms as u64,
                    "run finished"
                );
                Ok(summary)
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "run aborted, nothing committed");
                Err(e)
            }
        }
    }

    /// Load and validate the source for `period`.
    fn prepare(
        &self,
        period: ReportingPeriod,
        source_path: &Path,
    ) -> PipelineResult<ValidatedRecordSet> {
        let mut workbook = ExcelWorkbook::open(source_path)?;
        let raw = load_source(&mut workbook, &self.config.data_sheet)?;
        info!(rows = raw.len(), "source loaded");

        let validated = self.validator.validate(&raw, &mut workbook, period)?;
        Ok(validated)
    }

    /// Open the store, run the staging transaction, close the connection.
    fn stage(&self, records: &ValidatedRecordSet) -> PipelineResult<usize> {
        let db_path = &self.config.database_path;
        let mut conn = open_existing_sqlite_connection(db_path).map_err(|e| {
            RepositoryError::DatabaseConnectionError {
                path: db_path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let report = self.loader.load(&mut conn, records)?;
        Ok(report.rows_inserted)
    }
}
