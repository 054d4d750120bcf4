// ==========================================
// Community Dashboard Loader - staging loader
// ==========================================
// One transaction: truncate both staging tables → bulk insert →
// community procedure → staging-to-dashboard procedure → commit
// Precondition of the procedures: the community procedure fills the
// primary staging table from the community table
// ==========================================

use crate::config::StagingTargets;
use crate::db::{quote_ident, PROCEDURE_TABLE, STAGING_COLUMNS};
use crate::domain::ValidatedRecordSet;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};

// ==========================================
// StagingStep / StagingScript
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagingStep {
    Truncate { table: String },
    BulkInsert { table: String },
    ExecProcedure { name: String },
}

impl fmt::Display for StagingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StagingStep::Truncate { table } => write!(f, "truncate {}", table),
            StagingStep::BulkInsert { table } => write!(f, "insert into {}", table),
            StagingStep::ExecProcedure { name } => write!(f, "exec {}", name),
        }
    }
}

/// Ordered steps; no reordering is safe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingScript {
    steps: Vec<StagingStep>,
}

impl StagingScript {
    pub fn from_targets(targets: &StagingTargets) -> Self {
        Self {
            steps: vec![
                StagingStep::Truncate {
                    table: targets.primary_table.clone(),
                },
                StagingStep::Truncate {
                    table: targets.community_table.clone(),
                },
                StagingStep::BulkInsert {
                    table: targets.community_table.clone(),
                },
                StagingStep::ExecProcedure {
                    name: targets.community_procedure.clone(),
                },
                StagingStep::ExecProcedure {
                    name: targets.process_procedure.clone(),
                },
            ],
        }
    }

    pub fn steps(&self) -> &[StagingStep] {
        &self.steps
    }
}

/// Outcome of a committed staging transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StagingReport {
    pub rows_truncated: usize,
    pub rows_inserted: usize,
    pub procedures_executed: usize,
}

// ==========================================
// StagingLoader
// ==========================================
#[derive(Debug, Clone)]
pub struct StagingLoader {
    script: StagingScript,
}

impl StagingLoader {
    pub fn new(targets: &StagingTargets) -> Self {
        Self {
            script: StagingScript::from_targets(targets),
        }
    }

    pub fn script(&self) -> &StagingScript {
        &self.script
    }

    /// Run the whole script in one transaction on `conn`.
    ///
    /// Returning early drops the `Transaction`, which rolls back; only a
    /// fully successful script reaches `commit`.
    #[instrument(skip_all, fields(rows = records.len()))]
    pub fn load(
        &self,
        conn: &mut Connection,
        records: &ValidatedRecordSet,
    ) -> RepositoryResult<StagingReport> {
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut report = StagingReport::default();
        for step in self.script.steps() {
            debug!(step = %step, "staging step");
            if let Err(e) = Self::execute_step(&tx, step, records, &mut report) {
                warn!(step = %step, error = %e, "staging step failed, rolling back");
                return Err(e);
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(
            rows_inserted = report.rows_inserted,
            procedures = report.procedures_executed,
            "staging transaction committed"
        );
        Ok(report)
    }

    fn execute_step(
        tx: &Transaction,
        step: &StagingStep,
        records: &ValidatedRecordSet,
        report: &mut StagingReport,
    ) -> RepositoryResult<()> {
        let step_error = |e: rusqlite::Error| RepositoryError::StagingStepFailed {
            step: step.to_string(),
            message: e.to_string(),
        };

        match step {
            StagingStep::Truncate { table } => {
                let deleted = tx
                    .execute(&format!("DELETE FROM {}", quote_ident(table)), [])
                    .map_err(step_error)?;
                report.rows_truncated += deleted;
            }
            StagingStep::BulkInsert { table } => {
                report.rows_inserted += Self::bulk_insert_tx(tx, table, records).map_err(step_error)?;
            }
            StagingStep::ExecProcedure { name } => {
                let body: Option<String> = tx
                    .query_row(
                        &format!("SELECT body FROM {} WHERE name = ?1", PROCEDURE_TABLE),
                        params![name],
                        |row| row.get(0),
                    )
                    .optional()
                    .map_err(step_error)?;
                let body = body.ok_or_else(|| RepositoryError::ProcedureNotFound(name.clone()))?;
                tx.execute_batch(&body).map_err(step_error)?;
                report.procedures_executed += 1;
            }
        }
        Ok(())
    }

    /// Insert every row in the fixed staging column order.
    fn bulk_insert_tx(
        tx: &Transaction,
        table: &str,
        records: &ValidatedRecordSet,
    ) -> rusqlite::Result<usize> {
        let columns: Vec<String> = STAGING_COLUMNS.iter().map(|c| quote_ident(c)).collect();
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            quote_ident(table),
            columns.join(", ")
        ))?;

        let mut count = 0;
        for record in records.iter() {
            stmt.execute(params![
                record.indicator_name,
                record.period,
                record.date,
                record.data_value,
                record.data_value2,
                record.speciality,
                record.source,
            ])?;
            count += 1;
        }
        Ok(count)
    }
}
