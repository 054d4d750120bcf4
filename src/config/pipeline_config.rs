// ==========================================
// Community Dashboard Loader - pipeline configuration
// ==========================================
// Every value the pipeline needs is carried here and passed in at
// construction; nothing is read ad hoc mid-run
// ==========================================

use crate::domain::period::DEFAULT_FILE_NAME_PATTERN;
use crate::importer::record_validator::ReferenceSheets;
use crate::importer::source_loader::DEFAULT_DATA_SHEET;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config read failed ({path}): {message}")]
    Read { path: String, message: String },

    #[error("config parse failed ({path}): {message}")]
    Parse { path: String, message: String },

    #[error("invalid config value ({key}): {message}")]
    Invalid { key: String, message: String },
}

// ==========================================
// StagingTargets - staging tables and transform procedures
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingTargets {
    /// Truncated, populated downstream by the community procedure
    pub primary_table: String,
    /// Truncated and bulk-loaded with the validated rows
    pub community_table: String,
    pub community_procedure: String,
    pub process_procedure: String,
}

impl Default for StagingTargets {
    fn default() -> Self {
        Self {
            primary_table: "Tbl_Dashboard_Data_STAGING".to_string(),
            community_table: "Tbl_Dashboard_Data_STAGING_Community".to_string(),
            community_procedure: "sp_dashboard_data_community".to_string(),
            process_procedure: "sp_dashboard_data_process_from_staging".to_string(),
        }
    }
}

// ==========================================
// PipelineConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub source_folder: PathBuf,
    /// strftime pattern rendered with the reporting period
    pub file_name_pattern: String,
    pub data_sheet: String,
    pub reference_sheets: ReferenceSheets,
    pub database_path: PathBuf,
    pub staging: StagingTargets,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_folder: PathBuf::from("Sample Data"),
            file_name_pattern: DEFAULT_FILE_NAME_PATTERN.to_string(),
            data_sheet: DEFAULT_DATA_SHEET.to_string(),
            reference_sheets: ReferenceSheets::default(),
            database_path: PathBuf::from("community_dashboard.db"),
            staging: StagingTargets::default(),
        }
    }
}

/// `<config dir>/community-dashboard-loader/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(crate::APP_NAME).join("config.json"))
}

impl PipelineConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let location = path.display().to_string();

        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: location.clone(),
            message: e.to_string(),
        })?;
        let config: PipelineConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
                path: location.clone(),
                message: e.to_string(),
            })?;

        debug!(path = %location, "config loaded");
        config.validate()?;
        Ok(config)
    }

    /// Explicit file when given, else the default location if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("data_sheet", &self.data_sheet),
            ("reference_sheets.indicator_name", &self.reference_sheets.indicator_name),
            ("reference_sheets.speciality", &self.reference_sheets.speciality),
            ("reference_sheets.source", &self.reference_sheets.source),
            ("staging.primary_table", &self.staging.primary_table),
            ("staging.community_table", &self.staging.community_table),
            ("staging.community_procedure", &self.staging.community_procedure),
            ("staging.process_procedure", &self.staging.process_procedure),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: key.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }

        // an unknown specifier would make chrono's formatter fail at render time
        if StrftimeItems::new(&self.file_name_pattern).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid {
                key: "file_name_pattern".to_string(),
                message: format!("not a valid strftime pattern: {}", self.file_name_pattern),
            });
        }
        if !self.file_name_pattern.contains("%Y") {
            return Err(ConfigError::Invalid {
                key: "file_name_pattern".to_string(),
                message: "must contain %Y".to_string(),
            });
        }

        Ok(())
    }
}
