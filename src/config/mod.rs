// ==========================================
// Community Dashboard Loader - config layer
// ==========================================
// Responsibility: explicit pipeline configuration and the injected clock
// Sources: JSON file (optional) → CLI overrides
// ==========================================

pub mod clock;
pub mod pipeline_config;

pub use clock::{Clock, FixedClock, SystemClock};
pub use pipeline_config::{default_config_path, ConfigError, PipelineConfig, StagingTargets};
