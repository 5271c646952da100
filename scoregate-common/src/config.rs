//! Service configuration
//!
//! One explicit configuration record constructed at process start and passed
//! by reference into request handlers; nothing in the core reads process
//! globals. Resolution follows the priority order:
//! 1. Environment variable (SCOREGATE_* prefix, highest)
//! 2. TOML config file (platform config dir, `scoregate/config.toml`)
//! 3. Compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Table and ingest-mapping names for one assessment kind
#[derive(Debug, Clone)]
pub struct SinkTarget {
    pub table: String,
    pub mapping: String,
}

/// Service configuration record
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// HTTP bind host
    pub bind_host: String,
    /// HTTP bind port
    pub bind_port: u16,
    /// Analytics sink ingest endpoint base URL; None enables dev mode
    /// (submissions are accepted and logged without being forwarded)
    pub ingest_endpoint: Option<String>,
    /// Analytics sink query endpoint base URL; None disables live reads
    pub query_endpoint: Option<String>,
    /// Analytics database name
    pub database: String,
    /// Bearer token for the sink, if the deployment requires one
    pub sink_token: Option<String>,
    /// Latest-value cache file path
    pub cache_path: PathBuf,
    /// Sink target for the generic domain-scored assessment
    pub tech_health: SinkTarget,
    /// Sink target for the 21-question survey
    pub ai_readiness: SinkTarget,
    /// Sink target for the 28-question survey
    pub digital_readiness: SinkTarget,
}

/// Optional values read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub bind_host: Option<String>,
    pub bind_port: Option<u16>,
    pub ingest_endpoint: Option<String>,
    pub query_endpoint: Option<String>,
    pub database: Option<String>,
    pub sink_token: Option<String>,
    pub cache_path: Option<PathBuf>,
    pub tech_health_table: Option<String>,
    pub tech_health_mapping: Option<String>,
    pub ai_readiness_table: Option<String>,
    pub ai_readiness_mapping: Option<String>,
    pub digital_readiness_table: Option<String>,
    pub digital_readiness_mapping: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment and the platform config file
    pub fn load() -> Result<Self> {
        let file = load_config_file()?;
        Ok(Self::from_parts(file, |name| std::env::var(name).ok()))
    }

    /// Build the record from a file config and an environment lookup.
    ///
    /// The lookup is injectable so tests never touch process environment.
    pub fn from_parts(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let pick = |env_name: &str, file_value: Option<String>| -> Option<String> {
            env(env_name).or(file_value).filter(|s| !s.trim().is_empty())
        };

        let bind_port = env("SCOREGATE_BIND_PORT")
            .and_then(|s| s.parse().ok())
            .or(file.bind_port)
            .unwrap_or(7071);

        ServiceConfig {
            bind_host: pick("SCOREGATE_BIND_HOST", file.bind_host)
                .unwrap_or_else(|| "127.0.0.1".to_string()),
            bind_port,
            ingest_endpoint: pick("SCOREGATE_INGEST_ENDPOINT", file.ingest_endpoint),
            query_endpoint: pick("SCOREGATE_QUERY_ENDPOINT", file.query_endpoint),
            database: pick("SCOREGATE_DATABASE", file.database)
                .unwrap_or_else(|| "aixdb".to_string()),
            sink_token: pick("SCOREGATE_SINK_TOKEN", file.sink_token),
            cache_path: env("SCOREGATE_CACHE_PATH")
                .map(PathBuf::from)
                .or(file.cache_path)
                .unwrap_or_else(|| std::env::temp_dir().join("tech_health_latest.json")),
            tech_health: SinkTarget {
                table: pick("SCOREGATE_TECH_HEALTH_TABLE", file.tech_health_table)
                    .unwrap_or_else(|| "aix_scores_v2".to_string()),
                mapping: pick("SCOREGATE_TECH_HEALTH_MAPPING", file.tech_health_mapping)
                    .unwrap_or_else(|| "aix_scores_json_map".to_string()),
            },
            ai_readiness: SinkTarget {
                table: pick("SCOREGATE_AI_READINESS_TABLE", file.ai_readiness_table)
                    .unwrap_or_else(|| "ai_readiness_scores".to_string()),
                mapping: pick("SCOREGATE_AI_READINESS_MAPPING", file.ai_readiness_mapping)
                    .unwrap_or_else(|| "ai_readiness_scores_json_map".to_string()),
            },
            digital_readiness: SinkTarget {
                table: pick("SCOREGATE_DIGITAL_READINESS_TABLE", file.digital_readiness_table)
                    .unwrap_or_else(|| "digital_readiness_scores".to_string()),
                mapping: pick("SCOREGATE_DIGITAL_READINESS_MAPPING", file.digital_readiness_mapping)
                    .unwrap_or_else(|| "digital_readiness_scores_json_map".to_string()),
            },
        }
    }

    /// Sink target for an assessment kind
    pub fn target(&self, kind: crate::AssessmentKind) -> &SinkTarget {
        match kind {
            crate::AssessmentKind::TechHealth => &self.tech_health,
            crate::AssessmentKind::AiReadiness => &self.ai_readiness,
            crate::AssessmentKind::DigitalReadiness => &self.digital_readiness,
        }
    }
}

/// Read the platform config file if one exists; absent file is not an error
fn load_config_file() -> Result<FileConfig> {
    let path = match config_file_path() {
        Some(path) if path.exists() => path,
        _ => return Ok(FileConfig::default()),
    };

    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
}

/// `~/.config/scoregate/config.toml` (or the platform equivalent)
fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scoregate").join("config.toml"))
}
