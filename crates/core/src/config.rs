use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::record::RecordKind;
use crate::domain::workflow::{ApprovalTier, ApproverKind};
use crate::reminders::{ReminderBucket, ThresholdTable};
use crate::workflow::WorkflowTemplate;

#[derive(Clone, Debug, Serialize)]
pub struct AppConfig {
    pub workflows: WorkflowsConfig,
    pub reminders: RemindersConfig,
    pub logging: LoggingConfig,
}

/// Tier tables per record kind, supplied as data so every module shares the
/// one engine instead of redeclaring its own approval branching.
#[derive(Clone, Debug, Serialize)]
pub struct WorkflowsConfig {
    pub vehicle_request: Vec<TierConfig>,
    pub building_asset: Vec<TierConfig>,
    pub sales_auction: Vec<TierConfig>,
    pub branch_improvement: Vec<TierConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TierConfig {
    pub level: u32,
    #[serde(default = "TierConfig::default_kind")]
    pub approver_kind: ApproverKind,
    pub approver: String,
    pub sla_days: u32,
}

impl TierConfig {
    fn default_kind() -> ApproverKind {
        ApproverKind::Role
    }

    fn role(level: u32, approver: &str, sla_days: u32) -> Self {
        Self {
            level,
            approver_kind: ApproverKind::Role,
            approver: approver.to_string(),
            sla_days,
        }
    }

    fn user(level: u32, approver: &str, sla_days: u32) -> Self {
        Self {
            level,
            approver_kind: ApproverKind::User,
            approver: approver.to_string(),
            sla_days,
        }
    }
}

impl From<TierConfig> for ApprovalTier {
    fn from(tier: TierConfig) -> Self {
        Self {
            level: tier.level,
            approver_kind: tier.approver_kind,
            approver: tier.approver,
            sla_days: tier.sla_days,
        }
    }
}

impl WorkflowsConfig {
    pub fn tiers_for(&self, kind: RecordKind) -> &[TierConfig] {
        match kind {
            RecordKind::VehicleRequest => &self.vehicle_request,
            RecordKind::BuildingAsset => &self.building_asset,
            RecordKind::SalesAuction => &self.sales_auction,
            RecordKind::BranchImprovement => &self.branch_improvement,
        }
    }

    pub fn template_for(&self, kind: RecordKind) -> Result<WorkflowTemplate, ConfigError> {
        let tiers = self.tiers_for(kind).iter().cloned().map(ApprovalTier::from).collect();
        WorkflowTemplate::new(kind.key(), tiers).map_err(|error| {
            ConfigError::Validation(format!("workflows.{}: {error}", kind.key()))
        })
    }
}

/// Threshold profiles per use-site: legal-document reminders run the fine
/// table, SLA badges the coarse one. Both are plain data and overridable.
#[derive(Clone, Debug, Serialize)]
pub struct RemindersConfig {
    pub legal: ThresholdProfileConfig,
    pub sla: ThresholdProfileConfig,
}

#[derive(Clone, Debug, Serialize)]
pub struct ThresholdProfileConfig {
    pub expired_label: String,
    pub safe_label: String,
    pub buckets: Vec<ReminderBucket>,
}

impl ThresholdProfileConfig {
    fn from_table(table: &ThresholdTable) -> Self {
        Self {
            expired_label: table.expired_label().to_string(),
            safe_label: table.safe_label().to_string(),
            buckets: table.buckets().to_vec(),
        }
    }

    fn table(&self, site: &str) -> Result<ThresholdTable, ConfigError> {
        ThresholdTable::with_labels(
            self.buckets.clone(),
            self.expired_label.clone(),
            self.safe_label.clone(),
        )
        .map_err(|error| ConfigError::Validation(format!("reminders.{site}: {error}")))
    }
}

impl RemindersConfig {
    pub fn legal_table(&self) -> Result<ThresholdTable, ConfigError> {
        self.legal.table("legal")
    }

    pub fn sla_table(&self) -> Result<ThresholdTable, ConfigError> {
        self.sla.table("sla")
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workflows: WorkflowsConfig {
                vehicle_request: vec![
                    TierConfig::role(1, "Branch Manager", 3),
                    TierConfig::role(2, "Regional Manager", 3),
                    TierConfig::role(3, "AVP", 5),
                    TierConfig::user(4, "company.owner", 7),
                ],
                building_asset: vec![
                    TierConfig::role(1, "Branch Manager", 3),
                    TierConfig::role(2, "AVP", 5),
                    TierConfig::user(3, "company.owner", 7),
                ],
                sales_auction: vec![
                    TierConfig::role(1, "Regional Manager", 3),
                    TierConfig::user(2, "company.owner", 5),
                ],
                branch_improvement: vec![
                    TierConfig::role(1, "Branch Manager", 3),
                    TierConfig::role(2, "Regional Manager", 5),
                    TierConfig::user(3, "company.owner", 7),
                ],
            },
            reminders: RemindersConfig {
                legal: ThresholdProfileConfig::from_table(&ThresholdTable::fine()),
                sla: ThresholdProfileConfig::from_table(&ThresholdTable::coarse()),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("fleetdesk.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(workflows) = patch.workflows {
            if let Some(tiers) = workflows.vehicle_request {
                self.workflows.vehicle_request = tiers;
            }
            if let Some(tiers) = workflows.building_asset {
                self.workflows.building_asset = tiers;
            }
            if let Some(tiers) = workflows.sales_auction {
                self.workflows.sales_auction = tiers;
            }
            if let Some(tiers) = workflows.branch_improvement {
                self.workflows.branch_improvement = tiers;
            }
        }

        if let Some(reminders) = patch.reminders {
            if let Some(profile) = reminders.legal {
                apply_profile_patch(&mut self.reminders.legal, profile);
            }
            if let Some(profile) = reminders.sla {
                apply_profile_patch(&mut self.reminders.sla, profile);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let log_level =
            read_env("FLEETDESK_LOGGING_LEVEL").or_else(|| read_env("FLEETDESK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }

        let log_format =
            read_env("FLEETDESK_LOGGING_FORMAT").or_else(|| read_env("FLEETDESK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "FLEETDESK_LOG_FORMAT".to_string(),
                    value: value.clone(),
                })?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in RecordKind::ALL {
            self.workflows.template_for(kind)?;
        }
        self.reminders.legal_table()?;
        self.reminders.sla_table()?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn apply_profile_patch(profile: &mut ThresholdProfileConfig, patch: ThresholdProfilePatch) {
    if let Some(expired_label) = patch.expired_label {
        profile.expired_label = expired_label;
    }
    if let Some(safe_label) = patch.safe_label {
        profile.safe_label = safe_label;
    }
    if let Some(buckets) = patch.buckets {
        profile.buckets = buckets;
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("fleetdesk.toml"), PathBuf::from("config/fleetdesk.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    workflows: Option<WorkflowsPatch>,
    reminders: Option<RemindersPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct WorkflowsPatch {
    vehicle_request: Option<Vec<TierConfig>>,
    building_asset: Option<Vec<TierConfig>>,
    sales_auction: Option<Vec<TierConfig>>,
    branch_improvement: Option<Vec<TierConfig>>,
}

#[derive(Debug, Default, Deserialize)]
struct RemindersPatch {
    legal: Option<ThresholdProfilePatch>,
    sla: Option<ThresholdProfilePatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ThresholdProfilePatch {
    expired_label: Option<String>,
    safe_label: Option<String>,
    buckets: Option<Vec<ReminderBucket>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use crate::domain::record::RecordKind;
    use crate::reminders::ReminderSeverity;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    #[test]
    fn defaults_pass_validation_and_cover_every_record_kind() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(&["FLEETDESK_LOG_LEVEL", "FLEETDESK_LOG_FORMAT"]);

        let config = AppConfig::default();
        config.validate().expect("defaults must validate");

        for kind in RecordKind::ALL {
            let template = config.workflows.template_for(kind).expect("valid template");
            assert!(!template.tiers().is_empty());
        }

        let legal = config.reminders.legal_table().expect("legal table");
        assert_eq!(legal.classify(45).severity, ReminderSeverity::Attention);
        let sla = config.reminders.sla_table().expect("sla table");
        assert_eq!(sla.classify(45).severity, ReminderSeverity::Warning);
    }

    #[test]
    fn file_patch_replaces_a_single_workflow_tier_table() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(&["FLEETDESK_LOG_LEVEL", "FLEETDESK_LOG_FORMAT"]);

        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("fleetdesk.toml");
        fs::write(
            &path,
            r#"
[[workflows.sales_auction]]
level = 1
approver = "AVP"
sla_days = 2

[[workflows.sales_auction]]
level = 2
approver_kind = "user"
approver = "company.owner"
sla_days = 4

[logging]
level = "warn"
"#,
        )
        .expect("write config file");

        let config =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                .expect("config load");

        let template =
            config.workflows.template_for(RecordKind::SalesAuction).expect("valid template");
        assert_eq!(template.tiers()[0].approver, "AVP");
        assert_eq!(template.tiers()[0].sla_days, 2);
        assert_eq!(config.logging.level, "warn");

        let untouched =
            config.workflows.template_for(RecordKind::VehicleRequest).expect("valid template");
        assert_eq!(untouched.tiers().len(), 4);
    }

    #[test]
    fn duplicate_tier_levels_in_a_patch_fail_validation() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(&["FLEETDESK_LOG_LEVEL", "FLEETDESK_LOG_FORMAT"]);

        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("fleetdesk.toml");
        fs::write(
            &path,
            r#"
[[workflows.vehicle_request]]
level = 1
approver = "Branch Manager"
sla_days = 3

[[workflows.vehicle_request]]
level = 1
approver = "Regional Manager"
sla_days = 3
"#,
        )
        .expect("write config file");

        let error =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                .expect_err("duplicate levels must fail");
        assert!(matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("workflows.vehicle_request")
        ));
    }

    #[test]
    fn reminder_bucket_patch_feeds_the_classifier() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(&["FLEETDESK_LOG_LEVEL", "FLEETDESK_LOG_FORMAT"]);

        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("fleetdesk.toml");
        fs::write(
            &path,
            r#"
[reminders.sla]
expired_label = "Past Due"

[[reminders.sla.buckets]]
max_days = 7
severity = "critical"
label = "This Week"

[[reminders.sla.buckets]]
max_days = 30
severity = "warning"
label = "This Month"
"#,
        )
        .expect("write config file");

        let config =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                .expect("config load");

        let table = config.reminders.sla_table().expect("sla table");
        assert_eq!(table.classify(-1).label, "Past Due");
        assert_eq!(table.classify(7).severity, ReminderSeverity::Critical);
        assert_eq!(table.classify(8).severity, ReminderSeverity::Warning);
    }

    #[test]
    fn env_and_explicit_overrides_take_precedence_over_defaults() {
        let _guard = env_lock().lock().expect("env lock");

        env::set_var("FLEETDESK_LOG_LEVEL", "debug");
        env::set_var("FLEETDESK_LOG_FORMAT", "json");

        let result = (|| {
            let config = AppConfig::load(LoadOptions::default())?;
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.logging.format, LogFormat::Json);

            let config = AppConfig::load(LoadOptions {
                overrides: ConfigOverrides {
                    log_level: Some("error".to_string()),
                    log_format: Some(LogFormat::Pretty),
                },
                ..LoadOptions::default()
            })?;
            assert_eq!(config.logging.level, "error");
            assert_eq!(config.logging.format, LogFormat::Pretty);
            Ok::<(), ConfigError>(())
        })();

        clear_vars(&["FLEETDESK_LOG_LEVEL", "FLEETDESK_LOG_FORMAT"]);
        result.expect("load with overrides");
    }

    #[test]
    fn invalid_log_level_fails_validation() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(&["FLEETDESK_LOG_LEVEL", "FLEETDESK_LOG_FORMAT"]);

        let error = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                log_level: Some("verbose".to_string()),
                log_format: None,
            },
            ..LoadOptions::default()
        })
        .expect_err("unknown level must fail");
        assert!(matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("logging.level")
        ));
    }

    #[test]
    fn missing_required_file_is_reported() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(&["FLEETDESK_LOG_LEVEL", "FLEETDESK_LOG_FORMAT"]);

        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("absent.toml");
        let error = AppConfig::load(LoadOptions {
            config_path: Some(path.clone()),
            require_file: true,
            ..LoadOptions::default()
        })
        .expect_err("missing required file must fail");
        assert!(matches!(error, ConfigError::MissingConfigFile(ref missing) if *missing == path));
    }
}
