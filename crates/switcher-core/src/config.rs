//! Configuration file loading and validation
//!
//! The config file is JSON. A missing file is created with default values;
//! anything malformed is a hard error, since running with a profile string
//! the external tool would silently reject is worse than not running.

use crate::targets::TargetSet;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Default config file name, resolved against the working directory
pub const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_AFTERBURNER_PATH: &str =
    r"C:\Program Files (x86)\MSI Afterburner\MSIAfterburner.exe";

const PROFILE_PREFIX: &str = "-Profile";
const PROFILE_MIN: i64 = 1;
const PROFILE_MAX: i64 = 5;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot open config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not parse config file {path}. Please check for JSON syntax errors like a missing comma or quote. Details: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Configuration error in '{field}'. A valid profile must be like \"-ProfileN\" where N is a number from 1 to 5. Details: {reason}")]
    InvalidProfile {
        field: &'static str,
        reason: ProfileError,
    },
    #[error("Configuration error in 'overrides' for target {target:?}. The profile must be like \"-ProfileN\" (where N is 1-5) or an empty string \"\" to use the default 'On' profile. Details: {reason}")]
    InvalidOverride { target: String, reason: ProfileError },
    #[error("Configuration error: 'monitoring_mode' must be either \"poll\" or \"event\", but found {0:?}")]
    InvalidMode(String),
    #[error("Configuration error: 'delay_seconds' must be at least 1, but found {0}")]
    InvalidDelay(i64),
    #[error("Configuration error in 'overrides': target keywords must not be empty")]
    EmptyTarget,
    #[error("Configuration error in 'overrides': target {0:?} is listed more than once (keywords are case-insensitive)")]
    DuplicateTarget(String),
}

/// Why a profile string was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile must not be empty")]
    Empty,
    #[error("invalid profile format: {0:?} (must start with \"-Profile\")")]
    MissingPrefix(String),
    #[error("invalid profile format: {0:?} (missing number after prefix)")]
    MissingNumber(String),
    #[error("invalid profile number: {0:?} (the part after \"-Profile\" is not a valid integer)")]
    NotANumber(String),
    #[error("invalid profile number: {profile:?} (number {number} is out of the valid range of 1-5)")]
    OutOfRange { profile: String, number: i64 },
}

/// Check a profile argument against the `-ProfileN` grammar, N in 1..=5.
///
/// The empty string is accepted: in overrides it means "use the on-profile".
pub fn validate_profile(profile: &str) -> Result<(), ProfileError> {
    if profile.is_empty() {
        return Ok(());
    }
    let Some(number) = profile.strip_prefix(PROFILE_PREFIX) else {
        return Err(ProfileError::MissingPrefix(profile.to_string()));
    };
    if number.is_empty() {
        return Err(ProfileError::MissingNumber(profile.to_string()));
    }
    let number: i64 = number
        .parse()
        .map_err(|_| ProfileError::NotANumber(profile.to_string()))?;
    if !(PROFILE_MIN..=PROFILE_MAX).contains(&number) {
        return Err(ProfileError::OutOfRange {
            profile: profile.to_string(),
            number,
        });
    }
    Ok(())
}

fn validate_required_profile(field: &'static str, profile: &str) -> Result<(), ConfigError> {
    if profile.is_empty() {
        return Err(ConfigError::InvalidProfile {
            field,
            reason: ProfileError::Empty,
        });
    }
    validate_profile(profile).map_err(|reason| ConfigError::InvalidProfile { field, reason })
}

/// How the scheduler is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitoringMode {
    /// Re-evaluate on a fixed timer
    Poll,
    /// Re-evaluate whenever the OS reports a window change
    Event,
}

impl MonitoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonitoringMode::Poll => "poll",
            MonitoringMode::Event => "event",
        }
    }
}

impl FromStr for MonitoringMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "poll" => Ok(MonitoringMode::Poll),
            "event" => Ok(MonitoringMode::Event),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for MonitoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The config file exactly as written on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawConfig {
    pub afterburner_path: String,
    pub profile_on: String,
    pub profile_off: String,
    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: i64,
    pub monitoring_mode: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub notifications: bool,
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

fn default_delay_seconds() -> i64 {
    5
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            afterburner_path: DEFAULT_AFTERBURNER_PATH.to_string(),
            profile_on: "-Profile2".to_string(),
            profile_off: "-Profile1".to_string(),
            delay_seconds: default_delay_seconds(),
            monitoring_mode: MonitoringMode::Event.to_string(),
            notifications: false,
            overrides: BTreeMap::new(),
        }
    }
}

/// Older config files spell booleans as strings ("true"/"false")
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.trim().to_lowercase().as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(D::Error::custom(format!(
                "expected true or false, found {:?}",
                other
            ))),
        },
    }
}

/// A validated, immutable view of the configuration.
///
/// Reloads build a fresh snapshot and swap it in whole; nothing mutates one
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSnapshot {
    pub afterburner_path: PathBuf,
    pub profile_on: String,
    pub profile_off: String,
    pub delay: Duration,
    pub monitoring_mode: MonitoringMode,
    pub notifications: bool,
    pub targets: TargetSet,
}

impl TryFrom<RawConfig> for ConfigSnapshot {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        validate_required_profile("profile_on", &raw.profile_on)?;
        validate_required_profile("profile_off", &raw.profile_off)?;
        let monitoring_mode: MonitoringMode = raw.monitoring_mode.parse()?;
        if raw.delay_seconds < 1 {
            return Err(ConfigError::InvalidDelay(raw.delay_seconds));
        }

        let mut targets = TargetSet::new();
        for (target, profile) in &raw.overrides {
            if target.trim().is_empty() {
                return Err(ConfigError::EmptyTarget);
            }
            validate_profile(profile).map_err(|reason| ConfigError::InvalidOverride {
                target: target.clone(),
                reason,
            })?;
            if !targets.insert(target, profile) {
                return Err(ConfigError::DuplicateTarget(target.to_lowercase()));
            }
        }

        Ok(Self {
            afterburner_path: PathBuf::from(raw.afterburner_path),
            profile_on: raw.profile_on,
            profile_off: raw.profile_off,
            delay: Duration::from_secs(raw.delay_seconds as u64),
            monitoring_mode,
            notifications: raw.notifications,
            targets,
        })
    }
}

impl ConfigSnapshot {
    /// Parse and validate config file contents. `path` is only used in errors.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        raw.try_into()
    }
}

/// Read and validate the config at `path`, creating it with defaults first if
/// it does not exist.
pub fn load_or_create(path: &Path) -> Result<ConfigSnapshot, ConfigError> {
    if !path.exists() {
        info!(
            "Configuration file not found. Creating {} with default values.",
            path.display()
        );
        let raw = write_default(path)?;
        return raw.try_into();
    }
    load(path)
}

/// Read and validate the config at `path`; a missing file is an error
pub fn load(path: &Path) -> Result<ConfigSnapshot, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ConfigSnapshot::parse(&contents, path)
}

/// Write the default config to `path`, four-space indented
pub fn write_default(path: &Path) -> Result<RawConfig, ConfigError> {
    let raw = RawConfig::default();
    let write_err = |source: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    raw.serialize(&mut ser)
        .map_err(|e| write_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    buf.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, buf).map_err(write_err)?;
    Ok(raw)
}

/// Where the scheduler gets a fresh snapshot from on every cycle
pub trait ConfigSource: Send {
    fn load(&self) -> Result<ConfigSnapshot, ConfigError>;
}

/// Loads the config from a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileConfig {
    path: PathBuf,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<ConfigSnapshot, ConfigError> {
        load_or_create(&self.path)
    }
}

impl<F> ConfigSource for F
where
    F: Fn() -> Result<ConfigSnapshot, ConfigError> + Send,
{
    fn load(&self) -> Result<ConfigSnapshot, ConfigError> {
        self()
    }
}

/// Log fields that changed between two snapshots
pub(crate) fn log_changes(old: &ConfigSnapshot, new: &ConfigSnapshot) {
    if old.monitoring_mode != new.monitoring_mode {
        warn!(
            "monitoring_mode changed from {} to {}; restart to switch modes",
            old.monitoring_mode, new.monitoring_mode
        );
    }
    if old.targets != new.targets {
        info!("Targets reloaded ({} configured)", new.targets.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "afterburner_path": "C:\\Tools\\MSIAfterburner.exe",
            "profile_on": "-Profile2",
            "profile_off": "-Profile1",
            "delay_seconds": 3,
            "monitoring_mode": "Poll",
            "overrides": {
                "Discord": "",
                "cyberpunk": "-Profile3"
            }
        }"#
    }

    #[test]
    fn test_profile_validator_accepts() {
        for p in ["", "-Profile1", "-Profile2", "-Profile3", "-Profile4", "-Profile5"] {
            assert!(validate_profile(p).is_ok(), "{p:?} should be valid");
        }
    }

    #[test]
    fn test_profile_validator_rejects() {
        assert!(matches!(
            validate_profile("-Profile0"),
            Err(ProfileError::OutOfRange { number: 0, .. })
        ));
        assert!(matches!(
            validate_profile("-Profile6"),
            Err(ProfileError::OutOfRange { number: 6, .. })
        ));
        assert!(matches!(
            validate_profile("Profile3"),
            Err(ProfileError::MissingPrefix(_))
        ));
        assert!(matches!(
            validate_profile("-ProfileX"),
            Err(ProfileError::NotANumber(_))
        ));
        assert!(matches!(
            validate_profile("-Profile"),
            Err(ProfileError::MissingNumber(_))
        ));
    }

    #[test]
    fn test_parse_valid_config() {
        let snapshot = ConfigSnapshot::parse(sample_json(), Path::new("config.json")).unwrap();
        assert_eq!(snapshot.monitoring_mode, MonitoringMode::Poll);
        assert_eq!(snapshot.delay, Duration::from_secs(3));
        assert!(!snapshot.notifications);
        assert!(snapshot.targets.contains("discord"));
        assert_eq!(snapshot.targets.override_for("discord"), None);
        assert_eq!(snapshot.targets.override_for("cyberpunk"), Some("-Profile3"));
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let json = sample_json().replace("\"Poll\"", "\"sometimes\"");
        let err = ConfigSnapshot::parse(&json, Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMode(m) if m == "sometimes"));
    }

    #[test]
    fn test_empty_on_profile_rejected() {
        let json = sample_json().replace("\"profile_on\": \"-Profile2\"", "\"profile_on\": \"\"");
        let err = ConfigSnapshot::parse(&json, Path::new("config.json")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidProfile { field: "profile_on", reason: ProfileError::Empty }
        ));
    }

    #[test]
    fn test_bad_override_rejected() {
        let json = sample_json().replace("\"-Profile3\"", "\"-Profile9\"");
        let err = ConfigSnapshot::parse(&json, Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride { target, .. } if target == "cyberpunk"));
    }

    #[test]
    fn test_zero_delay_rejected() {
        let json = sample_json().replace("\"delay_seconds\": 3", "\"delay_seconds\": 0");
        let err = ConfigSnapshot::parse(&json, Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDelay(0)));
    }

    #[test]
    fn test_duplicate_keywords_rejected() {
        let json = sample_json().replace("\"cyberpunk\"", "\"DISCORD\"");
        let err = ConfigSnapshot::parse(&json, Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTarget(k) if k == "discord"));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = ConfigSnapshot::parse("{ \"profile_on\": ", Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_notifications_accepts_strings() {
        let json = sample_json().replace(
            "\"delay_seconds\": 3,",
            "\"delay_seconds\": 3, \"notifications\": \"True\",",
        );
        let snapshot = ConfigSnapshot::parse(&json, Path::new("config.json")).unwrap();
        assert!(snapshot.notifications);

        let json = sample_json().replace(
            "\"delay_seconds\": 3,",
            "\"delay_seconds\": 3, \"notifications\": \"maybe\",",
        );
        assert!(ConfigSnapshot::parse(&json, Path::new("config.json")).is_err());
    }

    #[test]
    fn test_missing_file_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let snapshot = load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(snapshot.profile_on, "-Profile2");
        assert_eq!(snapshot.profile_off, "-Profile1");
        assert_eq!(snapshot.monitoring_mode, MonitoringMode::Event);
        assert_eq!(snapshot.delay, Duration::from_secs(5));
        assert!(snapshot.targets.is_empty());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n    \"afterburner_path\""));

        // A second load reads the file it just wrote
        let reloaded = load_or_create(&path).unwrap();
        assert_eq!(reloaded, snapshot);
    }

    #[test]
    fn test_load_without_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert!(matches!(load(&path), Err(ConfigError::Read { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_file_config_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, sample_json()).unwrap();

        let source = FileConfig::new(&path);
        let snapshot = source.load().unwrap();
        assert_eq!(snapshot.targets.len(), 2);
    }
}
