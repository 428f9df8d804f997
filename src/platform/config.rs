// AlumnosAdmin - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved platform paths for AlumnosAdmin data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/alumnosadmin/ or %APPDATA%\AlumnosAdmin\config\)
    pub config_dir: PathBuf,

    /// Data directory for the session file.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file works with an
/// older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub api: ApiSection,
    pub filter: FilterSection,
    pub export: ExportSection,
    pub logging: LoggingSection,
}

/// `[api]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Backend base URL, e.g. "http://localhost:8080".
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// `[filter]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// Lower age bound used when the CLI does not give one.
    pub default_age_min: Option<i32>,
    /// Upper age bound used when the CLI does not give one.
    pub default_age_max: Option<i32>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Directory for exports written without an explicit `--output`.
    pub directory: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- API --
    pub api_base_url: String,
    pub http_timeout: Duration,

    // -- Filter --
    pub default_age_min: i32,
    pub default_age_max: i32,

    // -- Export --
    /// None = current directory.
    pub export_dir: Option<PathBuf>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: constants::DEFAULT_API_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(constants::DEFAULT_HTTP_TIMEOUT_SECS),
            default_age_min: constants::DEFAULT_AGE_MIN,
            default_age_max: constants::DEFAULT_AGE_MAX,
            export_dir: None,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` at `config_path`.
///
/// A missing file yields defaults with no warnings (first run). Read or
/// parse failures yield defaults plus a warning; the application still
/// starts but the user is told.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match load_config_file(config_path) {
        Ok(result) => result,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Read and validate a config file that must exist.
///
/// Used for an explicit `--config PATH`, where a broken file is an error
/// rather than something to fall back from.
pub fn load_config_file(config_path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    Ok(validate_raw(&raw))
}

fn out_of_range(field: &str, value: impl ToString, expected: String) -> String {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
    .to_string()
}

/// Validate each field against named constants, accumulating every problem.
pub fn validate_raw(raw: &RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- API: base_url --
    if let Some(ref url) = raw.api.base_url {
        let trimmed = url.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            config.api_base_url = trimmed.trim_end_matches('/').to_string();
        } else {
            warnings.push(out_of_range(
                "[api] base_url",
                url,
                format!(
                    "an http:// or https:// URL. Using default ({})",
                    constants::DEFAULT_API_BASE_URL
                ),
            ));
        }
    }

    // -- API: timeout_secs --
    if let Some(secs) = raw.api.timeout_secs {
        if (constants::MIN_HTTP_TIMEOUT_SECS..=constants::MAX_HTTP_TIMEOUT_SECS).contains(&secs) {
            config.http_timeout = Duration::from_secs(secs);
        } else {
            warnings.push(out_of_range(
                "[api] timeout_secs",
                secs,
                format!(
                    "{}-{}. Using default ({})",
                    constants::MIN_HTTP_TIMEOUT_SECS,
                    constants::MAX_HTTP_TIMEOUT_SECS,
                    constants::DEFAULT_HTTP_TIMEOUT_SECS,
                ),
            ));
        }
    }

    // -- Filter: default age bounds --
    let age_ok = |age: i32| (0..=constants::ABSOLUTE_MAX_AGE).contains(&age);
    let mut min = constants::DEFAULT_AGE_MIN;
    let mut max = constants::DEFAULT_AGE_MAX;
    if let Some(v) = raw.filter.default_age_min {
        if age_ok(v) {
            min = v;
        } else {
            warnings.push(out_of_range(
                "[filter] default_age_min",
                v,
                format!(
                    "0-{}. Using default ({})",
                    constants::ABSOLUTE_MAX_AGE,
                    constants::DEFAULT_AGE_MIN
                ),
            ));
        }
    }
    if let Some(v) = raw.filter.default_age_max {
        if age_ok(v) {
            max = v;
        } else {
            warnings.push(out_of_range(
                "[filter] default_age_max",
                v,
                format!(
                    "0-{}. Using default ({})",
                    constants::ABSOLUTE_MAX_AGE,
                    constants::DEFAULT_AGE_MAX
                ),
            ));
        }
    }
    if min <= max {
        config.default_age_min = min;
        config.default_age_max = max;
    } else {
        warnings.push(format!(
            "[filter] default_age_min ({min}) is greater than default_age_max ({max}). \
             Using defaults ({}-{}).",
            constants::DEFAULT_AGE_MIN,
            constants::DEFAULT_AGE_MAX,
        ));
    }

    // -- Export: directory --
    if let Some(ref dir) = raw.export.directory {
        if !dir.trim().is_empty() {
            config.export_dir = Some(PathBuf::from(dir.trim()));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(toml_text: &str) -> (AppConfig, Vec<String>) {
        let raw: RawConfig = toml::from_str(toml_text).unwrap();
        validate_raw(&raw)
    }

    #[test]
    fn test_empty_config_is_default() {
        let (config, warnings) = parse("");
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_values_are_applied() {
        let (config, warnings) = parse(
            r#"
            [api]
            base_url = "https://api.example.org/"
            timeout_secs = 30

            [filter]
            default_age_min = 18
            default_age_max = 65

            [export]
            directory = "/tmp/exports"

            [logging]
            level = "DEBUG"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.api_base_url, "https://api.example.org");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!((config.default_age_min, config.default_age_max), (18, 65));
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/exports")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_warn_and_fall_back() {
        let (config, warnings) = parse(
            r#"
            [api]
            base_url = "localhost:8080"
            timeout_secs = 0

            [filter]
            default_age_min = 70
            default_age_max = 20

            [logging]
            level = "verbose"
            "#,
        );
        assert_eq!(warnings.len(), 4, "{warnings:?}");
        assert_eq!(config.api_base_url, constants::DEFAULT_API_BASE_URL);
        assert_eq!(config.default_age_min, constants::DEFAULT_AGE_MIN);
        assert_eq!(config.default_age_max, constants::DEFAULT_AGE_MAX);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (_, warnings) = parse("[ui]\ntheme = \"dark\"\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_file_is_silent_default() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unparseable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let (config, warnings) = load_config(&path);
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);

        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::TomlParse { .. })
        ));
    }
}
