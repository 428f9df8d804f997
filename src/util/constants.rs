// AlumnosAdmin - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// Config values are validated against the ranges defined here.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "AlumnosAdmin";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "AlumnosAdmin";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Remote record store
// =============================================================================

/// Base URL of the backend REST API when neither config nor CLI override it.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Collection path for alumno records, relative to the API base URL.
pub const ALUMNOS_PATH: &str = "alumnos";

/// Country catalogue path, relative to the API base URL.
pub const PAISES_PATH: &str = "paises";

/// Province catalogue path; the country id is appended as a path segment.
pub const PROVINCIAS_PATH: &str = "provincias";

/// Default timeout for a single HTTP request, connect to last body byte.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Minimum user-configurable HTTP timeout.
pub const MIN_HTTP_TIMEOUT_SECS: u64 = 1;

/// Maximum user-configurable HTTP timeout.
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 300;

/// Maximum size of an offline JSON snapshot file.
/// A snapshot this large is almost certainly not a record list.
pub const MAX_SNAPSHOT_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MB

// =============================================================================
// Filtering
// =============================================================================

/// Lower bound of the default age range (inclusive).
pub const DEFAULT_AGE_MIN: i32 = 0;

/// Upper bound of the default age range (inclusive).
pub const DEFAULT_AGE_MAX: i32 = 100;

/// Largest age bound accepted from config. Bounds beyond this are a typo.
pub const ABSOLUTE_MAX_AGE: i32 = 150;

/// Age reported for records whose birth date is absent or unparsable.
pub const FALLBACK_AGE: i32 = 0;

// =============================================================================
// Statistics
// =============================================================================

/// Width in years of each bucket in the age distribution.
pub const DEFAULT_AGE_BAND_WIDTH: i32 = 10;

/// Label used for records with a blank categorical field.
pub const UNSPECIFIED_LABEL: &str = "Sin especificar";

/// Maximum bar length (in characters) of the text bar chart.
pub const CHART_BAR_WIDTH: usize = 40;

// =============================================================================
// Export
// =============================================================================

/// Maximum number of records that can be exported in a single operation.
pub const MAX_EXPORT_RECORDS: usize = 100_000;

/// File stem used when no export path is given.
pub const DEFAULT_EXPORT_STEM: &str = "Alumnos";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in config.toml.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Session persistence file name (stored in the platform data directory).
pub const SESSION_FILE_NAME: &str = "session.json";
