// AlumnosAdmin - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all AlumnosAdmin operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum AlumnosError {
    /// Filter specification was rejected.
    Filter(FilterError),

    /// The record store (remote API or snapshot file) failed.
    Store(StoreError),

    /// A record draft failed validation before being sent to the store.
    Validation(ValidationError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Invalid command-line input that clap cannot check on its own.
    Usage(String),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for AlumnosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Store(e) => write!(f, "Store error: {e}"),
            Self::Validation(e) => write!(f, "Validation error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Usage(msg) => write!(f, "{msg}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for AlumnosError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Validation(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Usage(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to filter operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The filter specification is malformed. Raised before any record is
    /// evaluated, so a failed filter never yields a partial result.
    InvalidSpec(SpecDefect),
}

/// What exactly is wrong with a rejected filter specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecDefect {
    /// A facet key is absent from the raw specification.
    MissingFacet { facet: &'static str },

    /// The age range is absent from the raw specification.
    MissingAgeRange,

    /// An age bound could not be read as an integer.
    NonNumericAgeBound { bound: &'static str, value: String },

    /// A facet is constrained to the empty string, which would silently
    /// exclude every record with a non-blank value.
    EmptyFacetValue { facet: &'static str },

    /// Lower age bound is greater than the upper bound.
    InvertedAgeRange { min: i32, max: i32 },
}

impl fmt::Display for SpecDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFacet { facet } => write!(f, "missing facet '{facet}'"),
            Self::MissingAgeRange => write!(f, "missing age range"),
            Self::NonNumericAgeBound { bound, value } => {
                write!(f, "age bound '{bound}' is not an integer: '{value}'")
            }
            Self::EmptyFacetValue { facet } => write!(
                f,
                "facet '{facet}' is constrained to an empty value; leave it unconstrained instead"
            ),
            Self::InvertedAgeRange { min, max } => {
                write!(f, "age range is inverted ({min} > {max})")
            }
        }
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSpec(defect) => write!(f, "Invalid filter specification: {defect}"),
        }
    }
}

impl std::error::Error for FilterError {}

impl From<FilterError> for AlumnosError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors related to the record store.
#[derive(Debug)]
pub enum StoreError {
    /// Transport failure or undecodable response from the remote API.
    Http { url: String, source: ureq::Error },

    /// The remote API answered with a non-success status code.
    Status { url: String, status: u16 },

    /// No record with the given id exists.
    NotFound { id: String },

    /// The named country is not in the catalogue.
    UnknownCountry { name: String },

    /// The snapshot file is larger than the configured maximum.
    SnapshotTooLarge { path: PathBuf, size: u64, max: u64 },

    /// I/O error reading or writing a snapshot file.
    Io { path: PathBuf, source: io::Error },

    /// A snapshot file is not a valid JSON record list.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { url, source } => write!(f, "Request to '{url}' failed: {source}"),
            Self::Status { url, status } => {
                write!(f, "Request to '{url}' returned HTTP {status}")
            }
            Self::NotFound { id } => write!(f, "No alumno with id '{id}'"),
            Self::UnknownCountry { name } => {
                write!(f, "Country '{name}' is not in the catalogue")
            }
            Self::SnapshotTooLarge { path, size, max } => write!(
                f,
                "Snapshot '{}' is {size} bytes, exceeds maximum of {max} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "Snapshot I/O error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "Snapshot '{}' is not valid JSON: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<StoreError> for AlumnosError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Why a single field of a draft was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// Required field is blank.
    Missing,
    /// Field is present but not in the expected shape (email, date).
    Malformed,
    /// Enumerated field holds a value outside its canonical set.
    NotCanonical,
}

/// A rejected draft field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Wire name of the field (e.g. "fechaNacimiento").
    pub field: &'static str,
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.kind {
            IssueKind::Missing => "is required",
            IssueKind::Malformed => "is malformed",
            IssueKind::NotCanonical => "is not one of the accepted values",
        };
        write!(f, "'{}' {reason}", self.field)
    }
}

/// A record draft failed validation. Lists every offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// True if `field` is among the rejected fields.
    pub fn has_issue(&self, field: &str, kind: IssueKind) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.field == field && issue.kind == kind)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for AlumnosError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum record count.
    TooManyRecords { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::TooManyRecords { count, max } => write!(
                f,
                "Export of {count} records exceeds maximum of {max}. \
                 Apply filters to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for AlumnosError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for AlumnosError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for AlumnosAdmin results.
pub type Result<T> = std::result::Result<T, AlumnosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_spec_message_names_the_facet() {
        let err = FilterError::InvalidSpec(SpecDefect::MissingFacet { facet: "sexo" });
        assert!(err.to_string().contains("'sexo'"));
    }

    #[test]
    fn test_validation_error_lists_every_issue() {
        let err = ValidationError {
            issues: vec![
                FieldIssue {
                    field: "nombre",
                    kind: IssueKind::Missing,
                },
                FieldIssue {
                    field: "email",
                    kind: IssueKind::Malformed,
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("'nombre' is required"));
        assert!(msg.contains("'email' is malformed"));
        assert!(err.has_issue("email", IssueKind::Malformed));
        assert!(!err.has_issue("email", IssueKind::Missing));
    }

    #[test]
    fn test_top_level_error_preserves_source_chain() {
        use std::error::Error;
        let err: AlumnosError = ExportError::TooManyRecords { count: 10, max: 5 }.into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Export error:"));
    }
}
