// AlumnosAdmin - app/session.rs
//
// Session persistence: the last search term and filter, restored with
// `--resume` so a user can pick up the view they left.
//
// - Saved atomically; a crash during save keeps the previous session.
// - Load errors are logged and discarded; the caller starts fresh.
// - Records are NOT persisted. They are always re-fetched from the store.

use crate::core::filter::{FilterSpec, RawFilterSpec, SearchQuery};
use crate::platform::fs::write_atomic;
use crate::util::constants::SESSION_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version stamp. Version mismatches silently discard the session.
pub const SESSION_VERSION: u32 = 1;

/// Complete persistent session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Schema version; must equal `SESSION_VERSION` to be accepted.
    pub version: u32,

    /// Free-text search term.
    #[serde(default)]
    pub term: String,

    /// Facet filter in its untyped form. Re-validated on restore.
    pub filter: RawFilterSpec,
}

impl SessionData {
    pub fn from_query(query: &SearchQuery) -> Self {
        Self {
            version: SESSION_VERSION,
            term: query.term.clone(),
            filter: query.spec.to_raw(),
        }
    }

    /// Rebuild the query. Returns `None` if the saved filter no longer
    /// validates.
    pub fn to_query(&self) -> Option<SearchQuery> {
        match FilterSpec::from_raw(&self.filter) {
            Ok(spec) => Some(SearchQuery::new(self.term.clone(), spec)),
            Err(e) => {
                tracing::warn!(error = %e, "Saved filter is invalid; starting fresh");
                None
            }
        }
    }
}

/// Resolve the session file path from the platform data directory.
pub fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE_NAME)
}

/// Save `data` to `path` atomically.
///
/// Returns a descriptive error string suitable for a tracing warn! call;
/// callers log it and carry on.
pub fn save(data: &SessionData, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| format!("failed to serialise session: {e}"))?;

    write_atomic(path, json.as_bytes())
        .map_err(|e| format!("failed to write session file '{}': {e}", path.display()))?;

    tracing::debug!(path = %path.display(), "Session saved");
    Ok(())
}

/// Load and validate a `SessionData` from `path`.
///
/// Returns `None` on any error (file not found, JSON parse failure,
/// version mismatch).
pub fn load(path: &Path) -> Option<SessionData> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read session file");
            }
        })
        .ok()?;

    let data: SessionData = serde_json::from_str(&content)
        .map_err(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Session file is malformed, starting fresh"
            );
        })
        .ok()?;

    if data.version != SESSION_VERSION {
        tracing::warn!(
            found = data.version,
            expected = SESSION_VERSION,
            "Session file version mismatch, starting fresh"
        );
        return None;
    }

    tracing::info!(path = %path.display(), "Session file loaded");
    Some(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Disponibilidad, Status};
    use tempfile::TempDir;

    fn sample_query() -> SearchQuery {
        SearchQuery::new(
            "garcía",
            FilterSpec::default()
                .with_status(Status::LeadCaliente)
                .with_disponibilidad(Disponibilidad::Manana)
                .with_pais("España")
                .with_edad(18, 30),
        )
    }

    #[test]
    fn test_session_save_load_restores_query() {
        let dir = TempDir::new().unwrap();
        let path = session_path(dir.path());
        let query = sample_query();

        save(&SessionData::from_query(&query), &path).expect("save should succeed");
        let loaded = load(&path).expect("load should return Some after valid save");

        assert_eq!(loaded.version, SESSION_VERSION);
        assert_eq!(loaded.to_query(), Some(query));
    }

    #[test]
    fn test_session_load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("nonexistent.json")).is_none());
    }

    #[test]
    fn test_session_load_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not valid json {{{{").unwrap();
        assert!(load(&path).is_none());
    }

    #[test]
    fn test_session_load_wrong_version_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut data = SessionData::from_query(&sample_query());
        data.version = 99;
        save(&data, &path).unwrap();
        assert!(load(&path).is_none());
    }

    #[test]
    fn test_invalid_saved_filter_is_discarded() {
        let mut data = SessionData::from_query(&SearchQuery::default());
        data.filter.edad = Some(["treinta".to_string(), "10".to_string()]);
        assert_eq!(data.to_query(), None);

        data.filter = RawFilterSpec::unconstrained();
        data.filter.sexo = None;
        assert_eq!(data.to_query(), None);
    }

    /// A leftover temp file from a crashed save must not block the next save.
    #[test]
    fn test_session_save_over_stale_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        save(&SessionData::from_query(&SearchQuery::default()), &path).unwrap();

        std::fs::write(dir.path().join("session.json.tmp"), b"garbage").unwrap();

        save(&SessionData::from_query(&sample_query()), &path).unwrap();
        assert_eq!(load(&path).unwrap().term, "garcía");
    }
}
