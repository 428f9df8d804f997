// AlumnosAdmin - app/store.rs
//
// Record store: where alumno records live.
//
// Two implementations behind one trait:
//   - `HttpStore` talks to the backend REST API (blocking ureq agent).
//   - `JsonFileStore` reads and writes a local JSON snapshot, for offline
//     work and for tests.
//
// The filter engine never sees a store; callers fetch first and then
// filter synchronously.

use crate::core::model::{Alumno, Pais, Provincia, RecordId};
use crate::platform::fs::write_atomic;
use crate::util::constants::{
    ALUMNOS_PATH, MAX_SNAPSHOT_FILE_SIZE, PAISES_PATH, PROVINCIAS_PATH,
};
use crate::util::error::StoreError;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;

/// CRUD and catalogue access to alumno records.
pub trait RecordStore {
    /// All records, in the order the store returns them.
    fn list(&self) -> Result<Vec<Alumno>, StoreError>;

    fn get(&self, id: &RecordId) -> Result<Alumno, StoreError>;

    /// Store a new record. The store assigns the id; any id on `draft` is ignored.
    fn create(&self, draft: &Alumno) -> Result<Alumno, StoreError>;

    fn update(&self, id: &RecordId, alumno: &Alumno) -> Result<Alumno, StoreError>;

    fn delete(&self, id: &RecordId) -> Result<(), StoreError>;

    /// Country catalogue.
    fn countries(&self) -> Result<Vec<Pais>, StoreError>;

    /// Provinces of the country with the given catalogue id.
    fn provinces(&self, country_id: &RecordId) -> Result<Vec<Provincia>, StoreError>;
}

// =============================================================================
// HttpStore
// =============================================================================

/// Client for the backend REST API.
pub struct HttpStore {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpStore {
    /// `base_url` without the collection path, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: config.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    fn map_err(url: &str, e: ureq::Error) -> StoreError {
        match e {
            ureq::Error::StatusCode(status) => StoreError::Status {
                url: url.to_string(),
                status,
            },
            other => StoreError::Http {
                url: url.to_string(),
                source: other,
            },
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, StoreError> {
        tracing::debug!(url = %url, "GET");
        self.agent
            .get(url)
            .call()
            .and_then(|mut resp| resp.body_mut().read_json::<T>())
            .map_err(|e| Self::map_err(url, e))
    }
}

impl RecordStore for HttpStore {
    fn list(&self) -> Result<Vec<Alumno>, StoreError> {
        let url = self.url(&[ALUMNOS_PATH]);
        let records: Vec<Alumno> = self.get_json(&url)?;
        tracing::info!(records = records.len(), "Fetched alumnos");
        Ok(records)
    }

    fn get(&self, id: &RecordId) -> Result<Alumno, StoreError> {
        let id_text = id.to_string();
        let url = self.url(&[ALUMNOS_PATH, &id_text]);
        self.get_json(&url).map_err(|e| match e {
            StoreError::Status { status: 404, .. } => StoreError::NotFound { id: id_text.clone() },
            other => other,
        })
    }

    fn create(&self, draft: &Alumno) -> Result<Alumno, StoreError> {
        let url = self.url(&[ALUMNOS_PATH]);
        let payload = Alumno {
            id: None,
            ..draft.clone()
        };
        tracing::debug!(url = %url, "POST");
        let created: Alumno = self
            .agent
            .post(&url)
            .send_json(&payload)
            .and_then(|mut resp| resp.body_mut().read_json::<Alumno>())
            .map_err(|e| Self::map_err(&url, e))?;
        tracing::info!(id = %created.id_label(), "Alumno created");
        Ok(created)
    }

    fn update(&self, id: &RecordId, alumno: &Alumno) -> Result<Alumno, StoreError> {
        let id_text = id.to_string();
        let url = self.url(&[ALUMNOS_PATH, &id_text]);
        tracing::debug!(url = %url, "PUT");
        let updated: Alumno = self
            .agent
            .put(&url)
            .send_json(alumno)
            .and_then(|mut resp| resp.body_mut().read_json::<Alumno>())
            .map_err(|e| match Self::map_err(&url, e) {
                StoreError::Status { status: 404, .. } => StoreError::NotFound {
                    id: id_text.clone(),
                },
                other => other,
            })?;
        tracing::info!(id = %id_text, "Alumno updated");
        Ok(updated)
    }

    fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        let id_text = id.to_string();
        let url = self.url(&[ALUMNOS_PATH, &id_text]);
        tracing::debug!(url = %url, "DELETE");
        self.agent
            .delete(&url)
            .call()
            .map_err(|e| match Self::map_err(&url, e) {
                StoreError::Status { status: 404, .. } => StoreError::NotFound {
                    id: id_text.clone(),
                },
                other => other,
            })?;
        tracing::info!(id = %id_text, "Alumno deleted");
        Ok(())
    }

    fn countries(&self) -> Result<Vec<Pais>, StoreError> {
        let url = self.url(&[PAISES_PATH]);
        self.get_json(&url)
    }

    fn provinces(&self, country_id: &RecordId) -> Result<Vec<Provincia>, StoreError> {
        let id_text = country_id.to_string();
        let url = self.url(&[PROVINCIAS_PATH, &id_text]);
        self.get_json(&url)
    }
}

// =============================================================================
// JsonFileStore
// =============================================================================

/// Records kept in a local JSON file (an array in the backend's wire format).
///
/// Every call re-reads the file, and every mutation rewrites it atomically
/// (write temp, rename).
/// The catalogue is derived from the distinct pais/provincia values of the
/// records, numbered in first-seen order.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the snapshot file with the given records, replacing any
    /// existing file.
    pub fn create_with(path: impl Into<PathBuf>, records: &[Alumno]) -> Result<Self, StoreError> {
        let store = Self::new(path);
        store.write_all(records)?;
        Ok(store)
    }

    fn read_all(&self) -> Result<Vec<Alumno>, StoreError> {
        let io_err = |e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        };

        // A missing snapshot is an empty store, not an error.
        let meta = match std::fs::metadata(&self.path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Snapshot not found; empty store");
                return Ok(Vec::new());
            }
            Err(e) => return Err(io_err(e)),
        };
        if meta.len() > MAX_SNAPSHOT_FILE_SIZE {
            return Err(StoreError::SnapshotTooLarge {
                path: self.path.clone(),
                size: meta.len(),
                max: MAX_SNAPSHOT_FILE_SIZE,
            });
        }

        let content = std::fs::read_to_string(&self.path).map_err(io_err)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write_all(&self, records: &[Alumno]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records).map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })?;
        write_atomic(&self.path, json.as_bytes()).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "Snapshot written");
        Ok(())
    }

    fn position(records: &[Alumno], id: &RecordId) -> Result<usize, StoreError> {
        records
            .iter()
            .position(|a| a.id.as_ref() == Some(id))
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    fn next_id(records: &[Alumno]) -> RecordId {
        let max = records
            .iter()
            .filter_map(|a| match a.id {
                Some(RecordId::Number(n)) => Some(n),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        RecordId::Number(max + 1)
    }

    /// Distinct non-blank countries in first-seen order.
    fn country_names(records: &[Alumno]) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for alumno in records {
            let name = alumno.pais.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

impl RecordStore for JsonFileStore {
    fn list(&self) -> Result<Vec<Alumno>, StoreError> {
        let records = self.read_all()?;
        tracing::info!(records = records.len(), path = %self.path.display(), "Loaded snapshot");
        Ok(records)
    }

    fn get(&self, id: &RecordId) -> Result<Alumno, StoreError> {
        let records = self.read_all()?;
        let idx = Self::position(&records, id)?;
        Ok(records[idx].clone())
    }

    fn create(&self, draft: &Alumno) -> Result<Alumno, StoreError> {
        let mut records = self.read_all()?;
        let created = Alumno {
            id: Some(Self::next_id(&records)),
            ..draft.clone()
        };
        records.push(created.clone());
        self.write_all(&records)?;
        tracing::info!(id = %created.id_label(), "Alumno created");
        Ok(created)
    }

    fn update(&self, id: &RecordId, alumno: &Alumno) -> Result<Alumno, StoreError> {
        let mut records = self.read_all()?;
        let idx = Self::position(&records, id)?;
        let updated = Alumno {
            id: Some(id.clone()),
            ..alumno.clone()
        };
        records[idx] = updated.clone();
        self.write_all(&records)?;
        tracing::info!(id = %id, "Alumno updated");
        Ok(updated)
    }

    fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        let mut records = self.read_all()?;
        let idx = Self::position(&records, id)?;
        records.remove(idx);
        self.write_all(&records)?;
        tracing::info!(id = %id, "Alumno deleted");
        Ok(())
    }

    fn countries(&self) -> Result<Vec<Pais>, StoreError> {
        let records = self.read_all()?;
        Ok(Self::country_names(&records)
            .into_iter()
            .enumerate()
            .map(|(i, name)| Pais {
                id: RecordId::Number(i as i64 + 1),
                paisnombre: name,
            })
            .collect())
    }

    fn provinces(&self, country_id: &RecordId) -> Result<Vec<Provincia>, StoreError> {
        let records = self.read_all()?;
        let countries = Self::country_names(&records);
        let country = match country_id {
            RecordId::Number(n) if *n >= 1 => countries.get((*n - 1) as usize),
            _ => None,
        }
        .ok_or_else(|| StoreError::UnknownCountry {
            name: country_id.to_string(),
        })?;

        let mut names: Vec<String> = Vec::new();
        for alumno in records.iter().filter(|a| a.pais.trim() == country) {
            let name = alumno.provincia.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        Ok(names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Provincia {
                id: RecordId::Number(i as i64 + 1),
                estadonombre: name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make(nombre: &str, pais: &str, provincia: &str) -> Alumno {
        Alumno {
            nombre: nombre.to_string(),
            pais: pais.to_string(),
            provincia: provincia.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_snapshot_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("none.json"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_crud_cycle() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("alumnos.json"));

        let a = store.create(&make("Ana", "España", "Madrid")).unwrap();
        let b = store.create(&make("Luis", "España", "Sevilla")).unwrap();
        assert_eq!(a.id, Some(RecordId::Number(1)));
        assert_eq!(b.id, Some(RecordId::Number(2)));

        let mut edited = store.get(&RecordId::Number(1)).unwrap();
        edited.nombre = "Ana María".to_string();
        store.update(&RecordId::Number(1), &edited).unwrap();
        assert_eq!(store.get(&RecordId::Number(1)).unwrap().nombre, "Ana María");

        store.delete(&RecordId::Number(1)).unwrap();
        let remaining = store.list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].nombre, "Luis");

        // Ids are never reused while a higher one exists.
        let c = store.create(&make("Eva", "", "")).unwrap();
        assert_eq!(c.id, Some(RecordId::Number(3)));
    }

    #[test]
    fn test_missing_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::create_with(dir.path().join("a.json"), &[]).unwrap();
        assert!(matches!(
            store.delete(&RecordId::Number(9)),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.get(&RecordId::Number(9)),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_malformed_snapshot_is_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"{ not a list").unwrap();
        assert!(matches!(
            JsonFileStore::new(&path).list(),
            Err(StoreError::Json { .. })
        ));
    }

    #[test]
    fn test_catalogue_derived_from_records() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::create_with(
            dir.path().join("a.json"),
            &[
                make("A", "España", "Madrid"),
                make("B", "Portugal", "Lisboa"),
                make("C", "España", "Sevilla"),
                make("D", "España", "Madrid"),
                make("E", "", ""),
            ],
        )
        .unwrap();

        let countries = store.countries().unwrap();
        let names: Vec<&str> = countries.iter().map(|c| c.paisnombre.as_str()).collect();
        assert_eq!(names, vec!["España", "Portugal"]);

        let provinces = store.provinces(&countries[0].id).unwrap();
        let names: Vec<&str> = provinces.iter().map(|p| p.estadonombre.as_str()).collect();
        assert_eq!(names, vec!["Madrid", "Sevilla"]);

        assert!(matches!(
            store.provinces(&RecordId::Number(7)),
            Err(StoreError::UnknownCountry { .. })
        ));
    }

    #[test]
    fn test_http_store_url_building() {
        let store = HttpStore::new("http://localhost:8080/", Duration::from_secs(1));
        assert_eq!(store.base_url(), "http://localhost:8080");
        assert_eq!(
            store.url(&[ALUMNOS_PATH, "5"]),
            "http://localhost:8080/alumnos/5"
        );
        assert_eq!(
            store.url(&[PROVINCIAS_PATH, "3"]),
            "http://localhost:8080/provincias/3"
        );
    }
}
