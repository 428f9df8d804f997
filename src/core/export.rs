// AlumnosAdmin - core/export.rs
//
// Spreadsheet (CSV) and JSON export of filtered alumno records.
// Core layer: writes to any Write trait object; the caller owns the file.

use crate::core::model::Alumno;
use crate::util::constants::{DEFAULT_EXPORT_STEM, MAX_EXPORT_RECORDS};
use crate::util::error::ExportError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Spreadsheet column headers, in export order.
pub const CSV_HEADERS: [&str; 16] = [
    "ID",
    "Nombre",
    "Apellidos",
    "DNI",
    "Email",
    "Telefono",
    "Direccion",
    "Pais",
    "Provincia",
    "Propietario",
    "Creado",
    "Sexo",
    "Situación Laboral",
    "Disponibilidad",
    "Estado",
    "Fecha Nacimiento",
];

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values, opens directly in spreadsheet applications.
    Csv,
    /// Pretty-printed JSON array in the backend's wire format.
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// `<dir>/Alumnos.<ext>`.
    pub fn default_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{DEFAULT_EXPORT_STEM}.{}", self.extension()))
    }
}

fn check_size(count: usize) -> Result<(), ExportError> {
    if count > MAX_EXPORT_RECORDS {
        return Err(ExportError::TooManyRecords {
            count,
            max: MAX_EXPORT_RECORDS,
        });
    }
    Ok(())
}

/// Export records to CSV format, one row per record.
///
/// `export_path` is used for error context only.
pub fn export_csv<W: Write>(
    records: &[&Alumno],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(records.len())?;

    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS).map_err(csv_err)?;

    let mut count = 0;
    for alumno in records {
        let id = alumno
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default();

        csv_writer
            .write_record([
                id.as_str(),
                &alumno.nombre,
                &alumno.apellidos,
                &alumno.dni,
                &alumno.email,
                &alumno.telefono,
                &alumno.direccion,
                &alumno.pais,
                &alumno.provincia,
                &alumno.propietario,
                &alumno.creado,
                &alumno.sexo,
                &alumno.situacion_laboral,
                &alumno.disponibilidad,
                &alumno.status,
                &alumno.fecha_nacimiento,
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(records = count, path = %export_path.display(), "CSV export written");
    Ok(count)
}

/// Export records to JSON format (array of objects).
pub fn export_json<W: Write>(
    records: &[&Alumno],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(records.len())?;

    serde_json::to_writer_pretty(writer, records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(records.len())
}

/// Dispatch on `format`.
pub fn export<W: Write>(
    format: ExportFormat,
    records: &[&Alumno],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    match format {
        ExportFormat::Csv => export_csv(records, writer, export_path),
        ExportFormat::Json => export_json(records, writer, export_path),
    }
}
