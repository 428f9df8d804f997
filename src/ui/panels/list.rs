// AlumnosAdmin - ui/panels/list.rs
//
// Record list: one table row per visible alumno.

use crate::core::model::Alumno;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Shown instead of an empty table.
pub const EMPTY_MESSAGE: &str = "No hay alumnos que coincidan con los filtros.";

#[derive(Debug, Tabled)]
struct AlumnoRow<'a> {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Nombre")]
    nombre: &'a str,
    #[tabled(rename = "Apellidos")]
    apellidos: &'a str,
    #[tabled(rename = "Email")]
    email: &'a str,
    #[tabled(rename = "Teléfono")]
    telefono: &'a str,
    #[tabled(rename = "Fecha de nacimiento")]
    fecha_nacimiento: &'a str,
}

impl<'a> From<&'a Alumno> for AlumnoRow<'a> {
    fn from(a: &'a Alumno) -> Self {
        Self {
            id: a.id_label(),
            nombre: &a.nombre,
            apellidos: &a.apellidos,
            email: &a.email,
            telefono: &a.telefono,
            fecha_nacimiento: &a.fecha_nacimiento,
        }
    }
}

/// Render `records` as a rounded table, or `EMPTY_MESSAGE` if there are none.
pub fn render(records: &[&Alumno]) -> String {
    if records.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }
    let rows: Vec<AlumnoRow<'_>> = records.iter().map(|&a| AlumnoRow::from(a)).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::RecordId;

    #[test]
    fn test_empty_list_message() {
        assert_eq!(render(&[]), EMPTY_MESSAGE);
    }

    #[test]
    fn test_rows_and_headers() {
        let ana = Alumno {
            id: Some(RecordId::Number(7)),
            nombre: "Ana".to_string(),
            apellidos: "Núñez".to_string(),
            telefono: "600123123".to_string(),
            ..Default::default()
        };
        let out = render(&[&ana]);
        assert!(out.contains("Fecha de nacimiento"));
        assert!(out.contains("Núñez"));
        assert!(out.contains("600123123"));
        assert!(out.contains(" 7 "));
    }
}
