// AlumnosAdmin - ui/panels/detail.rs
//
// Record detail: every field, labelled, plus the derived age.

use crate::core::age::{compute_age, parse_date};
use crate::core::model::{Alumno, Disponibilidad, SituacionLaboral, Sexo, Status};
use chrono::NaiveDate;
use std::fmt::Write;
use std::str::FromStr;

/// Display label for a categorical value: the enum label when the stored
/// value is canonical, otherwise the raw value as stored.
fn label_of<T>(raw: &str, label: fn(&T) -> &'static str) -> String
where
    T: FromStr,
{
    match T::from_str(raw) {
        Ok(v) => label(&v).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Render `alumno` as aligned `Label: value` lines.
pub fn render(alumno: &Alumno, today: NaiveDate) -> String {
    let edad = if parse_date(&alumno.fecha_nacimiento).is_some() {
        compute_age(&alumno.fecha_nacimiento, today).to_string()
    } else {
        "-".to_string()
    };

    let fields: [(&str, String); 18] = [
        ("ID", alumno.id_label()),
        ("Nombre", alumno.nombre.clone()),
        ("Apellidos", alumno.apellidos.clone()),
        ("DNI", alumno.dni.clone()),
        ("Email", alumno.email.clone()),
        ("Teléfono", alumno.telefono.clone()),
        ("Dirección", alumno.direccion.clone()),
        ("Código postal", alumno.codigo_postal.clone()),
        ("País", alumno.pais.clone()),
        ("Provincia", alumno.provincia.clone()),
        ("Fecha de nacimiento", alumno.fecha_nacimiento.clone()),
        ("Edad", edad),
        ("Sexo", label_of::<Sexo>(&alumno.sexo, Sexo::label)),
        (
            "Disponibilidad",
            label_of::<Disponibilidad>(&alumno.disponibilidad, Disponibilidad::label),
        ),
        (
            "Situación laboral",
            label_of::<SituacionLaboral>(&alumno.situacion_laboral, SituacionLaboral::label),
        ),
        ("Estado", label_of::<Status>(&alumno.status, Status::label)),
        ("Propietario", alumno.propietario.clone()),
        ("Creado", alumno.creado.clone()),
    ];

    let width = fields
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
        + 1;

    let mut out = String::new();
    for (label, value) in &fields {
        let shown = if value.trim().is_empty() { "-" } else { value };
        writeln!(out, "{:<width$} {shown}", format!("{label}:")).ok();
    }
    out
}
