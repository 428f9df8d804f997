// AlumnosAdmin - core/validate.rs
//
// Client-side checks on a record draft before it is sent to the store.
// The backend remains the authority; this catches the obvious mistakes
// (blank required fields, malformed email or dates, non-canonical
// categorical values) without a round-trip.

use crate::core::age::parse_date;
use crate::core::model::{Alumno, Disponibilidad, SituacionLaboral, Sexo, Status};
use crate::util::error::{FieldIssue, IssueKind, ValidationError};
use regex::Regex;
use std::sync::OnceLock;

/// Loose address shape: something@something.tld, no whitespace.
fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Validate a draft for create or update.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_draft(draft: &Alumno) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    let mut require = |field: &'static str, value: &str| -> bool {
        if value.trim().is_empty() {
            issues.push(FieldIssue {
                field,
                kind: IssueKind::Missing,
            });
            false
        } else {
            true
        }
    };

    require("nombre", &draft.nombre);
    require("apellidos", &draft.apellidos);
    let has_email = require("email", &draft.email);
    let has_nacimiento = require("fechaNacimiento", &draft.fecha_nacimiento);
    require("dni", &draft.dni);
    let has_sexo = require("sexo", &draft.sexo);
    let has_disponibilidad = require("disponibilidad", &draft.disponibilidad);
    let has_creado = require("creado", &draft.creado);
    let has_situacion = require("situacionLaboral", &draft.situacion_laboral);
    let has_status = require("status", &draft.status);

    let mut malformed = |field: &'static str, kind: IssueKind| {
        issues.push(FieldIssue { field, kind });
    };

    if has_email && !email_regex().is_match(draft.email.trim()) {
        malformed("email", IssueKind::Malformed);
    }
    if has_nacimiento && parse_date(&draft.fecha_nacimiento).is_none() {
        malformed("fechaNacimiento", IssueKind::Malformed);
    }
    if has_creado && parse_date(&draft.creado).is_none() {
        malformed("creado", IssueKind::Malformed);
    }
    if has_sexo && !Sexo::is_canonical(&draft.sexo) {
        malformed(Sexo::FIELD, IssueKind::NotCanonical);
    }
    if has_disponibilidad && !Disponibilidad::is_canonical(&draft.disponibilidad) {
        malformed(Disponibilidad::FIELD, IssueKind::NotCanonical);
    }
    if has_situacion && !SituacionLaboral::is_canonical(&draft.situacion_laboral) {
        malformed(SituacionLaboral::FIELD, IssueKind::NotCanonical);
    }
    if has_status && !Status::is_canonical(&draft.status) {
        malformed(Status::FIELD, IssueKind::NotCanonical);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> Alumno {
        Alumno {
            nombre: "Ana".to_string(),
            apellidos: "Lopez".to_string(),
            email: "ana@example.com".to_string(),
            fecha_nacimiento: "2000-01-01".to_string(),
            dni: "12345678Z".to_string(),
            sexo: "Femenino".to_string(),
            disponibilidad: "Tarde".to_string(),
            creado: "2024-05-20".to_string(),
            situacion_laboral: "Desempleado".to_string(),
            status: "lead_frio".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert_eq!(validate_draft(&valid_draft()), Ok(()));
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        let mut draft = valid_draft();
        draft.telefono.clear();
        draft.direccion.clear();
        draft.pais.clear();
        draft.propietario.clear();
        assert!(validate_draft(&draft).is_ok());
    }

    #[test]
    fn test_all_missing_fields_reported() {
        let err = validate_draft(&Alumno::default()).unwrap_err();
        assert_eq!(err.issues.len(), 10);
        assert!(err
            .issues
            .iter()
            .all(|issue| issue.kind == IssueKind::Missing));
    }

    #[test]
    fn test_malformed_email_and_dates() {
        let mut draft = valid_draft();
        draft.email = "ana at example".to_string();
        draft.fecha_nacimiento = "01/01/2000".to_string();
        draft.creado = "ayer".to_string();
        let err = validate_draft(&draft).unwrap_err();
        assert!(err.has_issue("email", IssueKind::Malformed));
        assert!(err.has_issue("fechaNacimiento", IssueKind::Malformed));
        assert!(err.has_issue("creado", IssueKind::Malformed));
        assert_eq!(err.issues.len(), 3);
    }

    #[test]
    fn test_non_canonical_enumerations() {
        let mut draft = valid_draft();
        draft.situacion_laboral = "Ocupado".to_string();
        draft.status = "Cliente".to_string();
        let err = validate_draft(&draft).unwrap_err();
        assert!(err.has_issue("situacionLaboral", IssueKind::NotCanonical));
        assert!(err.has_issue("status", IssueKind::NotCanonical));
    }
}
