// AlumnosAdmin - ui/panels/summary.rs
//
// Header block shown by `stats`: how many records are visible out of the
// total, the mean age, and the default chart.

use crate::core::stats::Summary;
use crate::ui::panels::charts;
use std::fmt::Write;

pub fn render(summary: &Summary) -> String {
    let mut out = String::new();
    writeln!(out, "Alumnos: {} de {}", summary.visible, summary.total).ok();
    let mean = summary
        .mean_age
        .map_or_else(|| "-".to_string(), |m| format!("{m:.1}"));
    writeln!(out, "Edad media: {mean}").ok();
    out.push('\n');
    out.push_str(&charts::render(&summary.by_sexo));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Alumno;
    use chrono::NaiveDate;

    #[test]
    fn test_summary_header() {
        let a = Alumno {
            sexo: "Femenino".to_string(),
            fecha_nacimiento: "2000-01-01".to_string(),
            ..Default::default()
        };
        let summary = Summary::compute(3, &[&a], NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let out = render(&summary);
        assert!(out.starts_with("Alumnos: 1 de 3\nEdad media: 24.0\n"));
        assert!(out.contains("Alumnos por sexo"));
    }

    #[test]
    fn test_summary_without_ages_shows_dash() {
        let summary = Summary::compute(0, &[], NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let out = render(&summary);
        assert!(out.starts_with("Alumnos: 0 de 0\nEdad media: -\n"));
    }
}
