// AlumnosAdmin - core/stats.rs
//
// Category counts for charts. Operates on an already-filtered record
// set, so every chart reflects exactly what the list view shows.
// Core layer: pure logic.

use crate::core::age::{compute_age, compute_age_from, parse_date};
use crate::core::model::{Alumno, Disponibilidad, SituacionLaboral, Sexo, Status};
use crate::util::constants::{DEFAULT_AGE_BAND_WIDTH, UNSPECIFIED_LABEL};
use chrono::NaiveDate;
use serde::Serialize;

/// One bar of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

/// A titled series of buckets, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub title: String,
    pub buckets: Vec<Bucket>,
}

impl Distribution {
    /// Sum of all bucket counts.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Count for `label`, or 0 if there is no such bucket.
    pub fn count_of(&self, label: &str) -> usize {
        self.buckets
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.count)
            .unwrap_or(0)
    }

    /// Largest bucket count (0 for an empty distribution).
    pub fn max_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Which chart a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Sexo,
    Status,
    Disponibilidad,
    SituacionLaboral,
    Edad,
}

impl ChartKind {
    pub fn all() -> &'static [ChartKind] {
        &[
            ChartKind::Sexo,
            ChartKind::Status,
            ChartKind::Disponibilidad,
            ChartKind::SituacionLaboral,
            ChartKind::Edad,
        ]
    }

    pub fn compute(&self, records: &[&Alumno], today: NaiveDate) -> Distribution {
        match self {
            ChartKind::Sexo => by_sexo(records),
            ChartKind::Status => by_status(records),
            ChartKind::Disponibilidad => by_disponibilidad(records),
            ChartKind::SituacionLaboral => by_situacion_laboral(records),
            ChartKind::Edad => by_age_band(records, today, DEFAULT_AGE_BAND_WIDTH),
        }
    }
}

/// Count `field(record)` values. Canonical categories come first in
/// canonical order (zero counts included so charts keep a stable shape),
/// then other values in first-seen order, then blanks.
fn categorical<'a>(
    title: &str,
    canonical: &[&str],
    records: &[&'a Alumno],
    field: impl Fn(&'a Alumno) -> &'a str,
) -> Distribution {
    let mut buckets: Vec<Bucket> = canonical
        .iter()
        .map(|label| Bucket {
            label: (*label).to_string(),
            count: 0,
        })
        .collect();
    let mut unspecified = 0usize;

    for &record in records {
        let value = field(record);
        if value.trim().is_empty() {
            unspecified += 1;
            continue;
        }
        match buckets.iter_mut().find(|b| b.label == value) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(Bucket {
                label: value.to_string(),
                count: 1,
            }),
        }
    }

    if unspecified > 0 {
        buckets.push(Bucket {
            label: UNSPECIFIED_LABEL.to_string(),
            count: unspecified,
        });
    }

    Distribution {
        title: title.to_string(),
        buckets,
    }
}

/// Count of alumnos by sex. This is the default chart.
pub fn by_sexo(records: &[&Alumno]) -> Distribution {
    let canonical: Vec<&str> = Sexo::all().iter().map(|v| v.as_str()).collect();
    categorical("Alumnos por sexo", &canonical, records, |a| a.sexo.as_str())
}

pub fn by_status(records: &[&Alumno]) -> Distribution {
    let canonical: Vec<&str> = Status::all().iter().map(|v| v.as_str()).collect();
    categorical("Alumnos por estado", &canonical, records, |a| a.status.as_str())
}

pub fn by_disponibilidad(records: &[&Alumno]) -> Distribution {
    let canonical: Vec<&str> = Disponibilidad::all().iter().map(|v| v.as_str()).collect();
    categorical("Alumnos por disponibilidad", &canonical, records, |a| {
        a.disponibilidad.as_str()
    })
}

pub fn by_situacion_laboral(records: &[&Alumno]) -> Distribution {
    let canonical: Vec<&str> = SituacionLaboral::all().iter().map(|v| v.as_str()).collect();
    categorical("Alumnos por situación laboral", &canonical, records, |a| {
        a.situacion_laboral.as_str()
    })
}

/// Ages bucketed into `band_width`-year bands ("0-9", "10-19", ...),
/// ascending, only bands that occur. Negative ages (birth date after
/// `today`) land in the lowest band.
pub fn by_age_band(records: &[&Alumno], today: NaiveDate, band_width: i32) -> Distribution {
    let width = band_width.max(1);
    let mut counts: std::collections::BTreeMap<i32, usize> = std::collections::BTreeMap::new();
    for record in records {
        let age = compute_age(&record.fecha_nacimiento, today).max(0);
        *counts.entry(age / width).or_insert(0) += 1;
    }

    let buckets = counts
        .into_iter()
        .map(|(band, count)| Bucket {
            label: format!("{}-{}", band * width, band * width + width - 1),
            count,
        })
        .collect();

    Distribution {
        title: "Alumnos por edad".to_string(),
        buckets,
    }
}

/// Totals shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Records fetched from the store.
    pub total: usize,
    /// Records left after filtering.
    pub visible: usize,
    /// Mean derived age of visible records with a parseable birth date.
    pub mean_age: Option<f64>,
    pub by_sexo: Distribution,
}

impl Summary {
    pub fn compute(total: usize, visible: &[&Alumno], today: NaiveDate) -> Self {
        let ages: Vec<i32> = visible
            .iter()
            .filter_map(|a| parse_date(&a.fecha_nacimiento))
            .map(|birth| compute_age_from(birth, today))
            .collect();
        let mean_age = if ages.is_empty() {
            None
        } else {
            Some(ages.iter().map(|&a| f64::from(a)).sum::<f64>() / ages.len() as f64)
        };

        Self {
            total,
            visible: visible.len(),
            mean_age,
            by_sexo: by_sexo(visible),
        }
    }
}
