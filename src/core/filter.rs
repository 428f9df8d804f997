// AlumnosAdmin - core/filter.rs
//
// Composable filter engine for alumno records.
// Free-text search, six exact-match facets and a derived age range,
// all AND-combined. Core layer: pure logic, no I/O or UI dependencies.
//
// The list, statistics and export views all filter through this module;
// there is no other implementation of these predicates in the crate.

use crate::core::age::compute_age;
use crate::core::model::{Alumno, Disponibilidad, SituacionLaboral, Sexo, Status};
use crate::util::constants::{DEFAULT_AGE_MAX, DEFAULT_AGE_MIN};
use crate::util::error::{FilterError, SpecDefect};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Facet
// =============================================================================

/// One independently constrainable categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Facet {
    /// No constraint: every record matches.
    #[default]
    Any,
    /// Record field must equal this value exactly (case-sensitive).
    Exactly(String),
}

impl Facet {
    /// Interpret the empty-string-means-all convention of form input.
    pub fn from_sentinel(value: &str) -> Self {
        if value.is_empty() {
            Facet::Any
        } else {
            Facet::Exactly(value.to_string())
        }
    }

    /// Inverse of `from_sentinel`.
    pub fn as_sentinel(&self) -> &str {
        match self {
            Facet::Any => "",
            Facet::Exactly(v) => v,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Facet::Any)
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Facet::Any => true,
            Facet::Exactly(wanted) => wanted == value,
        }
    }
}

// =============================================================================
// Age range
// =============================================================================

/// Inclusive age bounds in completed years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    pub min: i32,
    pub max: i32,
}

impl Default for AgeRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_AGE_MIN,
            max: DEFAULT_AGE_MAX,
        }
    }
}

impl AgeRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, age: i32) -> bool {
        self.min <= age && age <= self.max
    }
}

// =============================================================================
// FilterSpec
// =============================================================================

/// Complete facet + age filter. All fields are AND-combined when applied.
///
/// The default is fully unconstrained with the `[0, 100]` age range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    pub sexo: Facet,
    pub disponibilidad: Facet,
    pub situacion_laboral: Facet,
    pub status: Facet,
    pub pais: Facet,
    pub provincia: Facet,
    pub edad: AgeRange,
}

impl FilterSpec {
    pub fn with_sexo(mut self, sexo: Sexo) -> Self {
        self.sexo = Facet::Exactly(sexo.as_str().to_string());
        self
    }

    pub fn with_disponibilidad(mut self, disponibilidad: Disponibilidad) -> Self {
        self.disponibilidad = Facet::Exactly(disponibilidad.as_str().to_string());
        self
    }

    pub fn with_situacion_laboral(mut self, situacion: SituacionLaboral) -> Self {
        self.situacion_laboral = Facet::Exactly(situacion.as_str().to_string());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Facet::Exactly(status.as_str().to_string());
        self
    }

    pub fn with_pais(mut self, pais: impl Into<String>) -> Self {
        self.pais = Facet::from_sentinel(&pais.into());
        self
    }

    pub fn with_provincia(mut self, provincia: impl Into<String>) -> Self {
        self.provincia = Facet::from_sentinel(&provincia.into());
        self
    }

    pub fn with_edad(mut self, min: i32, max: i32) -> Self {
        self.edad = AgeRange::new(min, max);
        self
    }

    /// Facets paired with their wire names, in a fixed order.
    fn facets(&self) -> [(&'static str, &Facet); 6] {
        [
            ("sexo", &self.sexo),
            ("disponibilidad", &self.disponibilidad),
            ("situacionLaboral", &self.situacion_laboral),
            ("status", &self.status),
            ("pais", &self.pais),
            ("provincia", &self.provincia),
        ]
    }

    /// Number of facets that constrain the result (age range excluded).
    pub fn active_facets(&self) -> usize {
        self.facets().iter().filter(|(_, f)| !f.is_any()).count()
    }

    /// Check the spec before evaluating any record.
    pub fn validate(&self) -> Result<(), FilterError> {
        for (name, facet) in self.facets() {
            if let Facet::Exactly(v) = facet {
                if v.is_empty() {
                    return Err(FilterError::InvalidSpec(SpecDefect::EmptyFacetValue {
                        facet: name,
                    }));
                }
            }
        }
        if self.edad.min > self.edad.max {
            return Err(FilterError::InvalidSpec(SpecDefect::InvertedAgeRange {
                min: self.edad.min,
                max: self.edad.max,
            }));
        }
        Ok(())
    }

    /// Serialisable form, for sessions and form state.
    pub fn to_raw(&self) -> RawFilterSpec {
        RawFilterSpec {
            sexo: Some(self.sexo.as_sentinel().to_string()),
            disponibilidad: Some(self.disponibilidad.as_sentinel().to_string()),
            situacion_laboral: Some(self.situacion_laboral.as_sentinel().to_string()),
            status: Some(self.status.as_sentinel().to_string()),
            pais: Some(self.pais.as_sentinel().to_string()),
            provincia: Some(self.provincia.as_sentinel().to_string()),
            edad: Some([self.edad.min.to_string(), self.edad.max.to_string()]),
        }
    }

    /// Build a typed spec from raw form input.
    ///
    /// Every facet key must be present (empty string = unconstrained) and
    /// both age bounds must be integers.
    pub fn from_raw(raw: &RawFilterSpec) -> Result<Self, FilterError> {
        fn facet(value: &Option<String>, name: &'static str) -> Result<Facet, FilterError> {
            value
                .as_deref()
                .map(Facet::from_sentinel)
                .ok_or(FilterError::InvalidSpec(SpecDefect::MissingFacet { facet: name }))
        }

        fn bound(value: &str, name: &'static str) -> Result<i32, FilterError> {
            value.trim().parse::<i32>().map_err(|_| {
                FilterError::InvalidSpec(SpecDefect::NonNumericAgeBound {
                    bound: name,
                    value: value.to_string(),
                })
            })
        }

        let [min, max] = raw
            .edad
            .as_ref()
            .ok_or(FilterError::InvalidSpec(SpecDefect::MissingAgeRange))?;

        let spec = Self {
            sexo: facet(&raw.sexo, "sexo")?,
            disponibilidad: facet(&raw.disponibilidad, "disponibilidad")?,
            situacion_laboral: facet(&raw.situacion_laboral, "situacionLaboral")?,
            status: facet(&raw.status, "status")?,
            pais: facet(&raw.pais, "pais")?,
            provincia: facet(&raw.provincia, "provincia")?,
            edad: AgeRange::new(bound(min, "min")?, bound(max, "max")?),
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// Untyped filter as a form or a saved session provides it.
///
/// Facets use the empty-string-means-all convention. A missing key
/// (`None`) is a malformed spec, distinct from an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilterSpec {
    pub sexo: Option<String>,
    pub disponibilidad: Option<String>,
    pub situacion_laboral: Option<String>,
    pub status: Option<String>,
    pub pais: Option<String>,
    pub provincia: Option<String>,
    /// `[min, max]`, as typed into the form.
    pub edad: Option<[String; 2]>,
}

impl RawFilterSpec {
    /// All facets present and empty; age range `[0, 100]`.
    pub fn unconstrained() -> Self {
        FilterSpec::default().to_raw()
    }
}

// =============================================================================
// SearchQuery
// =============================================================================

/// Free-text term plus facet filter: everything a view needs to narrow
/// the record list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    /// Matched against nombre/apellidos (case-insensitive) and telefono.
    pub term: String,
    pub spec: FilterSpec,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, spec: FilterSpec) -> Self {
        Self {
            term: term.into(),
            spec,
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Apply term + spec to a slice of records, returning indices of matches.
///
/// Returns indices into the original slice in ascending order, so the
/// result is a stable subsequence. The spec is validated before any
/// record is evaluated.
pub fn apply_filters(
    records: &[Alumno],
    term: &str,
    spec: &FilterSpec,
    today: NaiveDate,
) -> Result<Vec<usize>, FilterError> {
    spec.validate()?;

    let term_lower = term.to_lowercase();

    Ok(records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_all(record, term, &term_lower, spec, today))
        .map(|(idx, _)| idx)
        .collect())
}

/// Same as `apply_filters` but yields the matching records themselves.
pub fn filter_records<'a>(
    records: &'a [Alumno],
    term: &str,
    spec: &FilterSpec,
    today: NaiveDate,
) -> Result<Vec<&'a Alumno>, FilterError> {
    Ok(apply_filters(records, term, spec, today)?
        .into_iter()
        .map(|idx| &records[idx])
        .collect())
}

/// Check if a single record matches the term, every facet, and the age range.
fn matches_all(
    record: &Alumno,
    term: &str,
    term_lower: &str,
    spec: &FilterSpec,
    today: NaiveDate,
) -> bool {
    // Phone numbers are not case-folded.
    let term_match = record.nombre.to_lowercase().contains(term_lower)
        || record.apellidos.to_lowercase().contains(term_lower)
        || record.telefono.contains(term);
    if !term_match {
        return false;
    }

    if !(spec.sexo.matches(&record.sexo)
        && spec.disponibilidad.matches(&record.disponibilidad)
        && spec.situacion_laboral.matches(&record.situacion_laboral)
        && spec.status.matches(&record.status)
        && spec.pais.matches(&record.pais)
        && spec.provincia.matches(&record.provincia))
    {
        return false;
    }

    spec.edad.contains(compute_age(&record.fecha_nacimiento, today))
}
