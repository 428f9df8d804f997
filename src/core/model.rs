// AlumnosAdmin - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers. Field names
// follow the backend's camelCase JSON so records round-trip unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Record identifier
// =============================================================================

/// Opaque identifier assigned by the record store.
///
/// The backend emits numeric ids; string ids are kept verbatim so that a
/// store with a different id scheme still round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<i64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(trimmed.to_string()),
        })
    }
}

// =============================================================================
// Alumno (the record)
// =============================================================================

/// A single student/lead record as served by the backend.
///
/// Categorical fields are kept as the raw wire strings: the backend owns
/// validation, and the filter engine compares them verbatim. The typed
/// enums below supply the canonical values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alumno {
    /// `None` for a draft that has not been stored yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub nombre: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub apellidos: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub telefono: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub direccion: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub codigo_postal: String,

    /// Calendar date, normally `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fecha_nacimiento: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub dni: String,

    /// Country display name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pais: String,

    /// Province/state display name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub provincia: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub sexo: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub disponibilidad: String,

    /// Owner of the lead (free text).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub propietario: String,

    /// Registration date.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub creado: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub situacion_laboral: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
}

impl Alumno {
    /// Id as display text, or "-" for an unsaved draft.
    pub fn id_label(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Decode JSON `null` (and absent keys, via `#[serde(default)]`) as "".
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Enumerated fields
// =============================================================================

/// Error returned when text does not name a variant of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid value for {}", self.value, self.field)
    }
}

impl std::error::Error for UnknownVariant {}

/// Declares a closed set of canonical wire values with display labels.
///
/// Parsing is lenient (any casing of the wire value or the label); the
/// value produced is always canonical. Comparison against records is not:
/// the filter engine matches `as_str()` exactly.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $wire:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Wire field name.
            pub const FIELD: &'static str = $field;

            /// Returns all variants in display order.
            pub fn all() -> &'static [$name] {
                &[$($name::$variant),+]
            }

            /// Canonical wire string, as stored on records.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Human-readable label for display.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// True if `value` is exactly one of the canonical wire strings.
            pub fn is_canonical(value: &str) -> bool {
                Self::all().iter().any(|v| v.as_str() == value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                Self::all()
                    .iter()
                    .copied()
                    .find(|v| {
                        v.as_str().to_lowercase() == wanted || v.label().to_lowercase() == wanted
                    })
                    .ok_or_else(|| UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}

wire_enum! {
    /// Sex of the alumno.
    Sexo, "sexo" {
        Masculino => "Masculino", "Masculino";
        Femenino => "Femenino", "Femenino";
    }
}

wire_enum! {
    /// Availability shift.
    Disponibilidad, "disponibilidad" {
        Manana => "Mañana", "Mañana";
        Tarde => "Tarde", "Tarde";
    }
}

wire_enum! {
    /// Employment situation. The canonical "occupied" value is lower-case.
    SituacionLaboral, "situacionLaboral" {
        Desempleado => "Desempleado", "Desempleado";
        Ocupado => "ocupado", "Ocupado";
    }
}

wire_enum! {
    /// Position of the lead in the sales pipeline.
    Status, "status" {
        LeadCaliente => "lead_caliente", "Lead caliente";
        LeadTemplado => "lead_templado", "Lead templado";
        LeadFrio => "lead_frio", "Lead frío";
        Cliente => "cliente", "Cliente";
        EnOportunidad => "en_oportunidad", "En oportunidad";
    }
}

// =============================================================================
// Country / province catalogue
// =============================================================================

/// A country as listed by the catalogue endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pais {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub paisnombre: String,
}

/// A province/state of a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provincia {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub estadonombre: String,
}

/// Resolve a country reference typed by the user to its catalogue id.
///
/// Accepts either the id itself or the display name (case-insensitive).
/// Records store the display name, the province endpoint wants the id.
pub fn resolve_country<'a>(countries: &'a [Pais], reference: &str) -> Option<&'a Pais> {
    let reference = reference.trim();
    countries
        .iter()
        .find(|p| p.id.to_string() == reference)
        .or_else(|| {
            let wanted = reference.to_lowercase();
            countries
                .iter()
                .find(|p| p.paisnombre.to_lowercase() == wanted)
        })
}
