// AlumnosAdmin - ui/panels/catalogue.rs
//
// Country and province listings.

use crate::core::model::{Pais, Provincia};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Tabled)]
struct CatalogueRow<'a> {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Nombre")]
    nombre: &'a str,
}

fn table(rows: Vec<CatalogueRow<'_>>, empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_countries(countries: &[Pais]) -> String {
    let rows = countries
        .iter()
        .map(|p| CatalogueRow {
            id: p.id.to_string(),
            nombre: &p.paisnombre,
        })
        .collect();
    table(rows, "No hay países en el catálogo.")
}

pub fn render_provinces(provinces: &[Provincia]) -> String {
    let rows = provinces
        .iter()
        .map(|p| CatalogueRow {
            id: p.id.to_string(),
            nombre: &p.estadonombre,
        })
        .collect();
    table(rows, "No hay provincias para este país.")
}
