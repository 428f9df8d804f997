// AlumnosAdmin - ui/panels/mod.rs

pub mod catalogue;
pub mod charts;
pub mod detail;
pub mod list;
pub mod summary;
