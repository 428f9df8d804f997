// AlumnosAdmin - core/mod.rs
//
// Core business logic layer.
// Dependencies: chrono, serde, regex, csv only.
// Must NOT depend on: ui, platform, app, or any network crate.

pub mod age;
pub mod export;
pub mod filter;
pub mod model;
pub mod stats;
pub mod validate;
