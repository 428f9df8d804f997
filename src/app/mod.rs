// AlumnosAdmin - app/mod.rs
//
// Application layer: record stores, view state, session persistence.
// Dependencies: core layer, platform fs helpers.
// Must NOT depend on: ui.

pub mod session;
pub mod state;
pub mod store;
