// AlumnosAdmin - lib.rs
//
// Library entry point, exposing every module for integration testing
// and programmatic use. The binary in `main.rs` is a thin wrapper over
// `cli::execute`.

pub mod app;
pub mod cli;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
