// AlumnosAdmin - ui/mod.rs
//
// UI layer: presentation only. Every panel renders to a String; the CLI
// decides where it goes.
// Dependencies: app (state), core (read-only models), tabled.
// Must NOT depend on: platform, direct I/O.

pub mod panels;
