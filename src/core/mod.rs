// EventFiend - core/mod.rs
//
// Core business logic layer.
// Dependencies: util, chrono, serde, csv.
// Must NOT depend on: ui, platform, app.

pub mod catalog;
pub mod export;
pub mod filter;
pub mod model;
pub mod provider;
pub mod view;
