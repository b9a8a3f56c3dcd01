//! Weather Dashboard - OpenWeatherMap TUI built on tui-dispatch
//!
//! This library exposes the dashboard's modules for the binary and tests.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod format;
pub mod history;
pub mod logging;
pub mod reducer;
pub mod state;
