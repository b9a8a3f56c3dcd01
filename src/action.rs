//! Actions: user intents and fetch results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{FetchFailure, Forecast, WeatherSnapshot};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Search category =====
    /// Intent: look up a city (from the input field or a recent chip)
    SearchSubmit(String),

    // ===== Weather category =====
    /// Result: current conditions and forecast both loaded
    WeatherDidLoad {
        generation: u64,
        city: String,
        weather: WeatherSnapshot,
        forecast: Forecast,
    },

    /// Result: current conditions loaded, forecast failed
    WeatherDidPartial {
        generation: u64,
        city: String,
        weather: WeatherSnapshot,
        failure: FetchFailure,
    },

    /// Result: current conditions failed, forecast never requested
    WeatherDidError {
        generation: u64,
        failure: FetchFailure,
    },

    // ===== Recent category =====
    /// Highlight a recent-search chip (by index)
    RecentSelect(usize),

    /// Re-run the highlighted recent search
    RecentConfirm,

    // ===== UI category =====
    /// Switch between metric and imperial, re-fetching the last city
    UiToggleUnits,

    /// Move key focus to the recent-search chips
    UiFocusRecent,

    /// Move key focus back to the search input
    UiFocusSearch,

    /// Force a re-render (input edits live outside the store)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for the loading spinner
    Tick,

    /// Exit the application
    Quit,
}
