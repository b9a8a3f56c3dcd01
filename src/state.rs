//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::format;

/// Maximum number of cities kept in the recent-search list
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Message shown for any network, decode or parse failure
pub const TRANSPORT_ERROR_MESSAGE: &str = "Failed to fetch data";

/// Forecast entries at this time of day represent their date
pub const MIDDAY_MARKER: &str = "12:00:00";

/// Spinner frame interval while a fetch is in flight.
pub const SPINNER_TICK_MS: u64 = 80;

/// Current conditions for a single location
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherSnapshot {
    pub name: String,
    pub country: String,
    pub temperature: f64,
    pub humidity: u32,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
}

impl WeatherSnapshot {
    /// "Paris, FR", or just the name when the provider sends no country
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// One slot of the 3-hour forecast listing
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastEntry {
    pub timestamp: i64,
    pub timestamp_text: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub description: String,
    pub icon: String,
}

impl ForecastEntry {
    pub fn is_midday(&self) -> bool {
        self.timestamp_text.contains(MIDDAY_MARKER)
    }

    pub fn date_label(&self) -> String {
        format::date_label(&self.timestamp_text)
    }
}

/// The full forecast listing as returned by the provider
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Forecast {
    pub entries: Vec<ForecastEntry>,
}

impl Forecast {
    /// One representative entry per day: the midday slot, in listing order.
    pub fn daily(&self) -> Vec<&ForecastEntry> {
        self.entries.iter().filter(|entry| entry.is_midday()).collect()
    }
}

/// Why a fetch cycle did not complete
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum FetchFailure {
    /// Network error, unreadable body or malformed JSON
    Transport,
    /// Non-success status with the provider's message
    Api(String),
}

impl FetchFailure {
    pub fn message(&self) -> &str {
        match self {
            FetchFailure::Transport => TRANSPORT_ERROR_MESSAGE,
            FetchFailure::Api(message) => message,
        }
    }

    /// A provider-level error still counts as a search for the history list;
    /// a transport failure does not.
    pub fn records_search(&self) -> bool {
        matches!(self, FetchFailure::Api(_))
    }
}

/// Lifecycle of one search cycle
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum FetchStatus {
    /// Nothing searched yet
    #[default]
    Idle,
    /// Both fetches are outstanding or in progress
    Loading,
    /// Current conditions and forecast both arrived
    Ready {
        weather: WeatherSnapshot,
        forecast: Forecast,
    },
    /// Current conditions arrived, the forecast did not
    Partial {
        weather: WeatherSnapshot,
        error: String,
    },
    /// Current conditions could not be fetched
    Failed(String),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        match self {
            FetchStatus::Ready { weather, .. } | FetchStatus::Partial { weather, .. } => {
                Some(weather)
            }
            _ => None,
        }
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        match self {
            FetchStatus::Ready { forecast, .. } => Some(forecast),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchStatus::Partial { error, .. } | FetchStatus::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Unit system requested from the provider
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn toggle(&self) -> Self {
        match self {
            Units::Metric => Units::Imperial,
            Units::Imperial => Units::Metric,
        }
    }

    /// Value of the `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temp_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn speed_label(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }

    /// Label for the toggle control, naming the unit it switches to
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Units::Metric => "Switch to Fahrenheit (°F)",
            Units::Imperial => "Switch to Celsius (°C)",
        }
    }

    /// Format a provider temperature, already in this unit, rounded to whole degrees
    pub fn format_temp(&self, value: f64) -> String {
        format!("{}{}", format::round_half_up(value), self.temp_symbol())
    }
}

/// Most-recent-first, deduplicated, capped list of searched cities
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RecentSearches(Vec<String>);

impl RecentSearches {
    /// Build from persisted data, re-applying dedup and the cap.
    pub fn from_cities(cities: impl IntoIterator<Item = String>) -> Self {
        let mut list: Vec<String> = Vec::new();
        for city in cities {
            if !list.contains(&city) {
                list.push(city);
            }
        }
        list.truncate(MAX_RECENT_SEARCHES);
        Self(list)
    }

    /// Move `city` to the front, inserting it if new.
    pub fn record(&mut self, city: &str) {
        self.0.retain(|existing| existing != city);
        self.0.insert(0, city.to_string());
        self.0.truncate(MAX_RECENT_SEARCHES);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// Which part of the dashboard receives key input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Focus {
    #[default]
    Search,
    Recent,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, Default, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Search lifecycle: Idle → Loading → Ready/Partial/Failed
    #[debug(section = "Weather", label = "Status", debug_fmt)]
    pub status: FetchStatus,

    /// Unit system for the next request
    #[debug(section = "Weather", label = "Units", debug_fmt)]
    pub unit: Units,

    /// City of the last search whose current conditions arrived
    #[debug(section = "Weather", label = "Last city", debug_fmt)]
    pub last_city: Option<String>,

    /// City of the search currently in flight
    #[debug(section = "Weather", label = "Pending city", debug_fmt)]
    pub pending_city: Option<String>,

    /// Bumped on every search; results from older searches are dropped
    #[debug(section = "Weather", label = "Generation")]
    pub generation: u64,

    #[debug(section = "History", label = "Recent", debug_fmt)]
    pub recent: RecentSearches,

    #[debug(section = "UI", label = "Focus", debug_fmt)]
    pub focus: Focus,

    #[debug(skip)]
    pub recent_selected: usize,

    /// Spinner frame counter
    #[debug(skip)]
    pub tick_count: u32,
}

impl AppState {
    pub fn new(unit: Units, recent: RecentSearches) -> Self {
        Self {
            unit,
            recent,
            ..Default::default()
        }
    }

    pub fn selected_recent(&self) -> Option<&str> {
        self.recent.get(self.recent_selected)
    }
}
