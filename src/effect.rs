//! Effects - side effects declared by the reducer

use crate::state::Units;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch current conditions, then the forecast, for one city
    FetchWeather {
        city: String,
        units: Units,
        generation: u64,
    },
    /// Write the recent-search list to disk
    SaveRecentSearches { cities: Vec<String> },
}
