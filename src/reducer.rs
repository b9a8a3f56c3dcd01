//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, FetchStatus, Focus};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Search actions =====
        Action::SearchSubmit(city) => {
            let city = city.trim();
            if city.is_empty() {
                return DispatchResult::unchanged();
            }
            begin_search(state, city.to_string())
        }

        // ===== Weather actions =====
        Action::WeatherDidLoad {
            generation,
            city,
            weather,
            forecast,
        } => {
            if is_stale(state, generation) {
                return DispatchResult::unchanged();
            }
            state.status = FetchStatus::Ready { weather, forecast };
            state.last_city = Some(city.clone());
            remember_search(state, &city)
        }

        Action::WeatherDidPartial {
            generation,
            city,
            weather,
            failure,
        } => {
            if is_stale(state, generation) {
                return DispatchResult::unchanged();
            }
            state.status = FetchStatus::Partial {
                weather,
                error: failure.message().to_string(),
            };
            state.last_city = Some(city.clone());
            if failure.records_search() {
                remember_search(state, &city)
            } else {
                DispatchResult::changed()
            }
        }

        Action::WeatherDidError {
            generation,
            failure,
        } => {
            if is_stale(state, generation) {
                return DispatchResult::unchanged();
            }
            state.status = FetchStatus::Failed(failure.message().to_string());
            DispatchResult::changed()
        }

        // ===== Recent actions =====
        Action::RecentSelect(index) => {
            if index < state.recent.len() && index != state.recent_selected {
                state.recent_selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::RecentConfirm => {
            let Some(city) = state.selected_recent().map(str::to_string) else {
                return DispatchResult::unchanged();
            };
            begin_search(state, city)
        }

        // ===== UI actions =====
        Action::UiToggleUnits => {
            state.unit = state.unit.toggle();
            // An in-flight search was issued in the old unit; restart it
            let city = if state.status.is_loading() {
                state.pending_city.clone()
            } else {
                state.last_city.clone()
            };
            match city {
                Some(city) => begin_search(state, city),
                None => DispatchResult::changed(),
            }
        }

        Action::UiFocusRecent => {
            if state.recent.is_empty() || state.focus == Focus::Recent {
                return DispatchResult::unchanged();
            }
            state.focus = Focus::Recent;
            state.recent_selected = 0;
            DispatchResult::changed()
        }

        Action::UiFocusSearch => {
            if state.focus == Focus::Search {
                return DispatchResult::unchanged();
            }
            state.focus = Focus::Search;
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            if state.status.is_loading() {
                state.tick_count = state.tick_count.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Clear the previous result and request both fetches under a fresh generation.
fn begin_search(state: &mut AppState, city: String) -> DispatchResult<Effect> {
    state.generation = state.generation.wrapping_add(1);
    state.status = FetchStatus::Loading;
    state.tick_count = 0;
    state.pending_city = Some(city.clone());
    DispatchResult::changed_with(Effect::FetchWeather {
        city,
        units: state.unit,
        generation: state.generation,
    })
}

fn is_stale(state: &AppState, generation: u64) -> bool {
    generation != state.generation
}

fn remember_search(state: &mut AppState, city: &str) -> DispatchResult<Effect> {
    state.recent.record(city);
    if state.recent_selected >= state.recent.len() {
        state.recent_selected = 0;
    }
    DispatchResult::changed_with(Effect::SaveRecentSearches {
        cities: state.recent.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FetchFailure, Forecast, RecentSearches, Units, WeatherSnapshot};

    fn paris() -> WeatherSnapshot {
        WeatherSnapshot {
            name: "Paris".into(),
            country: "FR".into(),
            temperature: 18.2,
            humidity: 60,
            wind_speed: 3.1,
            description: "clear sky".into(),
            icon: "01d".into(),
        }
    }

    #[test]
    fn test_search_sets_loading_and_fetches() {
        let mut state = AppState {
            status: FetchStatus::Failed("old".into()),
            tick_count: 4,
            ..Default::default()
        };

        let result = reducer(&mut state, Action::SearchSubmit("  Paris ".into()));

        assert!(result.changed);
        assert!(state.status.is_loading());
        assert_eq!(state.generation, 1);
        assert_eq!(state.tick_count, 0);
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather {
                city: "Paris".into(),
                units: Units::Metric,
                generation: 1,
            }]
        );
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::SearchSubmit("   ".into()));
        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.generation, 0);
    }

    #[test]
    fn test_load_records_city_and_persists() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit("Paris".into()));

        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                generation: 1,
                city: "Paris".into(),
                weather: paris(),
                forecast: Forecast::default(),
            },
        );

        assert!(result.changed);
        assert_eq!(state.status.weather(), Some(&paris()));
        assert_eq!(state.last_city.as_deref(), Some("Paris"));
        assert_eq!(state.recent.as_slice(), ["Paris"]);
        assert_eq!(
            result.effects,
            vec![Effect::SaveRecentSearches {
                cities: vec!["Paris".into()],
            }]
        );
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit("Paris".into()));
        reducer(&mut state, Action::SearchSubmit("Tokyo".into()));

        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                generation: 1,
                city: "Paris".into(),
                weather: paris(),
                forecast: Forecast::default(),
            },
        );

        assert!(!result.changed);
        assert!(state.status.is_loading());
        assert!(state.recent.is_empty());
        assert_eq!(state.last_city, None);
    }

    #[test]
    fn test_partial_transport_failure_keeps_weather_without_history() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SearchSubmit("Paris".into()));

        let result = reducer(
            &mut state,
            Action::WeatherDidPartial {
                generation: 1,
                city: "Paris".into(),
                weather: paris(),
                failure: FetchFailure::Transport,
            },
        );

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.status.weather(), Some(&paris()));
        assert_eq!(state.status.error(), Some("Failed to fetch data"));
        assert_eq!(state.last_city.as_deref(), Some("Paris"));
        assert!(state.recent.is_empty());
    }

    #[test]
    fn test_toggle_units_without_city_only_flips() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::UiToggleUnits);

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.unit, Units::Imperial);
        assert_eq!(state.status, FetchStatus::Idle);
    }

    #[test]
    fn test_toggle_units_refetches_last_city() {
        let mut state = AppState {
            last_city: Some("Tokyo".into()),
            generation: 3,
            ..Default::default()
        };

        let result = reducer(&mut state, Action::UiToggleUnits);

        assert!(state.status.is_loading());
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather {
                city: "Tokyo".into(),
                units: Units::Imperial,
                generation: 4,
            }]
        );
    }

    #[test]
    fn test_toggle_units_restarts_in_flight_search() {
        let mut state = AppState {
            last_city: Some("Oslo".into()),
            ..Default::default()
        };
        reducer(&mut state, Action::SearchSubmit("Paris".into()));

        let result = reducer(&mut state, Action::UiToggleUnits);

        assert_eq!(state.generation, 2);
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather {
                city: "Paris".into(),
                units: Units::Imperial,
                generation: 2,
            }]
        );
    }

    #[test]
    fn test_recent_focus_and_confirm() {
        let mut state = AppState::new(
            Units::Metric,
            RecentSearches::from_cities(["Oslo".into(), "Lima".into()]),
        );

        assert!(reducer(&mut state, Action::UiFocusRecent).changed);
        assert_eq!(state.focus, Focus::Recent);
        assert!(reducer(&mut state, Action::RecentSelect(1)).changed);
        assert!(!reducer(&mut state, Action::RecentSelect(5)).changed);

        let result = reducer(&mut state, Action::RecentConfirm);
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather {
                city: "Lima".into(),
                units: Units::Metric,
                generation: 1,
            }]
        );
    }

    #[test]
    fn test_focus_recent_requires_history() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::UiFocusRecent).changed);
        assert_eq!(state.focus, Focus::Search);
    }

    #[test]
    fn test_tick_only_while_loading() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::Tick).changed);

        state.status = FetchStatus::Loading;
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.tick_count, 1);
    }
}
