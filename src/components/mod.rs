pub mod current_conditions;
pub mod dashboard;
pub mod forecast_grid;
pub mod recent_searches;
pub mod search_input;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use current_conditions::{CurrentConditions, CurrentConditionsProps};
pub use dashboard::{Dashboard, DashboardProps, ERROR_ICON};
pub use forecast_grid::{ForecastGrid, ForecastGridProps};
pub use recent_searches::{RecentSearchesBar, RecentSearchesProps};
pub use search_input::{SearchInput, SearchInputProps};
