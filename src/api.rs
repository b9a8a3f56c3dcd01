//! OpenWeatherMap API client

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::action::Action;
use crate::state::{FetchFailure, Forecast, ForecastEntry, Units, WeatherSnapshot};

pub const DEFAULT_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct Condition {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
struct Sys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

/// Current-conditions response
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: Sys,
    #[serde(default)]
    weather: Vec<Condition>,
    main: CurrentMain,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    dt_txt: String,
    main: ForecastMain,
    #[serde(default)]
    weather: Vec<Condition>,
}

/// Forecast response: 3-hour slots over several days
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastItem>,
}

/// Body the provider sends with a non-success status
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn first_condition(conditions: Vec<Condition>) -> Condition {
    conditions.into_iter().next().unwrap_or_default()
}

impl From<CurrentResponse> for WeatherSnapshot {
    fn from(response: CurrentResponse) -> Self {
        let condition = first_condition(response.weather);
        WeatherSnapshot {
            name: response.name,
            country: response.sys.country,
            temperature: response.main.temp,
            humidity: response.main.humidity,
            wind_speed: response.wind.speed,
            description: condition.description,
            icon: condition.icon,
        }
    }
}

impl From<ForecastItem> for ForecastEntry {
    fn from(item: ForecastItem) -> Self {
        let condition = first_condition(item.weather);
        ForecastEntry {
            timestamp: item.dt,
            timestamp_text: item.dt_txt,
            temp_min: item.main.temp_min,
            temp_max: item.main.temp_max,
            description: condition.description,
            icon: condition.icon,
        }
    }
}

impl From<ForecastResponse> for Forecast {
    fn from(response: ForecastResponse) -> Self {
        Forecast {
            entries: response.list.into_iter().map(ForecastEntry::from).collect(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("response parse error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl ApiError {
    /// Collapse into what the dashboard shows: the provider message, or a
    /// fixed transport message for everything else.
    pub fn failure(&self) -> FetchFailure {
        match self {
            ApiError::Status { message, .. } => FetchFailure::Api(message.clone()),
            ApiError::Request(_) | ApiError::Decode(_) => FetchFailure::Transport,
        }
    }
}

/// Decode a response body. The body must be JSON whatever the status;
/// non-success statuses surface the provider's `message`.
pub fn decode_response<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &[u8],
) -> Result<T, ApiError> {
    if status.is_success() {
        return Ok(serde_json::from_slice(body)?);
    }
    let error: ErrorBody = serde_json::from_slice(body)?;
    let message = error.message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

// ============================================================================
// Client
// ============================================================================

/// Result of one two-stage search
#[derive(Debug)]
pub enum SearchOutcome {
    Complete {
        weather: WeatherSnapshot,
        forecast: Forecast,
    },
    ForecastFailed {
        weather: WeatherSnapshot,
        error: ApiError,
    },
    Failed(ApiError),
}

impl SearchOutcome {
    pub fn into_action(self, generation: u64, city: String) -> Action {
        match self {
            SearchOutcome::Complete { weather, forecast } => Action::WeatherDidLoad {
                generation,
                city,
                weather,
                forecast,
            },
            SearchOutcome::ForecastFailed { weather, error } => Action::WeatherDidPartial {
                generation,
                city,
                weather,
                failure: error.failure(),
            },
            SearchOutcome::Failed(error) => Action::WeatherDidError {
                generation,
                failure: error.failure(),
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Full request URL for `endpoint` (`weather` or `forecast`)
    pub fn endpoint_url(&self, endpoint: &str, city: &str, units: Units) -> String {
        format!(
            "{}/{}?q={}&appid={}&units={}",
            self.base_url.trim_end_matches('/'),
            endpoint,
            urlencoding::encode(city),
            urlencoding::encode(&self.api_key),
            units.as_query()
        )
    }

    pub async fn current(&self, city: &str, units: Units) -> Result<WeatherSnapshot, ApiError> {
        let response: CurrentResponse = self.get_json("weather", city, units).await?;
        Ok(response.into())
    }

    pub async fn forecast(&self, city: &str, units: Units) -> Result<Forecast, ApiError> {
        let response: ForecastResponse = self.get_json("forecast", city, units).await?;
        Ok(response.into())
    }

    /// Current conditions first; the forecast is only requested once they arrive.
    pub async fn search(&self, city: &str, units: Units) -> SearchOutcome {
        let weather = match self.current(city, units).await {
            Ok(weather) => weather,
            Err(error) => return SearchOutcome::Failed(error),
        };
        match self.forecast(city, units).await {
            Ok(forecast) => SearchOutcome::Complete { weather, forecast },
            Err(error) => SearchOutcome::ForecastFailed { weather, error },
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
        units: Units,
    ) -> Result<T, ApiError> {
        let url = self.endpoint_url(endpoint, city, units);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_response(status, &body)
    }
}
