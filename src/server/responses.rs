use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        Error,
        forecast::{ForecastSummary, HourlySample},
        production::ProductionSnapshot,
        profile::{AnnotatedSample, Comparison, LoadProfile},
    },
    prelude::error,
    quantity::{
        mass::Kilograms,
        power::{Kilowatts, Megawatts},
    },
};

#[derive(Deserialize)]
pub struct ForecastQuery {
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct OptimizeRequest {
    pub power_kw: Option<f64>,
    pub duration_hours: Option<u32>,
    pub standard_start_hour: Option<u32>,
    pub date: Option<String>,
}

impl OptimizeRequest {
    pub const DEFAULT_STANDARD_START_HOUR: u32 = 6;
}

#[derive(Serialize)]
pub struct ForecastResponse {
    pub success: bool,
    pub summary: Option<ForecastSummary>,
    pub hourly_data: Vec<HourlyData<HourlySample>>,
}

/// Hourly record with the hour of day spelled out for the front end.
#[derive(Serialize)]
pub struct HourlyData<T> {
    pub hour: u32,

    #[serde(flatten)]
    pub inner: T,
}

impl<T> HourlyData<T> {
    pub fn new(timestamp: DateTime<Utc>, inner: T) -> Self {
        Self { hour: timestamp.hour(), inner }
    }
}

#[derive(Serialize)]
pub struct OptimizeResponse {
    pub success: bool,
    pub date: NaiveDate,
    pub data_fetch_time: DateTime<Utc>,
    pub standard_profile: ProfileBody,
    pub optimal_profile: ProfileBody,
    pub savings: Savings,
    pub hourly_data: Vec<HourlyData<AnnotatedSample>>,
}

#[derive(Serialize)]
pub struct ProfileBody {
    pub start_hour: u32,

    #[serde(rename = "load_kw")]
    pub load: Kilowatts,

    #[serde(flatten)]
    pub profile: LoadProfile,
}

impl From<LoadProfile> for ProfileBody {
    fn from(profile: LoadProfile) -> Self {
        Self { start_hour: profile.start_hour(), load: profile.load.into(), profile }
    }
}

#[derive(Serialize)]
pub struct Savings {
    #[serde(rename = "emissions_saved_kg")]
    pub emissions_saved: Kilograms,

    #[serde(rename = "emissions_saved_pct")]
    pub saved_percentage: f64,

    pub time_shift_hours: i64,
    pub km_equivalent: f64,
}

impl From<&Comparison> for Savings {
    fn from(comparison: &Comparison) -> Self {
        Self {
            emissions_saved: comparison.emissions_saved,
            saved_percentage: comparison.saved_percentage,
            time_shift_hours: comparison.time_shift_hours,
            km_equivalent: comparison.km_equivalent(),
        }
    }
}

#[derive(Serialize)]
pub struct ProductionResponse {
    pub success: bool,
    pub source: &'static str,

    #[serde(flatten)]
    pub snapshot: ProductionSnapshot,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
}

/// Failed request with a JSON body.
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse { error: error.into(), help: None },
        }
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorResponse { error: error.into(), help: None },
        }
    }

    #[must_use]
    pub const fn with_help(mut self, help: &'static str) -> Self {
        self.body.help = Some(help);
        self
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let status = if matches!(error, Error::InvalidWindow { .. }) {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let error = format!("{:#}", anyhow::Error::from(error));
        error!(%status, "{error}");
        Self { status, body: ErrorResponse { error, help: None } }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Parse the optional `YYYY-MM-DD` date.
pub fn parse_date(date: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    date.filter(|date| !date.is_empty())
        .map(|date| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| ApiError::bad_request("invalid date format, use YYYY-MM-DD"))
        })
        .transpose()
}

/// Validated optimization parameters.
pub struct OptimizeParameters {
    pub load: Megawatts,
    pub duration_hours: u32,
    pub standard_start_hour: u32,
    pub date: Option<NaiveDate>,
}

impl TryFrom<OptimizeRequest> for OptimizeParameters {
    type Error = ApiError;

    fn try_from(request: OptimizeRequest) -> Result<Self, Self::Error> {
        let (Some(power_kw), Some(duration_hours)) = (request.power_kw, request.duration_hours)
        else {
            return Err(ApiError::bad_request("`power_kw` and `duration_hours` are required"));
        };
        if !power_kw.is_finite() || power_kw <= 0.0 {
            return Err(ApiError::bad_request("`power_kw` must be positive"));
        }
        if !(1..=24).contains(&duration_hours) {
            return Err(ApiError::bad_request("`duration_hours` must be between 1 and 24"));
        }
        let standard_start_hour =
            request.standard_start_hour.unwrap_or(OptimizeRequest::DEFAULT_STANDARD_START_HOUR);
        if standard_start_hour > 23 {
            return Err(ApiError::bad_request("`standard_start_hour` must be between 0 and 23"));
        }
        Ok(Self {
            load: Kilowatts(power_kw).into(),
            duration_hours,
            standard_start_hour,
            date: parse_date(request.date.as_deref())?,
        })
    }
}
