use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use chrono::{NaiveDate, Utc};

use crate::{
    api::entsoe::TOKEN_HELP,
    core::{CarbonForecast, FeedSource, ScheduleOptimizer, cache::CachedForecast},
    prelude::*,
    server::{
        AppState,
        responses::{
            ApiError,
            ForecastQuery,
            ForecastResponse,
            HealthResponse,
            HourlyData,
            OptimizeParameters,
            OptimizeRequest,
            OptimizeResponse,
            ProductionResponse,
            Savings,
            parse_date,
        },
    },
};

pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy", timestamp: Utc::now() })
}

#[instrument(skip_all, fields(date = ?query.date))]
pub async fn get_forecast<S: FeedSource + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let date = parse_date(query.date.as_deref())?;
    let CachedForecast { forecast, .. } = get_forecast_on(&state, date).await?;
    Ok(Json(ForecastResponse {
        success: true,
        summary: forecast.summary(),
        hourly_data: forecast
            .samples()
            .iter()
            .map(|sample| HourlyData::new(sample.timestamp, *sample))
            .collect(),
    }))
}

#[instrument(skip_all)]
pub async fn optimize_forecast<S: FeedSource + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    request: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let Json(request) =
        request.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let parameters = OptimizeParameters::try_from(request)?;
    info!(
        load = %parameters.load,
        duration_hours = parameters.duration_hours,
        standard_start_hour = parameters.standard_start_hour,
        "optimizing…",
    );

    let CachedForecast { forecast, fetched_at } =
        get_forecast_on(&state, parameters.date).await?;
    let comparison = ScheduleOptimizer::builder()
        .forecast(&forecast)
        .duration_hours(parameters.duration_hours)
        .load(parameters.load)
        .build()
        .compare(parameters.standard_start_hour)?;

    Ok(Json(OptimizeResponse {
        success: true,
        date: forecast.date(),
        data_fetch_time: fetched_at,
        standard_profile: comparison.standard.into(),
        optimal_profile: comparison.optimal.into(),
        savings: Savings::from(&comparison),
        hourly_data: comparison
            .annotate(&forecast)
            .map(|sample| HourlyData::new(sample.sample.timestamp, sample))
            .collect(),
    }))
}

#[instrument(skip_all)]
pub async fn get_realtime_production<S: FeedSource + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ProductionResponse>, ApiError> {
    let Some(entsoe) = &state.entsoe else {
        return Err(ApiError::internal(
            "could not fetch the real-time production, please check `ENTSOE_API_TOKEN` is set",
        )
        .with_help(TOKEN_HELP));
    };
    let snapshot = entsoe.fetch_latest_production(Utc::now()).await?;
    Ok(Json(ProductionResponse { success: true, source: "entsoe", snapshot }))
}

/// Explicit dates always go to the upstream, the latest day comes from the cache.
async fn get_forecast_on<S: FeedSource + Send + Sync + 'static>(
    state: &AppState<S>,
    date: Option<NaiveDate>,
) -> Result<CachedForecast, ApiError> {
    match date {
        Some(date) => {
            let forecast: CarbonForecast = state.builder.build(Some(date)).await?;
            Ok(CachedForecast { forecast: Arc::new(forecast), fetched_at: Utc::now() })
        }
        None => Ok(state.cache.get_or_build(&state.builder).await?),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone};
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    use super::*;
    use crate::{
        core::{
            ForecastBuilder,
            ForecastCache,
            error::Result as CoreResult,
            feed::{Feed, Record},
            forecast::tests::forecast_from_intensities,
        },
        quantity::power::Megawatts,
        server::router,
    };

    /// Flat load with the wind growing through the day, on the 1st of October only.
    struct WindyDay;

    impl WindyDay {
        fn date() -> NaiveDate {
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
        }

        fn midnight() -> DateTime<Utc> {
            Utc.from_utc_datetime(&Self::date().and_hms_opt(0, 0, 0).unwrap())
        }
    }

    #[async_trait]
    impl FeedSource for WindyDay {
        async fn fetch(&self, feed: Feed, on: NaiveDate) -> CoreResult<Vec<Record>> {
            if on != Self::date() {
                return Ok(Vec::new());
            }
            Ok((0..24)
                .map(|hour| {
                    let value = match feed {
                        Feed::Load => 1000.0,
                        Feed::Wind => 40.0 * f64::from(hour),
                        Feed::Solar | Feed::ActualGeneration => 0.0,
                    };
                    (Self::midnight() + TimeDelta::hours(i64::from(hour)), Megawatts(value))
                })
                .collect())
        }
    }

    fn app() -> Router {
        router(Arc::new(AppState {
            builder: ForecastBuilder::new(WindyDay),
            cache: ForecastCache::default(),
            entsoe: None,
        }))
    }

    async fn app_with_cached(intensities: &[f64]) -> Router {
        let cache = ForecastCache::default();
        cache.store(forecast_from_intensities(intensities)).await;
        router(Arc::new(AppState { builder: ForecastBuilder::new(WindyDay), cache, entsoe: None }))
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_ok() {
        let (status, body) = call(app(), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/api/health")
            .header(header::ORIGIN, "https://example.org")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_forecast_invalid_date() {
        let (status, body) = call(app(), get("/api/forecast?date=01-10-2025")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_forecast_on_date_ok() {
        let (status, body) = call(app(), get("/api/forecast?date=2025-10-01")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["summary"]["date"], "2025-10-01");
        assert_eq!(body["summary"]["total_hours"], 24);

        let hourly_data = body["hourly_data"].as_array().unwrap();
        assert_eq!(hourly_data.len(), 24);
        assert_eq!(hourly_data[3]["hour"], 3);
        assert_eq!(hourly_data[3]["total_load_mw"], 1000.0);
        assert_eq!(hourly_data[3]["wind_mw"], 120.0);
        assert_eq!(hourly_data[3]["thermal_and_nuclear_mw"], 880.0);
        assert!(hourly_data[3]["carbon_intensity"].is_f64());
    }

    #[tokio::test]
    async fn test_forecast_missing_day() {
        let (status, body) = call(app(), get("/api/forecast?date=2025-10-02")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("grid load"));
    }

    #[tokio::test]
    async fn test_forecast_from_cache() {
        let app = app_with_cached(&[100.0, 50.0]).await;
        let (status, body) = call(app, get("/api/forecast")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hourly_data"].as_array().unwrap().len(), 2);
        assert_eq!(body["summary"]["min_carbon_intensity"], 50.0);
    }

    #[tokio::test]
    async fn test_optimize_ok() {
        let request = json!({"power_kw": 250.0, "duration_hours": 2, "date": "2025-10-01"});
        let (status, body) = call(app(), post_json("/api/optimize-forecast", &request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2025-10-01");
        assert_eq!(body["standard_profile"]["start_hour"], 6);
        assert_eq!(body["standard_profile"]["load_kw"], 250.0);
        assert_eq!(body["standard_profile"]["energy_kwh"], 500.0);
        // The wind keeps growing, so the last full window is the cleanest:
        assert_eq!(body["optimal_profile"]["start_hour"], 22);
        assert_eq!(body["savings"]["time_shift_hours"], 16);
        assert!(body["savings"]["emissions_saved_kg"].as_f64().unwrap() > 0.0);

        let hourly_data = body["hourly_data"].as_array().unwrap();
        assert_eq!(hourly_data.len(), 24);
        let count = |flag: &str| hourly_data.iter().filter(|hour| hour[flag] == true).count();
        let (n_standard, n_optimal) = (count("is_standard_window"), count("is_optimal_window"));
        assert_eq!((n_standard, n_optimal), (2, 2));
        assert_eq!(hourly_data[6]["is_standard_window"], true);
        assert_eq!(hourly_data[23]["is_optimal_window"], true);
    }

    #[tokio::test]
    async fn test_optimize_requires_power_and_duration() {
        let request = json!({"duration_hours": 2});
        let (status, body) = call(app(), post_json("/api/optimize-forecast", &request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("power_kw"));
    }

    #[tokio::test]
    async fn test_optimize_rejects_invalid_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/optimize-forecast")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{"))
            .unwrap();
        let (status, body) = call(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_optimize_invalid_window() {
        let request = json!({"power_kw": 250.0, "duration_hours": 1, "standard_start_hour": 12});
        let app = app_with_cached(&[100.0, 50.0]).await;
        let (status, body) = call(app, post_json("/api/optimize-forecast", &request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("12:00"));
    }

    #[tokio::test]
    async fn test_realtime_production_without_token() {
        let (status, body) = call(app(), get("/api/realtime-production")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("ENTSOE_API_TOKEN"));
        assert_eq!(body["help"], TOKEN_HELP);
    }
}
