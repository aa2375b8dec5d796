//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::NaiveDate;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::aladhan::PrayerTimesSource;
use crate::domain::{AdjustmentMap, AdjustmentProfile, nearby_mosques_url};
use crate::error::ScheduleError;
use crate::ramadan::load_ramadan;
use crate::schedule::load_daily;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S: PrayerTimesSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/timings", get(daily_timings::<S>))
        .route("/api/ramadan", get(ramadan_calendar::<S>))
        .route("/api/ramadan/day", get(ramadan_day::<S>))
        .route("/api/mosques", get(nearby_mosques))
        .route("/api/home", put(set_home::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Today's adjusted timings with the current and next prayer.
async fn daily_timings<S: PrayerTimesSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<TimingsResponse>, AppError> {
    let adjustments = request_adjustments(&state, &query)?;

    // A requested date keeps the current time of day
    let now = state.clock.now();
    let now = match query.date.as_deref() {
        Some(raw) => date_param(raw)?.and_time(now.time()),
        None => now,
    };

    let schedule = load_daily(
        state.source.as_ref(),
        &query.location(),
        query.params(state.config.params),
        &adjustments,
        now,
    )
    .await?;

    Ok(Json(TimingsResponse::from_schedule(&schedule)))
}

/// The whole Ramadan month of the current Hijri year.
async fn ramadan_calendar<S: PrayerTimesSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<RamadanResponse>, AppError> {
    let adjustments = request_adjustments(&state, &query)?;
    let now = state.clock.now();

    let calendar = load_ramadan(
        state.source.as_ref(),
        &query.location(),
        query.params(state.config.params),
        &adjustments,
        now.date(),
    )
    .await?;

    Ok(Json(RamadanResponse::from_calendar(&calendar, now)))
}

/// A single Ramadan day by Gregorian date.
async fn ramadan_day<S: PrayerTimesSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<CalendarDayResult>, AppError> {
    let date = query
        .date
        .as_deref()
        .ok_or_else(|| AppError::BadRequest {
            message: "Missing date (expected YYYY-MM-DD)".to_string(),
        })
        .and_then(date_param)?;
    let adjustments = request_adjustments(&state, &query)?;

    let calendar = load_ramadan(
        state.source.as_ref(),
        &query.location(),
        query.params(state.config.params),
        &adjustments,
        state.clock.now().date(),
    )
    .await?;

    let day = calendar.day_for(date).ok_or_else(|| AppError::NotFound {
        message: format!("{date} is not in Ramadan {}", calendar.hijri_year),
    })?;
    Ok(Json(CalendarDayResult::from_day(day)))
}

/// Link to a map search for mosques near a point.
async fn nearby_mosques(
    Query(query): Query<MosquesQuery>,
) -> Result<Json<MosquesResponse>, AppError> {
    let url = nearby_mosques_url(query.lat, query.lon).map_err(ScheduleError::from)?;
    Ok(Json(MosquesResponse {
        url: url.to_string(),
    }))
}

/// Point the home monitor at a new location.
///
/// A load already in flight for the old location is abandoned.
async fn set_home<S: PrayerTimesSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<HomeResponse>, AppError> {
    let home = state.home.as_ref().ok_or_else(|| AppError::NotFound {
        message: "home monitor is not running".to_string(),
    })?;

    let location = query.location();
    let resolved = location.resolve().map_err(ScheduleError::from)?;
    home.send_replace(location);

    info!(location = %resolved, "home location updated");
    Ok(Json(HomeResponse {
        location: resolved.to_string(),
    }))
}

/// The configured offsets for the requested profile.
fn request_adjustments<S>(
    state: &AppState<S>,
    query: &ScheduleQuery,
) -> Result<AdjustmentMap, AppError> {
    let profile = match query.profile.as_deref() {
        Some(name) => name
            .parse::<AdjustmentProfile>()
            .map_err(|e| AppError::BadRequest {
                message: e.to_string(),
            })?,
        None => state.config.profile,
    };
    Ok(state.config.adjustments_for(profile))
}

fn date_param(raw: &str) -> Result<NaiveDate, AppError> {
    parse_query_date(raw).ok_or_else(|| AppError::BadRequest {
        message: format!("Invalid date: {raw} (expected YYYY-MM-DD)"),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        let message = e.to_string();
        match e {
            ScheduleError::Configuration(_) => AppError::BadRequest { message },
            ScheduleError::Service(_) => AppError::Upstream { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
