use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::entity::{alerts, signals};
use shared::DEFAULT_ALERTS_LIMIT;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::error::ApiError;
use crate::state::AppState;

/// Raw query of `GET /api/signals`. Both values are coerced by hand so a bad
/// `minScore` yields an empty list instead of a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SignalsQuery {
    #[serde(rename = "minScore")]
    pub min_score: Option<String>,
    #[serde(rename = "onlyStrong")]
    pub only_strong: Option<String>,
}

impl SignalsQuery {
    /// Missing or blank -> 0, numeric text -> its value, anything else -> NaN.
    pub fn min_score(&self) -> f64 {
        match self.min_score.as_deref().map(str::trim) {
            None | Some("") => 0.0,
            Some(raw) => raw.parse().unwrap_or(f64::NAN),
        }
    }

    pub fn only_strong(&self) -> bool {
        self.only_strong.as_deref() == Some("true")
    }
}

pub fn build_router(state: AppState, dashboard_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/signals", get(list_signals))
        .route("/api/signals/latest", get(latest_update))
        .route("/api/signals/:id", get(get_signal))
        .route("/api/alerts", get(list_alerts))
        .fallback_service(ServeDir::new(dashboard_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let last_refresh = state
        .scheduler
        .last_refresh()
        .await
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true));
    Json(json!({ "status": "ok", "lastRefresh": last_refresh }))
}

async fn list_signals(
    State(state): State<AppState>,
    Query(query): Query<SignalsQuery>,
) -> Result<Json<Vec<signals::Model>>, ApiError> {
    let signals = state
        .storage
        .get_signals(query.min_score(), query.only_strong())
        .await?;
    Ok(Json(signals))
}

/// Reports the time of the request, not of the last write.
async fn latest_update() -> Json<Value> {
    Json(json!({ "lastUpdate": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true) }))
}

async fn get_signal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<signals::Model>, ApiError> {
    let id = parse_signal_id(&id)?.ok_or(ApiError::NotFound)?;

    match state.storage.get_signal(id).await? {
        Some(signal) => Ok(Json(signal)),
        None => Err(ApiError::NotFound),
    }
}

/// Non-numeric text is a validation error. Numbers that cannot name a row
/// (fractional, out of `i32` range, non-finite) yield `None`.
fn parse_signal_id(raw: &str) -> Result<Option<i32>, ApiError> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i32>() {
        return Ok(Some(id));
    }
    let value: f64 = raw.parse().map_err(|_| ApiError::Validation {
        field: "id",
        message: format!("Invalid signal id: {}", raw),
    })?;
    if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        Ok(Some(value as i32))
    } else {
        Ok(None)
    }
}

async fn list_alerts(State(state): State<AppState>) -> Result<Json<Vec<alerts::Model>>, ApiError> {
    let alerts = state.storage.get_alerts(DEFAULT_ALERTS_LIMIT).await?;
    Ok(Json(alerts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(min_score: Option<&str>, only_strong: Option<&str>) -> SignalsQuery {
        SignalsQuery {
            min_score: min_score.map(str::to_string),
            only_strong: only_strong.map(str::to_string),
        }
    }

    #[test]
    fn test_min_score_coercion() {
        assert_eq!(query(None, None).min_score(), 0.0);
        assert_eq!(query(Some(""), None).min_score(), 0.0);
        assert_eq!(query(Some(" 60 "), None).min_score(), 60.0);
        assert_eq!(query(Some("72.5"), None).min_score(), 72.5);
        assert!(query(Some("abc"), None).min_score().is_nan());
    }

    #[test]
    fn test_signal_id_parsing() {
        assert_eq!(parse_signal_id("42").unwrap(), Some(42));
        assert_eq!(parse_signal_id(" -1 ").unwrap(), Some(-1));
        assert_eq!(parse_signal_id("1.0").unwrap(), Some(1));
        assert_eq!(parse_signal_id("2147483648").unwrap(), None);
        assert_eq!(parse_signal_id("99999999999").unwrap(), None);
        assert_eq!(parse_signal_id("2.5").unwrap(), None);
        assert_eq!(parse_signal_id("inf").unwrap(), None);
        assert!(matches!(
            parse_signal_id("abc"),
            Err(ApiError::Validation { field: "id", .. })
        ));
    }

    #[test]
    fn test_only_strong_requires_literal_true() {
        assert!(query(None, Some("true")).only_strong());
        assert!(!query(None, Some("1")).only_strong());
        assert!(!query(None, Some("TRUE")).only_strong());
        assert!(!query(None, None).only_strong());
    }
}
