use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

use clicker_db::format_timestamp;
use clicker_db::models::BalanceUpdate;
use clicker_types::api::{ActiveBoostResponse, BuyBoostRequest, BuyBoostResponse};
use clicker_types::validation::required;

use crate::error::ApiError;
use crate::{AppState, run_db};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// POST /api/buy-boost
///
/// Checks the balance, deducts the price, then records the boost. The steps
/// are separate store calls with no transaction around them: a failed insert
/// leaves the price deducted.
pub async fn buy_boost(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<BuyBoostRequest>, ApiError>,
) -> Result<Json<BuyBoostResponse>, ApiError> {
    let (Some(user_id), Some(boost_type), Some(price), Some(duration)) = (
        required(req.user_id),
        required(req.boost_type),
        required(req.price),
        required(req.duration),
    ) else {
        return Err(ApiError::BadRequest("Missing required fields"));
    };

    let id = user_id.clone();
    let balance = run_db(&state, move |db| db.get_token_balance(&id)).await?;
    if !balance.is_some_and(|b| b >= price) {
        debug!("Boost purchase rejected for {}: balance {:?}, price {}", user_id, balance, price);
        return Err(ApiError::BadRequest("Insufficient tokens"));
    }

    let expiry = boost_expiry(Utc::now(), duration).ok_or(ApiError::BadRequest("Invalid duration"))?;
    let active_until = format_timestamp(expiry);

    let id = user_id.clone();
    let update = run_db(&state, move |db| db.deduct_tokens(&id, price)).await?;
    if update == BalanceUpdate::OutOfRange {
        return Err(ApiError::BadRequest("Token balance out of range"));
    }

    let (id, kind, until) = (user_id.clone(), boost_type.clone(), active_until.clone());
    run_db(&state, move |db| db.insert_boost(&id, &kind, &until)).await?;

    info!("User {} bought boost {} until {}", user_id, boost_type, active_until);
    Ok(Json(BuyBoostResponse {
        message: format!("Boost {} purchased", boost_type),
        active_until,
    }))
}

/// GET /api/active-boost/{user_id}
pub async fn get_active_boost(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ActiveBoostResponse>, ApiError> {
    let now = format_timestamp(Utc::now());
    let boost = run_db(&state, move |db| db.get_active_boost(&user_id, &now))
        .await?
        .ok_or(ApiError::NotFound("No active boost found"))?;

    Ok(Json(ActiveBoostResponse {
        boost_type: boost.boost_type,
        active_until: boost.active_until,
    }))
}

/// `now` plus `hours`, truncated to whole milliseconds. `None` when the
/// result is out of range.
fn boost_expiry(now: DateTime<Utc>, hours: f64) -> Option<DateTime<Utc>> {
    let millis = hours * MILLIS_PER_HOUR;
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    now.checked_add_signed(TimeDelta::try_milliseconds(millis as i64)?)
}
