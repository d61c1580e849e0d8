use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use tracing::{debug, info};

use clicker_db::models::BalanceUpdate;
use clicker_types::api::{ClaimTokensRequest, ClickRequest, MessageResponse, RegisterRequest, UserStatsResponse};
use clicker_types::validation::required;

use crate::error::ApiError;
use crate::{AppState, run_db};

/// POST /api/register: create the user, or rename an existing one.
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = required(req.user_id).ok_or(ApiError::BadRequest("userId is required"))?;
    let username = req.username;

    let id = user_id.clone();
    run_db(&state, move |db| db.upsert_user(&id, username.as_deref())).await?;

    info!("Registered user {}", user_id);
    Ok(Json(MessageResponse::new(format!("User {} registered", user_id))))
}

/// POST /api/click. An unknown user is not an error, the update just
/// matches nothing.
pub async fn click(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<ClickRequest>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (Some(user_id), Some(reward)) = (required(req.user_id), required(req.click_reward)) else {
        return Err(ApiError::BadRequest("Missing required fields"));
    };

    match run_db(&state, move |db| db.record_click(&user_id, reward)).await? {
        BalanceUpdate::Applied => {}
        BalanceUpdate::UnknownUser => debug!("Click for unknown user ignored"),
        BalanceUpdate::OutOfRange => return Err(ApiError::BadRequest("Token balance out of range")),
    }

    Ok(Json(MessageResponse::new(format!("{} tokens added", reward))))
}

/// POST /api/claim-tokens
pub async fn claim_tokens(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<ClaimTokensRequest>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (Some(user_id), Some(tokens)) = (required(req.user_id), required(req.tokens)) else {
        return Err(ApiError::BadRequest("Missing required fields"));
    };

    // Read and write are separate store calls; concurrent claims for the
    // same user can both pass this check.
    let id = user_id.clone();
    let balance = run_db(&state, move |db| db.get_token_balance(&id)).await?;
    if !balance.is_some_and(|b| b >= tokens) {
        debug!("Claim of {} tokens rejected for {}: balance {:?}", tokens, user_id, balance);
        return Err(ApiError::BadRequest("Insufficient tokens"));
    }

    let update = run_db(&state, move |db| db.deduct_tokens(&user_id, tokens)).await?;
    if update == BalanceUpdate::OutOfRange {
        return Err(ApiError::BadRequest("Token balance out of range"));
    }

    Ok(Json(MessageResponse::new(format!("{} tokens claimed", tokens))))
}

/// GET /api/user/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserStatsResponse>, ApiError> {
    let row = run_db(&state, move |db| db.get_user(&user_id))
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(UserStatsResponse {
        id: row.id,
        username: row.username,
        total_clicks: row.total_clicks,
        total_tokens: row.total_tokens,
    }))
}
