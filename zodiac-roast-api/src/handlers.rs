use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;
use zodiac_roast_app::domain::{RateLimitStatus, RoastRecord, RoastSubmission};
use zodiac_roast_app::AppContext;
use zodiac_roast_errors::AppError;

#[derive(Serialize)]
pub struct CreatedRoast {
    id: Uuid,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn create_roast(
    State(ctx): State<AppContext>,
    payload: Result<Json<RoastSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedRoast>), AppError> {
    let Json(submission) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let id = ctx.create_roast.execute(submission).await?;
    Ok((StatusCode::CREATED, Json(CreatedRoast { id })))
}

pub async fn list_roasts(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<RoastRecord>>, AppError> {
    Ok(Json(ctx.queries.list_roasts().await?))
}

pub async fn get_roast(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<RoastRecord>, AppError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::Validation(format!("'{id}' is not a roast id")))?;
    Ok(Json(ctx.queries.get_roast(id).await?))
}

pub async fn rate_limit(
    State(ctx): State<AppContext>,
) -> Result<Json<RateLimitStatus>, AppError> {
    Ok(Json(ctx.queries.check_rate_limit().await?))
}
