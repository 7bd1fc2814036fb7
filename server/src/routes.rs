use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};

#[derive(Deserialize)]
pub struct CheckUsernameRequest {
    #[serde(rename = "newUsername")]
    pub new_username: String,
}

#[derive(Debug, Serialize)]
pub struct CheckUsernameResponse {
    pub exists: bool,
}

/// `POST /check-username`. Requires the service Bearer token in the
/// Authorization header.
pub async fn check_username_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CheckUsernameRequest>,
) -> Result<Json<CheckUsernameResponse>, ApiError> {
    check_service_token(&headers, &state.config.service_token)?;

    let exists = state.directory.contains(&payload.new_username).await?;

    Ok(Json(CheckUsernameResponse { exists }))
}

fn check_service_token(headers: &HeaderMap, token: &str) -> Result<(), ApiError> {
    let header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if header != format!("Bearer {token}") {
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}
