mod session;

pub use session::*;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use parley_shared::constants::SESSION_COOKIE;
use parley_shared::validation::{validate_file_url, validate_uid};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::models::LoginRequest;
use crate::AppState;

/// POST /api/auth/login
///
/// The uid has already been verified by the identity provider on the
/// client; this records (or refreshes) the user and opens a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let uid = body.uid.trim();
    validate_uid(uid)?;
    if body.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if body.email.trim().is_empty() {
        return Err(ApiError::bad_request("Email is required"));
    }
    if let Some(ref pic) = body.profile_pic {
        validate_file_url(pic)?;
    }

    let user = db::profiles::upsert_user(&state.db, &LoginRequest {
        uid: uid.to_string(),
        name: body.name,
        email: body.email,
        profile_pic: body.profile_pic,
    })
    .await?;

    let cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}",
        SESSION_COOKIE, user.id, state.config.session_max_age_secs
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| ApiError::Internal("Failed to build session cookie".into()))?,
    );

    tracing::info!("User {} signed in", user.id);

    Ok((StatusCode::CREATED, headers, Json(user)))
}
