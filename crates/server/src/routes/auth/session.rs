use axum::{
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use parley_shared::constants::SESSION_COOKIE;

use crate::middleware::CurrentProfile;

/// POST /api/auth/logout
pub async fn logout() -> impl IntoResponse {
    let cookie = format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE);

    let mut headers = HeaderMap::new();
    if let Ok(value) = cookie.parse() {
        headers.insert(SET_COOKIE, value);
    }

    (StatusCode::NO_CONTENT, headers)
}

/// GET /api/profile
pub async fn get_profile(CurrentProfile(profile): CurrentProfile) -> impl IntoResponse {
    Json(profile)
}
