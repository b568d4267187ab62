use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use parley_shared::constants::SESSION_COOKIE;

use crate::db;
use crate::error::ApiError;
use crate::models::{AuthUser, Profile};
use crate::AppState;

/// The raw user id stored in the session cookie, if one is present.
pub fn session_user_id(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    let value = jar.get(SESSION_COOKIE)?.value().trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        session_user_id(&parts.headers)
            .map(|id| AuthUser { id })
            .ok_or(ApiError::Unauthorized)
    }
}

/// The signed-in user's profile, created on their first authenticated request.
#[derive(Debug, Clone)]
pub struct CurrentProfile(pub Profile);

impl FromRequestParts<Arc<AppState>> for CurrentProfile {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let record = match db::profiles::find_user(&state.db, &user.id).await? {
            Some(u) => u,
            None => {
                tracing::debug!("Session names unknown user {}", user.id);
                return Err(ApiError::Unauthorized);
            }
        };

        let profile = db::profiles::get_or_create(&state.db, &record).await?;
        Ok(CurrentProfile(profile))
    }
}
