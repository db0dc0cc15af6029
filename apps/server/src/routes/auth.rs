use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use super::Body;
use crate::auth::{AuthUser, Session, SignInRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

pub(super) async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Body(request): Body<SignInRequest>,
) -> ApiResult<Json<Session>> {
    let session = state
        .auth
        .sign_in(&state.store, &request, user_agent(&headers))
        .await?;
    Ok(Json(session))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap, user: AuthUser) -> StatusCode {
    state
        .auth
        .sign_out(&state.store, user.claims(), user_agent(&headers))
        .await;
    StatusCode::NO_CONTENT
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Me {
    email: String,
    display_name: String,
    expires_at: i64,
}

async fn me(user: AuthUser) -> Json<Me> {
    let claims = user.claims();
    Json(Me {
        email: claims.sub.clone(),
        display_name: claims.name.clone(),
        expires_at: claims.exp,
    })
}
