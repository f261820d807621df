//! Authentication HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;
use wiki_common::ApiResponse;

use super::service;
use super::types::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, UserProfile};
use crate::access::Actor;
use crate::api::{ApiJson, AppState};
use crate::audit::{self, AuditAction};
use crate::error::{ApiError, ApiResult};
use crate::roles::resolve_role_by_id;

/// POST /auth/register
#[tracing::instrument(skip(state, body), fields(username = %body.username))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    body.validate()?;

    let (user, role) = service::register(&*state.store, &state.config, &body).await?;
    let token = super::jwt::issue_token(
        user.id,
        &user.username,
        &state.config.jwt_secret,
        state.config.jwt_expiry,
    )
    .map_err(ApiError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(AuthResponse {
            access_token: token,
            token_type: "Bearer",
            expires_in: state.config.jwt_expiry,
            user: UserProfile::new(user, &role),
        })),
    ))
}

/// POST /auth/login
#[tracing::instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    body.validate()?;

    let session =
        service::authenticate(&*state.store, &state.config, &body.identifier, &body.password)
            .await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// GET /auth/me
#[tracing::instrument(skip(state, actor), fields(user_id = %actor.user_id))]
pub async fn me(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let user = state
        .store
        .find_user_by_id(actor.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    let role = resolve_role_by_id(&*state.store, user.role_id).await?;

    Ok(Json(ApiResponse::ok(UserProfile::new(user, &role))))
}

/// PATCH /auth/me
#[tracing::instrument(skip(state, actor, body), fields(user_id = %actor.user_id))]
pub async fn update_me(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    body.validate()?;

    let before = state
        .store
        .find_user_by_id(actor.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let user = match body.email {
        Some(ref email) if !email.eq_ignore_ascii_case(&before.email) => {
            let updated = state
                .store
                .update_user_email(actor.user_id, email)
                .await?
                .ok_or_else(|| ApiError::not_found("User not found"))?;

            audit::record(
                &*state.store,
                Some(actor.user_id),
                AuditAction::UserProfileUpdate,
                "user",
                actor.user_id,
                Some(audit::snapshot(
                    Some(&serde_json::json!({ "email": before.email })),
                    Some(&serde_json::json!({ "email": updated.email })),
                )),
            )
            .await;
            updated
        }
        _ => before,
    };

    let role = resolve_role_by_id(&*state.store, user.role_id).await?;
    Ok(Json(ApiResponse::ok(UserProfile::new(user, &role))))
}
