//! Site Settings HTTP Handlers

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;
use wiki_common::ApiResponse;

use crate::access::guard::{ensure_can_read_setting, ensure_can_update_setting, setting_visible_to};
use crate::access::{AccessError, Actor};
use crate::api::{ApiJson, ApiPath, AppState};
use crate::audit::{self, AuditAction};
use crate::db::{SiteSetting, StoreError};
use crate::error::{ApiError, ApiResult};
use crate::permissions::{Capability, Requirement};

/// Categories readable without authentication.
///
/// `analytics` is founder-level for writes but public for reads: the frontend
/// embeds the tracker IDs in every page, so they are not secrets.
pub const PUBLIC_CATEGORIES: &[&str] = &["public", "analytics"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Setting not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::NotFound(_) => Self::not_found(err.to_string()),
            SettingsError::Access(e) => e.into(),
            SettingsError::Store(e) => e.into(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingRequest {
    #[validate(length(max = 65536))]
    pub value: String,
}

/// GET /api/settings/public
pub async fn public_settings(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<BTreeMap<String, String>>>> {
    let values = state
        .store
        .list_settings()
        .await?
        .into_iter()
        .filter(|s| PUBLIC_CATEGORIES.contains(&s.category.as_str()))
        .map(|s| (s.key, s.value))
        .collect();

    Ok(Json(ApiResponse::ok(values)))
}

/// GET /api/settings
///
/// Founder-level settings are omitted for everyone but the founder.
#[tracing::instrument(skip(state, actor), fields(user_id = %actor.user_id))]
pub async fn list_settings(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Json<ApiResponse<Vec<SiteSetting>>>> {
    Requirement::Capability(Capability::SettingsView)
        .evaluate(Some(&actor))
        .map_err(SettingsError::from)?;

    let settings = state
        .store
        .list_settings()
        .await?
        .into_iter()
        .filter(|s| setting_visible_to(&actor, s))
        .collect();

    Ok(Json(ApiResponse::ok(settings)))
}

/// GET /api/settings/{key}
#[tracing::instrument(skip(state, actor), fields(user_id = %actor.user_id))]
pub async fn get_setting(
    State(state): State<AppState>,
    actor: Actor,
    ApiPath(key): ApiPath<String>,
) -> ApiResult<Json<ApiResponse<SiteSetting>>> {
    Requirement::Capability(Capability::SettingsView)
        .evaluate(Some(&actor))
        .map_err(SettingsError::from)?;

    let setting = state
        .store
        .find_setting(&key)
        .await?
        .ok_or(SettingsError::NotFound(key))?;
    ensure_can_read_setting(&actor, &setting).map_err(SettingsError::from)?;

    Ok(Json(ApiResponse::ok(setting)))
}

/// PUT /api/settings/{key}
#[tracing::instrument(skip(state, actor, body), fields(user_id = %actor.user_id))]
pub async fn update_setting(
    State(state): State<AppState>,
    actor: Actor,
    ApiPath(key): ApiPath<String>,
    ApiJson(body): ApiJson<UpdateSettingRequest>,
) -> ApiResult<Json<ApiResponse<SiteSetting>>> {
    Requirement::Capability(Capability::SettingsEdit)
        .evaluate(Some(&actor))
        .map_err(SettingsError::from)?;

    let before = state
        .store
        .find_setting(&key)
        .await?
        .ok_or_else(|| SettingsError::NotFound(key.clone()))?;
    ensure_can_update_setting(&actor, &before).map_err(SettingsError::from)?;
    body.validate()?;

    let setting = state
        .store
        .update_setting_value(&key, &body.value, actor.user_id)
        .await?
        .ok_or(SettingsError::NotFound(key))?;

    audit::record(
        &*state.store,
        Some(actor.user_id),
        AuditAction::SettingUpdate,
        "setting",
        &setting.key,
        Some(audit::snapshot(Some(&before.value), Some(&setting.value))),
    )
    .await;

    tracing::info!(key = %setting.key, "Setting updated");
    Ok(Json(ApiResponse::ok(setting)))
}
