//! Admin API handlers.
//!
//! Route layers gate on role sets; capability checks and target-dependent
//! rules (self-protection, hierarchy) run here, before any write.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde_json::json;
use uuid::Uuid;
use wiki_common::ApiResponse;

use super::types::{AdminError, AuditLogParams, DeletedUser, UpdateRoleRequest, UpdateStatusRequest};
use crate::access::guard::{ensure_can_assign, ensure_not_self, ensure_outranks};
use crate::access::Actor;
use crate::api::{ApiJson, ApiPath, ApiQuery, AppState, PageParams};
use crate::audit::{self, AuditAction};
use crate::auth::UserProfile;
use crate::db::{AuditLogEntry, User};
use crate::permissions::{Capability, Requirement};
use crate::roles::{self, resolve_role, resolve_role_by_id, RoleError, RoleSummary};

async fn find_user(state: &AppState, id: Uuid) -> Result<User, AdminError> {
    state
        .store
        .find_user_by_id(id)
        .await?
        .ok_or(AdminError::UserNotFound(id))
}

/// List all roles, most trusted first.
///
/// `GET /api/admin/roles`
#[tracing::instrument(skip(state, actor), fields(user_id = %actor.user_id))]
pub async fn list_roles(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<ApiResponse<Vec<RoleSummary>>>, AdminError> {
    Requirement::Capability(Capability::RolesView).evaluate(Some(&actor))?;

    let resolved = roles::list_roles(&*state.store).await?;
    Ok(Json(ApiResponse::ok(
        resolved.iter().map(RoleSummary::from).collect(),
    )))
}

/// List users with pagination.
///
/// `GET /api/admin/users`
#[tracing::instrument(skip(state, actor), fields(user_id = %actor.user_id))]
pub async fn list_users(
    State(state): State<AppState>,
    actor: Actor,
    ApiQuery(page): ApiQuery<PageParams>,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, AdminError> {
    Requirement::Capability(Capability::UsersView).evaluate(Some(&actor))?;

    let (users, total) = state
        .store
        .list_users(i64::from(page.limit()), page.offset())
        .await?;

    let by_id: HashMap<Uuid, _> = roles::list_roles(&*state.store)
        .await?
        .into_iter()
        .map(|role| (role.id, role))
        .collect();

    let profiles = users
        .into_iter()
        .map(|user| -> Result<UserProfile, AdminError> {
            let role = by_id
                .get(&user.role_id)
                .ok_or_else(|| RoleError::NotFound(user.role_id.to_string()))?;
            Ok(UserProfile::new(user, role))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ApiResponse::paginated(profiles, page.pagination(total))))
}

/// Get one user's profile.
///
/// `GET /api/admin/users/{id}`
#[tracing::instrument(skip(state, actor), fields(user_id = %actor.user_id))]
pub async fn get_user(
    State(state): State<AppState>,
    actor: Actor,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<UserProfile>>, AdminError> {
    Requirement::Capability(Capability::UsersView).evaluate(Some(&actor))?;

    let user = find_user(&state, id).await?;
    let role = resolve_role_by_id(&*state.store, user.role_id).await?;
    Ok(Json(ApiResponse::ok(UserProfile::new(user, &role))))
}

/// Change a user's role.
///
/// `PUT /api/admin/users/{id}/role`
///
/// The actor must strictly outrank the target's current role and may only
/// assign roles below their own (founders may assign any role).
#[tracing::instrument(skip(state, actor, body), fields(user_id = %actor.user_id, role = ?body.role))]
pub async fn update_user_role(
    State(state): State<AppState>,
    actor: Actor,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AdminError> {
    Requirement::Capability(Capability::UsersManage).evaluate(Some(&actor))?;
    ensure_not_self(&actor, id)?;

    let target = find_user(&state, id).await?;
    let current = resolve_role_by_id(&*state.store, target.role_id).await?;
    ensure_outranks(&actor, &current)?;

    let next = resolve_role(&*state.store, body.role).await?;
    ensure_can_assign(&actor, &next)?;

    if next.id == current.id {
        return Ok(Json(ApiResponse::ok(UserProfile::new(target, &current))));
    }

    let user = state
        .store
        .set_user_role(id, next.id)
        .await?
        .ok_or(AdminError::UserNotFound(id))?;

    audit::record(
        &*state.store,
        Some(actor.user_id),
        AuditAction::UserRoleChange,
        "user",
        id,
        Some(audit::snapshot(
            Some(&json!({ "role": current.name })),
            Some(&json!({ "role": next.name })),
        )),
    )
    .await;

    tracing::info!(target_id = %id, from = %current.name, to = %next.name, "User role changed");
    Ok(Json(ApiResponse::ok(UserProfile::new(user, &next))))
}

/// Activate or deactivate a user.
///
/// `PUT /api/admin/users/{id}/status`
#[tracing::instrument(skip(state, actor, body), fields(user_id = %actor.user_id, is_active = body.is_active))]
pub async fn update_user_status(
    State(state): State<AppState>,
    actor: Actor,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AdminError> {
    Requirement::Capability(Capability::UsersManage).evaluate(Some(&actor))?;
    ensure_not_self(&actor, id)?;

    let target = find_user(&state, id).await?;
    let role = resolve_role_by_id(&*state.store, target.role_id).await?;
    ensure_outranks(&actor, &role)?;

    if target.is_active == body.is_active {
        return Ok(Json(ApiResponse::ok(UserProfile::new(target, &role))));
    }

    let user = state
        .store
        .set_user_active(id, body.is_active)
        .await?
        .ok_or(AdminError::UserNotFound(id))?;

    audit::record(
        &*state.store,
        Some(actor.user_id),
        AuditAction::UserStatusChange,
        "user",
        id,
        Some(audit::snapshot(
            Some(&json!({ "is_active": target.is_active })),
            Some(&json!({ "is_active": user.is_active })),
        )),
    )
    .await;

    tracing::info!(target_id = %id, is_active = user.is_active, "User status changed");
    Ok(Json(ApiResponse::ok(UserProfile::new(user, &role))))
}

/// Permanently delete a user. Founder only.
///
/// `DELETE /api/admin/users/{id}`
#[tracing::instrument(skip(state, actor), fields(user_id = %actor.user_id))]
pub async fn delete_user(
    State(state): State<AppState>,
    actor: Actor,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<DeletedUser>>, AdminError> {
    Requirement::founder_only().evaluate(Some(&actor))?;
    Requirement::Capability(Capability::UsersDelete).evaluate(Some(&actor))?;
    ensure_not_self(&actor, id)?;

    let target = find_user(&state, id).await?;
    let role = resolve_role_by_id(&*state.store, target.role_id).await?;
    ensure_outranks(&actor, &role)?;

    if !state.store.delete_user(id).await? {
        return Err(AdminError::UserNotFound(id));
    }

    audit::record(
        &*state.store,
        Some(actor.user_id),
        AuditAction::UserDelete,
        "user",
        id,
        Some(audit::snapshot::<_, ()>(
            Some(&json!({
                "username": target.username,
                "email": target.email,
                "role": role.name,
            })),
            None,
        )),
    )
    .await;

    tracing::warn!(target_id = %id, username = %target.username, "User deleted");
    Ok(Json(ApiResponse::ok(DeletedUser { id, deleted: true })))
}

/// Read the audit log, newest first.
///
/// `GET /api/admin/audit-log`
#[tracing::instrument(skip(state, actor, params), fields(user_id = %actor.user_id))]
pub async fn get_audit_log(
    State(state): State<AppState>,
    actor: Actor,
    ApiQuery(params): ApiQuery<AuditLogParams>,
) -> Result<Json<ApiResponse<Vec<AuditLogEntry>>>, AdminError> {
    Requirement::Capability(Capability::AuditView).evaluate(Some(&actor))?;

    let page = params.page_params();
    let (entries, total) = state
        .store
        .list_audit(
            i64::from(page.limit()),
            page.offset(),
            params.action_prefix(),
        )
        .await?;

    Ok(Json(ApiResponse::paginated(entries, page.pagination(total))))
}
