//! Content HTTP Handlers
//!
//! One set of handlers serves all four kinds; the router injects the kind
//! as an extension.

use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;
use validator::Validate;
use wiki_common::ApiResponse;

use super::error::ContentError;
use super::types::{
    CreateContentRequest, DeletedContent, ListQuery, PublishRequest, UpdateContentRequest,
};
use super::visibility::{can_view, ensure_can, ensure_can_create, published_filter};
use crate::access::{Actor, Viewer};
use crate::api::{ApiJson, ApiPath, ApiQuery, AppState};
use crate::audit::{self, AuditAction};
use crate::db::{ContentEntry, ContentKind, ContentQuery, NewContent};
use crate::error::ApiResult;
use crate::permissions::ContentOp;

/// GET /api/{kind}
#[tracing::instrument(skip(state, viewer, query))]
pub async fn list(
    State(state): State<AppState>,
    Extension(kind): Extension<ContentKind>,
    viewer: Viewer,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ContentEntry>>>> {
    let page = query.page_params();
    let search = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(String::from);

    let (entries, total) = state
        .store
        .list_content(&ContentQuery {
            kind,
            published: published_filter(&viewer, query.published),
            search,
            limit: i64::from(page.limit()),
            offset: page.offset(),
        })
        .await?;

    Ok(Json(ApiResponse::paginated(entries, page.pagination(total))))
}

/// GET /api/{kind}/{slug}
#[tracing::instrument(skip(state, viewer))]
pub async fn get_by_slug(
    State(state): State<AppState>,
    Extension(kind): Extension<ContentKind>,
    viewer: Viewer,
    ApiPath(slug): ApiPath<String>,
) -> ApiResult<Json<ApiResponse<ContentEntry>>> {
    let entry = state
        .store
        .find_content_by_slug(kind, &slug)
        .await?
        .filter(|e| can_view(&viewer, e))
        .ok_or(ContentError::NotFound(kind))?;

    Ok(Json(ApiResponse::ok(entry)))
}

/// POST /api/{kind}
#[tracing::instrument(skip(state, actor, body), fields(user_id = %actor.user_id))]
pub async fn create(
    State(state): State<AppState>,
    Extension(kind): Extension<ContentKind>,
    actor: Actor,
    ApiJson(body): ApiJson<CreateContentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ContentEntry>>)> {
    ensure_can_create(&actor, kind, body.published).map_err(ContentError::from)?;
    body.validate()?;

    let entry = state
        .store
        .create_content(NewContent {
            kind,
            slug: body.slug,
            title: body.title,
            summary: body.summary,
            body: body.body,
            published: body.published,
            author_id: Some(actor.user_id),
        })
        .await
        .map_err(ContentError::from)?;

    audit::record(
        &*state.store,
        Some(actor.user_id),
        AuditAction::ContentCreate,
        kind.as_str(),
        entry.id,
        Some(audit::snapshot(None::<&()>, Some(&entry))),
    )
    .await;

    tracing::info!(content_id = %entry.id, kind = kind.as_str(), slug = %entry.slug, "Content created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(entry))))
}

/// PATCH /api/{kind}/{id}
#[tracing::instrument(skip(state, actor, body), fields(user_id = %actor.user_id))]
pub async fn update(
    State(state): State<AppState>,
    Extension(kind): Extension<ContentKind>,
    actor: Actor,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateContentRequest>,
) -> ApiResult<Json<ApiResponse<ContentEntry>>> {
    ensure_can(&actor, kind, ContentOp::Edit).map_err(ContentError::from)?;
    body.validate()?;

    let before = state
        .store
        .find_content_by_id(kind, id)
        .await?
        .ok_or(ContentError::NotFound(kind))?;

    let entry = state
        .store
        .update_content(kind, id, body.into())
        .await?
        .ok_or(ContentError::NotFound(kind))?;

    audit::record(
        &*state.store,
        Some(actor.user_id),
        AuditAction::ContentUpdate,
        kind.as_str(),
        id,
        Some(audit::snapshot(Some(&before), Some(&entry))),
    )
    .await;

    Ok(Json(ApiResponse::ok(entry)))
}

/// PUT /api/{kind}/{id}/publish
#[tracing::instrument(skip(state, actor, body), fields(user_id = %actor.user_id))]
pub async fn set_published(
    State(state): State<AppState>,
    Extension(kind): Extension<ContentKind>,
    actor: Actor,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<PublishRequest>,
) -> ApiResult<Json<ApiResponse<ContentEntry>>> {
    ensure_can(&actor, kind, ContentOp::Publish).map_err(ContentError::from)?;

    let before = state
        .store
        .find_content_by_id(kind, id)
        .await?
        .ok_or(ContentError::NotFound(kind))?;

    if before.published == body.published {
        return Ok(Json(ApiResponse::ok(before)));
    }

    let entry = state
        .store
        .set_content_published(kind, id, body.published)
        .await?
        .ok_or(ContentError::NotFound(kind))?;

    let action = if entry.published {
        AuditAction::ContentPublish
    } else {
        AuditAction::ContentUnpublish
    };
    audit::record(
        &*state.store,
        Some(actor.user_id),
        action,
        kind.as_str(),
        id,
        Some(audit::snapshot(
            Some(&serde_json::json!({ "published": before.published })),
            Some(&serde_json::json!({ "published": entry.published })),
        )),
    )
    .await;

    Ok(Json(ApiResponse::ok(entry)))
}

/// DELETE /api/{kind}/{id}
#[tracing::instrument(skip(state, actor), fields(user_id = %actor.user_id))]
pub async fn remove(
    State(state): State<AppState>,
    Extension(kind): Extension<ContentKind>,
    actor: Actor,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ApiResponse<DeletedContent>>> {
    ensure_can(&actor, kind, ContentOp::Delete).map_err(ContentError::from)?;

    let before = state
        .store
        .find_content_by_id(kind, id)
        .await?
        .ok_or(ContentError::NotFound(kind))?;

    if !state.store.delete_content(kind, id).await? {
        return Err(ContentError::NotFound(kind).into());
    }

    audit::record(
        &*state.store,
        Some(actor.user_id),
        AuditAction::ContentDelete,
        kind.as_str(),
        id,
        Some(audit::snapshot(Some(&before), None::<&()>)),
    )
    .await;

    tracing::info!(content_id = %id, kind = kind.as_str(), "Content deleted");
    Ok(Json(ApiResponse::ok(DeletedContent { id, kind })))
}
