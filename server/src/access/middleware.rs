//! Access Middleware

use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::actor::Actor;
use crate::api::AppState;
use crate::auth::{actor_from_token, AuthError};
use crate::error::ApiError;
use crate::permissions::Requirement;

/// Resolve the request's actor, if any.
///
/// Applied to the whole router. No `Authorization` header means anonymous;
/// a header that is present but unusable is rejected with 401 even on
/// public routes.
#[tracing::instrument(skip_all, fields(user_id = tracing::field::Empty))]
pub async fn resolve_actor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => {
            let token = value
                .to_str()
                .ok()
                .and_then(|h| h.strip_prefix("Bearer "))
                .ok_or(AuthError::InvalidAuthHeader)?;
            Some(token.to_owned())
        }
    };

    if let Some(token) = token {
        let actor = actor_from_token(&state, &token).await?;
        tracing::Span::current().record("user_id", tracing::field::display(actor.user_id));
        request.extensions_mut().insert(actor);
    }

    Ok(next.run(request).await)
}

/// Middleware factory enforcing a [`Requirement`] before the handler runs.
///
/// # Usage
///
/// ```ignore
/// Router::new()
///     .route("/api/admin/users", get(list_users))
///     .layer(from_fn(require(Requirement::admin_or_above())));
/// ```
pub fn require(
    requirement: Requirement,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>>
       + Clone
       + Send
       + 'static {
    move |request: Request, next: Next| {
        let decision = requirement.evaluate(request.extensions().get::<Actor>());
        let requirement = requirement.clone();
        Box::pin(async move {
            match decision {
                Ok(()) => next.run(request).await,
                Err(err) => {
                    tracing::debug!(?requirement, error = %err, "Request denied");
                    ApiError::from(err).into_response()
                }
            }
        })
    }
}
