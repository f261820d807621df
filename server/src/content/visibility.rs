//! Content visibility and mutation policy.

use crate::access::{AccessError, Actor, Viewer};
use crate::db::{ContentEntry, ContentKind};
use crate::permissions::{Capability, ContentOp, Requirement};

/// Translate the caller and their `?published=` into a storage filter.
///
/// Callers without `content.view_unpublished` always get published rows.
/// Elevated callers get published rows by default and every row with
/// `published=false`.
#[must_use]
pub fn published_filter(viewer: &Viewer, requested: Option<bool>) -> Option<bool> {
    if viewer.can(Capability::ContentViewUnpublished) && requested == Some(false) {
        None
    } else {
        Some(true)
    }
}

/// Whether a single entry may be shown to the viewer.
#[must_use]
pub fn can_view(viewer: &Viewer, entry: &ContentEntry) -> bool {
    entry.published || viewer.can(Capability::ContentViewUnpublished)
}

/// Require `<kind>.<op>` for the actor.
pub fn ensure_can(actor: &Actor, kind: ContentKind, op: ContentOp) -> Result<(), AccessError> {
    Requirement::Capability(Capability::Content(kind, op)).evaluate(Some(actor))
}

/// Creating an entry already published needs both create and publish.
pub fn ensure_can_create(actor: &Actor, kind: ContentKind, published: bool) -> Result<(), AccessError> {
    ensure_can(actor, kind, ContentOp::Create)?;
    if published {
        ensure_can(actor, kind, ContentOp::Publish)?;
    }
    Ok(())
}
