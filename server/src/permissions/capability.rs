//! Capability vocabulary.
//!
//! Roles carry a nested JSON permission document such as
//! `{"guides": {"edit": true, "publish": false}, "legal": {"edit": true}}`.
//! Each dotted key the server understands is a [`Capability`]; a parsed
//! document is a [`Capabilities`] bitfield. Unknown keys are ignored and
//! missing keys read as `false`.

use bitflags::bitflags;
use serde_json::{Map, Value};

use crate::db::ContentKind;

bitflags! {
    /// Capability set parsed from a role's permission document.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct Capabilities: u32 {
        // === Items (bits 0-3) ===
        const ITEMS_CREATE        = 1 << 0;
        const ITEMS_EDIT          = 1 << 1;
        const ITEMS_DELETE        = 1 << 2;
        const ITEMS_PUBLISH       = 1 << 3;

        // === Guides (bits 4-7) ===
        const GUIDES_CREATE       = 1 << 4;
        const GUIDES_EDIT         = 1 << 5;
        const GUIDES_DELETE       = 1 << 6;
        const GUIDES_PUBLISH      = 1 << 7;

        // === Locations (bits 8-11) ===
        const LOCATIONS_CREATE    = 1 << 8;
        const LOCATIONS_EDIT      = 1 << 9;
        const LOCATIONS_DELETE    = 1 << 10;
        const LOCATIONS_PUBLISH   = 1 << 11;

        // === Patches (bits 12-15) ===
        const PATCHES_CREATE      = 1 << 12;
        const PATCHES_EDIT        = 1 << 13;
        const PATCHES_DELETE      = 1 << 14;
        const PATCHES_PUBLISH     = 1 << 15;

        // === Content visibility (bit 16) ===
        /// See unpublished entries on read paths
        const CONTENT_VIEW_UNPUBLISHED = 1 << 16;

        // === Users (bits 17-19) ===
        const USERS_VIEW          = 1 << 17;
        /// Change role and active state of other users
        const USERS_MANAGE        = 1 << 18;
        const USERS_DELETE        = 1 << 19;

        // === Settings (bits 20-22) ===
        const SETTINGS_VIEW       = 1 << 20;
        const SETTINGS_EDIT       = 1 << 21;
        /// Edit settings in the `legal` category
        const LEGAL_EDIT          = 1 << 22;

        // === Registry (bits 23-24) ===
        const AUDIT_VIEW          = 1 << 23;
        const ROLES_VIEW          = 1 << 24;
    }
}

/// Content operation gated per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentOp {
    Create,
    Edit,
    Delete,
    Publish,
}

impl ContentOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Publish => "publish",
        }
    }
}

/// A single named capability, addressed by its dotted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Content(ContentKind, ContentOp),
    ContentViewUnpublished,
    UsersView,
    UsersManage,
    UsersDelete,
    SettingsView,
    SettingsEdit,
    LegalEdit,
    AuditView,
    RolesView,
}

const CONTENT_OPS: [ContentOp; 4] = [
    ContentOp::Create,
    ContentOp::Edit,
    ContentOp::Delete,
    ContentOp::Publish,
];

const NON_CONTENT: [Capability; 9] = [
    Capability::ContentViewUnpublished,
    Capability::UsersView,
    Capability::UsersManage,
    Capability::UsersDelete,
    Capability::SettingsView,
    Capability::SettingsEdit,
    Capability::LegalEdit,
    Capability::AuditView,
    Capability::RolesView,
];

impl Capability {
    /// Every capability the server understands.
    pub fn all() -> impl Iterator<Item = Self> {
        ContentKind::all()
            .iter()
            .flat_map(|kind| CONTENT_OPS.into_iter().map(move |op| Self::Content(*kind, op)))
            .chain(NON_CONTENT)
    }

    /// `(namespace, action)` pair of the dotted key.
    #[must_use]
    pub const fn path(self) -> (&'static str, &'static str) {
        match self {
            Self::Content(kind, op) => (kind.collection(), op.as_str()),
            Self::ContentViewUnpublished => ("content", "view_unpublished"),
            Self::UsersView => ("users", "view"),
            Self::UsersManage => ("users", "manage"),
            Self::UsersDelete => ("users", "delete"),
            Self::SettingsView => ("settings", "view"),
            Self::SettingsEdit => ("settings", "edit"),
            Self::LegalEdit => ("legal", "edit"),
            Self::AuditView => ("audit", "view"),
            Self::RolesView => ("roles", "view"),
        }
    }

    /// Dotted key, e.g. `guides.publish`.
    #[must_use]
    pub fn key(self) -> String {
        let (namespace, action) = self.path();
        format!("{namespace}.{action}")
    }

    /// Parse a dotted key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let (namespace, action) = key.split_once('.')?;
        Self::all().find(|c| c.path() == (namespace, action))
    }

    /// The bit this capability occupies.
    #[must_use]
    pub const fn flag(self) -> Capabilities {
        match self {
            Self::Content(kind, op) => {
                let base = match kind {
                    ContentKind::Item => 0,
                    ContentKind::Guide => 4,
                    ContentKind::Location => 8,
                    ContentKind::Patch => 12,
                };
                let offset = match op {
                    ContentOp::Create => 0,
                    ContentOp::Edit => 1,
                    ContentOp::Delete => 2,
                    ContentOp::Publish => 3,
                };
                Capabilities::from_bits_truncate(1 << (base + offset))
            }
            Self::ContentViewUnpublished => Capabilities::CONTENT_VIEW_UNPUBLISHED,
            Self::UsersView => Capabilities::USERS_VIEW,
            Self::UsersManage => Capabilities::USERS_MANAGE,
            Self::UsersDelete => Capabilities::USERS_DELETE,
            Self::SettingsView => Capabilities::SETTINGS_VIEW,
            Self::SettingsEdit => Capabilities::SETTINGS_EDIT,
            Self::LegalEdit => Capabilities::LEGAL_EDIT,
            Self::AuditView => Capabilities::AUDIT_VIEW,
            Self::RolesView => Capabilities::ROLES_VIEW,
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (namespace, action) = self.path();
        write!(f, "{namespace}.{action}")
    }
}

impl Capabilities {
    // === Preset Combinations ===

    /// Create, edit and publish for every content kind.
    pub const CONTENT_AUTHORING: Self = Self::ITEMS_CREATE
        .union(Self::ITEMS_EDIT)
        .union(Self::ITEMS_PUBLISH)
        .union(Self::GUIDES_CREATE)
        .union(Self::GUIDES_EDIT)
        .union(Self::GUIDES_PUBLISH)
        .union(Self::LOCATIONS_CREATE)
        .union(Self::LOCATIONS_EDIT)
        .union(Self::LOCATIONS_PUBLISH)
        .union(Self::PATCHES_CREATE)
        .union(Self::PATCHES_EDIT)
        .union(Self::PATCHES_PUBLISH);

    /// Default set for `content_manager`.
    pub const CONTENT_MANAGER_DEFAULT: Self = Self::CONTENT_AUTHORING
        .union(Self::ITEMS_DELETE)
        .union(Self::LOCATIONS_DELETE)
        .union(Self::CONTENT_VIEW_UNPUBLISHED);

    /// Default set for `moderator`: curation without authoring or publishing.
    pub const MODERATOR_DEFAULT: Self = Self::ITEMS_EDIT
        .union(Self::ITEMS_DELETE)
        .union(Self::GUIDES_EDIT)
        .union(Self::GUIDES_DELETE)
        .union(Self::LOCATIONS_EDIT)
        .union(Self::LOCATIONS_DELETE)
        .union(Self::PATCHES_EDIT)
        .union(Self::PATCHES_DELETE)
        .union(Self::CONTENT_VIEW_UNPUBLISHED)
        .union(Self::USERS_VIEW)
        .union(Self::AUDIT_VIEW);

    /// Check a single capability.
    ///
    /// ```
    /// use wiki_server::permissions::{Capabilities, Capability};
    ///
    /// let caps = Capabilities::MODERATOR_DEFAULT;
    /// assert!(caps.has(Capability::AuditView));
    /// assert!(!caps.has(Capability::UsersDelete));
    /// ```
    #[must_use]
    pub const fn has(self, capability: Capability) -> bool {
        self.contains(capability.flag())
    }

    /// Parse a permission document. Only boolean `true` grants a capability.
    #[must_use]
    pub fn from_document(document: &Value) -> Self {
        Capability::all()
            .filter(|cap| {
                let (namespace, action) = cap.path();
                document
                    .get(namespace)
                    .and_then(|ns| ns.get(action))
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            })
            .fold(Self::empty(), |acc, cap| acc | cap.flag())
    }

    /// Render as a full permission document with every known key present.
    #[must_use]
    pub fn to_document(self) -> Value {
        let mut document = Map::new();
        for cap in Capability::all() {
            let (namespace, action) = cap.path();
            let entry = document
                .entry(namespace)
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(actions) = entry {
                actions.insert(action.to_string(), Value::Bool(self.has(cap)));
            }
        }
        Value::Object(document)
    }

    /// Dotted keys of every granted capability, for API responses.
    #[must_use]
    pub fn keys(self) -> Vec<String> {
        Capability::all()
            .filter(|cap| self.has(*cap))
            .map(Capability::key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_every_capability_has_distinct_bit() {
        let all: Vec<Capability> = Capability::all().collect();
        assert_eq!(all.len(), 25);

        let combined = all
            .iter()
            .fold(Capabilities::empty(), |acc, c| acc | c.flag());
        assert_eq!(combined, Capabilities::all());
        assert_eq!(combined.bits().count_ones(), 25);
    }

    #[test]
    fn test_content_flags_line_up_with_named_consts() {
        assert_eq!(
            Capability::Content(ContentKind::Guide, ContentOp::Publish).flag(),
            Capabilities::GUIDES_PUBLISH
        );
        assert_eq!(
            Capability::Content(ContentKind::Patch, ContentOp::Delete).flag(),
            Capabilities::PATCHES_DELETE
        );
        assert_eq!(
            Capability::Content(ContentKind::Item, ContentOp::Create).flag(),
            Capabilities::ITEMS_CREATE
        );
    }

    #[test]
    fn test_key_roundtrip() {
        for cap in Capability::all() {
            assert_eq!(Capability::from_key(&cap.key()), Some(cap));
        }
        assert_eq!(Capability::from_key("guides"), None);
        assert_eq!(Capability::from_key("guides.approve"), None);
    }

    #[test]
    fn test_document_parsing() {
        let doc = json!({
            "guides": {"edit": true, "publish": false},
            "legal": {"edit": true},
            "content": {"view_unpublished": "yes"},
            "weather": {"control": true}
        });
        let caps = Capabilities::from_document(&doc);

        assert!(caps.has(Capability::Content(ContentKind::Guide, ContentOp::Edit)));
        assert!(!caps.has(Capability::Content(ContentKind::Guide, ContentOp::Publish)));
        assert!(caps.has(Capability::LegalEdit));
        // Non-boolean values never grant anything.
        assert!(!caps.has(Capability::ContentViewUnpublished));
        assert_eq!(caps.bits().count_ones(), 2);
    }

    #[test]
    fn test_document_roundtrip_for_presets() {
        for preset in [
            Capabilities::empty(),
            Capabilities::CONTENT_MANAGER_DEFAULT,
            Capabilities::MODERATOR_DEFAULT,
            Capabilities::all(),
        ] {
            assert_eq!(Capabilities::from_document(&preset.to_document()), preset);
        }
    }

    #[test]
    fn test_moderator_cannot_create_or_publish() {
        let caps = Capabilities::MODERATOR_DEFAULT;
        for kind in ContentKind::all() {
            assert!(!caps.has(Capability::Content(*kind, ContentOp::Create)));
            assert!(!caps.has(Capability::Content(*kind, ContentOp::Publish)));
            assert!(caps.has(Capability::Content(*kind, ContentOp::Delete)));
        }
    }

    #[test]
    fn test_content_manager_delete_scope() {
        let caps = Capabilities::CONTENT_MANAGER_DEFAULT;
        assert!(caps.has(Capability::Content(ContentKind::Item, ContentOp::Delete)));
        assert!(caps.has(Capability::Content(ContentKind::Location, ContentOp::Delete)));
        assert!(!caps.has(Capability::Content(ContentKind::Guide, ContentOp::Delete)));
        assert!(!caps.has(Capability::Content(ContentKind::Patch, ContentOp::Delete)));
        assert!(!caps.has(Capability::UsersView));
    }

    #[test]
    fn test_keys_lists_granted_only() {
        let caps = Capabilities::AUDIT_VIEW | Capabilities::ITEMS_EDIT;
        assert_eq!(caps.keys(), vec!["items.edit", "audit.view"]);
    }
}
