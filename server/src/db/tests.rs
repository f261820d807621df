//! Storage Port Tests
//!
//! Exercised against [`MemoryStore`]; the Postgres store shares the same
//! trait contract.

use serde_json::json;
use uuid::Uuid;

use super::*;

async fn store_with_role() -> (MemoryStore, Role) {
    let store = MemoryStore::new();
    let role = store
        .upsert_role(NewRole {
            name: "user".into(),
            display_name: "User".into(),
            priority: 10,
            permissions: json!({}),
        })
        .await
        .unwrap();
    (store, role)
}

fn new_user(username: &str, email: &str, role_id: Uuid) -> NewUser {
    NewUser {
        username: username.into(),
        email: email.into(),
        password_hash: "hash".into(),
        role_id,
    }
}

fn new_guide(slug: &str, title: &str, published: bool) -> NewContent {
    NewContent {
        kind: ContentKind::Guide,
        slug: slug.into(),
        title: title.into(),
        summary: None,
        body: json!({"blocks": []}),
        published,
        author_id: None,
    }
}

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
async fn test_upsert_role_updates_in_place() {
    let (store, role) = store_with_role().await;

    let updated = store
        .upsert_role(NewRole {
            name: "user".into(),
            display_name: "Member".into(),
            priority: 15,
            permissions: json!({"guides": {"create": true}}),
        })
        .await
        .unwrap();

    assert_eq!(updated.id, role.id);
    assert_eq!(updated.display_name, "Member");
    assert_eq!(store.list_roles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_roles_highest_priority_first() {
    let (store, _) = store_with_role().await;
    store
        .upsert_role(NewRole {
            name: "admin".into(),
            display_name: "Administrator".into(),
            priority: 80,
            permissions: json!({}),
        })
        .await
        .unwrap();

    let names: Vec<String> = store
        .list_roles()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["admin", "user"]);
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_username_and_email_uniqueness() {
    let (store, role) = store_with_role().await;
    store
        .create_user(new_user("alice", "alice@example.com", role.id))
        .await
        .unwrap();

    let err = store
        .create_user(new_user("alice", "other@example.com", role.id))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict("username")));

    let err = store
        .create_user(new_user("alice2", "ALICE@example.com", role.id))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict("email")));
}

#[tokio::test]
async fn test_mixed_case_email_is_stored_lowercase() {
    let (store, role) = store_with_role().await;
    let user = store
        .create_user(new_user("bob", "Bob@Example.com", role.id))
        .await
        .unwrap();
    assert_eq!(user.email, "bob@example.com");

    let err = store
        .create_user(new_user("bob2", "bob@example.com", role.id))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict("email")));
    assert_eq!(store.list_users(10, 0).await.unwrap().1, 1);
}

#[tokio::test]
async fn test_create_user_with_unknown_role() {
    let (store, _) = store_with_role().await;
    let err = store
        .create_user(new_user("bob", "bob@example.com", Uuid::now_v7()))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingReference("role")));
}

#[tokio::test]
async fn test_email_lookup_is_case_insensitive() {
    let (store, role) = store_with_role().await;
    let user = store
        .create_user(new_user("carol", "Carol@Example.com", role.id))
        .await
        .unwrap();
    assert_eq!(user.email, "carol@example.com");

    let found = store
        .find_user_by_email("CAROL@example.COM")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);
}

#[tokio::test]
async fn test_record_login_bumps_counter() {
    let (store, role) = store_with_role().await;
    let user = store
        .create_user(new_user("dave", "dave@example.com", role.id))
        .await
        .unwrap();

    store.record_login(user.id, chrono::Utc::now()).await.unwrap();
    store.record_login(user.id, chrono::Utc::now()).await.unwrap();

    let found = store.find_user_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(found.login_count, 2);
    assert!(found.last_login_at.is_some());
}

#[tokio::test]
async fn test_list_users_pages_and_counts() {
    let (store, role) = store_with_role().await;
    for i in 0..5 {
        store
            .create_user(new_user(&format!("user{i}"), &format!("u{i}@example.com"), role.id))
            .await
            .unwrap();
    }

    let (page, total) = store.list_users(2, 4).await.unwrap();
    assert_eq!(total, 5);
    assert_eq!(page.len(), 1);
    assert_eq!(store.count_users_with_role(role.id).await.unwrap(), 5);
}

#[tokio::test]
async fn test_delete_user_reports_absence() {
    let (store, role) = store_with_role().await;
    let user = store
        .create_user(new_user("erin", "erin@example.com", role.id))
        .await
        .unwrap();

    assert!(store.delete_user(user.id).await.unwrap());
    assert!(!store.delete_user(user.id).await.unwrap());
    assert!(store.find_user_by_id(user.id).await.unwrap().is_none());
}

// ============================================================================
// Settings
// ============================================================================

#[tokio::test]
async fn test_seeding_keeps_existing_value() {
    let store = MemoryStore::new();
    let seed = NewSetting {
        key: "site_name".into(),
        value: "Game Wiki".into(),
        category: "general".into(),
        access_level: SettingAccessLevel::Admin,
    };
    store.insert_setting_if_missing(seed.clone()).await.unwrap();

    let editor = Uuid::now_v7();
    store
        .update_setting_value("site_name", "My Wiki", editor)
        .await
        .unwrap()
        .unwrap();
    store.insert_setting_if_missing(seed).await.unwrap();

    let setting = store.find_setting("site_name").await.unwrap().unwrap();
    assert_eq!(setting.value, "My Wiki");
    assert_eq!(setting.updated_by, Some(editor));
}

#[tokio::test]
async fn test_update_missing_setting() {
    let store = MemoryStore::new();
    let updated = store
        .update_setting_value("nope", "x", Uuid::now_v7())
        .await
        .unwrap();
    assert!(updated.is_none());
}

// ============================================================================
// Content
// ============================================================================

#[tokio::test]
async fn test_slug_unique_per_kind() {
    let store = MemoryStore::new();
    store
        .create_content(new_guide("fishing", "Fishing", true))
        .await
        .unwrap();

    let err = store
        .create_content(new_guide("fishing", "Fishing again", false))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict("slug")));

    // Same slug under another kind is fine.
    let mut item = new_guide("fishing", "Fishing Rod", true);
    item.kind = ContentKind::Item;
    store.create_content(item).await.unwrap();
}

#[tokio::test]
async fn test_list_content_filters() {
    let store = MemoryStore::new();
    store
        .create_content(new_guide("fishing", "Fishing Basics", true))
        .await
        .unwrap();
    store
        .create_content(new_guide("mining", "Mining Basics", false))
        .await
        .unwrap();
    store
        .create_content(new_guide("cooking", "Cooking", true))
        .await
        .unwrap();

    let base = ContentQuery {
        kind: ContentKind::Guide,
        published: None,
        search: None,
        limit: 20,
        offset: 0,
    };

    let (_, total) = store.list_content(&base).await.unwrap();
    assert_eq!(total, 3);

    let published = ContentQuery {
        published: Some(true),
        ..base.clone()
    };
    let (rows, total) = store.list_content(&published).await.unwrap();
    assert_eq!(total, 2);
    assert!(rows.iter().all(|r| r.published));

    let search = ContentQuery {
        search: Some("basics".into()),
        ..base.clone()
    };
    let (_, total) = store.list_content(&search).await.unwrap();
    assert_eq!(total, 2);

    let other_kind = ContentQuery {
        kind: ContentKind::Location,
        ..base
    };
    let (rows, total) = store.list_content(&other_kind).await.unwrap();
    assert!(rows.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_update_content_is_partial() {
    let store = MemoryStore::new();
    let guide = store
        .create_content(new_guide("fishing", "Fishing", true))
        .await
        .unwrap();

    let updated = store
        .update_content(
            ContentKind::Guide,
            guide.id,
            ContentPatch {
                title: Some("Fishing 101".into()),
                ..ContentPatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Fishing 101");
    assert_eq!(updated.slug, "fishing");

    // Wrong kind never matches.
    let missing = store
        .update_content(ContentKind::Item, guide.id, ContentPatch::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_delete_content_checks_kind() {
    let store = MemoryStore::new();
    let guide = store
        .create_content(new_guide("fishing", "Fishing", true))
        .await
        .unwrap();

    assert!(!store.delete_content(ContentKind::Patch, guide.id).await.unwrap());
    assert!(store.delete_content(ContentKind::Guide, guide.id).await.unwrap());
}

// ============================================================================
// Audit
// ============================================================================

#[tokio::test]
async fn test_audit_newest_first_with_prefix() {
    let store = MemoryStore::new();
    for action in ["user.register", "setting.update", "user.delete"] {
        store
            .append_audit(NewAuditEntry {
                user_id: None,
                action: action.into(),
                entity: "test".into(),
                entity_id: None,
                changes: None,
            })
            .await
            .unwrap();
    }

    let (rows, total) = store.list_audit(10, 0, None).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(rows[0].action, "user.delete");

    let (rows, total) = store.list_audit(10, 0, Some("user.")).await.unwrap();
    assert_eq!(total, 2);
    assert!(rows.iter().all(|r| r.action.starts_with("user.")));
}
