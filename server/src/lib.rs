//! Game Wiki Server
//!
//! Backend for a community game wiki: curated items, guides, locations and
//! patch notes, local accounts with role-based permissions, and the admin
//! endpoints staff use to manage users and settings.
//!
//! Authorization runs through a single primitive:
//!
//! ```
//! use wiki_server::db::ContentKind;
//! use wiki_server::permissions::{Capabilities, Capability, ContentOp};
//!
//! let publish = Capability::Content(ContentKind::Guide, ContentOp::Publish);
//! assert_eq!(publish.key(), "guides.publish");
//! assert!(!Capabilities::GUIDES_EDIT.has(publish));
//! ```

pub mod access;
pub mod admin;
pub mod api;
pub mod audit;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod permissions;
pub mod roles;
pub mod settings;
