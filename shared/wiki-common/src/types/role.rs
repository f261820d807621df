//! Well-known Role Names

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The five roles every deployment ships with, least trusted first.
///
/// The name (not the storage id) is the stable identifier used in
/// authorization checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    User,
    ContentManager,
    Moderator,
    Admin,
    Founder,
}

/// Returned when parsing a role name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl RoleName {
    /// Stored and serialized name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::ContentManager => "content_manager",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
            Self::Founder => "founder",
        }
    }

    /// Human-readable name shown in the admin panel.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::ContentManager => "Content Manager",
            Self::Moderator => "Moderator",
            Self::Admin => "Administrator",
            Self::Founder => "Founder",
        }
    }

    /// Seeded priority. Higher means more trust.
    #[must_use]
    pub const fn default_priority(self) -> i32 {
        match self {
            Self::User => 10,
            Self::ContentManager => 50,
            Self::Moderator => 60,
            Self::Admin => 80,
            Self::Founder => 100,
        }
    }

    /// All roles in ascending priority.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::User,
            Self::ContentManager,
            Self::Moderator,
            Self::Admin,
            Self::Founder,
        ]
    }

    /// Roles whose priority is at least that of `min`.
    ///
    /// ```
    /// use wiki_common::RoleName;
    ///
    /// assert_eq!(
    ///     RoleName::at_least(RoleName::Admin),
    ///     vec![RoleName::Admin, RoleName::Founder]
    /// );
    /// ```
    #[must_use]
    pub fn at_least(min: Self) -> Vec<Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|r| r.default_priority() >= min.default_priority())
            .collect()
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
