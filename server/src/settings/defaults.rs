//! Seeded site settings.

use tracing::info;

use crate::db::{NewSetting, SettingAccessLevel, SettingStore, StoreResult};

/// `(key, default value, category, access level)`
const DEFAULTS: &[(&str, &str, &str, SettingAccessLevel)] = &[
    ("site_name", "Game Wiki", "general", SettingAccessLevel::Admin),
    ("maintenance_mode", "false", "general", SettingAccessLevel::Admin),
    ("announcement", "", "public", SettingAccessLevel::Admin),
    ("yandex_metrika_id", "", "analytics", SettingAccessLevel::Founder),
    ("google_analytics_id", "", "analytics", SettingAccessLevel::Founder),
    ("terms_of_service", "", "legal", SettingAccessLevel::Admin),
    ("privacy_policy", "", "legal", SettingAccessLevel::Admin),
];

/// Insert any missing default settings. Existing values are never touched.
pub async fn seed_settings<S>(store: &S) -> StoreResult<()>
where
    S: SettingStore + ?Sized,
{
    for (key, value, category, access_level) in DEFAULTS {
        store
            .insert_setting_if_missing(NewSetting {
                key: (*key).to_string(),
                value: (*value).to_string(),
                category: (*category).to_string(),
                access_level: *access_level,
            })
            .await?;
    }
    info!(count = DEFAULTS.len(), "Settings seeded");
    Ok(())
}
