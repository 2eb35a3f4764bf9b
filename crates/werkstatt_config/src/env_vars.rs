//! Environment variable handling for the Werkstatt backend.
//!
//! Structured overrides use `<PREFIX>__SECTION__KEY`. The flat variables of
//! older deployments (`SHOP_NAME`, `GCAL_PRIVATE_KEY`, ...) are mapped onto
//! config paths by [`legacy_overrides`].

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "WERKSTATT";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Flat variable name → config path.
pub const LEGACY_ENV_VARS: &[(&str, &str)] = &[
    ("GCAL_KEY_PATH", "gcal.key_path"),
    ("GCAL_CLIENT_EMAIL", "gcal.client_email"),
    ("GCAL_PRIVATE_KEY", "gcal.private_key"),
    ("GCAL_CALENDAR_ID", "gcal.calendar_id"),
    ("RESEND_API_KEY", "mail.resend.api_key"),
    ("SMTP_HOST", "mail.smtp.host"),
    ("SMTP_PORT", "mail.smtp.port"),
    ("SMTP_USER", "mail.smtp.username"),
    ("SMTP_PASS", "mail.smtp.password"),
    ("SHOP_NAME", "shop.name"),
    ("SHOP_EMAIL", "shop.email"),
    ("TIMEZONE", "shop.time_zone"),
    ("REMINDER_HOURS_BEFORE", "reminder.hours_before"),
    ("PORT", "server.port"),
    ("ADMIN_API_TOKEN", "admin.api_token"),
];

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Check if a path holds a secret. Such values are never logged.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("key")
        || path_lower.contains("password")
        || path_lower.contains("token")
}

/// Collects the legacy flat variables that are set, as `(config path, value)` pairs.
///
/// Empty values are ignored. Escaped `\n` sequences in the private key are expanded,
/// since PEM keys are usually pasted into a single env line.
pub fn legacy_overrides<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    LEGACY_ENV_VARS
        .iter()
        .filter_map(|(name, path)| {
            let value = lookup(name)?;
            if value.trim().is_empty() {
                return None;
            }
            let value = if *path == "gcal.private_key" {
                value.replace("\\n", "\n")
            } else {
                value
            };
            Some((*path, value))
        })
        .collect()
}
