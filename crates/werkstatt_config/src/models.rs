// --- File: crates/werkstatt_config/src/models.rs ---

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_TIME_ZONE: &str = "Europe/Berlin";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Take the client address from the last `X-Forwarded-For` hop (one reverse proxy in front).
    #[serde(default = "default_true")]
    pub trust_proxy: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            trust_proxy: true,
        }
    }
}

// --- Shop identity ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ShopConfig {
    #[serde(default = "default_shop_name")]
    pub name: String,
    /// Sender address for all mails and the shop's attendee address on calendar events.
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: default_shop_name(),
            email: String::new(),
            time_zone: default_time_zone(),
        }
    }
}

// --- Google Calendar Config ---
// Either key_path or the client_email/private_key pair must be present.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    pub key_path: Option<String>,
    pub client_email: Option<String>,
    #[serde(skip_serializing)]
    pub private_key: Option<String>,
    pub calendar_id: Option<String>,
}

// --- Mail Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    #[default]
    Resend,
    Smtp,
    Disabled,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResendConfig {
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_resend_url")]
    pub api_url: String,
}

impl Default for ResendConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_resend_url(),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MailConfig {
    #[serde(default)]
    pub transport: MailTransport,
    #[serde(default)]
    pub resend: Option<ResendConfig>,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    /// Also mail the shop itself on every new booking.
    #[serde(default)]
    pub notify_shop_on_booking: bool,
    /// A failed confirmation mail fails the booking request even though it was already stored.
    #[serde(default = "default_true")]
    pub fail_request_on_delivery_error: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransport::default(),
            resend: None,
            smtp: None,
            notify_shop_on_booking: false,
            fail_request_on_delivery_error: true,
        }
    }
}

// --- Local appointment store ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

// --- Reminder batch job ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReminderConfig {
    #[serde(default = "default_hours_before")]
    pub hours_before: f64,
    #[serde(default = "default_window_hours")]
    pub window_hours: f64,
    /// Transport for reminder mails; falls back to `mail.transport`.
    #[serde(default)]
    pub transport: Option<MailTransport>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            hours_before: default_hours_before(),
            window_hours: default_window_hours(),
            transport: None,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AdminConfig {
    /// Bearer token for the admin endpoints. Unset leaves them open.
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

impl AppConfig {
    /// The shop time zone, `Europe/Berlin` when the configured name is unknown.
    ///
    /// [`crate::load_config`] rejects unknown names, so the fallback only applies
    /// to hand-built configs.
    pub fn time_zone(&self) -> Tz {
        Tz::from_str(&self.shop.time_zone).unwrap_or_else(|_| {
            tracing::warn!(
                "Unknown time zone '{}', falling back to Europe/Berlin",
                self.shop.time_zone
            );
            Tz::Europe__Berlin
        })
    }

    /// Target calendar id, if a calendar is configured at all.
    pub fn calendar_id(&self) -> Option<&str> {
        self.gcal
            .as_ref()
            .and_then(|gcal| gcal.calendar_id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }

    /// Shop address, `None` when unset.
    pub fn shop_email(&self) -> Option<&str> {
        Some(self.shop.email.trim()).filter(|email| !email.is_empty())
    }

    /// Transport used by the reminder job.
    pub fn reminder_transport(&self) -> MailTransport {
        self.reminder.transport.unwrap_or(self.mail.transport)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_true() -> bool {
    true
}

fn default_shop_name() -> String {
    "Werkstatt".to_string()
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

fn default_resend_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_store_path() -> String {
    "data/appointments.json".to_string()
}

fn default_hours_before() -> f64 {
    24.0
}

fn default_window_hours() -> f64 {
    0.5
}

fn default_max_requests() -> u32 {
    30
}

fn default_window_secs() -> u64 {
    60
}
