// --- File: crates/werkstatt_common/src/handlers.rs ---

pub const LIVENESS_TEXT: &str = "✅ Werkstatt Backend läuft (Google Sync)";

/// Plain-text liveness probe.
pub async fn liveness_handler() -> &'static str {
    LIVENESS_TEXT
}
