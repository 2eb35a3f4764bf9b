//! One-off helper that runs the installed-app OAuth flow and stores the
//! resulting token next to the client secret.
//!
//! Usage: `gcal-oauth-setup [scope]`. Expects `credentials.json` in the working
//! directory and writes `token.json`. Does nothing if `token.json` already exists.

use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};
use yup_oauth2::{read_application_secret, InstalledFlowAuthenticator, InstalledFlowReturnMethod};

const CREDENTIALS_PATH: &str = "credentials.json";
const TOKEN_PATH: &str = "token.json";
const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";

async fn run(scope: &str) -> Result<(), Box<dyn std::error::Error>> {
    let secret = read_application_secret(CREDENTIALS_PATH)
        .await
        .map_err(|e| format!("{}: {}", CREDENTIALS_PATH, e))?;

    let auth =
        InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::Interactive)
            .persist_tokens_to_disk(TOKEN_PATH)
            .build()
            .await?;

    auth.token(&[scope]).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    werkstatt_common::init();

    if Path::new(TOKEN_PATH).exists() {
        info!("{} already exists, nothing to do", TOKEN_PATH);
        return ExitCode::SUCCESS;
    }

    let scope = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SCOPE.to_string());

    match run(&scope).await {
        Ok(()) => {
            info!("Token stored in {} (scope {})", TOKEN_PATH, scope);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("OAuth setup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
