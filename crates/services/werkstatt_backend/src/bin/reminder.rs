//! Batch job: mails a reminder for every appointment starting in about
//! `reminder.hours_before` hours. Run it from cron or a systemd timer.

use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use werkstatt_appointments::ReminderSweeper;
use werkstatt_config::load_config;
use werkstatt_mail::create_mailer;
use werkstatt_store::JsonFileRepository;

#[tokio::main]
async fn main() -> ExitCode {
    werkstatt_common::init();

    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let repository = JsonFileRepository::new(&config.store.path);
    if !repository.exists() {
        info!("No appointment store at {}, nothing to do", config.store.path);
        return ExitCode::SUCCESS;
    }

    let mailer = match create_mailer(&config, config.reminder_transport()) {
        Ok(mailer) => mailer,
        Err(e) => {
            error!("Failed to set up mail transport: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let sweeper = ReminderSweeper::new(config, Arc::new(repository), mailer);
    match sweeper.run().await {
        Ok(report) => {
            info!(
                "Reminders: {} sent, {} failed of {} appointments",
                report.sent, report.failed, report.checked
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Reminder sweep failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
