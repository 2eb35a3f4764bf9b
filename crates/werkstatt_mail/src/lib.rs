//! Outgoing mail for the Werkstatt backend.
//!
//! Every transport implements [`NotificationService`]. Which one is used is decided
//! by [`create_mailer`] from the `mail.transport` (or `reminder.transport`) setting.

pub mod error;
pub mod ics;
/// Resend HTTP API transport.
pub mod resend;
pub mod service;
/// SMTP (STARTTLS relay) transport.
pub mod smtp;

pub use error::MailError;
pub use ics::{build_ics, build_ics_at, IcsInvite};
pub use resend::ResendMailer;
pub use service::{create_mailer, sender_address, DisabledMailer};
pub use smtp::SmtpMailer;

pub use werkstatt_common::services::{EmailMessage, NotificationResult, NotificationService};

/// File name of the calendar invite attachment.
pub const ICS_FILENAME: &str = "termin.ics";
/// Content type of the calendar invite attachment.
pub const ICS_CONTENT_TYPE: &str = "text/calendar; method=REQUEST";
