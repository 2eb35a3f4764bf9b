//! iCalendar invites attached to confirmation mails.
//!
//! The output is a single `VEVENT` with `METHOD:REQUEST` so mail clients offer
//! to add it to the recipient's calendar.

use chrono::{DateTime, Utc};

pub const PRODID: &str = "-//Werkstatt//Terminbuchung//DE";

const ICS_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Data for one invite.
#[derive(Debug, Clone, PartialEq)]
pub struct IcsInvite {
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub organizer_name: String,
    /// `ORGANIZER` is left out when the shop has no address.
    pub organizer_email: Option<String>,
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.format(ICS_TIME_FORMAT).to_string()
}

/// Escapes a TEXT value (RFC 5545, 3.3.11).
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

// Quoted parameter values may not contain DQUOTE.
fn quote_param(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "'"))
}

/// Builds the invite with `DTSTAMP` set to now.
pub fn build_ics(invite: &IcsInvite) -> String {
    build_ics_at(invite, Utc::now())
}

/// Builds the invite with an explicit `DTSTAMP`.
pub fn build_ics_at(invite: &IcsInvite, stamp: DateTime<Utc>) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODID),
        "METHOD:REQUEST".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", invite.uid),
        format!("DTSTAMP:{}", format_time(&stamp)),
        format!("DTSTART:{}", format_time(&invite.start)),
        format!("DTEND:{}", format_time(&invite.end)),
        format!("SUMMARY:{}", escape_text(&invite.summary)),
        format!("DESCRIPTION:{}", escape_text(&invite.description)),
    ];
    if let Some(email) = invite.organizer_email.as_deref() {
        lines.push(format!(
            "ORGANIZER;CN={}:mailto:{}",
            quote_param(&invite.organizer_name),
            email
        ));
    }
    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn invite() -> IcsInvite {
        let start = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        IcsInvite {
            uid: "apt_1741593600000_1a2b3c4d".to_string(),
            summary: "Autohaus Müller: Ölwechsel – Max".to_string(),
            description: "Kunde: Max\nE-Mail: max@example.com".to_string(),
            start,
            end: start + chrono::Duration::hours(1),
            organizer_name: "Autohaus Müller".to_string(),
            organizer_email: Some("werkstatt@example.com".to_string()),
        }
    }

    #[test]
    fn test_invite_layout() {
        let stamp = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();
        let ics = build_ics_at(&invite(), stamp);
        let lines: Vec<&str> = ics.split("\r\n").collect();

        assert_eq!(
            lines,
            vec![
                "BEGIN:VCALENDAR",
                "VERSION:2.0",
                "PRODID:-//Werkstatt//Terminbuchung//DE",
                "METHOD:REQUEST",
                "BEGIN:VEVENT",
                "UID:apt_1741593600000_1a2b3c4d",
                "DTSTAMP:20250301T123000Z",
                "DTSTART:20250310T080000Z",
                "DTEND:20250310T090000Z",
                "SUMMARY:Autohaus Müller: Ölwechsel – Max",
                "DESCRIPTION:Kunde: Max\\nE-Mail: max@example.com",
                "ORGANIZER;CN=\"Autohaus Müller\":mailto:werkstatt@example.com",
                "END:VEVENT",
                "END:VCALENDAR",
            ]
        );
        assert!(!ics.ends_with("\r\n"));
    }

    #[test]
    fn test_only_dtstamp_varies() {
        let a = build_ics_at(&invite(), Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let b = build_ics_at(&invite(), Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());

        let differing: Vec<_> = a
            .split("\r\n")
            .zip(b.split("\r\n"))
            .filter(|(x, y)| x != y)
            .map(|(x, _)| x)
            .collect();
        assert_eq!(differing, vec!["DTSTAMP:20250101T000000Z"]);
    }

    #[test]
    fn test_text_escaping() {
        assert_eq!(escape_text("a;b,c\\d"), "a\\;b\\,c\\\\d");
        assert_eq!(escape_text("line1\r\nline2\nline3"), "line1\\nline2\\nline3");
    }

    #[test]
    fn test_organizer_omitted_without_email() {
        let mut invite = invite();
        invite.organizer_email = None;
        let ics = build_ics(&invite);
        assert!(!ics.contains("ORGANIZER"));
        assert!(ics.contains("\r\nEND:VEVENT\r\n"));
    }
}
