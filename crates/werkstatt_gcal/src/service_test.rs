#[cfg(test)]
mod tests {
    use crate::service::{
        build_event, is_not_found, map_api_error, rewrite_attendee_status, to_remote_event, DisabledCalendarService,
        GcalServiceError,
    };
    use chrono::{NaiveDate, TimeZone, Utc};
    use google_calendar3::api::{Event, EventAttendee, EventDateTime};
    use serde_json::json;
    use werkstatt_common::models::{NewCalendarEvent, ResponseStatus};
    use werkstatt_common::services::CalendarService;
    use werkstatt_common::WerkstattError;

    fn attendee(email: &str, status: &str) -> EventAttendee {
        EventAttendee {
            email: Some(email.to_string()),
            response_status: Some(status.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_rewrite_matches_email_case_insensitively() {
        let attendees = vec![
            attendee("kunde@example.com", "accepted"),
            attendee("Werkstatt@Example.com", "needsAction"),
        ];

        let updated =
            rewrite_attendee_status(attendees, "werkstatt@example.com", ResponseStatus::Declined);

        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0].response_status.as_deref(), Some("accepted"));
        assert_eq!(updated[1].email.as_deref(), Some("Werkstatt@Example.com"));
        assert_eq!(updated[1].response_status.as_deref(), Some("declined"));
    }

    #[test]
    fn test_rewrite_appends_missing_attendee() {
        let updated = rewrite_attendee_status(
            vec![attendee("kunde@example.com", "accepted")],
            "werkstatt@example.com",
            ResponseStatus::Accepted,
        );

        assert_eq!(updated.len(), 2);
        assert_eq!(updated[1].email.as_deref(), Some("werkstatt@example.com"));
        assert_eq!(updated[1].response_status.as_deref(), Some("accepted"));
    }

    #[test]
    fn test_to_remote_event_timed_and_all_day() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let timed = Event {
            id: Some("evt_1".to_string()),
            start: Some(EventDateTime {
                date_time: Some(start),
                ..Default::default()
            }),
            end: Some(EventDateTime {
                date_time: Some(start + chrono::Duration::hours(1)),
                ..Default::default()
            }),
            attendees: Some(vec![attendee("werkstatt@example.com", "somethingElse")]),
            ..Default::default()
        };
        let remote = to_remote_event(timed).unwrap();
        assert_eq!(remote.start.as_deref(), Some("2025-03-10T08:00:00+00:00"));
        assert!(!remote.all_day);
        assert_eq!(remote.attendees[0].response_status, ResponseStatus::NeedsAction);

        let all_day = Event {
            id: Some("evt_2".to_string()),
            start: Some(EventDateTime {
                date: NaiveDate::from_ymd_opt(2025, 12, 24),
                ..Default::default()
            }),
            ..Default::default()
        };
        let remote = to_remote_event(all_day).unwrap();
        assert_eq!(remote.start.as_deref(), Some("2025-12-24"));
        assert!(remote.all_day);
        assert!(remote.end.is_none());
    }

    #[test]
    fn test_to_remote_event_requires_id() {
        let result = to_remote_event(Event::default());
        assert!(matches!(result, Err(GcalServiceError::MalformedEvent(_))));
    }

    #[test]
    fn test_build_event_carries_attendees_and_times() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let event = build_event(NewCalendarEvent {
            summary: "Werkstatt: Service – Max".to_string(),
            description: "Kunde: Max".to_string(),
            start,
            end: start + chrono::Duration::hours(1),
            attendees: vec!["werkstatt@example.com".to_string()],
        });

        assert_eq!(event.start.unwrap().date_time, Some(start));
        let attendees = event.attendees.unwrap();
        assert_eq!(attendees.len(), 1);
        assert_eq!(attendees[0].email.as_deref(), Some("werkstatt@example.com"));

        let without_attendees = build_event(NewCalendarEvent {
            summary: String::new(),
            description: String::new(),
            start,
            end: start,
            attendees: vec![],
        });
        assert!(without_attendees.attendees.is_none());
    }

    #[test]
    fn test_not_found_detection_from_error_body() {
        let gone = google_calendar3::Error::BadRequest(json!({"error": {"code": 410, "message": "Resource has been deleted"}}));
        let missing = google_calendar3::Error::BadRequest(json!({"error": {"code": 404, "message": "Not Found"}}));
        let forbidden = google_calendar3::Error::BadRequest(json!({"error": {"code": 403, "message": "Forbidden"}}));

        assert!(is_not_found(&gone));
        assert!(is_not_found(&missing));
        assert!(!is_not_found(&forbidden));
    }

    fn failure(status: u16, content_length: &str) -> google_calendar3::Error {
        let response = google_calendar3::hyper::Response::builder()
            .status(status)
            .header("content-length", content_length)
            .body(google_calendar3::common::to_body::<String>(None))
            .unwrap();
        google_calendar3::Error::Failure(response)
    }

    #[test]
    fn test_failure_status_decides_not_found() {
        assert!(is_not_found(&failure(404, "0")));
        assert!(is_not_found(&failure(410, "0")));
        assert!(!is_not_found(&failure(502, "1404")));
        assert!(!is_not_found(&failure(503, "4100")));
    }

    #[test]
    fn test_bad_gateway_stays_a_downstream_error() {
        let err: WerkstattError = map_api_error("evt_1", failure(502, "1404")).into();
        assert!(matches!(err, WerkstattError::ExternalServiceError { .. }));

        let err: WerkstattError = map_api_error("evt_1", failure(404, "0")).into();
        assert!(matches!(err, WerkstattError::NotFoundError(_)));
    }

    #[test]
    fn test_error_mapping() {
        let err: WerkstattError = GcalServiceError::NotFound("evt_1".to_string()).into();
        assert!(matches!(err, WerkstattError::NotFoundError(_)));

        let err: WerkstattError = GcalServiceError::NotConfigured.into();
        assert!(matches!(err, WerkstattError::ConfigError(_)));

        let err: WerkstattError = GcalServiceError::MalformedEvent("x".to_string()).into();
        assert!(matches!(err, WerkstattError::ExternalServiceError { .. }));
    }

    #[tokio::test]
    async fn test_disabled_calendar_skips_inserts_and_rejects_the_rest() {
        let calendar = DisabledCalendarService;
        assert!(!calendar.is_configured());

        let start = Utc::now();
        let id = calendar
            .insert_event(NewCalendarEvent {
                summary: "s".to_string(),
                description: "d".to_string(),
                start,
                end: start,
                attendees: vec![],
            })
            .await
            .unwrap();
        assert!(id.is_none());

        assert!(matches!(
            calendar.delete_event("evt_1").await,
            Err(WerkstattError::ConfigError(_))
        ));
        assert!(matches!(
            calendar.list_events(start, 10).await,
            Err(WerkstattError::ConfigError(_))
        ));
    }
}
