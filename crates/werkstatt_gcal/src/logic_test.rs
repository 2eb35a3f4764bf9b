#[cfg(test)]
mod tests {
    use crate::logic::{blocked_slots, calendar_overview, OVERVIEW_MAX_RESULTS};
    use chrono::{Duration, Utc};
    use werkstatt_common::models::{BlockedSlot, RemoteCalendarEvent};
    use werkstatt_common::testing::InMemoryCalendarService;

    fn timed(id: &str, start: &str, end: &str) -> RemoteCalendarEvent {
        RemoteCalendarEvent {
            id: id.to_string(),
            summary: Some("Werkstatt: Service – Max".to_string()),
            description: None,
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            all_day: false,
            attendees: vec![],
        }
    }

    #[test]
    fn test_blocked_slots_skip_all_day_events() {
        let mut holiday = timed("evt_2", "2025-12-24", "2025-12-25");
        holiday.all_day = true;
        let events = vec![
            timed("evt_1", "2025-12-23T09:00:00+00:00", "2025-12-23T10:00:00+00:00"),
            holiday,
        ];

        assert_eq!(
            blocked_slots(&events),
            vec![BlockedSlot {
                start: "2025-12-23T09:00:00+00:00".to_string(),
                end: "2025-12-23T10:00:00+00:00".to_string(),
            }]
        );
    }

    #[test]
    fn test_blocked_slots_need_both_bounds() {
        let mut open_ended = timed("evt_1", "2025-12-23T09:00:00+00:00", "");
        open_ended.end = None;
        assert!(blocked_slots(&[open_ended]).is_empty());
    }

    #[tokio::test]
    async fn test_overview_lists_only_upcoming_events() {
        let now = Utc::now();
        let past = timed(
            "evt_past",
            &(now - Duration::hours(2)).to_rfc3339(),
            &(now - Duration::hours(1)).to_rfc3339(),
        );
        let upcoming = timed(
            "evt_next",
            &(now + Duration::hours(1)).to_rfc3339(),
            &(now + Duration::hours(2)).to_rfc3339(),
        );
        let calendar = InMemoryCalendarService::with_events(vec![past, upcoming]);

        let overview = calendar_overview(&calendar, now).await.unwrap();

        assert!(overview.success);
        assert_eq!(overview.events.len(), 1);
        assert_eq!(overview.events[0].id, "evt_next");
        assert_eq!(overview.blocked_slots.len(), 1);
    }

    #[tokio::test]
    async fn test_overview_is_capped() {
        let now = Utc::now();
        let events = (0..60)
            .map(|i| {
                let start = now + Duration::hours(i + 1);
                timed(
                    &format!("evt_{}", i),
                    &start.to_rfc3339(),
                    &(start + Duration::minutes(30)).to_rfc3339(),
                )
            })
            .collect();
        let calendar = InMemoryCalendarService::with_events(events);

        let overview = calendar_overview(&calendar, now).await.unwrap();
        assert_eq!(overview.events.len(), OVERVIEW_MAX_RESULTS as usize);
    }
}
