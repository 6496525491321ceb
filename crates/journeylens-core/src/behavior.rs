// Single-user journey reconstruction
//
// The service fetches ALL of a user's events and sessions (this path is
// deliberately unbounded; see DESIGN.md) and hands them in. Filtering,
// grouping, and summarization happen in memory here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::types::{BehaviorSummary, Event, EventType, PageActivity, Session, User, UserBehavior};

pub const SESSION_TIMELINE_LIMIT: usize = 20;
pub const EVENT_TIMELINE_LIMIT: usize = 50;

/// Page key used for events that carry no page.
const UNKNOWN_PAGE: &str = "Unknown";

/// Optional inclusive date bounds. Only supplied bounds are applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct BehaviorWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl BehaviorWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    fn contains(&self, ts: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if ts < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if ts > end {
                return false;
            }
        }
        true
    }
}

/// Reconstruct a user's behavior from their raw events and sessions.
///
/// Events are filtered by `timestamp`, sessions by `session_start`, both
/// inclusive. Events group by page (first-seen order); timelines are
/// sorted descending and capped.
pub fn reconstruct_behavior(
    user: User,
    events: Vec<Event>,
    sessions: Vec<Session>,
    window: &BehaviorWindow,
) -> UserBehavior {
    let events: Vec<Event> = events
        .into_iter()
        .filter(|e| window.contains(e.timestamp))
        .collect();
    let sessions: Vec<Session> = sessions
        .into_iter()
        .filter(|s| window.contains(s.session_start))
        .collect();

    let events_by_page = group_events_by_page(&events);
    let summary = summarize(&events, &sessions);

    let mut session_timeline = sessions;
    session_timeline.sort_by(|a, b| b.session_start.cmp(&a.session_start));
    session_timeline.truncate(SESSION_TIMELINE_LIMIT);

    let mut event_timeline = events;
    event_timeline.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    event_timeline.truncate(EVENT_TIMELINE_LIMIT);

    UserBehavior {
        user,
        summary,
        events_by_page,
        session_timeline,
        event_timeline,
    }
}

fn group_events_by_page(events: &[Event]) -> Vec<PageActivity> {
    let mut groups: Vec<PageActivity> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for event in events {
        let page = event.page.as_deref().unwrap_or(UNKNOWN_PAGE).to_string();
        let i = *index.entry(page.clone()).or_insert_with(|| {
            groups.push(PageActivity {
                page,
                page_views: 0,
                events: Vec::new(),
            });
            groups.len() - 1
        });
        groups[i].page_views += 1;
        groups[i].events.push(event.clone());
    }

    groups
}

fn summarize(events: &[Event], sessions: &[Session]) -> BehaviorSummary {
    let total_sessions = sessions.len() as i64;
    let total_events = events.len() as i64;
    let total_time_spent: i64 = sessions.iter().map(|s| s.time_spent as i64).sum();
    let total_pages_visited: i64 = sessions.iter().map(|s| s.pages_visited as i64).sum();
    let purchase_count = events
        .iter()
        .filter(|e| e.event_type == EventType::Purchase)
        .count() as i64;

    let (average_time_per_session, average_pages_per_session) = if total_sessions > 0 {
        (
            total_time_spent as f64 / total_sessions as f64,
            total_pages_visited as f64 / total_sessions as f64,
        )
    } else {
        (0.0, 0.0)
    };

    BehaviorSummary {
        total_sessions,
        total_events,
        total_time_spent,
        total_pages_visited,
        purchase_count,
        average_time_per_session,
        average_pages_per_session,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn user() -> User {
        User {
            id: Uuid::now_v7(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: ts(1, 0),
        }
    }

    fn event(event_type: EventType, page: Option<&str>, at: DateTime<Utc>) -> Event {
        Event {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            session_id: None,
            event_type,
            page: page.map(String::from),
            item_id: None,
            duration: 0,
            purchase_count: 0,
            timestamp: at,
            metadata: None,
        }
    }

    fn session(start: DateTime<Utc>, time_spent: i32, pages_visited: i32) -> Session {
        Session {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            session_start: start,
            session_end: None,
            pages_visited,
            time_spent,
            created_at: start,
        }
    }

    #[test]
    fn summary_averages_over_sessions() {
        let sessions = vec![session(ts(1, 9), 100, 3), session(ts(2, 9), 200, 5)];
        let behavior = reconstruct_behavior(user(), vec![], sessions, &BehaviorWindow::default());

        assert_eq!(behavior.summary.total_sessions, 2);
        assert_eq!(behavior.summary.total_time_spent, 300);
        assert_eq!(behavior.summary.total_pages_visited, 8);
        assert_eq!(behavior.summary.average_time_per_session, 150.0);
        assert_eq!(behavior.summary.average_pages_per_session, 4.0);
    }

    #[test]
    fn no_sessions_means_zero_averages() {
        let behavior = reconstruct_behavior(
            user(),
            vec![event(EventType::PageView, Some("/home"), ts(1, 9))],
            vec![],
            &BehaviorWindow::default(),
        );
        assert_eq!(behavior.summary.average_time_per_session, 0.0);
        assert_eq!(behavior.summary.average_pages_per_session, 0.0);
        assert_eq!(behavior.summary.total_events, 1);
    }

    #[test]
    fn events_group_by_page_with_unknown_default() {
        let events = vec![
            event(EventType::PageView, Some("/home"), ts(1, 9)),
            event(EventType::Click, None, ts(1, 10)),
            event(EventType::PageView, Some("/home"), ts(1, 11)),
            event(EventType::PageView, Some("/pricing"), ts(1, 12)),
        ];
        let behavior = reconstruct_behavior(user(), events, vec![], &BehaviorWindow::default());

        let pages: Vec<(&str, i64)> = behavior
            .events_by_page
            .iter()
            .map(|p| (p.page.as_str(), p.page_views))
            .collect();
        assert_eq!(pages, vec![("/home", 2), ("Unknown", 1), ("/pricing", 1)]);
        assert_eq!(behavior.events_by_page[0].events.len(), 2);
    }

    #[test]
    fn purchase_count_counts_purchase_events_only() {
        let events = vec![
            event(EventType::Purchase, Some("/checkout"), ts(1, 9)),
            event(EventType::Purchase, Some("/checkout"), ts(1, 10)),
            event(EventType::AddToCart, Some("/item"), ts(1, 11)),
        ];
        let behavior = reconstruct_behavior(user(), events, vec![], &BehaviorWindow::default());
        assert_eq!(behavior.summary.purchase_count, 2);
    }

    #[test]
    fn window_bounds_are_inclusive_and_independent() {
        let events = vec![
            event(EventType::PageView, Some("/a"), ts(1, 0)),
            event(EventType::PageView, Some("/b"), ts(2, 0)),
            event(EventType::PageView, Some("/c"), ts(3, 0)),
        ];

        // Both bounds, inclusive on each end.
        let window = BehaviorWindow::new(Some(ts(1, 0)), Some(ts(2, 0)));
        let behavior = reconstruct_behavior(user(), events.clone(), vec![], &window);
        assert_eq!(behavior.summary.total_events, 2);

        // Lower bound only.
        let window = BehaviorWindow::new(Some(ts(2, 0)), None);
        let behavior = reconstruct_behavior(user(), events.clone(), vec![], &window);
        assert_eq!(behavior.summary.total_events, 2);

        // Upper bound only.
        let window = BehaviorWindow::new(None, Some(ts(1, 0)));
        let behavior = reconstruct_behavior(user(), events, vec![], &window);
        assert_eq!(behavior.summary.total_events, 1);
    }

    #[test]
    fn sessions_filter_on_session_start() {
        let sessions = vec![session(ts(1, 0), 100, 1), session(ts(5, 0), 200, 2)];
        let window = BehaviorWindow::new(Some(ts(4, 0)), None);
        let behavior = reconstruct_behavior(user(), vec![], sessions, &window);
        assert_eq!(behavior.summary.total_sessions, 1);
        assert_eq!(behavior.summary.total_time_spent, 200);
    }

    #[test]
    fn event_timeline_sorted_descending_and_capped_at_50() {
        let events: Vec<Event> = (0..60)
            .map(|i| event(EventType::Click, Some("/a"), ts(1, 0) + chrono::Duration::minutes(i)))
            .collect();
        let behavior = reconstruct_behavior(user(), events, vec![], &BehaviorWindow::default());

        assert_eq!(behavior.event_timeline.len(), EVENT_TIMELINE_LIMIT);
        for pair in behavior.event_timeline.windows(2) {
            assert!(pair[0].timestamp > pair[1].timestamp);
        }
        // Newest event survives the cap.
        assert_eq!(
            behavior.event_timeline[0].timestamp,
            ts(1, 0) + chrono::Duration::minutes(59)
        );
    }

    #[test]
    fn session_timeline_capped_at_20() {
        let sessions: Vec<Session> = (0..25)
            .map(|i| session(ts(1, 0) + chrono::Duration::hours(i), 10, 1))
            .collect();
        let behavior = reconstruct_behavior(user(), vec![], sessions, &BehaviorWindow::default());

        assert_eq!(behavior.session_timeline.len(), SESSION_TIMELINE_LIMIT);
        assert!(behavior.session_timeline[0].session_start
            > behavior.session_timeline[1].session_start);
    }
}
