use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::{AccountId, EventId, RepoCreateError, RepoError, SortOrder};

#[async_trait::async_trait]
pub trait EventRepository {
    async fn insert_event(&self, event: NewEvent) -> Result<Event, RepoCreateError>;
    async fn list_events_by_owner(
        &self,
        owner: &AccountId,
        order: SortOrder,
    ) -> Result<Vec<Event>, RepoError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub user_id: AccountId,
    pub title: String,
    pub description: String,
    pub event_date: NaiveDateTime,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `events` table. The storage service assigns
/// `id` and `created_at`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewEvent {
    pub user_id: AccountId,
    pub title: String,
    pub description: String,
    pub event_date: NaiveDateTime,
    pub location: String,
}

impl NewEvent {
    pub fn into_event(self, id: EventId, created_at: DateTime<Utc>) -> Event {
        Event {
            id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            event_date: self.event_date,
            location: self.location,
            created_at,
        }
    }
}

/// Sorts by scheduled date, falling back to creation time so that events
/// sharing a date keep a stable order.
pub fn sort_by_event_date(events: &mut [Event], order: SortOrder) {
    events.sort_by(|a, b| {
        let ordering = a
            .event_date
            .cmp(&b.event_date)
            .then(a.created_at.cmp(&b.created_at));
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;

    fn event_at(day: u32, title: &str) -> Event {
        NewEvent {
            user_id: AccountId::new(),
            title: title.to_string(),
            description: String::new(),
            event_date: NaiveDate::from_ymd_opt(2025, 7, day)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
            location: "Central Park".to_string(),
        }
        .into_event(EventId::new(), Utc::now())
    }

    #[test]
    fn test_sort_by_event_date() {
        let mut events = vec![
            event_at(20, "late"),
            event_at(4, "early"),
            event_at(10, "middle"),
        ];

        sort_by_event_date(&mut events, SortOrder::Ascending);
        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "middle", "late"]);

        sort_by_event_date(&mut events, SortOrder::Descending);
        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["late", "middle", "early"]);
    }

    #[test]
    fn test_sort_same_date_uses_creation_time() {
        let mut first = event_at(4, "first");
        let mut second = event_at(4, "second");
        first.created_at = Utc::now() - Duration::minutes(5);
        second.created_at = Utc::now();

        let mut events = vec![second, first];
        sort_by_event_date(&mut events, SortOrder::Ascending);
        assert_eq!(events[0].title, "first");
        assert_eq!(events[1].title, "second");
    }
}
