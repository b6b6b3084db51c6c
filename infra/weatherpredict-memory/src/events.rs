use chrono::Utc;
use dashmap::DashMap;
use weatherpredict_app::domain::{
    AccountId, EventId, RepoCreateError, RepoError, SortOrder,
    event::{Event, EventRepository, NewEvent, sort_by_event_date},
};

use crate::FailureSwitch;

pub struct InMemoryEventRepository {
    events: DashMap<EventId, Event>,
    insert_failure: FailureSwitch,
    list_failure: FailureSwitch,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self {
            events: DashMap::new(),
            insert_failure: FailureSwitch::default(),
            list_failure: FailureSwitch::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn set_insert_failure(&self, message: Option<&str>) {
        self.insert_failure.set(message);
    }

    pub fn set_list_failure(&self, message: Option<&str>) {
        self.list_failure.set(message);
    }
}

#[async_trait::async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert_event(&self, event: NewEvent) -> Result<Event, RepoCreateError> {
        if let Some(message) = self.insert_failure.check() {
            return Err(RepoCreateError::StorageError(message));
        }
        let event = event.into_event(EventId::new(), Utc::now());
        self.events.insert(event.id, event.clone());
        log::debug!("Stored event {} in memory", event.id);
        Ok(event)
    }

    async fn list_events_by_owner(
        &self,
        owner: &AccountId,
        order: SortOrder,
    ) -> Result<Vec<Event>, RepoError> {
        if let Some(message) = self.list_failure.check() {
            return Err(RepoError::StorageError(message));
        }
        let mut events: Vec<Event> = self
            .events
            .iter()
            .filter(|entry| &entry.user_id == owner)
            .map(|entry| entry.value().clone())
            .collect();
        sort_by_event_date(&mut events, order);
        Ok(events)
    }
}
