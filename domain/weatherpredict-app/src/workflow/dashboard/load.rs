use std::sync::Arc;

use crate::{
    domain::{
        AccountId, EventId, SortOrder,
        event::EventRepository,
        prediction::{PredictionRepository, index_by_event},
    },
    workflow::dashboard::EventCardView,
};

#[async_trait::async_trait]
pub trait LoadDashboardUseCase {
    async fn load_dashboard(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<EventCardView>, LoadDashboardError>;
}

#[derive(Debug)]
pub enum LoadDashboardError {
    EventsUnavailable(String),
    /// The events were loaded but their predictions were not; `cards` holds
    /// the events without predictions.
    PredictionsUnavailable {
        cards: Vec<EventCardView>,
        message: String,
    },
}

impl LoadDashboardError {
    pub fn message(&self) -> &str {
        match self {
            LoadDashboardError::EventsUnavailable(message) => message,
            LoadDashboardError::PredictionsUnavailable { message, .. } => message,
        }
    }

    pub fn into_partial_cards(self) -> Vec<EventCardView> {
        match self {
            LoadDashboardError::EventsUnavailable(_) => Vec::new(),
            LoadDashboardError::PredictionsUnavailable { cards, .. } => cards,
        }
    }
}

pub struct LoadDashboardUseCaseImpl<E: EventRepository, P: PredictionRepository> {
    event_repository: Arc<E>,
    prediction_repository: Arc<P>,
}

impl<E: EventRepository, P: PredictionRepository> LoadDashboardUseCaseImpl<E, P> {
    pub fn new(event_repository: Arc<E>, prediction_repository: Arc<P>) -> Self {
        Self {
            event_repository,
            prediction_repository,
        }
    }
}

#[async_trait::async_trait]
impl<E, P> LoadDashboardUseCase for LoadDashboardUseCaseImpl<E, P>
where
    E: EventRepository + Send + Sync + 'static,
    P: PredictionRepository + Send + Sync + 'static,
{
    async fn load_dashboard(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<EventCardView>, LoadDashboardError> {
        let events = match self
            .event_repository
            .list_events_by_owner(&account_id, SortOrder::Ascending)
            .await
        {
            Ok(events) => events,
            Err(e) => {
                log::error!("Failed to load events for account {}: {}", account_id, e);
                return Err(LoadDashboardError::EventsUnavailable(e.to_string()));
            }
        };

        if events.is_empty() {
            return Ok(Vec::new());
        }

        let event_ids: Vec<EventId> = events.iter().map(|event| event.id).collect();
        let predictions = match self
            .prediction_repository
            .list_predictions_for_events(&event_ids)
            .await
        {
            Ok(predictions) => predictions,
            Err(e) => {
                log::error!(
                    "Failed to load predictions for account {}: {}",
                    account_id,
                    e
                );
                let cards = events
                    .into_iter()
                    .map(|event| EventCardView {
                        event: event.into(),
                        prediction: None,
                    })
                    .collect();
                return Err(LoadDashboardError::PredictionsUnavailable {
                    cards,
                    message: e.to_string(),
                });
            }
        };

        let mut by_event = index_by_event(predictions);
        let cards = events
            .into_iter()
            .map(|event| {
                let prediction = by_event.remove(&event.id).map(Into::into);
                EventCardView {
                    event: event.into(),
                    prediction,
                }
            })
            .collect();
        Ok(cards)
    }
}
