use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::{
    domain::{
        AccountId, EventId,
        event::{EventRepository, NewEvent},
        forecast::WeatherPredictor,
        prediction::PredictionRepository,
    },
    workflow::dashboard::EventCardView,
};

#[derive(Clone, Debug, PartialEq)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub event_date: NaiveDateTime,
    pub location: String,
}

#[async_trait::async_trait]
pub trait CreateEventUseCase {
    async fn create_event(
        &self,
        owner: AccountId,
        form: EventForm,
    ) -> Result<EventCardView, CreateEventError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateEventError {
    EventInsertFailed(String),
    /// The event row exists but its prediction could not be stored.
    PredictionInsertFailed { event_id: EventId, message: String },
}

impl CreateEventError {
    pub fn message(&self) -> &str {
        match self {
            CreateEventError::EventInsertFailed(message) => message,
            CreateEventError::PredictionInsertFailed { message, .. } => message,
        }
    }
}

pub struct CreateEventUseCaseImpl<E, P, W>
where
    E: EventRepository,
    P: PredictionRepository,
    W: WeatherPredictor,
{
    event_repository: Arc<E>,
    prediction_repository: Arc<P>,
    weather_predictor: Arc<W>,
}

impl<E, P, W> CreateEventUseCaseImpl<E, P, W>
where
    E: EventRepository,
    P: PredictionRepository,
    W: WeatherPredictor,
{
    pub fn new(
        event_repository: Arc<E>,
        prediction_repository: Arc<P>,
        weather_predictor: Arc<W>,
    ) -> Self {
        Self {
            event_repository,
            prediction_repository,
            weather_predictor,
        }
    }
}

#[async_trait::async_trait]
impl<E, P, W> CreateEventUseCase for CreateEventUseCaseImpl<E, P, W>
where
    E: EventRepository + Send + Sync + 'static,
    P: PredictionRepository + Send + Sync + 'static,
    W: WeatherPredictor + Send + Sync + 'static,
{
    async fn create_event(
        &self,
        owner: AccountId,
        form: EventForm,
    ) -> Result<EventCardView, CreateEventError> {
        let new_event = NewEvent {
            user_id: owner,
            title: form.title,
            description: form.description,
            event_date: form.event_date,
            location: form.location,
        };

        let event = match self.event_repository.insert_event(new_event).await {
            Ok(event) => event,
            Err(e) => {
                log::error!("Failed to insert event for account {}: {}", owner, e);
                return Err(CreateEventError::EventInsertFailed(e.to_string()));
            }
        };

        let new_prediction = self.weather_predictor.predict(&event).for_event(&event);
        let prediction = match self
            .prediction_repository
            .insert_prediction(new_prediction)
            .await
        {
            Ok(prediction) => prediction,
            Err(e) => {
                log::error!(
                    "Event {} created without a prediction, insert failed: {}",
                    event.id,
                    e
                );
                return Err(CreateEventError::PredictionInsertFailed {
                    event_id: event.id,
                    message: e.to_string(),
                });
            }
        };

        log::info!(
            "Account {} created event {} with prediction {}",
            owner,
            event.id,
            prediction.id
        );

        Ok(EventCardView {
            event: event.into(),
            prediction: Some(prediction.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{
        domain::{
            RepoCreateError,
            forecast::DEFAULT_RECOMMENDATION,
            prediction::WeatherCondition,
        },
        workflow::testing::{
            FakeEventRepository, FakePredictionRepository, FixedWeatherPredictor,
        },
    };

    use super::*;

    fn summer_bbq() -> EventForm {
        EventForm {
            title: "Summer BBQ".to_string(),
            description: String::new(),
            event_date: NaiveDate::from_ymd_opt(2025, 7, 4)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
            location: "Central Park".to_string(),
        }
    }

    fn use_case(
        events: &Arc<FakeEventRepository>,
        predictions: &Arc<FakePredictionRepository>,
    ) -> CreateEventUseCaseImpl<FakeEventRepository, FakePredictionRepository, FixedWeatherPredictor>
    {
        CreateEventUseCaseImpl::new(
            events.clone(),
            predictions.clone(),
            Arc::new(FixedWeatherPredictor::sunny()),
        )
    }

    #[tokio::test]
    async fn test_creates_event_and_prediction() {
        let events = Arc::new(FakeEventRepository::default());
        let predictions = Arc::new(FakePredictionRepository::default());
        let owner = AccountId::new();

        let card = use_case(&events, &predictions)
            .create_event(owner, summer_bbq())
            .await
            .expect("event should be created");

        let stored_events = events.all();
        assert_eq!(stored_events.len(), 1);
        assert_eq!(stored_events[0].user_id, owner);
        assert_eq!(stored_events[0].title, "Summer BBQ");
        assert_eq!(stored_events[0].location, "Central Park");

        let stored_predictions = predictions.all();
        assert_eq!(stored_predictions.len(), 1);
        assert_eq!(stored_predictions[0].event_id, stored_events[0].id);
        assert_eq!(stored_predictions[0].conditions, WeatherCondition::Sunny);
        assert_eq!(stored_predictions[0].recommendation, DEFAULT_RECOMMENDATION);

        assert_eq!(card.event.id, stored_events[0].id);
        assert_eq!(card.prediction.map(|p| p.conditions), Some("Sunny".to_string()));
    }

    #[tokio::test]
    async fn test_event_failure_creates_nothing() {
        let events = Arc::new(FakeEventRepository::default());
        let predictions = Arc::new(FakePredictionRepository::default());
        events.fail_inserts_with(RepoCreateError::StorageError(
            "new row violates row-level security policy".to_string(),
        ));

        let err = use_case(&events, &predictions)
            .create_event(AccountId::new(), summer_bbq())
            .await
            .expect_err("insert should fail");

        assert_eq!(
            err,
            CreateEventError::EventInsertFailed(
                "new row violates row-level security policy".to_string()
            )
        );
        assert!(events.all().is_empty());
        assert_eq!(predictions.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_prediction_failure_leaves_event_behind() {
        let events = Arc::new(FakeEventRepository::default());
        let predictions = Arc::new(FakePredictionRepository::default());
        predictions.fail_inserts_with(RepoCreateError::StorageError("offline".to_string()));

        let err = use_case(&events, &predictions)
            .create_event(AccountId::new(), summer_bbq())
            .await
            .expect_err("prediction insert should fail");

        let stored_events = events.all();
        assert_eq!(stored_events.len(), 1);
        assert_eq!(
            err,
            CreateEventError::PredictionInsertFailed {
                event_id: stored_events[0].id,
                message: "offline".to_string(),
            }
        );
        assert_eq!(err.message(), "offline");
        assert!(predictions.all().is_empty());
    }

    #[tokio::test]
    async fn test_double_submit_creates_duplicates() {
        let events = Arc::new(FakeEventRepository::default());
        let predictions = Arc::new(FakePredictionRepository::default());
        let owner = AccountId::new();
        let use_case = use_case(&events, &predictions);

        use_case.create_event(owner, summer_bbq()).await.unwrap();
        use_case.create_event(owner, summer_bbq()).await.unwrap();

        assert_eq!(events.all().len(), 2);
        assert_eq!(predictions.all().len(), 2);
    }
}
