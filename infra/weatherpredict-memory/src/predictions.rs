use dashmap::DashMap;
use weatherpredict_app::domain::{
    EventId, PredictionId, RepoCreateError, RepoError,
    prediction::{NewWeatherPrediction, PredictionRepository, WeatherPrediction},
};

use crate::FailureSwitch;

pub struct InMemoryPredictionRepository {
    predictions: DashMap<PredictionId, WeatherPrediction>,
    insert_failure: FailureSwitch,
    list_failure: FailureSwitch,
}

impl InMemoryPredictionRepository {
    pub fn new() -> Self {
        Self {
            predictions: DashMap::new(),
            insert_failure: FailureSwitch::default(),
            list_failure: FailureSwitch::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn for_event(&self, event_id: &EventId) -> Vec<WeatherPrediction> {
        self.predictions
            .iter()
            .filter(|entry| &entry.event_id == event_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn set_insert_failure(&self, message: Option<&str>) {
        self.insert_failure.set(message);
    }

    pub fn set_list_failure(&self, message: Option<&str>) {
        self.list_failure.set(message);
    }
}

#[async_trait::async_trait]
impl PredictionRepository for InMemoryPredictionRepository {
    async fn insert_prediction(
        &self,
        prediction: NewWeatherPrediction,
    ) -> Result<WeatherPrediction, RepoCreateError> {
        if let Some(message) = self.insert_failure.check() {
            return Err(RepoCreateError::StorageError(message));
        }
        let prediction = prediction.into_prediction(PredictionId::new());
        self.predictions.insert(prediction.id, prediction.clone());
        Ok(prediction)
    }

    async fn list_predictions_for_events(
        &self,
        event_ids: &[EventId],
    ) -> Result<Vec<WeatherPrediction>, RepoError> {
        if let Some(message) = self.list_failure.check() {
            return Err(RepoError::StorageError(message));
        }
        Ok(self
            .predictions
            .iter()
            .filter(|entry| event_ids.contains(&entry.event_id))
            .map(|entry| entry.value().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use weatherpredict_app::domain::prediction::WeatherCondition;

    use super::*;

    fn prediction(event_id: EventId) -> NewWeatherPrediction {
        NewWeatherPrediction {
            event_id,
            temperature_celsius: 18,
            conditions: WeatherCondition::Cloudy,
            humidity_percent: 60,
            wind_speed_kmh: 20,
            precipitation_chance: 40,
            recommendation: "Bring a jacket".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_filters_by_event_ids() {
        let repo = InMemoryPredictionRepository::new();
        let wanted = EventId::new();
        let other = EventId::new();
        repo.insert_prediction(prediction(wanted)).await.unwrap();
        repo.insert_prediction(prediction(other)).await.unwrap();

        let found = repo.list_predictions_for_events(&[wanted]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].event_id, wanted);
        assert!(repo.list_predictions_for_events(&[]).await.unwrap().is_empty());
        assert_eq!(repo.for_event(&other).len(), 1);
    }
}
