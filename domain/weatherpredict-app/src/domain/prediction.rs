use std::{collections::HashMap, str::FromStr};

use crate::domain::{EventId, PredictionId, RepoCreateError, RepoError};

#[async_trait::async_trait]
pub trait PredictionRepository {
    async fn insert_prediction(
        &self,
        prediction: NewWeatherPrediction,
    ) -> Result<WeatherPrediction, RepoCreateError>;
    async fn list_predictions_for_events(
        &self,
        event_ids: &[EventId],
    ) -> Result<Vec<WeatherPrediction>, RepoError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    PartlyCloudy,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Sunny,
        WeatherCondition::Cloudy,
        WeatherCondition::Rainy,
        WeatherCondition::PartlyCloudy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Rainy => "Rainy",
            WeatherCondition::PartlyCloudy => "Partly Cloudy",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownConditionError(pub String);

impl std::fmt::Display for UnknownConditionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown weather condition '{}'", self.0)
    }
}

impl FromStr for WeatherCondition {
    type Err = UnknownConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeatherCondition::ALL
            .into_iter()
            .find(|condition| condition.label() == s)
            .ok_or_else(|| UnknownConditionError(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeatherPrediction {
    pub id: PredictionId,
    pub event_id: EventId,
    pub temperature_celsius: i32,
    pub conditions: WeatherCondition,
    pub humidity_percent: i32,
    pub wind_speed_kmh: i32,
    pub precipitation_chance: i32,
    pub recommendation: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewWeatherPrediction {
    pub event_id: EventId,
    pub temperature_celsius: i32,
    pub conditions: WeatherCondition,
    pub humidity_percent: i32,
    pub wind_speed_kmh: i32,
    pub precipitation_chance: i32,
    pub recommendation: String,
}

impl NewWeatherPrediction {
    pub fn into_prediction(self, id: PredictionId) -> WeatherPrediction {
        WeatherPrediction {
            id,
            event_id: self.event_id,
            temperature_celsius: self.temperature_celsius,
            conditions: self.conditions,
            humidity_percent: self.humidity_percent,
            wind_speed_kmh: self.wind_speed_kmh,
            precipitation_chance: self.precipitation_chance,
            recommendation: self.recommendation,
        }
    }
}

/// Keyed by the referenced event. If an event has more than one prediction
/// the one returned last wins.
pub fn index_by_event(
    predictions: Vec<WeatherPrediction>,
) -> HashMap<EventId, WeatherPrediction> {
    let mut index = HashMap::with_capacity(predictions.len());
    for prediction in predictions {
        index.insert(prediction.event_id, prediction);
    }
    index
}
