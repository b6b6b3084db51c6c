use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::{EventId, event::Event, prediction::WeatherPrediction};

pub mod load;

#[derive(Clone, Debug, PartialEq)]
pub struct EventView {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub event_date: NaiveDateTime,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventView {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            location: event.location,
            created_at: event.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PredictionView {
    pub temperature_celsius: i32,
    pub conditions: String,
    pub humidity_percent: i32,
    pub wind_speed_kmh: i32,
    pub precipitation_chance: i32,
    pub recommendation: String,
}

impl From<WeatherPrediction> for PredictionView {
    fn from(prediction: WeatherPrediction) -> Self {
        Self {
            temperature_celsius: prediction.temperature_celsius,
            conditions: prediction.conditions.to_string(),
            humidity_percent: prediction.humidity_percent,
            wind_speed_kmh: prediction.wind_speed_kmh,
            precipitation_chance: prediction.precipitation_chance,
            recommendation: prediction.recommendation,
        }
    }
}

/// One dashboard card. `prediction` is `None` while the event has no
/// prediction row.
#[derive(Clone, Debug, PartialEq)]
pub struct EventCardView {
    pub event: EventView,
    pub prediction: Option<PredictionView>,
}
