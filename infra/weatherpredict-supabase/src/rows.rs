use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use weatherpredict_app::domain::{
    AccountId, EventId, PredictionId,
    event::{Event, NewEvent},
    prediction::{NewWeatherPrediction, WeatherCondition, WeatherPrediction},
};

use crate::error::SupabaseError;

pub const EVENTS_TABLE: &str = "events";
pub const PREDICTIONS_TABLE: &str = "weather_predictions";

const EVENT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Deserialize)]
pub struct EventRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_event_date")]
    pub event_date: NaiveDateTime,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: EventId(row.id),
            user_id: AccountId(row.user_id),
            title: row.title,
            description: row.description.unwrap_or_default(),
            event_date: row.event_date,
            location: row.location,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewEventRow {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "serialize_event_date")]
    pub event_date: NaiveDateTime,
    pub location: String,
}

impl From<NewEvent> for NewEventRow {
    fn from(event: NewEvent) -> Self {
        NewEventRow {
            user_id: event.user_id.0,
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            location: event.location,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictionRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub temperature_celsius: i32,
    pub conditions: String,
    pub humidity_percent: i32,
    pub wind_speed_kmh: i32,
    pub precipitation_chance: i32,
    #[serde(default)]
    pub recommendation: Option<String>,
}

impl TryFrom<PredictionRow> for WeatherPrediction {
    type Error = SupabaseError;

    fn try_from(row: PredictionRow) -> Result<Self, Self::Error> {
        let conditions = row
            .conditions
            .parse::<WeatherCondition>()
            .map_err(|e| SupabaseError::Decode(e.to_string()))?;
        Ok(WeatherPrediction {
            id: PredictionId(row.id),
            event_id: EventId(row.event_id),
            temperature_celsius: row.temperature_celsius,
            conditions,
            humidity_percent: row.humidity_percent,
            wind_speed_kmh: row.wind_speed_kmh,
            precipitation_chance: row.precipitation_chance,
            recommendation: row.recommendation.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct NewPredictionRow {
    pub event_id: Uuid,
    pub temperature_celsius: i32,
    pub conditions: &'static str,
    pub humidity_percent: i32,
    pub wind_speed_kmh: i32,
    pub precipitation_chance: i32,
    pub recommendation: String,
}

impl From<NewWeatherPrediction> for NewPredictionRow {
    fn from(prediction: NewWeatherPrediction) -> Self {
        NewPredictionRow {
            event_id: prediction.event_id.0,
            temperature_celsius: prediction.temperature_celsius,
            conditions: prediction.conditions.label(),
            humidity_percent: prediction.humidity_percent,
            wind_speed_kmh: prediction.wind_speed_kmh,
            precipitation_chance: prediction.precipitation_chance,
            recommendation: prediction.recommendation,
        }
    }
}

fn serialize_event_date<S: Serializer>(
    value: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.format(EVENT_DATE_FORMAT).to_string())
}

fn deserialize_event_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_event_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid event_date '{}'", raw))
    })
}

/// `timestamptz` columns come back with an offset, `timestamp` columns
/// without one. Either way the wall-clock value as entered is kept.
pub fn parse_event_date(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_local());
    }
    let normalized = raw.replacen(' ', "T", 1);
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
        .or_else(|| {
            DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f%#z")
                .ok()
                .map(|dt| dt.naive_local())
        })
}
