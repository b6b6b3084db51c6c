use std::ops::{Range, RangeInclusive};

use rand::Rng;

use crate::domain::{
    event::Event,
    prediction::{NewWeatherPrediction, WeatherCondition},
};

pub const TEMPERATURE_CELSIUS_RANGE: Range<i32> = 10..30;
pub const HUMIDITY_PERCENT_RANGE: Range<i32> = 40..80;
pub const WIND_SPEED_KMH_RANGE: Range<i32> = 5..35;
pub const PRECIPITATION_CHANCE_RANGE: RangeInclusive<i32> = 0..=100;

pub const DEFAULT_RECOMMENDATION: &str = "Based on current weather patterns, we recommend planning indoor alternatives. Consider having umbrellas available and adjusting outdoor activities accordingly.";

/// Produces the weather attached to a freshly created event.
pub trait WeatherPredictor {
    fn predict(&self, event: &Event) -> PredictedWeather;
}

#[derive(Clone, Debug, PartialEq)]
pub struct PredictedWeather {
    pub temperature_celsius: i32,
    pub conditions: WeatherCondition,
    pub humidity_percent: i32,
    pub wind_speed_kmh: i32,
    pub precipitation_chance: i32,
    pub recommendation: String,
}

impl PredictedWeather {
    pub fn for_event(self, event: &Event) -> NewWeatherPrediction {
        NewWeatherPrediction {
            event_id: event.id,
            temperature_celsius: self.temperature_celsius,
            conditions: self.conditions,
            humidity_percent: self.humidity_percent,
            wind_speed_kmh: self.wind_speed_kmh,
            precipitation_chance: self.precipitation_chance,
            recommendation: self.recommendation,
        }
    }
}

/// Mock forecast: every value is drawn independently and uniformly,
/// ignoring the event's date and location.
pub struct RandomWeatherPredictor;

impl RandomWeatherPredictor {
    pub fn new() -> Self {
        Self
    }

    pub fn predict_with<R: Rng + ?Sized>(rng: &mut R) -> PredictedWeather {
        let conditions =
            WeatherCondition::ALL[rng.random_range(0..WeatherCondition::ALL.len())];
        PredictedWeather {
            temperature_celsius: rng.random_range(TEMPERATURE_CELSIUS_RANGE),
            conditions,
            humidity_percent: rng.random_range(HUMIDITY_PERCENT_RANGE),
            wind_speed_kmh: rng.random_range(WIND_SPEED_KMH_RANGE),
            precipitation_chance: rng.random_range(PRECIPITATION_CHANCE_RANGE),
            recommendation: DEFAULT_RECOMMENDATION.to_string(),
        }
    }
}

impl WeatherPredictor for RandomWeatherPredictor {
    fn predict(&self, _event: &Event) -> PredictedWeather {
        Self::predict_with(&mut rand::rng())
    }
}
