use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    domain::{
        AccountId, EventId, PredictionId, RepoCreateError, RepoError, SortOrder,
        event::{Event, EventRepository, NewEvent, sort_by_event_date},
        forecast::{DEFAULT_RECOMMENDATION, PredictedWeather, WeatherPredictor},
        prediction::{
            NewWeatherPrediction, PredictionRepository, WeatherCondition, WeatherPrediction,
        },
        session::{
            Account, Session, SessionEvent, SessionId, SessionNotifier, SessionSubscription,
            SessionToken,
        },
    },
    ports::authentication::{AuthError, AuthenticationPort, SignUpOutcome},
};

pub fn new_event(owner: AccountId, title: &str, july_day: u32) -> NewEvent {
    NewEvent {
        user_id: owner,
        title: title.to_string(),
        description: String::new(),
        event_date: NaiveDate::from_ymd_opt(2025, 7, july_day)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap(),
        location: "Central Park".to_string(),
    }
}

pub fn prediction_for(
    event: &Event,
    temperature_celsius: i32,
    conditions: WeatherCondition,
) -> NewWeatherPrediction {
    NewWeatherPrediction {
        event_id: event.id,
        temperature_celsius,
        conditions,
        humidity_percent: 55,
        wind_speed_kmh: 12,
        precipitation_chance: 30,
        recommendation: DEFAULT_RECOMMENDATION.to_string(),
    }
}

#[derive(Default)]
pub struct FakeEventRepository {
    events: Mutex<Vec<Event>>,
    insert_error: Mutex<Option<RepoCreateError>>,
    list_error: Mutex<Option<RepoError>>,
}

impl FakeEventRepository {
    pub fn seed(&self, event: NewEvent) -> Event {
        let event = event.into_event(EventId::new(), Utc::now());
        self.events.lock().unwrap().push(event.clone());
        event
    }

    pub fn all(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn fail_inserts_with(&self, error: RepoCreateError) {
        *self.insert_error.lock().unwrap() = Some(error);
    }

    pub fn fail_lists_with(&self, error: RepoError) {
        *self.list_error.lock().unwrap() = Some(error);
    }
}

#[async_trait::async_trait]
impl EventRepository for FakeEventRepository {
    async fn insert_event(&self, event: NewEvent) -> Result<Event, RepoCreateError> {
        if let Some(error) = self.insert_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.seed(event))
    }

    async fn list_events_by_owner(
        &self,
        owner: &AccountId,
        order: SortOrder,
    ) -> Result<Vec<Event>, RepoError> {
        if let Some(error) = self.list_error.lock().unwrap().clone() {
            return Err(error);
        }
        let mut events: Vec<Event> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| &event.user_id == owner)
            .cloned()
            .collect();
        sort_by_event_date(&mut events, order);
        Ok(events)
    }
}

#[derive(Default)]
pub struct FakePredictionRepository {
    predictions: Mutex<Vec<WeatherPrediction>>,
    insert_error: Mutex<Option<RepoCreateError>>,
    list_error: Mutex<Option<RepoError>>,
    insert_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl FakePredictionRepository {
    pub fn seed(&self, prediction: NewWeatherPrediction) -> WeatherPrediction {
        let prediction = prediction.into_prediction(PredictionId::new());
        self.predictions.lock().unwrap().push(prediction.clone());
        prediction
    }

    pub fn all(&self) -> Vec<WeatherPrediction> {
        self.predictions.lock().unwrap().clone()
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn fail_inserts_with(&self, error: RepoCreateError) {
        *self.insert_error.lock().unwrap() = Some(error);
    }

    pub fn fail_lists_with(&self, error: RepoError) {
        *self.list_error.lock().unwrap() = Some(error);
    }
}

#[async_trait::async_trait]
impl PredictionRepository for FakePredictionRepository {
    async fn insert_prediction(
        &self,
        prediction: NewWeatherPrediction,
    ) -> Result<WeatherPrediction, RepoCreateError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.insert_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.seed(prediction))
    }

    async fn list_predictions_for_events(
        &self,
        event_ids: &[EventId],
    ) -> Result<Vec<WeatherPrediction>, RepoError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.list_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self
            .predictions
            .lock()
            .unwrap()
            .iter()
            .filter(|prediction| event_ids.contains(&prediction.event_id))
            .cloned()
            .collect())
    }
}

pub struct FixedWeatherPredictor {
    weather: PredictedWeather,
}

impl FixedWeatherPredictor {
    pub fn sunny() -> Self {
        Self {
            weather: PredictedWeather {
                temperature_celsius: 24,
                conditions: WeatherCondition::Sunny,
                humidity_percent: 45,
                wind_speed_kmh: 8,
                precipitation_chance: 5,
                recommendation: DEFAULT_RECOMMENDATION.to_string(),
            },
        }
    }
}

impl WeatherPredictor for FixedWeatherPredictor {
    fn predict(&self, _event: &Event) -> PredictedWeather {
        self.weather.clone()
    }
}

#[derive(Default)]
pub struct FakeAuthentication {
    sessions: Mutex<HashMap<SessionToken, Session>>,
    refresh_tokens: Mutex<HashMap<SessionToken, Session>>,
    notifier: SessionNotifier,
    user_lookups: AtomicUsize,
}

impl FakeAuthentication {
    pub fn issue(&self, email: &str, expires_at: Option<DateTime<Utc>>) -> Session {
        let account = Account {
            account_id: AccountId::new(),
            email: Some(email.to_string()),
        };
        self.store(SessionId::new(uuid::Uuid::new_v4().to_string()), account, expires_at)
    }

    fn store(
        &self,
        session_id: SessionId,
        account: Account,
        expires_at: Option<DateTime<Utc>>,
    ) -> Session {
        let session = Session {
            session_id,
            access_token: SessionToken::new(uuid::Uuid::new_v4().to_string()),
            refresh_token: Some(SessionToken::new(uuid::Uuid::new_v4().to_string())),
            account,
            expires_at,
        };
        self.sessions
            .lock()
            .unwrap()
            .insert(session.access_token.clone(), session.clone());
        if let Some(refresh_token) = &session.refresh_token {
            self.refresh_tokens
                .lock()
                .unwrap()
                .insert(refresh_token.clone(), session.clone());
        }
        self.notifier.publish(SessionEvent::signed_in(&session));
        session
    }

    pub fn user_lookups(&self) -> usize {
        self.user_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AuthenticationPort for FakeAuthentication {
    async fn get_session(&self, token: &SessionToken) -> Option<Session> {
        self.sessions.lock().unwrap().get(token).cloned()
    }

    async fn get_user(&self, token: &SessionToken) -> Result<Option<Account>, AuthError> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(token)
            .map(|session| session.account.clone()))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        if password != "password" {
            return Err(AuthError::InvalidCredentials(
                "Invalid login credentials".to_string(),
            ));
        }
        Ok(self.issue(email, None))
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<SignUpOutcome, AuthError> {
        Ok(SignUpOutcome::SignedIn(self.issue(email, None)))
    }

    async fn refresh_session(&self, refresh_token: &SessionToken) -> Result<Session, AuthError> {
        let previous = self
            .refresh_tokens
            .lock()
            .unwrap()
            .remove(refresh_token)
            .ok_or_else(|| AuthError::Rejected("Refresh Token Not Found".to_string()))?;
        self.sessions
            .lock()
            .unwrap()
            .remove(&previous.access_token);
        Ok(self.store(
            previous.session_id,
            previous.account,
            Some(Utc::now() + chrono::Duration::hours(1)),
        ))
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError> {
        let removed = self.sessions.lock().unwrap().remove(token);
        match removed {
            Some(session) => {
                self.notifier.publish(SessionEvent::signed_out(&session));
                Ok(())
            }
            None => Err(AuthError::Rejected("Session not found".to_string())),
        }
    }

    fn subscribe(&self, session_id: &SessionId) -> SessionSubscription {
        self.notifier.subscribe(session_id)
    }
}
