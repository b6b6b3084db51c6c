use weatherpredict_app::domain::{
    AccountId, EventId, RepoCreateError, RepoError, SortOrder,
    event::{Event, EventRepository, NewEvent},
    prediction::{NewWeatherPrediction, PredictionRepository, WeatherPrediction},
};

use crate::{
    SupabaseClient,
    postgrest::{Direction, Query},
    rows::{
        EVENTS_TABLE, EventRow, NewEventRow, NewPredictionRow, PREDICTIONS_TABLE, PredictionRow,
    },
};

pub struct SupabaseEventRepository {
    client: SupabaseClient,
}

impl SupabaseEventRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl EventRepository for SupabaseEventRepository {
    async fn insert_event(&self, event: NewEvent) -> Result<Event, RepoCreateError> {
        let row: EventRow = self
            .client
            .insert(EVENTS_TABLE, &NewEventRow::from(event))
            .await?;
        Ok(row.into())
    }

    async fn list_events_by_owner(
        &self,
        owner: &AccountId,
        order: SortOrder,
    ) -> Result<Vec<Event>, RepoError> {
        let direction = match order {
            SortOrder::Ascending => Direction::Asc,
            SortOrder::Descending => Direction::Desc,
        };
        let query = Query::on(EVENTS_TABLE)
            .eq("user_id", owner)
            .order("event_date", direction);
        let rows: Vec<EventRow> = self.client.fetch(&query).await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }
}

pub struct SupabasePredictionRepository {
    client: SupabaseClient,
}

impl SupabasePredictionRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl PredictionRepository for SupabasePredictionRepository {
    async fn insert_prediction(
        &self,
        prediction: NewWeatherPrediction,
    ) -> Result<WeatherPrediction, RepoCreateError> {
        let row: PredictionRow = self
            .client
            .insert(PREDICTIONS_TABLE, &NewPredictionRow::from(prediction))
            .await?;
        Ok(WeatherPrediction::try_from(row)?)
    }

    async fn list_predictions_for_events(
        &self,
        event_ids: &[EventId],
    ) -> Result<Vec<WeatherPrediction>, RepoError> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = Query::on(PREDICTIONS_TABLE).in_list("event_id", event_ids);
        let rows: Vec<PredictionRow> = self.client.fetch(&query).await?;
        rows.into_iter()
            .map(|row| WeatherPrediction::try_from(row).map_err(RepoError::from))
            .collect()
    }
}
