use serde::{Serialize, de::DeserializeOwned};

use crate::{SupabaseClient, error::SupabaseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// A PostgREST read against one table, rendered into query-string pairs.
#[derive(Debug, Clone)]
pub struct Query {
    table: &'static str,
    filters: Vec<(String, String)>,
    order: Option<(String, Direction)>,
}

impl Query {
    pub fn on(table: &'static str) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn in_list<T: ToString>(mut self, column: &str, values: &[T]) -> Self {
        let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        self.filters
            .push((column.to_string(), format!("in.({})", values.join(","))));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(self.filters.iter().cloned());
        if let Some((column, direction)) = &self.order {
            let direction = match direction {
                Direction::Asc => "asc",
                Direction::Desc => "desc",
            };
            pairs.push(("order".to_string(), format!("{}.{}", column, direction)));
        }
        pairs
    }
}

impl SupabaseClient {
    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url, table)
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        query: &Query,
    ) -> Result<Vec<T>, SupabaseError> {
        let response = self
            .http
            .get(self.rest_url(query.table()))
            .query(&query.to_pairs())
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.config.row_access_key())
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Inserts one row and returns it as stored.
    pub(crate) async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &'static str,
        row: &B,
    ) -> Result<T, SupabaseError> {
        let response = self
            .http
            .post(self.rest_url(table))
            .header("apikey", &self.config.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.config.row_access_key())
            .json(row)
            .send()
            .await?;
        let rows: Vec<T> = Self::read_json(response).await?;
        rows.into_iter()
            .next()
            .ok_or(SupabaseError::EmptyResponse(table))
    }

    pub(crate) async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SupabaseError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SupabaseError::from_response(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| SupabaseError::Decode(e.to_string()))
    }
}
