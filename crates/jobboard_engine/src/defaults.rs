use jobboard_core::UserId;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::http::{encode_json, read_json, send};
use crate::postgrest::PostgrestClient;
use crate::StoreError;

const FILTERS_TABLE: &str = "user_filters";

/// Per-user default exclusion words, one row per user.
#[async_trait::async_trait]
pub trait FilterDefaultsStore: Send + Sync {
    async fn load(&self, user: &UserId) -> Result<Vec<String>, StoreError>;
    async fn save(&self, user: &UserId, words: &[String]) -> Result<(), StoreError>;
}

#[derive(Debug, Deserialize)]
struct FiltersRow {
    #[serde(default)]
    excluded_words: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct FiltersUpsert<'a> {
    user_id: &'a str,
    excluded_words: &'a [String],
}

#[derive(Debug, Clone)]
pub struct PostgrestFilterDefaultsStore {
    rest: PostgrestClient,
}

impl PostgrestFilterDefaultsStore {
    pub fn new(rest: PostgrestClient) -> Self {
        Self { rest }
    }
}

#[async_trait::async_trait]
impl FilterDefaultsStore for PostgrestFilterDefaultsStore {
    async fn load(&self, user: &UserId) -> Result<Vec<String>, StoreError> {
        let mut url = self.rest.table_url(FILTERS_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", "excluded_words")
            .append_pair("user_id", &format!("eq.{user}"))
            .append_pair("limit", "1");
        let response = send(self.rest.request(Method::GET, url)).await?;
        let rows: Vec<FiltersRow> = read_json(response).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.excluded_words)
            .unwrap_or_default())
    }

    async fn save(&self, user: &UserId, words: &[String]) -> Result<(), StoreError> {
        let mut url = self.rest.table_url(FILTERS_TABLE)?;
        url.query_pairs_mut().append_pair("on_conflict", "user_id");
        let body = encode_json(&[FiltersUpsert {
            user_id: user.as_str(),
            excluded_words: words,
        }])?;
        let request = self
            .rest
            .request(Method::POST, url)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .body(body);
        send(request).await?;
        Ok(())
    }
}
