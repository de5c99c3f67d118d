use board_logging::board_debug;
use jobboard_core::{FavoriteEntry, JobRecord, UserId};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::{encode_json, read_json, send};
use crate::postgrest::PostgrestClient;
use crate::StoreError;

const FAVORITES_TABLE: &str = "favorites";

#[async_trait::async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Saves `job` for `user`; a job already saved is left as is.
    async fn add(&self, user: Option<&UserId>, job: &JobRecord) -> Result<(), StoreError>;
    /// Removing a favorite that does not exist succeeds.
    async fn remove(&self, user: Option<&UserId>, job_link: &str) -> Result<(), StoreError>;
    async fn list(&self, user: Option<&UserId>) -> Result<Vec<FavoriteEntry>, StoreError>;
    async fn is_favorited(&self, user: Option<&UserId>, job_link: &str)
        -> Result<bool, StoreError>;
}

#[derive(Debug, Deserialize)]
struct FavoriteRow {
    id: Value,
    user_id: String,
    job_title: String,
    #[serde(default)]
    job_location: Option<String>,
    job_link: String,
}

impl From<FavoriteRow> for FavoriteEntry {
    fn from(row: FavoriteRow) -> Self {
        let id = match row.id {
            Value::String(s) => s,
            other => other.to_string(),
        };
        FavoriteEntry {
            id,
            user_id: UserId::new(row.user_id),
            job_title: row.job_title,
            job_location: row.job_location,
            job_link: row.job_link,
        }
    }
}

#[derive(Debug, Serialize)]
struct NewFavorite<'a> {
    user_id: &'a str,
    job_title: &'a str,
    job_location: Option<&'a str>,
    job_link: &'a str,
}

/// Favorites kept in the hosted `favorites` table.
///
/// Uniqueness per (user, link) is enforced here with check-then-insert; two
/// concurrent adds may both insert.
#[derive(Debug, Clone)]
pub struct PostgrestFavoritesStore {
    rest: PostgrestClient,
}

impl PostgrestFavoritesStore {
    pub fn new(rest: PostgrestClient) -> Self {
        Self { rest }
    }

    async fn select(
        &self,
        user: &UserId,
        job_link: Option<&str>,
    ) -> Result<Vec<FavoriteEntry>, StoreError> {
        let mut url = self.rest.table_url(FAVORITES_TABLE)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "id,user_id,job_title,job_location,job_link");
            query.append_pair("user_id", &format!("eq.{user}"));
            if let Some(link) = job_link {
                query.append_pair("job_link", &format!("eq.{link}"));
            }
            query.append_pair("order", "id.asc");
        }
        let response = send(self.rest.request(Method::GET, url)).await?;
        let rows: Vec<FavoriteRow> = read_json(response).await?;
        Ok(rows.into_iter().map(FavoriteEntry::from).collect())
    }
}

#[async_trait::async_trait]
impl FavoritesStore for PostgrestFavoritesStore {
    async fn add(&self, user: Option<&UserId>, job: &JobRecord) -> Result<(), StoreError> {
        let user = user.ok_or(StoreError::Permission)?;
        if !self.select(user, Some(&job.link)).await?.is_empty() {
            board_debug!("Favorite already present for {}", job.link);
            return Ok(());
        }

        let body = encode_json(&NewFavorite {
            user_id: user.as_str(),
            job_title: &job.title,
            job_location: job.location.as_deref(),
            job_link: &job.link,
        })?;
        let url = self.rest.table_url(FAVORITES_TABLE)?;
        let request = self
            .rest
            .request(Method::POST, url)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .body(body);
        send(request).await?;
        Ok(())
    }

    async fn remove(&self, user: Option<&UserId>, job_link: &str) -> Result<(), StoreError> {
        let user = user.ok_or(StoreError::Permission)?;
        let mut url = self.rest.table_url(FAVORITES_TABLE)?;
        url.query_pairs_mut()
            .append_pair("user_id", &format!("eq.{user}"))
            .append_pair("job_link", &format!("eq.{job_link}"));
        send(self.rest.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn list(&self, user: Option<&UserId>) -> Result<Vec<FavoriteEntry>, StoreError> {
        match user {
            Some(user) => self.select(user, None).await,
            None => Ok(Vec::new()),
        }
    }

    async fn is_favorited(
        &self,
        user: Option<&UserId>,
        job_link: &str,
    ) -> Result<bool, StoreError> {
        match user {
            Some(user) => Ok(!self.select(user, Some(job_link)).await?.is_empty()),
            None => Ok(false),
        }
    }
}
