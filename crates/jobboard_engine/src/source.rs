use std::collections::HashSet;

use board_logging::{board_debug, board_warn};
use jobboard_core::{JobRecord, Page};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::{parse_url, read_json, send};
use crate::postgrest::{content_range_total, PostgrestClient};
use crate::{FailureKind, HttpSettings, PartialFetch, TransportError};

#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetches the page at `cursor`, or the first page when `None`.
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page, TransportError>;
}

/// Which payload fields hold each part of a job listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub title: String,
    pub location: String,
    pub link: String,
    pub published: String,
}

impl FieldMapping {
    /// Column names used by the scraper when writing to the tabular base.
    pub fn tabular() -> Self {
        Self {
            title: "Titre".to_string(),
            location: "Lieu".to_string(),
            link: "Lien".to_string(),
            published: "Date".to_string(),
        }
    }

    pub fn relational() -> Self {
        Self {
            title: "title".to_string(),
            location: "location".to_string(),
            link: "link".to_string(),
            published: "publication_date".to_string(),
        }
    }

    fn to_record(
        &self,
        id: String,
        fields: &Map<String, Value>,
        source_offset: Option<&str>,
    ) -> Option<JobRecord> {
        let title = text_field(fields, &self.title);
        let link = text_field(fields, &self.link);
        let (Some(title), Some(link)) = (title, link) else {
            board_warn!("Skipping record {} without title or link", id);
            return None;
        };
        Some(JobRecord {
            id,
            title,
            location: text_field(fields, &self.location),
            link,
            publication_date_raw: text_field(fields, &self.published),
            source_offset: source_offset.map(ToOwned::to_owned),
        })
    }
}

/// Reads a field as text; lookup fields arrive as arrays and use their first
/// element.
fn text_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    let text = match fields.get(name)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => match items.first()? {
            Value::String(s) => s.trim().to_string(),
            _ => return None,
        },
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct TabularSettings {
    /// Full table endpoint, e.g. `https://api.airtable.com/v0/<base>/<table>`.
    pub endpoint: String,
    pub token: String,
    pub page_size: u32,
    pub view: Option<String>,
    pub fields: FieldMapping,
}

#[derive(Debug, Deserialize)]
struct TabularResponse {
    #[serde(default)]
    records: Vec<TabularRecord>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TabularRecord {
    id: String,
    #[serde(default)]
    fields: Map<String, Value>,
    #[serde(rename = "createdTime", default)]
    created_time: Option<String>,
}

/// Tabular data API paginated by an opaque `offset` token.
#[derive(Debug, Clone)]
pub struct TabularSource {
    client: reqwest::Client,
    endpoint: Url,
    token: String,
    page_size: u32,
    view: Option<String>,
    fields: FieldMapping,
}

impl TabularSource {
    pub fn new(settings: TabularSettings, http: &HttpSettings) -> Result<Self, TransportError> {
        Ok(Self {
            client: http.build_client()?,
            endpoint: parse_url(&settings.endpoint)?,
            token: settings.token,
            page_size: settings.page_size,
            view: settings.view,
            fields: settings.fields,
        })
    }
}

#[async_trait::async_trait]
impl RecordSource for TabularSource {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page, TransportError> {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &self.page_size.to_string());
            if let Some(view) = &self.view {
                query.append_pair("view", view);
            }
            if let Some(offset) = cursor {
                query.append_pair("offset", offset);
            }
        }
        board_debug!("Fetching tabular page offset={:?}", cursor);

        let request = self
            .client
            .request(Method::GET, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token));
        let body: TabularResponse = read_json(send(request).await?).await?;

        let records = body
            .records
            .into_iter()
            .filter_map(|record| {
                let mut fields = record.fields;
                if !fields.contains_key(&self.fields.published) {
                    if let Some(created) = record.created_time {
                        fields.insert(self.fields.published.clone(), Value::String(created));
                    }
                }
                self.fields.to_record(record.id, &fields, cursor)
            })
            .collect();

        Ok(Page {
            records,
            next_cursor: body.offset.filter(|offset| !offset.is_empty()),
            total: None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RelationalSettings {
    pub table: String,
    pub page_size: u32,
    /// Equality predicate on `search_id`.
    pub search_id: Option<String>,
    /// Case-insensitive substring predicate on the title column.
    pub title_contains: Option<String>,
    pub fields: FieldMapping,
}

/// Relational table behind PostgREST, paginated by row offset.
#[derive(Debug, Clone)]
pub struct RelationalSource {
    rest: PostgrestClient,
    settings: RelationalSettings,
}

impl RelationalSource {
    pub fn new(rest: PostgrestClient, settings: RelationalSettings) -> Self {
        Self { rest, settings }
    }
}

#[async_trait::async_trait]
impl RecordSource for RelationalSource {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page, TransportError> {
        let offset: u64 = match cursor {
            Some(raw) => raw.parse().map_err(|_| {
                TransportError::new(FailureKind::InvalidUrl, format!("bad offset cursor {raw:?}"))
            })?,
            None => 0,
        };
        let limit = u64::from(self.settings.page_size.max(1));

        let mut url = self.rest.table_url(&self.settings.table)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if let Some(search_id) = &self.settings.search_id {
                query.append_pair("search_id", &format!("eq.{search_id}"));
            }
            if let Some(needle) = &self.settings.title_contains {
                query.append_pair(&self.settings.fields.title, &format!("ilike.*{needle}*"));
            }
            query.append_pair("order", "id.asc");
            query.append_pair("offset", &offset.to_string());
            query.append_pair("limit", &limit.to_string());
        }
        board_debug!("Fetching relational page offset={}", offset);

        let request = self
            .rest
            .request(Method::GET, url)
            .header("Prefer", "count=exact");
        let response = send(request).await?;
        let total = content_range_total(&response);
        let rows: Vec<Map<String, Value>> = read_json(response).await?;

        let received = rows.len() as u64;
        let cursor_label = offset.to_string();
        let records = rows
            .iter()
            .filter_map(|row| {
                let id = row.get("id").and_then(id_to_string)?;
                self.settings.fields.to_record(id, row, Some(&cursor_label))
            })
            .collect();

        let next = offset + received;
        let has_more = match total {
            Some(total) => received > 0 && next < total,
            None => received == limit,
        };

        Ok(Page {
            records,
            next_cursor: has_more.then(|| next.to_string()),
            total,
        })
    }
}

/// Follows cursors until the source is exhausted or `max_pages` were read.
///
/// A cursor seen twice ends the walk as well. On failure the records read
/// so far travel with the error.
pub async fn fetch_all(
    source: &dyn RecordSource,
    max_pages: usize,
) -> Result<Vec<JobRecord>, PartialFetch> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor: Option<String> = None;

    for _ in 0..max_pages {
        let page = match source.fetch_page(cursor.as_deref()).await {
            Ok(page) => page,
            Err(error) => return Err(PartialFetch { records, error }),
        };
        records.extend(page.records);
        match page.next_cursor {
            Some(next) if seen.insert(next.clone()) => cursor = Some(next),
            Some(next) => {
                board_warn!("Source repeated cursor {:?}; stopping", next);
                break;
            }
            None => break,
        }
    }
    Ok(records)
}
