//! Thin helpers over a Supabase project's PostgREST endpoint.

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Method, RequestBuilder, Response, Url};

use crate::http::parse_url;
use crate::{FailureKind, HttpSettings, TransportError};

#[derive(Debug, Clone)]
pub struct SupabaseSettings {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    pub anon_key: String,
    /// User session token; the anon key is sent as bearer when absent.
    pub access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostgrestClient {
    client: reqwest::Client,
    rest_base: Url,
    anon_key: String,
    bearer: String,
}

impl PostgrestClient {
    pub fn new(settings: &SupabaseSettings, http: &HttpSettings) -> Result<Self, TransportError> {
        let mut base = settings.url.trim_end_matches('/').to_string();
        base.push_str("/rest/v1/");
        let rest_base = parse_url(&base)?;
        Ok(Self {
            client: http.build_client()?,
            rest_base,
            anon_key: settings.anon_key.clone(),
            bearer: settings
                .access_token
                .clone()
                .unwrap_or_else(|| settings.anon_key.clone()),
        })
    }

    pub(crate) fn table_url(&self, table: &str) -> Result<Url, TransportError> {
        self.rest_base
            .join(table)
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.bearer))
    }
}

/// Total row count from a `Content-Range: 0-24/3573` header.
pub(crate) fn content_range_total(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|value: &HeaderValue| value.to_str().ok())
        .and_then(parse_content_range_total)
}

fn parse_content_range_total(raw: &str) -> Option<u64> {
    raw.rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse().ok())
}
