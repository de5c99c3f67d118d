use board_logging::board_info;
use jobboard_core::ScrapeQuery;
use reqwest::{Method, Url};

use crate::http::{parse_url, send};
use crate::{HttpSettings, TransportError};

/// Fire-and-forget client for the external scrape automation.
///
/// Only the HTTP status is inspected; response bodies are ignored.
#[derive(Debug, Clone)]
pub struct ScrapeWebhook {
    client: reqwest::Client,
    url: Url,
}

impl ScrapeWebhook {
    pub fn new(url: &str, http: &HttpSettings) -> Result<Self, TransportError> {
        Ok(Self {
            client: http.build_client()?,
            url: parse_url(url)?,
        })
    }

    pub async fn trigger(&self, query: &ScrapeQuery) -> Result<(), TransportError> {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("job_name", query.job_name())
            .append_pair("postal_code", query.postal_code())
            .append_pair("radius_km", &query.radius_km().to_string());
        board_info!(
            "Triggering scrape job={:?} postal_code={} radius_km={}",
            query.job_name(),
            query.postal_code(),
            query.radius_km()
        );
        send(self.client.request(Method::GET, url)).await?;
        Ok(())
    }

    /// Asks the automation to delete everything it scraped.
    pub async fn reset(&self) -> Result<(), TransportError> {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("action", "delete");
        board_info!("Requesting scrape store reset");
        send(self.client.request(Method::GET, url)).await?;
        Ok(())
    }
}
