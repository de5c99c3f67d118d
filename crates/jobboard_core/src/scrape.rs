use std::time::Duration;

use thiserror::Error;

pub const MAX_RADIUS_KM: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("job name must not be empty")]
    EmptyJobName,
    #[error("postal code must be exactly 4 digits, got {0:?}")]
    InvalidPostalCode(String),
    #[error("search radius must be between 1 and {MAX_RADIUS_KM} km, got {0}")]
    InvalidRadius(u32),
}

/// A validated request for the external scraper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeQuery {
    job_name: String,
    postal_code: String,
    radius_km: u32,
}

impl ScrapeQuery {
    pub fn parse(
        job_name: &str,
        postal_code: &str,
        radius_km: u32,
    ) -> Result<Self, ValidationError> {
        let job_name = job_name.trim();
        if job_name.is_empty() {
            return Err(ValidationError::EmptyJobName);
        }
        let postal_code = postal_code.trim();
        if postal_code.len() != 4 || !postal_code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidPostalCode(postal_code.to_string()));
        }
        if radius_km == 0 || radius_km > MAX_RADIUS_KM {
            return Err(ValidationError::InvalidRadius(radius_km));
        }
        Ok(Self {
            job_name: job_name.to_string(),
            postal_code: postal_code.to_string(),
            radius_km,
        })
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn radius_km(&self) -> u32 {
        self.radius_km
    }
}

/// Lifecycle of one externally triggered scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrapePhase {
    #[default]
    Idle,
    /// Webhook request sent, no answer yet.
    Triggered,
    /// Webhook accepted; waiting out the first-pass window.
    Waiting,
    /// Re-checking the source; the value is the number of checks issued.
    Polling(u32),
    Done {
        found: bool,
    },
    Failed,
}

impl ScrapePhase {
    pub fn is_active(self) -> bool {
        matches!(
            self,
            ScrapePhase::Triggered | ScrapePhase::Waiting | ScrapePhase::Polling(_)
        )
    }
}

/// Timing of the completion watch that follows a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchPlan {
    pub initial_wait: Duration,
    pub interval: Duration,
    pub max_polls: u32,
}

impl Default for WatchPlan {
    fn default() -> Self {
        Self {
            initial_wait: Duration::from_secs(90),
            interval: Duration::from_secs(15),
            max_polls: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postal_code_must_be_four_digits() {
        assert!(ScrapeQuery::parse("cariste", "1000", 10).is_ok());
        assert_eq!(
            ScrapeQuery::parse("cariste", "100", 10),
            Err(ValidationError::InvalidPostalCode("100".to_string()))
        );
        assert_eq!(
            ScrapeQuery::parse("cariste", "10a0", 10),
            Err(ValidationError::InvalidPostalCode("10a0".to_string()))
        );
    }

    #[test]
    fn rejects_blank_name_and_bad_radius() {
        assert_eq!(
            ScrapeQuery::parse("  ", "1000", 10),
            Err(ValidationError::EmptyJobName)
        );
        assert_eq!(
            ScrapeQuery::parse("cariste", "1000", 0),
            Err(ValidationError::InvalidRadius(0))
        );
        assert_eq!(
            ScrapeQuery::parse("cariste", "1000", MAX_RADIUS_KM + 1),
            Err(ValidationError::InvalidRadius(MAX_RADIUS_KM + 1))
        );
    }

    #[test]
    fn input_is_trimmed() {
        let query = ScrapeQuery::parse(" soudeur ", " 4000 ", 25).unwrap();
        assert_eq!(query.job_name(), "soudeur");
        assert_eq!(query.postal_code(), "4000");
        assert_eq!(query.radius_km(), 25);
    }
}
