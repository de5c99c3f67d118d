use std::fmt;

use jobboard_core::{FavoriteEntry, JobRecord, Page, RequestId, UserId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PageFetched {
        request_id: RequestId,
        result: Result<Page, TransportError>,
    },
    FavoritesListed {
        user_id: UserId,
        request_id: RequestId,
        result: Result<Vec<FavoriteEntry>, StoreError>,
    },
    FavoriteMutated {
        job_link: String,
        result: Result<(), StoreError>,
    },
    FilterDefaultsLoaded {
        user_id: UserId,
        result: Result<Vec<String>, StoreError>,
    },
    FilterDefaultsSaved {
        result: Result<(), StoreError>,
    },
    ScrapeTriggered {
        result: Result<(), TransportError>,
    },
    ResetCompleted {
        result: Result<(), TransportError>,
    },
    WatchWaitElapsed,
    WatchPollDue {
        poll: u32,
    },
}

/// Failure reaching a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A multi-page walk that failed midway, with the records read before the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error} after {} records", records.len())]
pub struct PartialFetch {
    pub records: Vec<JobRecord>,
    #[source]
    pub error: TransportError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    /// Engine not configured for this kind of request.
    Unavailable,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response body"),
            FailureKind::Unavailable => write!(f, "not configured"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("sign in required")]
    Permission,
    #[error(transparent)]
    Transport(#[from] TransportError),
}
