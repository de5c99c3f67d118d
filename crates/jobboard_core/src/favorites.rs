use std::collections::BTreeMap;

use crate::{FavoriteEntry, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingToggle {
    favorited: bool,
    previous: bool,
    /// First list request issued after the store answered.
    settled_by: Option<RequestId>,
}

/// Client-side view of a user's favorites.
///
/// Every mutation invalidates the cached list until a list requested after
/// the store answered lands. Until then `is_favorited` reports the intended
/// outcome, or the previous value when the store rejected the change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FavoritesCache {
    entries: Vec<FavoriteEntry>,
    loaded: bool,
    stale: bool,
    pending: BTreeMap<String, PendingToggle>,
    last_request_id: RequestId,
    /// List answers for older requests predate a settled mutation.
    oldest_trusted: RequestId,
}

impl FavoritesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trusted list, or `None` when never loaded or invalidated by a mutation.
    pub fn list(&self) -> Option<&[FavoriteEntry]> {
        (self.loaded && !self.stale).then_some(self.entries.as_slice())
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn is_favorited(&self, job_link: &str) -> bool {
        match self.pending.get(job_link) {
            Some(toggle) => toggle.favorited,
            None => self.entries.iter().any(|entry| entry.job_link == job_link),
        }
    }

    pub fn begin_add(&mut self, job_link: &str) {
        self.begin_toggle(job_link, true);
    }

    pub fn begin_remove(&mut self, job_link: &str) {
        self.begin_toggle(job_link, false);
    }

    fn begin_toggle(&mut self, job_link: &str, favorited: bool) {
        let previous = self.is_favorited(job_link);
        self.pending.insert(
            job_link.to_string(),
            PendingToggle {
                favorited,
                previous,
                settled_by: None,
            },
        );
        self.stale = true;
    }

    /// Id for the next list request.
    pub fn begin_reload(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    /// The store answered for `job_link`; `reload` is the list request sent
    /// right after. A failed change falls back to the value before the toggle.
    pub fn settle(&mut self, job_link: &str, succeeded: bool, reload: RequestId) {
        if let Some(toggle) = self.pending.get_mut(job_link) {
            if !succeeded {
                toggle.favorited = toggle.previous;
            }
            toggle.settled_by = Some(reload);
        }
        self.oldest_trusted = self.oldest_trusted.max(reload);
        self.stale = true;
    }

    /// Applies a list answer. Returns false when the answer was requested
    /// before a mutation settled and is dropped.
    pub fn replace(&mut self, request_id: RequestId, entries: Vec<FavoriteEntry>) -> bool {
        if request_id < self.oldest_trusted {
            return false;
        }
        self.entries = entries;
        self.loaded = true;
        self.pending
            .retain(|_, toggle| !matches!(toggle.settled_by, Some(by) if by <= request_id));
        self.stale = !self.pending.is_empty();
        true
    }

    /// Forgets everything; answers to requests sent before are dropped.
    pub fn clear(&mut self) {
        let last_request_id = self.last_request_id;
        *self = Self {
            last_request_id,
            oldest_trusted: last_request_id + 1,
            ..Self::default()
        };
    }
}
