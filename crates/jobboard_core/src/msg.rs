use crate::{FavoriteEntry, JobRecord, Page, RequestId, SortOrder, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Load from the first page, replacing whatever was accumulated.
    RefreshRequested,
    /// User asked for the next page.
    LoadMoreRequested,
    /// Source answered a fetch.
    PageLoaded {
        request_id: RequestId,
        page: Page,
    },
    /// Source fetch failed (transport, auth or decode).
    PageFailed {
        request_id: RequestId,
        message: String,
    },
    /// User edited the search box.
    SearchChanged(String),
    ExcludedWordAdded(String),
    ExcludedWordRemoved(String),
    SortChanged(Option<SortOrder>),
    SignedIn(UserId),
    SignedOut,
    /// Stored per-user exclusion list arrived.
    FilterDefaultsLoaded {
        user_id: UserId,
        words: Vec<String>,
    },
    /// Reading or saving the per-user exclusion list failed.
    FilterDefaultsFailed {
        message: String,
    },
    /// User clicked the favorite toggle on a listing.
    FavoriteToggled(JobRecord),
    /// Store answered an add or remove.
    FavoriteMutationFinished {
        job_link: String,
        result: Result<(), String>,
    },
    FavoritesLoaded {
        user_id: UserId,
        request_id: RequestId,
        entries: Vec<FavoriteEntry>,
    },
    FavoritesFailed {
        message: String,
    },
    /// User submitted the scrape form.
    ScrapeSubmitted {
        job_name: String,
        postal_code: String,
        radius_km: u32,
    },
    /// Webhook answered the trigger request.
    ScrapeTriggerFinished {
        result: Result<(), String>,
    },
    /// First-pass wait window is over.
    ScrapeWaitElapsed,
    /// Periodic re-check is due.
    ScrapePollDue,
    /// User abandoned the scrape watch.
    ScrapeCancelled,
    /// User confirmed the destructive reset of scraped data.
    ResetRequested,
    ResetFinished {
        result: Result<(), String>,
    },
    /// The view that owns the session is going away.
    ViewClosed,
    NoticesDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
