use crate::{JobRecord, RequestId, ScrapeQuery, UserId, WatchPlan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// `cursor: None` restarts from the first page.
    FetchPage {
        request_id: RequestId,
        cursor: Option<String>,
    },
    LoadFilterDefaults {
        user_id: UserId,
    },
    SaveFilterDefaults {
        user_id: UserId,
        words: Vec<String>,
    },
    LoadFavorites {
        user_id: UserId,
        request_id: RequestId,
    },
    AddFavorite {
        user_id: UserId,
        job: JobRecord,
    },
    RemoveFavorite {
        user_id: UserId,
        job_link: String,
    },
    TriggerScrape {
        query: ScrapeQuery,
    },
    StartWatch {
        plan: WatchPlan,
    },
    StopWatch,
    ResetScrapes,
}
