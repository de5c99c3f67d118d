use crate::{Notice, ScrapePhase, SortOrder};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub rows: Vec<JobRowView>,
    pub visible_count: usize,
    pub loaded_count: usize,
    pub total: Option<u64>,
    pub has_more: bool,
    pub loading: bool,
    pub search_query: String,
    pub excluded_words: Vec<String>,
    pub sort_order: Option<SortOrder>,
    pub signed_in: bool,
    pub favorites_stale: bool,
    pub scrape: ScrapeView,
    pub notices: Vec<Notice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub id: String,
    pub title: String,
    pub location: Option<String>,
    pub link: String,
    /// `DD/MM/YYYY` when recognized, otherwise the raw source text.
    pub published: String,
    pub agency_domain: Option<String>,
    pub logo_url: Option<String>,
    pub favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeView {
    pub phase: ScrapePhase,
    pub validation_error: Option<String>,
}
