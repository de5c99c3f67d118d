use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};

use crate::view_model::{AppViewModel, JobRowView, ScrapeView};
use crate::{
    apply, normalize_date, resolve_agency, resolve_domain, FavoritesCache, FilterState, JobRecord,
    Page, RequestId, ScrapePhase, UserId, ValidationError, WatchPlan,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Transport,
    Permission,
    Validation,
    Scrape,
}

/// A non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    request_id: RequestId,
    append: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ScrapeSession {
    phase: ScrapePhase,
    validation: Option<ValidationError>,
    known_ids: BTreeSet<String>,
    known_total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    records: Vec<JobRecord>,
    next_cursor: Option<String>,
    total: Option<u64>,
    in_flight: Option<InFlight>,
    last_request_id: RequestId,
    filter: FilterState,
    user: Option<UserId>,
    favorites: FavoritesCache,
    scrape: ScrapeSession,
    watch_plan: WatchPlan,
    notices: Vec<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_watch_plan(plan: WatchPlan) -> Self {
        Self {
            watch_plan: plan,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.view_at(Local::now().date_naive())
    }

    /// Builds the view with `today` as reference for relative dates.
    pub fn view_at(&self, today: NaiveDate) -> AppViewModel {
        let rows = apply(&self.records, &self.filter)
            .into_iter()
            .map(|record| self.row_view(record, today))
            .collect::<Vec<_>>();

        AppViewModel {
            visible_count: rows.len(),
            rows,
            loaded_count: self.records.len(),
            total: self.total,
            has_more: self.has_more(),
            loading: self.in_flight.is_some(),
            search_query: self.filter.search_query.clone(),
            excluded_words: self.filter.excluded_list(),
            sort_order: self.filter.sort_order,
            signed_in: self.user.is_some(),
            favorites_stale: self.favorites.is_stale(),
            scrape: ScrapeView {
                phase: self.scrape.phase,
                validation_error: self.scrape.validation.as_ref().map(ToString::to_string),
            },
            notices: self.notices.clone(),
            dirty: self.dirty,
        }
    }

    fn row_view(&self, record: JobRecord, today: NaiveDate) -> JobRowView {
        let agency = resolve_agency(&record.link);
        JobRowView {
            favorite: self.favorites.is_favorited(&record.link),
            published: normalize_date(record.publication_date_raw.as_deref(), today),
            agency_domain: resolve_domain(&record.link),
            logo_url: agency.map(|agency| agency.logo_url.to_string()),
            id: record.id,
            title: record.title,
            location: record.location,
            link: record.link,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn visible_records(&self) -> Vec<JobRecord> {
        apply(&self.records, &self.filter)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub(crate) fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn favorites(&self) -> &FavoritesCache {
        &self.favorites
    }

    pub(crate) fn favorites_mut(&mut self) -> &mut FavoritesCache {
        &mut self.favorites
    }

    pub fn scrape_phase(&self) -> ScrapePhase {
        self.scrape.phase
    }

    pub fn watch_plan(&self) -> WatchPlan {
        self.watch_plan
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn notify(&mut self, level: NoticeLevel, kind: NoticeKind, text: impl Into<String>) {
        self.notices.push(Notice {
            level,
            kind,
            text: text.into(),
        });
        self.dirty = true;
    }

    pub(crate) fn clear_notices(&mut self) {
        if !self.notices.is_empty() {
            self.notices.clear();
            self.dirty = true;
        }
    }

    /// Starts a fetch that supersedes any fetch still in flight.
    pub(crate) fn begin_fetch(&mut self, append: bool) -> (RequestId, Option<String>) {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.in_flight = Some(InFlight { request_id, append });
        self.dirty = true;
        let cursor = if append {
            self.next_cursor.clone()
        } else {
            None
        };
        (request_id, cursor)
    }

    /// Whether `request_id` is the fetch currently awaited, and if so whether
    /// it appends.
    pub(crate) fn awaited_fetch(&self, request_id: RequestId) -> Option<bool> {
        self.in_flight
            .filter(|flight| flight.request_id == request_id)
            .map(|flight| flight.append)
    }

    pub(crate) fn finish_fetch(&mut self) {
        self.in_flight = None;
        self.dirty = true;
    }

    pub(crate) fn apply_page(&mut self, page: Page, append: bool) {
        if append {
            self.records.extend(page.records);
        } else {
            self.records = page.records;
        }
        self.next_cursor = page.next_cursor;
        self.total = page.total;
        self.in_flight = None;
        self.dirty = true;
    }

    pub(crate) fn clear_records(&mut self) {
        self.records.clear();
        self.next_cursor = None;
        self.total = None;
        self.dirty = true;
    }

    pub(crate) fn sign_in(&mut self, user: UserId) {
        self.user = Some(user);
        self.favorites.clear();
        self.dirty = true;
    }

    pub(crate) fn sign_out(&mut self) {
        self.user = None;
        self.favorites.clear();
        self.dirty = true;
    }

    pub(crate) fn set_scrape_phase(&mut self, phase: ScrapePhase) {
        self.scrape.phase = phase;
        self.dirty = true;
    }

    pub(crate) fn set_validation(&mut self, error: Option<ValidationError>) {
        self.scrape.validation = error;
        self.dirty = true;
    }

    /// Remembers what is known before a scrape so new results can be spotted.
    pub(crate) fn capture_scrape_baseline(&mut self) {
        self.scrape.known_ids = self.records.iter().map(|r| r.id.clone()).collect();
        self.scrape.known_total = self.total;
    }

    pub(crate) fn page_has_new_results(&self, page: &Page) -> bool {
        if let (Some(before), Some(now)) = (self.scrape.known_total, page.total) {
            if now > before {
                return true;
            }
        }
        page.records
            .iter()
            .any(|record| !self.scrape.known_ids.contains(&record.id))
    }
}
