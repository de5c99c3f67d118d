use std::time::Duration;

use anyhow::bail;
use board_logging::board_debug;
use jobboard_core::{update, AppState, AppViewModel, Msg, Notice};

use crate::effects::EffectRunner;

/// How long one wait on the engine lasts before re-checking exit conditions.
const POLL_STEP: Duration = Duration::from_millis(250);

/// Owns the core state and drives it with engine answers until a command is done.
pub struct App {
    state: AppState,
    runner: EffectRunner,
    response_timeout: Duration,
}

impl App {
    pub fn new(state: AppState, runner: EffectRunner, response_timeout: Duration) -> Self {
        Self {
            state,
            runner,
            response_timeout,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.state.take_notices()
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Processes engine answers until no request is pending and no scrape
    /// watch is running.
    pub fn run_until_idle(&mut self) -> anyhow::Result<()> {
        self.run_while(|state| state.scrape_phase().is_active(), |_| {})
    }

    /// Processes engine answers while requests are pending or `keep_going`
    /// holds. `on_change` sees the view after every message that changed it.
    pub fn run_while(
        &mut self,
        keep_going: impl Fn(&AppState) -> bool,
        mut on_change: impl FnMut(&AppViewModel),
    ) -> anyhow::Result<()> {
        let mut waited = Duration::ZERO;
        while self.runner.outstanding() > 0 || keep_going(&self.state) {
            match self.runner.next_msg(POLL_STEP) {
                Some(msg) => {
                    waited = Duration::ZERO;
                    self.dispatch(msg);
                    if self.state.consume_dirty() {
                        on_change(&self.state.view());
                    }
                }
                None => {
                    waited += POLL_STEP;
                    if self.runner.outstanding() > 0 && waited >= self.response_timeout {
                        bail!(
                            "no answer from remote services after {}s ({} request(s) pending)",
                            waited.as_secs(),
                            self.runner.outstanding()
                        );
                    }
                }
            }
        }
        board_debug!("Run loop idle");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use jobboard_core::{JobRecord, Page, ScrapePhase, UserId, WatchPlan};
    use jobboard_engine::{EngineConfig, RecordSource, TransportError};
    use pretty_assertions::assert_eq;

    use super::*;

    /// Two pages of two listings, or one more page per call after a reset.
    #[derive(Default)]
    struct PagedSource {
        calls: AtomicUsize,
    }

    fn record(id: &str, title: &str) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            title: title.to_string(),
            location: Some("Liège".to_string()),
            link: format!("https://www.randstad.be/jobs/{id}"),
            publication_date_raw: Some("2025-01-08".to_string()),
            source_offset: None,
        }
    }

    #[async_trait::async_trait]
    impl RecordSource for PagedSource {
        async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(match cursor {
                None => Page {
                    records: vec![record("1", "Cariste"), record("2", "Magasinier")],
                    next_cursor: Some("p2".to_string()),
                    total: None,
                },
                Some(_) => Page {
                    records: vec![record("3", "Agent intérim logistique")],
                    next_cursor: None,
                    total: None,
                },
            })
        }
    }

    fn app(source: Arc<PagedSource>) -> App {
        let runner = EffectRunner::new(EngineConfig::new(source)).expect("engine");
        App::new(
            AppState::with_watch_plan(WatchPlan::default()),
            runner,
            Duration::from_secs(5),
        )
    }

    #[test]
    fn refresh_and_load_more_accumulate_pages() {
        let source = Arc::new(PagedSource::default());
        let mut app = app(source.clone());

        app.dispatch(Msg::RefreshRequested);
        app.run_until_idle().unwrap();
        assert_eq!(app.state().records().len(), 2);
        assert!(app.state().has_more());

        app.dispatch(Msg::LoadMoreRequested);
        app.run_until_idle().unwrap();
        assert_eq!(app.state().records().len(), 3);
        assert!(!app.state().has_more());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        app.dispatch(Msg::ExcludedWordAdded("intérim".to_string()));
        let titles: Vec<_> = app
            .state()
            .visible_records()
            .into_iter()
            .map(|record| record.title)
            .collect();
        assert_eq!(titles, vec!["Cariste", "Magasinier"]);
    }

    #[test]
    fn missing_services_surface_as_notices() {
        let mut app = app(Arc::new(PagedSource::default()));

        app.dispatch(Msg::SignedIn(UserId::new("u1")));
        app.run_until_idle().unwrap();

        let notices = app.take_notices();
        assert_eq!(notices.len(), 2, "{notices:?}");
        assert!(notices.iter().all(|notice| notice.text.contains("not configured")));
    }

    #[test]
    fn trigger_without_webhook_fails_scrape() {
        let mut app = app(Arc::new(PagedSource::default()));

        app.dispatch(Msg::ScrapeSubmitted {
            job_name: "cariste".to_string(),
            postal_code: "4000".to_string(),
            radius_km: 20,
        });
        let mut phases = Vec::new();
        app.run_while(
            |state| state.scrape_phase().is_active(),
            |view| phases.push(view.scrape.phase),
        )
        .unwrap();

        assert_eq!(app.state().scrape_phase(), ScrapePhase::Failed);
        assert_eq!(phases.last(), Some(&ScrapePhase::Failed));
    }
}
