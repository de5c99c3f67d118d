use board_logging::{board_debug, board_info};

use crate::{AppState, Effect, Msg, NoticeKind, NoticeLevel, ScrapePhase, ScrapeQuery};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::RefreshRequested => vec![fetch_effect(&mut state, false)],
        Msg::LoadMoreRequested => {
            // Pages are requested one at a time so they land in order.
            if state.is_loading() || !state.has_more() {
                return (state, Vec::new());
            }
            vec![fetch_effect(&mut state, true)]
        }
        Msg::PageLoaded { request_id, page } => {
            let Some(append) = state.awaited_fetch(request_id) else {
                board_debug!("Dropping superseded page for request {}", request_id);
                return (state, Vec::new());
            };
            let found = !append
                && matches!(state.scrape_phase(), ScrapePhase::Polling(_))
                && state.page_has_new_results(&page);
            state.apply_page(page, append);
            if found {
                board_info!("Scrape results detected");
                state.set_scrape_phase(ScrapePhase::Done { found: true });
                state.notify(
                    NoticeLevel::Info,
                    NoticeKind::Scrape,
                    "New listings are available",
                );
                vec![Effect::StopWatch]
            } else {
                Vec::new()
            }
        }
        Msg::PageFailed {
            request_id,
            message,
        } => {
            if state.awaited_fetch(request_id).is_none() {
                return (state, Vec::new());
            }
            state.finish_fetch();
            state.notify(
                NoticeLevel::Error,
                NoticeKind::Transport,
                format!("Could not load listings: {message}"),
            );
            Vec::new()
        }
        Msg::SearchChanged(query) => {
            if state.filter().search_query != query {
                state.filter_mut().search_query = query;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ExcludedWordAdded(word) => {
            if state.filter_mut().exclude(&word) {
                state.mark_dirty();
                save_defaults_effect(&state)
            } else {
                Vec::new()
            }
        }
        Msg::ExcludedWordRemoved(word) => {
            if state.filter_mut().include(&word) {
                state.mark_dirty();
                save_defaults_effect(&state)
            } else {
                Vec::new()
            }
        }
        Msg::SortChanged(order) => {
            if state.filter().sort_order != order {
                state.filter_mut().sort_order = order;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SignedIn(user_id) => {
            state.sign_in(user_id.clone());
            let request_id = state.favorites_mut().begin_reload();
            vec![
                Effect::LoadFavorites {
                    user_id: user_id.clone(),
                    request_id,
                },
                Effect::LoadFilterDefaults { user_id },
            ]
        }
        Msg::SignedOut => {
            state.sign_out();
            Vec::new()
        }
        Msg::FilterDefaultsLoaded { user_id, words } => {
            if state.user() == Some(&user_id) {
                for word in &words {
                    state.filter_mut().exclude(word);
                }
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FilterDefaultsFailed { message } => {
            state.notify(
                NoticeLevel::Warning,
                NoticeKind::Transport,
                format!("Saved exclusions unavailable: {message}"),
            );
            Vec::new()
        }
        Msg::FavoriteToggled(job) => {
            let Some(user_id) = state.user().cloned() else {
                state.notify(
                    NoticeLevel::Warning,
                    NoticeKind::Permission,
                    "Sign in to save favorites",
                );
                return (state, Vec::new());
            };
            state.mark_dirty();
            if state.favorites().is_favorited(&job.link) {
                state.favorites_mut().begin_remove(&job.link);
                vec![Effect::RemoveFavorite {
                    user_id,
                    job_link: job.link,
                }]
            } else {
                state.favorites_mut().begin_add(&job.link);
                vec![Effect::AddFavorite { user_id, job }]
            }
        }
        Msg::FavoriteMutationFinished { job_link, result } => {
            state.mark_dirty();
            if let Err(message) = &result {
                state.notify(
                    NoticeLevel::Error,
                    NoticeKind::Transport,
                    format!("Could not update favorites: {message}"),
                );
            }
            let Some(user_id) = state.user().cloned() else {
                return (state, Vec::new());
            };
            let request_id = state.favorites_mut().begin_reload();
            state
                .favorites_mut()
                .settle(&job_link, result.is_ok(), request_id);
            vec![Effect::LoadFavorites {
                user_id,
                request_id,
            }]
        }
        Msg::FavoritesLoaded {
            user_id,
            request_id,
            entries,
        } => {
            if state.user() != Some(&user_id) {
                return (state, Vec::new());
            }
            if state.favorites_mut().replace(request_id, entries) {
                state.mark_dirty();
            } else {
                board_debug!("Dropping favorites list from request {}", request_id);
            }
            Vec::new()
        }
        Msg::FavoritesFailed { message } => {
            state.notify(
                NoticeLevel::Error,
                NoticeKind::Transport,
                format!("Could not load favorites: {message}"),
            );
            Vec::new()
        }
        Msg::ScrapeSubmitted {
            job_name,
            postal_code,
            radius_km,
        } => {
            if state.scrape_phase().is_active() {
                return (state, Vec::new());
            }
            match ScrapeQuery::parse(&job_name, &postal_code, radius_km) {
                Ok(query) => {
                    state.set_validation(None);
                    state.capture_scrape_baseline();
                    state.set_scrape_phase(ScrapePhase::Triggered);
                    vec![Effect::TriggerScrape { query }]
                }
                Err(err) => {
                    state.notify(NoticeLevel::Warning, NoticeKind::Validation, err.to_string());
                    state.set_validation(Some(err));
                    Vec::new()
                }
            }
        }
        Msg::ScrapeTriggerFinished { result } => {
            if state.scrape_phase() != ScrapePhase::Triggered {
                return (state, Vec::new());
            }
            match result {
                Ok(()) => {
                    state.set_scrape_phase(ScrapePhase::Waiting);
                    vec![Effect::StartWatch {
                        plan: state.watch_plan(),
                    }]
                }
                Err(message) => {
                    state.set_scrape_phase(ScrapePhase::Failed);
                    state.notify(
                        NoticeLevel::Error,
                        NoticeKind::Scrape,
                        format!("Scrape could not be started: {message}"),
                    );
                    Vec::new()
                }
            }
        }
        Msg::ScrapeWaitElapsed => {
            if state.scrape_phase() != ScrapePhase::Waiting {
                return (state, Vec::new());
            }
            state.set_scrape_phase(ScrapePhase::Polling(1));
            vec![fetch_effect(&mut state, false)]
        }
        Msg::ScrapePollDue => {
            let ScrapePhase::Polling(checks) = state.scrape_phase() else {
                return (state, Vec::new());
            };
            if checks >= state.watch_plan().max_polls {
                board_info!("Scrape watch gave up after {} checks", checks);
                state.set_scrape_phase(ScrapePhase::Done { found: false });
                state.notify(
                    NoticeLevel::Info,
                    NoticeKind::Scrape,
                    "Scrape finished without new listings",
                );
                return (state, vec![Effect::StopWatch]);
            }
            state.set_scrape_phase(ScrapePhase::Polling(checks + 1));
            vec![fetch_effect(&mut state, false)]
        }
        Msg::ScrapeCancelled | Msg::ViewClosed => {
            if state.scrape_phase().is_active() {
                state.set_scrape_phase(ScrapePhase::Idle);
                vec![Effect::StopWatch]
            } else {
                Vec::new()
            }
        }
        Msg::ResetRequested => vec![Effect::ResetScrapes],
        Msg::ResetFinished { result } => match result {
            Ok(()) => {
                state.clear_records();
                state.notify(NoticeLevel::Info, NoticeKind::Scrape, "Scraped listings cleared");
                vec![fetch_effect(&mut state, false)]
            }
            Err(message) => {
                state.notify(
                    NoticeLevel::Error,
                    NoticeKind::Transport,
                    format!("Reset failed: {message}"),
                );
                Vec::new()
            }
        },
        Msg::NoticesDismissed => {
            state.clear_notices();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn fetch_effect(state: &mut AppState, append: bool) -> Effect {
    let (request_id, cursor) = state.begin_fetch(append);
    Effect::FetchPage { request_id, cursor }
}

fn save_defaults_effect(state: &AppState) -> Vec<Effect> {
    match state.user() {
        Some(user_id) => vec![Effect::SaveFilterDefaults {
            user_id: user_id.clone(),
            words: state.filter().excluded_list(),
        }],
        None => Vec::new(),
    }
}
