mod common;

use common::{fetch_request, job, loaded, page};
use jobboard_core::{update, AppState, Effect, Msg, NoticeKind, Page};
use pretty_assertions::assert_eq;

fn ids(state: &AppState) -> Vec<&str> {
    state.records().iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn refresh_fetches_from_first_page() {
    common::init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::RefreshRequested);

    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            request_id: 1,
            cursor: None,
        }]
    );
    assert!(state.is_loading());
    assert!(state.consume_dirty());
}

#[test]
fn pages_accumulate_in_arrival_order() {
    common::init_logging();
    let state = loaded(
        AppState::new(),
        page(
            vec![
                job("1", "A", None, "https://a.be/1"),
                job("2", "B", None, "https://a.be/2"),
            ],
            Some("cursor-2"),
        ),
    );
    assert!(state.has_more());

    let (state, effects) = update(state, Msg::LoadMoreRequested);
    let (request_id, cursor) = fetch_request(&effects);
    assert_eq!(cursor.as_deref(), Some("cursor-2"));

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            page: page(vec![job("3", "C", None, "https://a.be/3")], None),
        },
    );

    assert_eq!(ids(&state), vec!["1", "2", "3"]);
    assert!(!state.has_more());
    assert!(!state.is_loading());
}

#[test]
fn load_more_stops_when_cursor_is_absent() {
    common::init_logging();
    let state = loaded(
        AppState::new(),
        page(vec![job("1", "A", None, "https://a.be/1")], None),
    );

    let (state, effects) = update(state, Msg::LoadMoreRequested);
    assert!(effects.is_empty());
    assert!(!state.is_loading());
}

#[test]
fn load_more_waits_for_in_flight_page() {
    common::init_logging();
    let state = loaded(
        AppState::new(),
        page(vec![job("1", "A", None, "https://a.be/1")], Some("c2")),
    );

    let (state, first) = update(state, Msg::LoadMoreRequested);
    assert_eq!(first.len(), 1);
    let (_state, second) = update(state, Msg::LoadMoreRequested);
    assert!(second.is_empty());
}

#[test]
fn superseded_responses_are_dropped() {
    common::init_logging();
    let (state, effects) = update(AppState::new(), Msg::RefreshRequested);
    let (stale_id, _) = fetch_request(&effects);
    let (state, effects) = update(state, Msg::RefreshRequested);
    let (fresh_id, _) = fetch_request(&effects);
    assert_ne!(stale_id, fresh_id);

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id: stale_id,
            page: page(vec![job("old", "Old", None, "https://a.be/old")], None),
        },
    );
    assert!(state.records().is_empty());
    assert!(state.is_loading());

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id: fresh_id,
            page: page(vec![job("new", "New", None, "https://a.be/new")], None),
        },
    );
    assert_eq!(ids(&state), vec!["new"]);
}

#[test]
fn refresh_replaces_accumulated_records() {
    common::init_logging();
    let state = loaded(
        AppState::new(),
        page(vec![job("1", "A", None, "https://a.be/1")], None),
    );
    let state = loaded(
        state,
        page(vec![job("9", "Z", None, "https://a.be/9")], None),
    );
    assert_eq!(ids(&state), vec!["9"]);
}

#[test]
fn failed_fetch_keeps_records_and_notifies() {
    common::init_logging();
    let state = loaded(
        AppState::new(),
        page(vec![job("1", "A", None, "https://a.be/1")], Some("c2")),
    );
    let (state, effects) = update(state, Msg::LoadMoreRequested);
    let (request_id, _) = fetch_request(&effects);

    let (mut state, effects) = update(
        state,
        Msg::PageFailed {
            request_id,
            message: "http status 401".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(ids(&state), vec!["1"]);
    assert!(state.has_more());
    assert!(!state.is_loading());
    let notices = state.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Transport);
    assert!(notices[0].text.contains("401"));
}

#[test]
fn view_rows_follow_filter_state() {
    common::init_logging();
    let mut dated = job("2", "Agent intérim", Some("Namur"), "https://www.adecco.be/2");
    dated.publication_date_raw = Some("12 Décembre 2024".to_string());
    let state = loaded(
        AppState::new(),
        Page {
            records: vec![job("1", "Magasinier", None, "https://www.randstad.be/jobs/1"), dated],
            next_cursor: None,
            total: Some(2),
        },
    );

    let (state, _) = update(state, Msg::SearchChanged("agent".to_string()));
    let today = chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    let view = state.view_at(today);
    assert_eq!(view.loaded_count, 2);
    assert_eq!(view.visible_count, 1);
    assert_eq!(view.total, Some(2));
    assert_eq!(view.rows[0].published, "12/12/2024");
    assert_eq!(view.rows[0].agency_domain.as_deref(), Some("adecco.be"));
    assert_eq!(
        view.rows[0].logo_url.as_deref(),
        Some("https://logo.clearbit.com/adecco.be")
    );

    let (state, _) = update(state, Msg::ExcludedWordAdded("intérim".to_string()));
    assert_eq!(state.view_at(today).visible_count, 0);
    let (state, _) = update(state, Msg::SearchChanged(String::new()));
    assert_eq!(state.visible_records().len(), 1);
}

#[test]
fn exclusions_are_saved_for_signed_in_user_only() {
    common::init_logging();
    let (state, effects) = update(AppState::new(), Msg::ExcludedWordAdded("nuit".to_string()));
    assert!(effects.is_empty());
    assert_eq!(state.filter().excluded_list(), vec!["nuit".to_string()]);

    let user = jobboard_core::UserId::new("user-1");
    let (state, _) = update(state, Msg::SignedIn(user.clone()));
    let (state, effects) = update(state, Msg::ExcludedWordAdded("Week-end".to_string()));
    assert_eq!(
        effects,
        vec![Effect::SaveFilterDefaults {
            user_id: user.clone(),
            words: vec!["nuit".to_string(), "week-end".to_string()],
        }]
    );

    let (_state, effects) = update(state, Msg::ExcludedWordAdded("nuit".to_string()));
    assert!(effects.is_empty());
}

#[test]
fn stored_defaults_merge_into_exclusions() {
    common::init_logging();
    let user = jobboard_core::UserId::new("user-1");
    let (state, effects) = update(AppState::new(), Msg::SignedIn(user.clone()));
    assert!(effects.contains(&Effect::LoadFilterDefaults {
        user_id: user.clone()
    }));

    let (state, _) = update(
        state,
        Msg::FilterDefaultsLoaded {
            user_id: user,
            words: vec!["Intérim".to_string(), " ".to_string()],
        },
    );
    assert_eq!(state.filter().excluded_list(), vec!["intérim".to_string()]);

    let (state, _) = update(
        state,
        Msg::FilterDefaultsLoaded {
            user_id: jobboard_core::UserId::new("someone-else"),
            words: vec!["nuit".to_string()],
        },
    );
    assert_eq!(state.filter().excluded_list(), vec!["intérim".to_string()]);
}
