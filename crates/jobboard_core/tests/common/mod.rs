#![allow(dead_code)]

use std::sync::Once;

use jobboard_core::{update, AppState, Effect, JobRecord, Msg, Page, RequestId};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(board_logging::initialize_for_tests);
}

pub fn job(id: &str, title: &str, location: Option<&str>, link: &str) -> JobRecord {
    JobRecord {
        id: id.to_string(),
        title: title.to_string(),
        location: location.map(ToOwned::to_owned),
        link: link.to_string(),
        publication_date_raw: None,
        source_offset: None,
    }
}

pub fn page(records: Vec<JobRecord>, next_cursor: Option<&str>) -> Page {
    Page {
        records,
        next_cursor: next_cursor.map(ToOwned::to_owned),
        total: None,
    }
}

/// Returns the request id and cursor of the single `FetchPage` effect.
pub fn fetch_request(effects: &[Effect]) -> (RequestId, Option<String>) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchPage { request_id, cursor } => Some((*request_id, cursor.clone())),
            _ => None,
        })
        .expect("fetch effect")
}

/// Refreshes and answers with `first`, returning the loaded state.
pub fn loaded(state: AppState, first: Page) -> AppState {
    let (state, effects) = update(state, Msg::RefreshRequested);
    let (request_id, _) = fetch_request(&effects);
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request_id,
            page: first,
        },
    );
    state
}
