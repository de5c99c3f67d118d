mod common;

use common::job;
use jobboard_core::{update, AppState, Effect, FavoriteEntry, Msg, NoticeKind, UserId};
use pretty_assertions::assert_eq;

fn signed_in(user: &UserId) -> AppState {
    let (state, _) = update(AppState::new(), Msg::SignedIn(user.clone()));
    state
}

fn entry(user: &UserId, link: &str) -> FavoriteEntry {
    FavoriteEntry {
        id: format!("fav-{link}"),
        user_id: user.clone(),
        job_title: "Magasinier".to_string(),
        job_location: Some("Liège".to_string()),
        job_link: link.to_string(),
    }
}

#[test]
fn favoriting_while_signed_out_is_rejected() {
    common::init_logging();
    let record = job("1", "Magasinier", None, "https://www.randstad.be/jobs/1");

    let (mut state, effects) = update(AppState::new(), Msg::FavoriteToggled(record));

    assert!(effects.is_empty());
    let notices = state.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Permission);
    assert!(!state.favorites().is_stale());
}

#[test]
fn sign_in_loads_favorites() {
    common::init_logging();
    let user = UserId::new("user-1");
    let (state, effects) = update(AppState::new(), Msg::SignedIn(user.clone()));

    assert!(effects.contains(&Effect::LoadFavorites {
        user_id: user.clone(),
        request_id: 1,
    }));
    assert!(state.favorites().list().is_none());

    let (state, _) = update(
        state,
        Msg::FavoritesLoaded {
            user_id: user.clone(),
            request_id: 1,
            entries: vec![entry(&user, "https://a.be/1")],
        },
    );
    assert_eq!(state.favorites().list().map(<[_]>::len), Some(1));
}

#[test]
fn toggle_adds_then_removes() {
    common::init_logging();
    let user = UserId::new("user-1");
    let record = job("1", "Magasinier", None, "https://a.be/1");

    let (state, effects) = update(signed_in(&user), Msg::FavoriteToggled(record.clone()));
    assert_eq!(
        effects,
        vec![Effect::AddFavorite {
            user_id: user.clone(),
            job: record.clone(),
        }]
    );
    assert!(state.favorites().is_favorited(&record.link));

    let (state, effects) = update(
        state,
        Msg::FavoriteMutationFinished {
            job_link: record.link.clone(),
            result: Ok(()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::LoadFavorites {
            user_id: user.clone(),
            request_id: 2,
        }]
    );

    let (state, _) = update(
        state,
        Msg::FavoritesLoaded {
            user_id: user.clone(),
            request_id: 2,
            entries: vec![entry(&user, &record.link)],
        },
    );
    let (_state, effects) = update(state, Msg::FavoriteToggled(record.clone()));
    assert_eq!(
        effects,
        vec![Effect::RemoveFavorite {
            user_id: user,
            job_link: record.link,
        }]
    );
}

#[test]
fn cached_list_is_untrusted_after_mutation() {
    common::init_logging();
    let user = UserId::new("user-1");
    let (state, _) = update(
        signed_in(&user),
        Msg::FavoritesLoaded {
            user_id: user.clone(),
            request_id: 1,
            entries: vec![entry(&user, "https://a.be/1")],
        },
    );
    assert!(state.favorites().list().is_some());

    let (state, _) = update(
        state,
        Msg::FavoriteToggled(job("2", "Cariste", None, "https://a.be/2")),
    );
    assert!(state.favorites().list().is_none());
    assert!(state.view().favorites_stale);
}

#[test]
fn failed_mutation_notifies_and_reloads() {
    common::init_logging();
    let user = UserId::new("user-1");
    let record = job("1", "Magasinier", None, "https://a.be/1");
    let (state, _) = update(signed_in(&user), Msg::FavoriteToggled(record.clone()));

    let (mut state, effects) = update(
        state,
        Msg::FavoriteMutationFinished {
            job_link: record.link.clone(),
            result: Err("network error".to_string()),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::LoadFavorites {
            user_id: user.clone(),
            request_id: 2,
        }]
    );
    assert!(!state.favorites().is_favorited(&record.link));
    assert_eq!(state.take_notices()[0].kind, NoticeKind::Transport);
}

#[test]
fn favorites_for_previous_user_are_ignored() {
    common::init_logging();
    let old = UserId::new("old");
    let new = UserId::new("new");
    let (state, _) = update(signed_in(&old), Msg::SignedIn(new.clone()));

    let (state, _) = update(
        state,
        Msg::FavoritesLoaded {
            user_id: old.clone(),
            request_id: 1,
            entries: vec![entry(&old, "https://a.be/1")],
        },
    );
    assert!(state.favorites().list().is_none());
    assert!(!state.favorites().is_favorited("https://a.be/1"));
}

#[test]
fn sign_out_forgets_favorites() {
    common::init_logging();
    let user = UserId::new("user-1");
    let (state, _) = update(
        signed_in(&user),
        Msg::FavoritesLoaded {
            user_id: user.clone(),
            request_id: 1,
            entries: vec![entry(&user, "https://a.be/1")],
        },
    );
    let (state, _) = update(state, Msg::SignedOut);
    assert!(state.user().is_none());
    assert!(state.favorites().list().is_none());
}

#[test]
fn added_favorite_holds_until_reload_lands() {
    common::init_logging();
    let user = UserId::new("user-1");
    let record = job("1", "Magasinier", None, "https://a.be/1");
    let (state, _) = update(signed_in(&user), Msg::FavoriteToggled(record.clone()));
    let (state, _) = update(
        state,
        Msg::FavoriteMutationFinished {
            job_link: record.link.clone(),
            result: Ok(()),
        },
    );

    assert!(state.favorites().is_favorited(&record.link));

    let (_state, effects) = update(state, Msg::FavoriteToggled(record.clone()));
    assert_eq!(
        effects,
        vec![Effect::RemoveFavorite {
            user_id: user,
            job_link: record.link,
        }]
    );
}

#[test]
fn list_requested_before_mutation_is_dropped() {
    common::init_logging();
    let user = UserId::new("user-1");
    let record = job("1", "Magasinier", None, "https://a.be/1");
    let (state, _) = update(signed_in(&user), Msg::FavoriteToggled(record.clone()));
    let (state, _) = update(
        state,
        Msg::FavoriteMutationFinished {
            job_link: record.link.clone(),
            result: Ok(()),
        },
    );

    // Answer to the sign-in load, read before the add reached the store.
    let (state, _) = update(
        state,
        Msg::FavoritesLoaded {
            user_id: user.clone(),
            request_id: 1,
            entries: Vec::new(),
        },
    );
    assert!(state.favorites().list().is_none());
    assert!(state.favorites().is_favorited(&record.link));

    let (state, _) = update(
        state,
        Msg::FavoritesLoaded {
            user_id: user.clone(),
            request_id: 2,
            entries: vec![entry(&user, &record.link)],
        },
    );
    assert_eq!(state.favorites().list().map(<[_]>::len), Some(1));
    assert!(state.favorites().is_favorited(&record.link));
}

#[test]
fn failed_removal_keeps_favorite() {
    common::init_logging();
    let user = UserId::new("user-1");
    let record = job("1", "Magasinier", None, "https://a.be/1");
    let (state, _) = update(
        signed_in(&user),
        Msg::FavoritesLoaded {
            user_id: user.clone(),
            request_id: 1,
            entries: vec![entry(&user, &record.link)],
        },
    );
    let (state, _) = update(state, Msg::FavoriteToggled(record.clone()));
    assert!(!state.favorites().is_favorited(&record.link));

    let (state, _) = update(
        state,
        Msg::FavoriteMutationFinished {
            job_link: record.link.clone(),
            result: Err("permission denied".to_string()),
        },
    );
    assert!(state.favorites().is_favorited(&record.link));
}
