use std::time::Duration;

use board_logging::{board_debug, board_info, board_warn};
use jobboard_core::{Effect, Msg};
use jobboard_engine::{EngineCommand, EngineConfig, EngineEvent, EngineHandle};

/// Feeds core effects to the engine and turns engine events back into messages.
///
/// Counts the commands still waiting for an answer; watch timers are not
/// counted since they only stop when told to.
pub struct EffectRunner {
    engine: EngineHandle,
    outstanding: usize,
}

impl EffectRunner {
    pub fn new(config: EngineConfig) -> std::io::Result<Self> {
        Ok(Self {
            engine: EngineHandle::new(config)?,
            outstanding: 0,
        })
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let command = command_for(effect);
            if expects_reply(&command) {
                self.outstanding += 1;
            }
            board_debug!("Submitting {:?}", command);
            self.engine.submit(command);
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn next_msg(&mut self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        if is_reply(&event) {
            self.outstanding = self.outstanding.saturating_sub(1);
        }
        Some(msg_for(event))
    }
}

fn expects_reply(command: &EngineCommand) -> bool {
    !matches!(
        command,
        EngineCommand::StartWatch { .. } | EngineCommand::StopWatch
    )
}

fn is_reply(event: &EngineEvent) -> bool {
    !matches!(
        event,
        EngineEvent::WatchWaitElapsed | EngineEvent::WatchPollDue { .. }
    )
}

pub(crate) fn command_for(effect: Effect) -> EngineCommand {
    match effect {
        Effect::FetchPage { request_id, cursor } => {
            board_info!(
                "FetchPage request_id={} cursor={}",
                request_id,
                cursor.as_deref().unwrap_or("<first>")
            );
            EngineCommand::FetchPage { request_id, cursor }
        }
        Effect::LoadFilterDefaults { user_id } => EngineCommand::LoadFilterDefaults { user_id },
        Effect::SaveFilterDefaults { user_id, words } => {
            EngineCommand::SaveFilterDefaults { user_id, words }
        }
        Effect::LoadFavorites {
            user_id,
            request_id,
        } => EngineCommand::ListFavorites {
            user_id,
            request_id,
        },
        Effect::AddFavorite { user_id, job } => EngineCommand::AddFavorite { user_id, job },
        Effect::RemoveFavorite { user_id, job_link } => {
            EngineCommand::RemoveFavorite { user_id, job_link }
        }
        Effect::TriggerScrape { query } => EngineCommand::TriggerScrape { query },
        Effect::StartWatch { plan } => EngineCommand::StartWatch { plan },
        Effect::StopWatch => EngineCommand::StopWatch,
        Effect::ResetScrapes => EngineCommand::ResetScrapes,
    }
}

pub(crate) fn msg_for(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PageFetched { request_id, result } => match result {
            Ok(page) => Msg::PageLoaded { request_id, page },
            Err(err) => Msg::PageFailed {
                request_id,
                message: err.to_string(),
            },
        },
        EngineEvent::FavoritesListed {
            user_id,
            request_id,
            result,
        } => match result {
            Ok(entries) => Msg::FavoritesLoaded {
                user_id,
                request_id,
                entries,
            },
            Err(err) => Msg::FavoritesFailed {
                message: err.to_string(),
            },
        },
        EngineEvent::FavoriteMutated { job_link, result } => {
            if let Err(err) = &result {
                board_warn!("Favorite update for {} failed: {}", job_link, err);
            }
            Msg::FavoriteMutationFinished {
                job_link,
                result: result.map_err(|err| err.to_string()),
            }
        }
        EngineEvent::FilterDefaultsLoaded { user_id, result } => match result {
            Ok(words) => Msg::FilterDefaultsLoaded { user_id, words },
            Err(err) => Msg::FilterDefaultsFailed {
                message: err.to_string(),
            },
        },
        EngineEvent::FilterDefaultsSaved { result } => match result {
            Ok(()) => Msg::NoOp,
            Err(err) => Msg::FilterDefaultsFailed {
                message: err.to_string(),
            },
        },
        EngineEvent::ScrapeTriggered { result } => Msg::ScrapeTriggerFinished {
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::ResetCompleted { result } => Msg::ResetFinished {
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::WatchWaitElapsed => Msg::ScrapeWaitElapsed,
        EngineEvent::WatchPollDue { poll } => {
            board_debug!("Scrape poll {} due", poll);
            Msg::ScrapePollDue
        }
    }
}
