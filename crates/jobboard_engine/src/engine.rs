use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use board_logging::{board_debug, board_warn};
use jobboard_core::{JobRecord, RequestId, ScrapeQuery, UserId, WatchPlan};
use tokio_util::sync::CancellationToken;

use crate::watch::run_watch;
use crate::{
    EngineEvent, FailureKind, FavoritesStore, FilterDefaultsStore, RecordSource, ScrapeWebhook,
    StoreError, TransportError,
};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Remote services the engine talks to. Only the record source is mandatory.
#[derive(Clone)]
pub struct EngineConfig {
    pub source: Arc<dyn RecordSource>,
    pub favorites: Option<Arc<dyn FavoritesStore>>,
    pub filter_defaults: Option<Arc<dyn FilterDefaultsStore>>,
    pub webhook: Option<ScrapeWebhook>,
}

impl EngineConfig {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            favorites: None,
            filter_defaults: None,
            webhook: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    FetchPage {
        request_id: RequestId,
        cursor: Option<String>,
    },
    ListFavorites {
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
    LoadFilterDefaults {
        user_id: UserId,
    },
    SaveFilterDefaults {
        user_id: UserId,
        words: Vec<String>,
    },
    TriggerScrape {
        query: ScrapeQuery,
    },
    ResetScrapes,
    /// Replaces any running watch.
    StartWatch {
        plan: WatchPlan,
    },
    StopWatch,
}

/// Runs remote calls on a background tokio runtime and reports back through
/// [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    shutdown: CancellationToken,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();
        let engine_shutdown = shutdown.clone();

        thread::spawn(move || {
            let mut watch: Option<CancellationToken> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartWatch { plan } => {
                        if let Some(previous) = watch.take() {
                            previous.cancel();
                        }
                        let token = engine_shutdown.child_token();
                        watch = Some(token.clone());
                        let sink = ChannelEventSink::new(event_tx.clone());
                        runtime.spawn(async move {
                            let outcome = run_watch(plan, &sink, &token).await;
                            board_debug!("Scrape watch ended: {:?}", outcome);
                        });
                    }
                    EngineCommand::StopWatch => {
                        if let Some(token) = watch.take() {
                            token.cancel();
                        }
                    }
                    command => {
                        let config = config.clone();
                        let sink = ChannelEventSink::new(event_tx.clone());
                        runtime.spawn(async move {
                            handle_command(&config, command, &sink).await;
                        });
                    }
                }
            }
            engine_shutdown.cancel();
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            shutdown,
        })
    }

    pub fn submit(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            board_warn!("Engine thread has stopped; command dropped");
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn unavailable(what: &str) -> TransportError {
    TransportError::new(FailureKind::Unavailable, format!("{what} is not configured"))
}

/// Executes one remote command and emits its outcome.
pub async fn handle_command(config: &EngineConfig, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::FetchPage { request_id, cursor } => {
            let result = config.source.fetch_page(cursor.as_deref()).await;
            if let Err(err) = &result {
                board_warn!("Page fetch {} failed: {}", request_id, err);
            }
            sink.emit(EngineEvent::PageFetched { request_id, result });
        }
        EngineCommand::ListFavorites {
            user_id,
            request_id,
        } => {
            let result = match &config.favorites {
                Some(store) => store.list(Some(&user_id)).await,
                None => Err(StoreError::Transport(unavailable("favorites store"))),
            };
            sink.emit(EngineEvent::FavoritesListed {
                user_id,
                request_id,
                result,
            });
        }
        EngineCommand::AddFavorite { user_id, job } => {
            let result = match &config.favorites {
                Some(store) => store.add(Some(&user_id), &job).await,
                None => Err(StoreError::Transport(unavailable("favorites store"))),
            };
            sink.emit(EngineEvent::FavoriteMutated {
                job_link: job.link,
                result,
            });
        }
        EngineCommand::RemoveFavorite { user_id, job_link } => {
            let result = match &config.favorites {
                Some(store) => store.remove(Some(&user_id), &job_link).await,
                None => Err(StoreError::Transport(unavailable("favorites store"))),
            };
            sink.emit(EngineEvent::FavoriteMutated { job_link, result });
        }
        EngineCommand::LoadFilterDefaults { user_id } => {
            let result = match &config.filter_defaults {
                Some(store) => store.load(&user_id).await,
                None => Err(StoreError::Transport(unavailable("filter defaults store"))),
            };
            sink.emit(EngineEvent::FilterDefaultsLoaded { user_id, result });
        }
        EngineCommand::SaveFilterDefaults { user_id, words } => {
            let result = match &config.filter_defaults {
                Some(store) => store.save(&user_id, &words).await,
                None => Err(StoreError::Transport(unavailable("filter defaults store"))),
            };
            sink.emit(EngineEvent::FilterDefaultsSaved { result });
        }
        EngineCommand::TriggerScrape { query } => {
            let result = match &config.webhook {
                Some(webhook) => webhook.trigger(&query).await,
                None => Err(unavailable("scrape webhook")),
            };
            sink.emit(EngineEvent::ScrapeTriggered { result });
        }
        EngineCommand::ResetScrapes => {
            let result = match &config.webhook {
                Some(webhook) => webhook.reset().await,
                None => Err(unavailable("scrape webhook")),
            };
            sink.emit(EngineEvent::ResetCompleted { result });
        }
        EngineCommand::StartWatch { .. } | EngineCommand::StopWatch => {
            board_debug!("Watch commands are handled by the engine thread");
        }
    }
}
