//! Jobboard engine: remote sources, stores and effect execution.
mod defaults;
mod engine;
mod favorites;
mod http;
mod postgrest;
mod source;
mod types;
mod watch;
mod webhook;

pub use defaults::{FilterDefaultsStore, PostgrestFilterDefaultsStore};
pub use engine::{
    handle_command, ChannelEventSink, EngineCommand, EngineConfig, EngineHandle, EventSink,
};
pub use favorites::{FavoritesStore, PostgrestFavoritesStore};
pub use http::HttpSettings;
pub use postgrest::{PostgrestClient, SupabaseSettings};
pub use source::{
    fetch_all, FieldMapping, RecordSource, RelationalSettings, RelationalSource, TabularSettings,
    TabularSource,
};
pub use types::{EngineEvent, FailureKind, PartialFetch, StoreError, TransportError};
pub use watch::{run_watch, WatchOutcome};
pub use webhook::ScrapeWebhook;
