//! Jobboard core: pure record shaping, filtering and the UI state machine.
mod agency;
mod date;
mod effect;
mod favorites;
mod filter;
mod msg;
mod record;
mod scrape;
mod state;
mod update;
mod view_model;

pub use agency::{resolve_agency, resolve_domain, resolve_logo, Agency, AGENCIES};
pub use date::normalize_date;
pub use effect::Effect;
pub use favorites::FavoritesCache;
pub use filter::{apply, collation_cmp, FilterState, SortOrder};
pub use msg::Msg;
pub use record::{FavoriteEntry, JobRecord, Page, RequestId, UserId};
pub use scrape::{ScrapePhase, ScrapeQuery, ValidationError, WatchPlan, MAX_RADIUS_KM};
pub use state::{AppState, Notice, NoticeKind, NoticeLevel};
pub use update::update;
pub use view_model::{AppViewModel, JobRowView, ScrapeView};
