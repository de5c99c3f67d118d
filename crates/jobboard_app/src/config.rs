//! RON configuration for the jobboard CLI.
//!
//! Secrets are usually left out of the file and supplied through the
//! `JOBBOARD_*` environment variables instead.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use board_logging::{board_debug, board_info};
use jobboard_core::{UserId, WatchPlan};
use jobboard_engine::{
    EngineConfig, FieldMapping, HttpSettings, PostgrestClient, PostgrestFavoritesStore,
    PostgrestFilterDefaultsStore, RecordSource, RelationalSettings, RelationalSource,
    ScrapeWebhook, SupabaseSettings, TabularSettings, TabularSource, TransportError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::SortArg;

pub const ENV_TABULAR_TOKEN: &str = "JOBBOARD_TABULAR_TOKEN";
pub const ENV_SUPABASE_KEY: &str = "JOBBOARD_SUPABASE_KEY";
pub const ENV_ACCESS_TOKEN: &str = "JOBBOARD_ACCESS_TOKEN";
pub const ENV_USER_ID: &str = "JOBBOARD_USER_ID";

const DEFAULT_PAGE_SIZE: u32 = 50;
const DEFAULT_JOBS_TABLE: &str = "jobs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} already exists; remove it first to regenerate", path.display())]
    AlreadyExists { path: PathBuf },
    #[error("could not serialize configuration: {0}")]
    Serialize(#[from] ron::Error),
    #[error("{0} is not configured")]
    Missing(&'static str),
    #[error(transparent)]
    Service(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub supabase: Option<SupabaseConfig>,
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub default_sort: Option<SortArg>,
    /// Applied to `list` on top of the words stored for the user.
    #[serde(default)]
    pub excluded_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceConfig {
    Tabular {
        endpoint: String,
        #[serde(default)]
        token: String,
        #[serde(default = "default_page_size")]
        page_size: u32,
        #[serde(default)]
        view: Option<String>,
        #[serde(default)]
        fields: Option<FieldMapping>,
    },
    /// Rows of a table in the Supabase project.
    Relational {
        #[serde(default = "default_jobs_table")]
        table: String,
        #[serde(default = "default_page_size")]
        page_size: u32,
        #[serde(default)]
        search_id: Option<String>,
        #[serde(default)]
        title_contains: Option<String>,
        #[serde(default)]
        fields: Option<FieldMapping>,
    },
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_jobs_table() -> String {
    DEFAULT_JOBS_TABLE.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub initial_wait_secs: u64,
    pub interval_secs: u64,
    pub max_polls: u32,
}

impl Default for WatchConfig {
    fn default() -> Self {
        let plan = WatchPlan::default();
        Self {
            initial_wait_secs: plan.initial_wait.as_secs(),
            interval_secs: plan.interval.as_secs(),
            max_polls: plan.max_polls,
        }
    }
}

impl WatchConfig {
    pub fn plan(&self) -> WatchPlan {
        WatchPlan {
            initial_wait: Duration::from_secs(self.initial_wait_secs),
            interval: Duration::from_secs(self.interval_secs),
            max_polls: self.max_polls,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let settings = HttpSettings::default();
        Self {
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
        }
    }
}

impl HttpConfig {
    pub fn settings(&self) -> HttpSettings {
        HttpSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..HttpSettings::default()
        }
    }

    /// How long the CLI waits for any answer before giving up on the engine.
    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs + self.request_timeout_secs)
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        board_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn template() -> Self {
        Self {
            source: SourceConfig::Tabular {
                endpoint: "https://api.airtable.com/v0/<base>/<table>".to_string(),
                token: String::new(),
                page_size: DEFAULT_PAGE_SIZE,
                view: None,
                fields: Some(FieldMapping::tabular()),
            },
            supabase: Some(SupabaseConfig {
                url: "https://<project>.supabase.co".to_string(),
                anon_key: String::new(),
                access_token: None,
            }),
            webhook: Some(WebhookConfig {
                url: "https://hook.eu1.make.com/<id>".to_string(),
            }),
            watch: WatchConfig::default(),
            http: HttpConfig::default(),
            user_id: None,
            default_sort: None,
            excluded_words: Vec::new(),
        }
    }

    /// Overlays secrets and identity from the environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let (Some(token), SourceConfig::Tabular { token: slot, .. }) =
            (lookup(ENV_TABULAR_TOKEN), &mut self.source)
        {
            board_debug!("Using tabular token from {}", ENV_TABULAR_TOKEN);
            *slot = token;
        }
        if let Some(supabase) = self.supabase.as_mut() {
            if let Some(key) = lookup(ENV_SUPABASE_KEY) {
                supabase.anon_key = key;
            }
            if let Some(token) = lookup(ENV_ACCESS_TOKEN) {
                supabase.access_token = Some(token);
            }
        }
        if let Some(user_id) = lookup(ENV_USER_ID) {
            self.user_id = Some(user_id);
        }
    }

    pub fn user(&self) -> Option<UserId> {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(UserId::new)
    }

    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let http = self.http.settings();
        let rest = match &self.supabase {
            Some(supabase) => Some(supabase.client(&http)?),
            None => None,
        };

        let source: Arc<dyn RecordSource> = match &self.source {
            SourceConfig::Tabular {
                endpoint,
                token,
                page_size,
                view,
                fields,
            } => {
                if token.trim().is_empty() {
                    return Err(ConfigError::Missing("tabular token (JOBBOARD_TABULAR_TOKEN)"));
                }
                Arc::new(TabularSource::new(
                    TabularSettings {
                        endpoint: endpoint.clone(),
                        token: token.clone(),
                        page_size: *page_size,
                        view: view.clone(),
                        fields: fields.clone().unwrap_or_else(FieldMapping::tabular),
                    },
                    &http,
                )?)
            }
            SourceConfig::Relational {
                table,
                page_size,
                search_id,
                title_contains,
                fields,
            } => {
                let rest = rest.clone().ok_or(ConfigError::Missing("supabase"))?;
                Arc::new(RelationalSource::new(
                    rest,
                    RelationalSettings {
                        table: table.clone(),
                        page_size: *page_size,
                        search_id: search_id.clone(),
                        title_contains: title_contains.clone(),
                        fields: fields.clone().unwrap_or_else(FieldMapping::relational),
                    },
                ))
            }
        };

        let mut config = EngineConfig::new(source);
        if let Some(rest) = rest {
            config.favorites = Some(Arc::new(PostgrestFavoritesStore::new(rest.clone())));
            config.filter_defaults = Some(Arc::new(PostgrestFilterDefaultsStore::new(rest)));
        }
        if let Some(webhook) = &self.webhook {
            config.webhook = Some(ScrapeWebhook::new(&webhook.url, &http)?);
        }
        Ok(config)
    }
}

impl SupabaseConfig {
    fn client(&self, http: &HttpSettings) -> Result<PostgrestClient, ConfigError> {
        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::Missing("supabase anon key (JOBBOARD_SUPABASE_KEY)"));
        }
        let settings = SupabaseSettings {
            url: self.url.clone(),
            anon_key: self.anon_key.clone(),
            access_token: self.access_token.clone(),
        };
        Ok(PostgrestClient::new(&settings, http)?)
    }
}

/// Writes [`AppConfig::template`] to `path`. Never overwrites.
pub fn write_template(path: &Path) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(&AppConfig::template(), pretty)?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::AlreadyExists => ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Write {
                path: path.to_path_buf(),
                source,
            },
        })?;
    file.write_all(content.as_bytes())
        .map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    board_info!("Wrote configuration template to {:?}", path);
    Ok(())
}
