use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use jobboard_core::SortOrder;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "./jobboard.ron";

#[derive(Parser, Debug)]
#[command(name = "jobboard", version, about = "Browse scraped staffing-agency job listings")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_CONFIG_PATH,
        help = "Path to the RON configuration file"
    )]
    pub config: PathBuf,
    #[arg(long, global = true, help = "Act as this user (overrides user_id from the config)")]
    pub user: Option<String>,
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "More log output (-vv for trace)")]
    pub verbose: u8,
    #[arg(short, long, global = true, help = "Only log errors")]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print listings after search, exclusion and sort.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long = "exclude", value_name = "WORD")]
        exclude: Vec<String>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        #[arg(long, default_value_t = 1, help = "Number of source pages to load")]
        pages: u32,
    },
    Favorites {
        #[command(subcommand)]
        command: FavoriteCommands,
    },
    /// Manage the exclusion words stored for the current user.
    Excluded {
        #[command(subcommand)]
        command: ExcludedCommands,
    },
    /// Ask the scraper for new listings and wait until they show up.
    Scrape {
        #[arg(long = "job")]
        job_name: String,
        #[arg(long)]
        postal_code: String,
        #[arg(long = "radius")]
        radius_km: u32,
        #[arg(long, default_value_t = false, help = "Return right after the trigger")]
        no_watch: bool,
    },
    /// Delete every scraped listing.
    Reset {
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum FavoriteCommands {
    List,
    Add { link: String },
    Remove { link: String },
}

#[derive(Subcommand, Debug)]
pub enum ExcludedCommands {
    Show,
    Add { word: String },
    Remove { word: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a template configuration file.
    Init,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum SortArg {
    TitleAsc,
    TitleDesc,
    AgencyAsc,
    AgencyDesc,
}

impl From<SortArg> for SortOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::TitleAsc => SortOrder::TitleAsc,
            SortArg::TitleDesc => SortOrder::TitleDesc,
            SortArg::AgencyAsc => SortOrder::AgencyAsc,
            SortArg::AgencyDesc => SortOrder::AgencyDesc,
        }
    }
}
