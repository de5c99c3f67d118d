use std::path::Path;

use anyhow::{bail, Context};
use board_logging::{board_info, board_warn};
use jobboard_core::{AppState, JobRecord, Msg, NoticeLevel, ScrapePhase, UserId};

use crate::app::App;
use crate::cli::{Commands, ConfigCommands, ExcludedCommands, FavoriteCommands, SortArg};
use crate::config::{self, AppConfig};
use crate::effects::EffectRunner;
use crate::render;

/// Upper bound on pages walked when looking a listing up by link.
const MAX_LOOKUP_PAGES: u32 = 50;

pub fn run(command: Commands, config_path: &Path, user: Option<String>) -> anyhow::Result<()> {
    match command {
        Commands::Config {
            command: ConfigCommands::Init,
        } => {
            config::write_template(config_path)?;
            println!("Wrote {}", config_path.display());
            Ok(())
        }
        Commands::List {
            search,
            exclude,
            sort,
            pages,
        } => list(&load_config(config_path, user)?, search, exclude, sort, pages),
        Commands::Favorites { command } => favorites(&load_config(config_path, user)?, command),
        Commands::Excluded { command } => excluded(&load_config(config_path, user)?, command),
        Commands::Scrape {
            job_name,
            postal_code,
            radius_km,
            no_watch,
        } => scrape(
            &load_config(config_path, user)?,
            job_name,
            postal_code,
            radius_km,
            no_watch,
        ),
        Commands::Reset { yes } => {
            if !yes {
                bail!("reset deletes every scraped listing; pass --yes to confirm");
            }
            reset(&load_config(config_path, user)?)
        }
    }
}

fn load_config(path: &Path, user: Option<String>) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(path)
        .with_context(|| format!("run `jobboard config init` to create {}", path.display()))?;
    config.apply_env(|key| std::env::var(key).ok());
    if user.is_some() {
        config.user_id = user;
    }
    Ok(config)
}

fn start_app(config: &AppConfig) -> anyhow::Result<App> {
    let runner = EffectRunner::new(config.engine_config()?)
        .context("could not start the background engine")?;
    Ok(App::new(
        AppState::with_watch_plan(config.watch.plan()),
        runner,
        config.http.response_timeout(),
    ))
}

fn sign_in(app: &mut App, config: &AppConfig) -> anyhow::Result<UserId> {
    let user = config
        .user()
        .context("no user: set user_id in the config, JOBBOARD_USER_ID or --user")?;
    app.dispatch(Msg::SignedIn(user.clone()));
    app.run_until_idle()?;
    Ok(user)
}

/// Prints pending notices to stderr and fails if any of them is a problem.
fn report_notices(app: &mut App) -> anyhow::Result<()> {
    let notices = app.take_notices();
    let problems = notices
        .iter()
        .filter(|notice| notice.level != NoticeLevel::Info)
        .count();
    for notice in &notices {
        eprintln!("{}", render::render_notice(notice));
    }
    if problems > 0 {
        bail!("{problems} problem(s) reported");
    }
    Ok(())
}

fn list(
    config: &AppConfig,
    search: Option<String>,
    exclude: Vec<String>,
    sort: Option<SortArg>,
    pages: u32,
) -> anyhow::Result<()> {
    let mut app = start_app(config)?;

    // Words given here stay local; only words added after sign-in are saved.
    for word in config.excluded_words.iter().chain(&exclude) {
        app.dispatch(Msg::ExcludedWordAdded(word.clone()));
    }
    if let Some(query) = search {
        app.dispatch(Msg::SearchChanged(query));
    }
    if let Some(order) = sort.or(config.default_sort) {
        app.dispatch(Msg::SortChanged(Some(order.into())));
    }
    if let (Some(user), Some(_)) = (config.user(), &config.supabase) {
        app.dispatch(Msg::SignedIn(user));
    }

    app.dispatch(Msg::RefreshRequested);
    app.run_until_idle()?;
    for _ in 1..pages {
        if !app.state().has_more() {
            break;
        }
        app.dispatch(Msg::LoadMoreRequested);
        app.run_until_idle()?;
    }

    print!("{}", render::render_listing(&app.state().view()));
    report_notices(&mut app)
}

fn favorites(config: &AppConfig, command: FavoriteCommands) -> anyhow::Result<()> {
    let mut app = start_app(config)?;
    sign_in(&mut app, config)?;
    report_notices(&mut app)?;

    match command {
        FavoriteCommands::List => {
            let entries = app
                .state()
                .favorites()
                .list()
                .context("favorites are not available")?;
            print!("{}", render::render_favorites(entries));
            Ok(())
        }
        FavoriteCommands::Add { link } => {
            if app.state().favorites().is_favorited(&link) {
                println!("Already a favorite: {link}");
                return Ok(());
            }
            let job = find_listing(&mut app, &link)?;
            app.dispatch(Msg::FavoriteToggled(job));
            app.run_until_idle()?;
            report_notices(&mut app)?;
            println!("Added favorite: {link}");
            Ok(())
        }
        FavoriteCommands::Remove { link } => {
            let entry = app
                .state()
                .favorites()
                .list()
                .and_then(|entries| entries.iter().find(|entry| entry.job_link == link))
                .cloned();
            let Some(entry) = entry else {
                println!("Not a favorite: {link}");
                return Ok(());
            };
            app.dispatch(Msg::FavoriteToggled(JobRecord {
                id: entry.id,
                title: entry.job_title,
                location: entry.job_location,
                link: entry.job_link,
                publication_date_raw: None,
                source_offset: None,
            }));
            app.run_until_idle()?;
            report_notices(&mut app)?;
            println!("Removed favorite: {link}");
            Ok(())
        }
    }
}

/// Walks source pages until a listing with `link` shows up.
fn find_listing(app: &mut App, link: &str) -> anyhow::Result<JobRecord> {
    app.dispatch(Msg::RefreshRequested);
    app.run_until_idle()?;
    for _ in 0..MAX_LOOKUP_PAGES {
        if let Some(record) = app
            .state()
            .records()
            .iter()
            .find(|record| record.link == link)
        {
            return Ok(record.clone());
        }
        if !app.state().has_more() {
            break;
        }
        app.dispatch(Msg::LoadMoreRequested);
        app.run_until_idle()?;
    }
    report_notices(app)?;
    bail!("no listing with link {link}")
}

fn excluded(config: &AppConfig, command: ExcludedCommands) -> anyhow::Result<()> {
    let mut app = start_app(config)?;
    sign_in(&mut app, config)?;
    // Saving replaces the stored row, so never save over a list that failed to load.
    report_notices(&mut app)?;

    let changed = match &command {
        ExcludedCommands::Show => true,
        ExcludedCommands::Add { word } => {
            let before = app.state().filter().excluded_list();
            app.dispatch(Msg::ExcludedWordAdded(word.clone()));
            before != app.state().filter().excluded_list()
        }
        ExcludedCommands::Remove { word } => {
            let before = app.state().filter().excluded_list();
            app.dispatch(Msg::ExcludedWordRemoved(word.clone()));
            before != app.state().filter().excluded_list()
        }
    };
    if !changed {
        board_info!("Exclusion list unchanged by {:?}", command);
    }
    app.run_until_idle()?;
    report_notices(&mut app)?;

    let words = app.state().filter().excluded_list();
    if words.is_empty() {
        println!("No excluded words.");
    } else {
        println!("{}", words.join(", "));
    }
    Ok(())
}

fn scrape(
    config: &AppConfig,
    job_name: String,
    postal_code: String,
    radius_km: u32,
    no_watch: bool,
) -> anyhow::Result<()> {
    let mut app = start_app(config)?;

    // Baseline for spotting new listings.
    app.dispatch(Msg::RefreshRequested);
    app.run_until_idle()?;
    report_notices(&mut app)?;

    app.dispatch(Msg::ScrapeSubmitted {
        job_name,
        postal_code,
        radius_km,
    });
    let mut last_phase = app.state().scrape_phase();
    eprintln!("{}", render::scrape_status(last_phase));
    let mut print_phase = |phase: ScrapePhase| {
        if phase != last_phase {
            last_phase = phase;
            eprintln!("{}", render::scrape_status(phase));
        }
    };

    if no_watch {
        app.run_while(
            |state| state.scrape_phase() == ScrapePhase::Triggered,
            |view| print_phase(view.scrape.phase),
        )?;
        app.dispatch(Msg::ScrapeCancelled);
    } else {
        app.run_while(
            |state| state.scrape_phase().is_active(),
            |view| print_phase(view.scrape.phase),
        )?;
    }

    let view = app.state().view();
    if let Some(error) = &view.scrape.validation_error {
        board_warn!("Scrape input rejected: {}", error);
    }
    if view.scrape.phase == (ScrapePhase::Done { found: true }) {
        print!("{}", render::render_listing(&view));
    }
    report_notices(&mut app)
}

fn reset(config: &AppConfig) -> anyhow::Result<()> {
    let mut app = start_app(config)?;
    app.dispatch(Msg::ResetRequested);
    app.run_until_idle()?;
    report_notices(&mut app)?;
    println!("{}", render::render_listing(&app.state().view()).trim_end());
    Ok(())
}
