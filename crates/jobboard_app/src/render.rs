//! Plain-text rendering of the view model.

use std::fmt::Write;

use jobboard_core::{AppViewModel, FavoriteEntry, JobRowView, Notice, NoticeLevel, ScrapePhase};

pub fn render_listing(view: &AppViewModel) -> String {
    let mut out = String::new();
    for row in &view.rows {
        let _ = writeln!(out, "{}", render_row(row));
        if let Some(logo) = &row.logo_url {
            let _ = writeln!(out, "              logo: {logo}");
        }
    }
    let _ = writeln!(out, "{}", summary_line(view));
    out
}

pub fn render_row(row: &JobRowView) -> String {
    let marker = if row.favorite { '*' } else { ' ' };
    let published = if row.published.is_empty() {
        "-"
    } else {
        row.published.as_str()
    };
    format!(
        "{marker} {published:<10}  {} | {} | {} | {}",
        row.title,
        row.location.as_deref().unwrap_or("-"),
        row.agency_domain.as_deref().unwrap_or("-"),
        row.link
    )
}

fn summary_line(view: &AppViewModel) -> String {
    let mut line = format!("{} of {} loaded listings shown", view.visible_count, view.loaded_count);
    if let Some(total) = view.total {
        let _ = write!(line, " ({total} in source)");
    }
    if view.has_more {
        line.push_str("; more available with --pages");
    }
    line
}

pub fn render_favorites(entries: &[FavoriteEntry]) -> String {
    if entries.is_empty() {
        return "No favorites yet.\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{} | {} | {}",
            entry.job_title,
            entry.job_location.as_deref().unwrap_or("-"),
            entry.job_link
        );
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    let label = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("{label}: {}", notice.text)
}

pub fn scrape_status(phase: ScrapePhase) -> &'static str {
    match phase {
        ScrapePhase::Idle => "Scrape idle",
        ScrapePhase::Triggered => "Scrape requested, waiting for the webhook",
        ScrapePhase::Waiting => "Scrape accepted, waiting for the first results",
        ScrapePhase::Polling(_) => "Checking for new listings",
        ScrapePhase::Done { found: true } => "Scrape finished with new listings",
        ScrapePhase::Done { found: false } => "Scrape finished, nothing new found",
        ScrapePhase::Failed => "Scrape failed",
    }
}
