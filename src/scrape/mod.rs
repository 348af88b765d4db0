pub mod events;
pub mod published;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::api::ApiClient;
use crate::model::{EVENT_HEADER, PUBLISHED_HEADER};
use crate::output::csv;
use crate::transform;

pub const VIEWS_FILE: &str = "scraperviews.csv";
pub const COMPLETIONS_FILE: &str = "scrapercompletions.csv";
pub const PUBLISHED_FILE: &str = "scraperpublished.csv";

/// Result of a scrape run.
pub struct ScrapeReport {
    pub published: usize,
    pub view_events: usize,
    pub completion_events: usize,
    pub skipped_fetches: usize,
    pub files: Vec<PathBuf>,
    pub duration_secs: f64,
}

/// Run the whole pipeline: fetch published knowbys, harvest their events,
/// and write whichever of the three tables has data.
///
/// A failed or empty published listing is fatal; per-knowby event fetch
/// failures only cost that knowby's rows. Tables with no rows are not
/// written at all, and the enhanced published table additionally requires
/// at least one view event anywhere in the run.
pub fn run_scrape(client: &ApiClient, out_dir: &Path) -> Result<ScrapeReport> {
    let start = Instant::now();

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    eprintln!("Fetching published knowbys...");
    let items = published::fetch_published(client)?;
    eprintln!("  Found {} published knowbys", items.len());

    eprintln!("Fetching views and completions...");
    let harvest = events::fetch_events(client, &items)?;
    eprintln!(
        "  Collected {} views, {} completions ({} fetches skipped)",
        harvest.views.len(),
        harvest.completions.len(),
        harvest.skipped_fetches
    );

    let mut files = Vec::new();

    if !harvest.views.is_empty() {
        let rows: Vec<Vec<String>> = transform::event_rows(&harvest.views)
            .into_iter()
            .map(|r| r.into_record())
            .collect();
        let path = out_dir.join(VIEWS_FILE);
        csv::write_table(&path, &EVENT_HEADER, &rows)?;
        files.push(path);
    }

    if !harvest.completions.is_empty() {
        let rows: Vec<Vec<String>> = transform::event_rows(&harvest.completions)
            .into_iter()
            .map(|r| r.into_record())
            .collect();
        let path = out_dir.join(COMPLETIONS_FILE);
        csv::write_table(&path, &EVENT_HEADER, &rows)?;
        files.push(path);
    }

    // The listing endpoint carries no view counts, so the enhanced table
    // only exists when there is view data to aggregate.
    if !items.is_empty() && !harvest.views.is_empty() {
        let summaries = transform::summarize_views(&harvest.views);
        let rows: Vec<Vec<String>> = transform::published_rows(&items, &summaries)
            .into_iter()
            .map(|r| r.into_record())
            .collect();
        let path = out_dir.join(PUBLISHED_FILE);
        csv::write_table(&path, &PUBLISHED_HEADER, &rows)?;
        files.push(path);
    }

    Ok(ScrapeReport {
        published: items.len(),
        view_events: harvest.views.len(),
        completion_events: harvest.completions.len(),
        skipped_fetches: harvest.skipped_fetches,
        files,
        duration_secs: start.elapsed().as_secs_f64(),
    })
}
