use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

use crate::api::ApiClient;
use crate::model::{Event, PublishedItem, RawEvent};

/// Everything the per-knowby event endpoints yielded for one run.
pub struct EventHarvest {
    pub views: Vec<Event>,
    pub completions: Vec<Event>,
    /// Per-knowby fetches that failed and contributed no rows.
    pub skipped_fetches: usize,
}

/// Fetch the latest view and completion events for every published knowby.
///
/// The two calls per knowby are independent: a failed views fetch does not
/// block that knowby's completions, nor any other knowby. Failed fetches
/// are counted and logged, and that knowby simply contributes no rows to
/// the affected table.
pub fn fetch_events(client: &ApiClient, items: &[PublishedItem]) -> Result<EventHarvest> {
    let mut views = Vec::new();
    let mut completions = Vec::new();
    let mut skipped_fetches = 0usize;

    for item in items {
        match client.latest_views(&item.id) {
            Ok(records) => collect_events(records, item, &mut views)?,
            Err(e) => {
                skipped_fetches += 1;
                warn!("views fetch failed for knowby {}: {}", item.id, e);
            }
        }

        match client.latest_completions(&item.id) {
            Ok(records) => collect_events(records, item, &mut completions)?,
            Err(e) => {
                skipped_fetches += 1;
                warn!("completions fetch failed for knowby {}: {}", item.id, e);
            }
        }
    }

    Ok(EventHarvest {
        views,
        completions,
        skipped_fetches,
    })
}

fn collect_events(records: Vec<Value>, item: &PublishedItem, out: &mut Vec<Event>) -> Result<()> {
    for record in records {
        let raw: RawEvent = serde_json::from_value(record)
            .with_context(|| format!("Malformed event record for knowby {}", item.id))?;
        out.push(raw.tagged(&item.title));
    }
    Ok(())
}
