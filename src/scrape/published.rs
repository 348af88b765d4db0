use anyhow::{bail, Context, Result};

use crate::api::ApiClient;
use crate::model::PublishedItem;

/// Fetch the most recently updated published knowbys.
///
/// A listing failure or an empty collection is fatal, since there is
/// nothing downstream to enrich. So is a record missing one of the
/// projected fields.
pub fn fetch_published(client: &ApiClient) -> Result<Vec<PublishedItem>> {
    let records = client
        .list_published()
        .context("Published listing request failed")?;

    if records.is_empty() {
        bail!("Published listing returned no knowbys");
    }

    records
        .into_iter()
        .map(|record| {
            serde_json::from_value(record).context("Published record missing expected fields")
        })
        .collect()
}
