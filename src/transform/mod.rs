use chrono::{Local, TimeZone};
use std::collections::HashMap;

use crate::model::{Event, EventRow, PublishedItem, PublishedRow, ViewSummary};

/// Convert a Unix timestamp (seconds) to a DD/MM/YYYY local-calendar date.
/// Out-of-range values yield an empty string, never an error.
pub fn format_date(timestamp: i64) -> String {
    Local
        .timestamp_opt(timestamp, 0)
        .earliest()
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

/// Project events into the views/completions table shape, in input order.
pub fn event_rows(events: &[Event]) -> Vec<EventRow> {
    events
        .iter()
        .map(|e| EventRow {
            knowby_id: e.knowby_id.clone(),
            knowby_name: e.knowby_name.clone(),
            member_id: e.member_id.clone(),
            member_name: e.member_name.clone(),
            date: format_date(e.timestamp_utc),
        })
        .collect()
}

/// Group view events by knowby: total count and the latest raw timestamp.
pub fn summarize_views(events: &[Event]) -> HashMap<String, ViewSummary> {
    let mut summaries: HashMap<String, ViewSummary> = HashMap::new();
    for e in events {
        let entry = summaries.entry(e.knowby_id.clone()).or_insert(ViewSummary {
            total_views: 0,
            last_viewed_timestamp: e.timestamp_utc,
        });
        entry.total_views += 1;
        entry.last_viewed_timestamp = entry.last_viewed_timestamp.max(e.timestamp_utc);
    }
    summaries
}

/// Build the enhanced published table: one row per published knowby in
/// listing order, with view summaries merged in. Knowbys with no views get
/// zero/empty defaults rather than being dropped.
pub fn published_rows(
    items: &[PublishedItem],
    summaries: &HashMap<String, ViewSummary>,
) -> Vec<PublishedRow> {
    items
        .iter()
        .map(|item| {
            let summary = summaries.get(&item.id);
            PublishedRow {
                knowby_id: item.id.clone(),
                title: item.title.clone(),
                // The listing endpoint has no description field.
                description: String::new(),
                created_at: format_date(item.last_updated_at_utc),
                // The dashboard schema carries the creator *name* in both of
                // these columns; there is no distinct member id here.
                created_by_member_id: item.created_by_member_name.clone(),
                member_name: item.created_by_member_name.clone(),
                // Everything from this endpoint is published.
                status: "Published".to_string(),
                visibility: item.visibility.clone(),
                views: summary.map(|s| s.total_views).unwrap_or(0),
                last_viewed: summary
                    .map(|s| format_date(s.last_viewed_timestamp))
                    .unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(knowby_id: &str, member_id: &str, member_name: &str, timestamp_utc: i64) -> Event {
        Event {
            knowby_id: knowby_id.to_string(),
            knowby_name: "Demo".to_string(),
            member_id: member_id.to_string(),
            member_name: member_name.to_string(),
            timestamp_utc,
        }
    }

    fn item(id: &str, title: &str) -> PublishedItem {
        PublishedItem {
            id: id.to_string(),
            title: title.to_string(),
            created_by_member_name: "Casey".to_string(),
            visibility: "Organisation".to_string(),
            estimated_time_in_seconds: 90,
            last_updated_at_utc: 1_700_000_000,
        }
    }

    #[test]
    fn format_date_has_slashed_shape() {
        let date = format_date(1_700_000_000);
        assert_eq!(date.len(), 10);
        for (i, c) in date.chars().enumerate() {
            if i == 2 || i == 5 {
                assert_eq!(c, '/');
            } else {
                assert!(c.is_ascii_digit(), "unexpected char {c:?} in {date}");
            }
        }
    }

    #[test]
    fn format_date_epoch_is_valid() {
        assert_eq!(format_date(0).len(), 10);
    }

    #[test]
    fn format_date_out_of_range_is_empty() {
        assert_eq!(format_date(i64::MAX), "");
        assert_eq!(format_date(i64::MIN), "");
    }

    #[test]
    fn summarize_counts_and_keeps_max_timestamp() {
        let events = vec![
            event("A1", "m1", "Alice", 1_700_000_000),
            event("A1", "m2", "Bob", 1_700_086_400),
        ];
        let summaries = summarize_views(&events);
        let a1 = summaries.get("A1").unwrap();
        assert_eq!(a1.total_views, 2);
        assert_eq!(a1.last_viewed_timestamp, 1_700_086_400);
    }

    #[test]
    fn summarize_is_order_insensitive_for_max() {
        let events = vec![
            event("A1", "m2", "Bob", 1_700_086_400),
            event("A1", "m1", "Alice", 1_700_000_000),
        ];
        let summaries = summarize_views(&events);
        assert_eq!(summaries.get("A1").unwrap().last_viewed_timestamp, 1_700_086_400);
    }

    #[test]
    fn published_rows_merge_summary_into_listing_order() {
        let items = vec![item("A1", "Demo"), item("B2", "Other")];
        let events = vec![
            event("A1", "m1", "Alice", 1_700_000_000),
            event("A1", "m2", "Bob", 1_700_086_400),
        ];
        let rows = published_rows(&items, &summarize_views(&events));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].knowby_id, "A1");
        assert_eq!(rows[0].views, 2);
        assert_eq!(rows[0].last_viewed, format_date(1_700_086_400));
        assert_eq!(rows[0].status, "Published");
        assert_eq!(rows[0].description, "");
    }

    #[test]
    fn published_rows_default_to_zero_views() {
        let items = vec![item("B2", "Other")];
        let rows = published_rows(&items, &HashMap::new());
        assert_eq!(rows[0].views, 0);
        assert_eq!(rows[0].last_viewed, "");
    }

    #[test]
    fn published_rows_reuse_creator_name_for_both_columns() {
        let rows = published_rows(&[item("A1", "Demo")], &HashMap::new());
        assert_eq!(rows[0].created_by_member_id, "Casey");
        assert_eq!(rows[0].member_name, "Casey");
    }

    #[test]
    fn event_rows_preserve_order_and_format_dates() {
        let events = vec![
            event("A1", "m1", "Alice", 1_700_000_000),
            event("A1", "m2", "Bob", i64::MAX),
        ];
        let rows = event_rows(&events);
        assert_eq!(rows[0].member_name, "Alice");
        assert_eq!(rows[0].date, format_date(1_700_000_000));
        // A conversion failure still yields a row, just with an empty date.
        assert_eq!(rows[1].date, "");
    }
}
