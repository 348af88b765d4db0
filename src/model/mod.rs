use serde::Deserialize;

/// A published knowby, projected down from the listing endpoint's record.
/// Extra API fields are dropped; a missing field here fails deserialization
/// and aborts the run.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishedItem {
    pub id: String,
    pub title: String,
    pub created_by_member_name: String,
    pub visibility: String,
    pub estimated_time_in_seconds: i64,
    pub last_updated_at_utc: i64,
}

/// A view or completion event as the per-knowby endpoints return it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub knowby_id: String,
    pub member_id: String,
    pub member_name: String,
    pub timestamp_utc: i64,
}

impl RawEvent {
    /// Attach the owning knowby's title, which the event payload does not carry.
    pub fn tagged(self, title: &str) -> Event {
        Event {
            knowby_id: self.knowby_id,
            knowby_name: title.to_string(),
            member_id: self.member_id,
            member_name: self.member_name,
            timestamp_utc: self.timestamp_utc,
        }
    }
}

/// An event tagged with its knowby title.
#[derive(Debug, Clone)]
pub struct Event {
    pub knowby_id: String,
    pub knowby_name: String,
    pub member_id: String,
    pub member_name: String,
    pub timestamp_utc: i64,
}

/// Per-knowby view aggregate: how many views, and when the latest one was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSummary {
    pub total_views: u64,
    pub last_viewed_timestamp: i64,
}

pub const EVENT_HEADER: [&str; 5] = ["knowby_id", "knowby_name", "member_id", "member_name", "date"];

/// One output row of the views or completions table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub knowby_id: String,
    pub knowby_name: String,
    pub member_id: String,
    pub member_name: String,
    pub date: String,
}

impl EventRow {
    pub fn into_record(self) -> Vec<String> {
        vec![
            self.knowby_id,
            self.knowby_name,
            self.member_id,
            self.member_name,
            self.date,
        ]
    }
}

pub const PUBLISHED_HEADER: [&str; 10] = [
    "knowby_id",
    "title",
    "description",
    "created_at",
    "created_by_member_id",
    "member_name",
    "status",
    "visibility",
    "views",
    "last_viewed",
];

/// One output row of the enhanced published table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRow {
    pub knowby_id: String,
    pub title: String,
    pub description: String,
    pub created_at: String,
    pub created_by_member_id: String,
    pub member_name: String,
    pub status: String,
    pub visibility: String,
    pub views: u64,
    pub last_viewed: String,
}

impl PublishedRow {
    pub fn into_record(self) -> Vec<String> {
        vec![
            self.knowby_id,
            self.title,
            self.description,
            self.created_at,
            self.created_by_member_id,
            self.member_name,
            self.status,
            self.visibility,
            self.views.to_string(),
            self.last_viewed,
        ]
    }
}
