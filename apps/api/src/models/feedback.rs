use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// All identifiers are assigned by the upstream feedback API or the
/// watch-list store; none are minted locally.
pub type AccountId = i64;
pub type ContentId = i64;
pub type FeedbackId = i64;
pub type TagId = i64;
pub type AssignmentId = i64;

/// One catalog tag, as served by the upstream `tag_lookup/` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag_id: TagId,
    pub tag_name: String,
}

/// One tag attached to one feedback item. `id` is the assignment handle
/// used for removal; the same tag can be reattached under a new `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAssignment {
    pub id: AssignmentId,
    pub tag_id: TagId,
}

/// A single piece of end-user feedback, owned entirely by the upstream API.
/// `text` is untrusted input and must be output-escaped by the presenter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: FeedbackId,
    pub node_id: ContentId,
    pub submit_date: DateTime<Utc>,
    #[serde(default)]
    pub info_found: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<TagAssignment>,
}

/// One page of upstream feedback plus the metadata the UI needs to tell
/// "nothing is being watched" apart from "queried, found nothing".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackPage {
    pub results: Vec<FeedbackItem>,
    pub total: i64,
    pub per_page: u32,
    pub is_scope_non_empty: bool,
}

impl FeedbackPage {
    /// Page returned without any upstream call: the account watches nothing
    /// and no explicit page filter was set.
    pub fn empty_scope(per_page: u32) -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            per_page,
            is_scope_non_empty: false,
        }
    }

    /// Degraded page for a failed upstream read. The scope existed, so the
    /// table renders its ordinary empty state.
    pub fn degraded(per_page: u32) -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            per_page,
            is_scope_non_empty: true,
        }
    }
}
