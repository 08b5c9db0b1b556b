//! Feedback Table Presenter — pure view transform from a FeedbackPage plus
//! the tag catalog into display rows. No I/O, no mutation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::feedback::{
    AssignmentId, ContentId, FeedbackId, FeedbackPage, Tag, TagId,
};

/// One tag attached to a row. `assignment_id` is the remove handle; the
/// label is resolved against the catalog and stays empty when the tag id is
/// no longer in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagChip {
    pub assignment_id: AssignmentId,
    pub tag_id: TagId,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourcePage {
    pub content_id: ContentId,
    pub title: String,
}

/// One display row. `feedback_id` doubles as the add-tag handle.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRow {
    pub feedback_id: FeedbackId,
    pub submit_date: String,
    pub info_found: &'static str,
    pub source_page: SourcePage,
    pub text: String,
    pub tags: Vec<TagChip>,
}

/// Builds one row per feedback item. Feedback text is untrusted and gets
/// HTML-escaped here; everything downstream may render it verbatim.
pub fn build_rows(
    page: &FeedbackPage,
    catalog: &[Tag],
    titles: &HashMap<ContentId, String>,
) -> Vec<FeedbackRow> {
    let labels: HashMap<TagId, &str> = catalog
        .iter()
        .map(|t| (t.tag_id, t.tag_name.as_str()))
        .collect();

    page.results
        .iter()
        .map(|item| FeedbackRow {
            feedback_id: item.id,
            submit_date: format_submit_date(&item.submit_date),
            info_found: if item.info_found { "Yes" } else { "No" },
            source_page: SourcePage {
                content_id: item.node_id,
                title: titles.get(&item.node_id).cloned().unwrap_or_default(),
            },
            text: htmlescape::encode_minimal(&item.text),
            tags: item
                .tags
                .iter()
                .map(|assignment| TagChip {
                    assignment_id: assignment.id,
                    tag_id: assignment.tag_id,
                    label: labels
                        .get(&assignment.tag_id)
                        .map(|name| name.to_string())
                        .unwrap_or_default(),
                })
                .collect(),
        })
        .collect()
}

/// Numeric month/day/year without zero padding, e.g. `3/7/2024`.
fn format_submit_date(date: &DateTime<Utc>) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Message shown when the table has no rows. An account watching nothing
/// gets pointed at the watch-list rather than a plain "no results".
pub fn empty_message(is_scope_non_empty: bool) -> &'static str {
    if is_scope_non_empty {
        "No feedback available."
    } else {
        "You must be watching content to view related feedback."
    }
}
