//! Feedback Query Builder — turns UI filter/sort/page options into the
//! upstream request descriptor. Pure; performs no I/O.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::feedback::{AccountId, ContentId, TagId};
use crate::upstream::{FeedbackRequestBody, UpstreamRequest, FEEDBACK_ENDPOINT};

/// "Sort by" behavior offered in the feedback table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortVariant {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Normalized feedback options, built exactly once at the HTTP boundary.
/// `page` is 0-based on the UI side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackQueryOptions {
    pub content_filter: Option<ContentId>,
    pub tag_filter: Option<TagId>,
    pub sort: SortVariant,
    pub info_found: Option<bool>,
    pub page: u32,
}

/// (order_by, desc) pair for one sort variant.
#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    pub order_by: &'static str,
    pub desc: bool,
}

/// Outcome of scope resolution: either a request ready for the gateway or
/// the signal that there is nothing to query.
#[derive(Debug)]
pub enum ScopedQuery {
    EmptyScope,
    Request(UpstreamRequest),
}

/// Builds upstream feedback requests. The sorting-variant table and the
/// per-page size are immutable configuration fixed at construction.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    sort_table: [(SortVariant, SortSpec); 2],
    per_page: u32,
}

impl QueryBuilder {
    pub fn new(per_page: u32) -> Self {
        Self {
            sort_table: [
                (
                    SortVariant::NewestFirst,
                    SortSpec {
                        order_by: "submit_date",
                        desc: true,
                    },
                ),
                (
                    SortVariant::OldestFirst,
                    SortSpec {
                        order_by: "submit_date",
                        desc: false,
                    },
                ),
            ],
            per_page,
        }
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    fn sort_spec(&self, variant: SortVariant) -> SortSpec {
        self.sort_table
            .iter()
            .find(|(v, _)| *v == variant)
            .map(|(_, spec)| *spec)
            .unwrap_or(SortSpec {
                order_by: "submit_date",
                desc: true,
            })
    }

    /// Resolves the query scope and assembles the request descriptor. An
    /// explicit page filter overrides the watch-list entirely; an empty
    /// resolved scope means the caller must not hit the network at all.
    pub fn build(
        &self,
        options: &FeedbackQueryOptions,
        watched: &[ContentId],
        author_id: AccountId,
    ) -> ScopedQuery {
        let scope: Vec<ContentId> = match options.content_filter {
            Some(content_id) => vec![content_id],
            None => watched.to_vec(),
        };
        if scope.is_empty() {
            return ScopedQuery::EmptyScope;
        }

        let sort = self.sort_spec(options.sort);
        ScopedQuery::Request(UpstreamRequest {
            method: Method::GET,
            path: FEEDBACK_ENDPOINT,
            body: FeedbackRequestBody {
                node_id: scope,
                tag_id: options.tag_filter,
                order_by: sort.order_by,
                desc: sort.desc,
                info_found: options.info_found,
                author_id,
                per_page: self.per_page,
                // The UI pages from 0, the upstream API from 1.
                page: options.page + 1,
            },
        })
    }
}
