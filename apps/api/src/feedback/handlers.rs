use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::feedback::query::{FeedbackQueryOptions, SortVariant};
use crate::feedback::table::FeedbackRow;
use crate::feedback::watchlist::TitleOrder;
use crate::feedback::workflow::{DialogSignal, TagSubmission};
use crate::feedback::{service, table, watchlist, workflow};
use crate::models::content::WatchedContent;
use crate::models::feedback::{AccountId, AssignmentId, ContentId, FeedbackId, Tag, TagId};
use crate::state::AppState;

/// Raw feedback options as they arrive from the UI. `-1` sentinels and
/// numeric sort keys are normalized here, once, and never travel further.
#[derive(Debug, Deserialize)]
pub struct FeedbackParams {
    pub account_id: AccountId,
    pub filter_by_page: Option<ContentId>,
    pub filter_by_tag: Option<TagId>,
    pub sort_by: Option<i32>,
    pub filter_by_info_found: Option<i32>,
    pub page: Option<u32>,
}

impl FeedbackParams {
    fn into_options(self) -> FeedbackQueryOptions {
        FeedbackQueryOptions {
            content_filter: self.filter_by_page,
            tag_filter: self.filter_by_tag,
            sort: sort_from_raw(self.sort_by),
            info_found: info_found_from_raw(self.filter_by_info_found),
            page: self.page.unwrap_or(0),
        }
    }
}

fn sort_from_raw(sort_by: Option<i32>) -> SortVariant {
    match sort_by {
        Some(1) => SortVariant::OldestFirst,
        _ => SortVariant::NewestFirst,
    }
}

/// 1 = yes, 0 = no, -1 or absent = show all.
fn info_found_from_raw(value: Option<i32>) -> Option<bool> {
    match value {
        Some(1) => Some(true),
        Some(0) => Some(false),
        _ => None,
    }
}

#[derive(Serialize)]
pub struct FeedbackTableResponse {
    pub rows: Vec<FeedbackRow>,
    /// The catalog used to label the rows' chips, also populating the tag
    /// selector. One fetch serves both so ids can never mismatch.
    pub tags: Vec<Tag>,
    pub total: i64,
    pub per_page: u32,
    pub page: u32,
    pub is_scope_non_empty: bool,
    pub empty_message: Option<&'static str>,
    /// Echo of the normalized options so a client can discard responses
    /// that no longer match its latest filter state.
    pub options: FeedbackQueryOptions,
}

/// GET /api/v1/feedback
pub async fn handle_list_feedback(
    State(state): State<AppState>,
    Query(params): Query<FeedbackParams>,
) -> Result<Json<FeedbackTableResponse>, AppError> {
    let account_id = params.account_id;
    let options = params.into_options();
    let response = build_table_response(&state, account_id, &options).await?;
    Ok(Json(response))
}

async fn build_table_response(
    state: &AppState,
    account_id: AccountId,
    options: &FeedbackQueryOptions,
) -> Result<FeedbackTableResponse, AppError> {
    // The watch-list is only consulted when no explicit page filter is set.
    let watched = if options.content_filter.is_none() {
        watchlist::resolve_watched_content(&state.db, account_id, TitleOrder::Asc).await?
    } else {
        Vec::new()
    };

    let (tags, page) = service::load_catalog_and_page(
        state.gateway.as_ref(),
        &state.query_builder,
        account_id,
        options,
        &watched,
    )
    .await;

    let content_ids: Vec<ContentId> = page.results.iter().map(|item| item.node_id).collect();
    let titles = watchlist::content_titles(&state.db, &content_ids).await?;
    let rows = table::build_rows(&page, &tags, &titles);
    let empty_message = if rows.is_empty() {
        Some(table::empty_message(page.is_scope_non_empty))
    } else {
        None
    };

    Ok(FeedbackTableResponse {
        rows,
        tags,
        total: page.total,
        per_page: page.per_page,
        page: options.page,
        is_scope_non_empty: page.is_scope_non_empty,
        empty_message,
        options: options.clone(),
    })
}

#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub account_id: AccountId,
}

/// GET /api/v1/tags
pub async fn handle_list_tags(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> Json<Vec<Tag>> {
    Json(state.gateway.fetch_tags(query.account_id).await)
}

/// GET /api/v1/watchlist
pub async fn handle_list_watchlist(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<Vec<WatchedContent>>, AppError> {
    Ok(Json(
        watchlist::list_watched_content(&state.db, query.account_id).await?,
    ))
}

/// Filter state the client sends along with a tag mutation so the refreshed
/// table preserves its current filters. The pager restarts at the first
/// page, like the original table rebuild.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshOptions {
    pub filter_by_page: Option<ContentId>,
    pub filter_by_tag: Option<TagId>,
    pub sort_by: Option<i32>,
    pub filter_by_info_found: Option<i32>,
}

impl RefreshOptions {
    fn into_options(self) -> FeedbackQueryOptions {
        FeedbackQueryOptions {
            content_filter: self.filter_by_page,
            tag_filter: self.filter_by_tag,
            sort: sort_from_raw(self.sort_by),
            info_found: info_found_from_raw(self.filter_by_info_found),
            page: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddTagRequest {
    pub account_id: AccountId,
    /// Selection from the catalog; required, enforced by the workflow.
    pub tag_id: Option<TagId>,
    #[serde(default)]
    pub options: RefreshOptions,
}

#[derive(Debug, Deserialize)]
pub struct RemoveTagRequest {
    pub account_id: AccountId,
    pub tag_id: TagId,
    pub assignment_id: AssignmentId,
    #[serde(default)]
    pub options: RefreshOptions,
}

#[derive(Serialize)]
pub struct TagMutationResponse {
    pub signal: DialogSignal,
    pub table: FeedbackTableResponse,
}

/// POST /api/v1/feedback/:feedback_id/tags
pub async fn handle_add_tag(
    State(state): State<AppState>,
    Path(feedback_id): Path<FeedbackId>,
    Json(request): Json<AddTagRequest>,
) -> Result<Json<TagMutationResponse>, AppError> {
    let signal = workflow::submit(
        state.gateway.as_ref(),
        request.account_id,
        TagSubmission::Add {
            feedback_id,
            selected_tag: request.tag_id,
        },
    )
    .await?;

    let options = request.options.into_options();
    let table = build_table_response(&state, request.account_id, &options).await?;
    Ok(Json(TagMutationResponse { signal, table }))
}

/// DELETE /api/v1/feedback/:feedback_id/tags
pub async fn handle_remove_tag(
    State(state): State<AppState>,
    Path(feedback_id): Path<FeedbackId>,
    Json(request): Json<RemoveTagRequest>,
) -> Result<Json<TagMutationResponse>, AppError> {
    let signal = workflow::submit(
        state.gateway.as_ref(),
        request.account_id,
        TagSubmission::Remove {
            feedback_id,
            tag_id: request.tag_id,
            assignment_id: request.assignment_id,
        },
    )
    .await?;

    let options = request.options.into_options();
    let table = build_table_response(&state, request.account_id, &options).await?;
    Ok(Json(TagMutationResponse { signal, table }))
}
