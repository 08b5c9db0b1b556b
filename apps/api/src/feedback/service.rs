//! Orchestration between the watch-list, the query builder and the gateway.

use crate::feedback::query::{FeedbackQueryOptions, QueryBuilder, ScopedQuery};
use crate::models::feedback::{AccountId, ContentId, FeedbackPage, Tag};
use crate::upstream::FeedbackGateway;

/// Fetches one page of feedback for the resolved scope. An empty scope
/// never reaches the network and comes back flagged so the UI can tell the
/// author to watch content first.
pub async fn fetch_feedback_page(
    gateway: &dyn FeedbackGateway,
    builder: &QueryBuilder,
    author_id: AccountId,
    options: &FeedbackQueryOptions,
    watched: &[ContentId],
) -> FeedbackPage {
    match builder.build(options, watched, author_id) {
        ScopedQuery::EmptyScope => FeedbackPage::empty_scope(builder.per_page()),
        ScopedQuery::Request(request) => gateway.fetch_feedback(request).await,
    }
}

/// Fetches the tag catalog and the feedback page together. Used for the
/// initial table load and for the refresh after a tag mutation: both always
/// re-fetch, never patch locally, so chip labels and the tag selector share
/// one catalog and concurrent edits are picked up.
pub async fn load_catalog_and_page(
    gateway: &dyn FeedbackGateway,
    builder: &QueryBuilder,
    author_id: AccountId,
    options: &FeedbackQueryOptions,
    watched: &[ContentId],
) -> (Vec<Tag>, FeedbackPage) {
    let tags = gateway.fetch_tags(author_id).await;
    let page = fetch_feedback_page(gateway, builder, author_id, options, watched).await;
    (tags, page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::testing::{GatewayCall, ScriptedGateway};
    use serde_json::json;

    fn builder() -> QueryBuilder {
        QueryBuilder::new(10)
    }

    #[tokio::test]
    async fn test_empty_watchlist_short_circuits_without_gateway_call() {
        let gateway = ScriptedGateway::default();
        let page = fetch_feedback_page(
            &gateway,
            &builder(),
            5,
            &FeedbackQueryOptions::default(),
            &[],
        )
        .await;

        assert!(!page.is_scope_non_empty);
        assert_eq!(page.total, 0);
        assert!(page.results.is_empty());
        assert_eq!(page.per_page, 10);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_watched_scope_reaches_gateway() {
        let gateway = ScriptedGateway {
            page: Some(FeedbackPage {
                results: Vec::new(),
                total: 3,
                per_page: 10,
                is_scope_non_empty: true,
            }),
            ..Default::default()
        };
        let page = fetch_feedback_page(
            &gateway,
            &builder(),
            5,
            &FeedbackQueryOptions::default(),
            &[101, 202],
        )
        .await;

        assert!(page.is_scope_non_empty);
        assert_eq!(page.total, 3);
        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            GatewayCall::FetchFeedback { body } => {
                assert_eq!(body["node_id"], json!([101, 202]));
            }
            other => panic!("unexpected gateway call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_explicit_filter_skips_watchlist_scope() {
        let gateway = ScriptedGateway::default();
        let options = FeedbackQueryOptions {
            content_filter: Some(101),
            ..Default::default()
        };
        fetch_feedback_page(&gateway, &builder(), 5, &options, &[]).await;

        let calls = gateway.calls();
        match &calls[0] {
            GatewayCall::FetchFeedback { body } => {
                assert_eq!(body["node_id"], json!([101]));
            }
            other => panic!("unexpected gateway call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_catalog_and_page_fetches_both() {
        let gateway = ScriptedGateway {
            tags: vec![Tag {
                tag_id: 7,
                tag_name: "Broken link".to_string(),
            }],
            ..Default::default()
        };
        let (tags, _page) = load_catalog_and_page(
            &gateway,
            &builder(),
            5,
            &FeedbackQueryOptions::default(),
            &[101],
        )
        .await;

        assert_eq!(tags.len(), 1);
        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], GatewayCall::FetchTags { author_id: 5 });
        assert!(matches!(calls[1], GatewayCall::FetchFeedback { .. }));
    }

    #[tokio::test]
    async fn test_empty_scope_skips_feedback_but_still_loads_catalog() {
        let gateway = ScriptedGateway::default();
        let (_tags, page) = load_catalog_and_page(
            &gateway,
            &builder(),
            5,
            &FeedbackQueryOptions::default(),
            &[],
        )
        .await;

        assert!(!page.is_scope_non_empty);
        let calls = gateway.calls();
        assert_eq!(calls, vec![GatewayCall::FetchTags { author_id: 5 }]);
    }
}
