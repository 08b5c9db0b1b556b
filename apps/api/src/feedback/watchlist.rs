//! Watch-list Resolver — read-only queries against the local watch-list
//! store. Feedback itself never touches the database; only the set of
//! watched content and its display titles live here.

use std::collections::HashMap;

use anyhow::Result;
use sqlx::PgPool;

use crate::models::content::WatchedContent;
use crate::models::feedback::{AccountId, ContentId};

/// ORDER BY direction for content titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleOrder {
    Asc,
    Desc,
}

/// Returns every ContentId the account is watching, ordered by content
/// title with the content id as a stable tiebreak. An account watching
/// nothing gets an empty list, not an error.
pub async fn resolve_watched_content(
    pool: &PgPool,
    account_id: AccountId,
    title_order: TitleOrder,
) -> Result<Vec<ContentId>> {
    // Direction cannot be bound as a parameter; both statements are fixed.
    let query = match title_order {
        TitleOrder::Asc => {
            "SELECT w.content_id FROM watchlist w \
             LEFT JOIN content c ON w.content_id = c.id \
             WHERE w.account_id = $1 \
             ORDER BY c.title ASC, w.content_id ASC"
        }
        TitleOrder::Desc => {
            "SELECT w.content_id FROM watchlist w \
             LEFT JOIN content c ON w.content_id = c.id \
             WHERE w.account_id = $1 \
             ORDER BY c.title DESC, w.content_id ASC"
        }
    };
    Ok(sqlx::query_scalar(query)
        .bind(account_id)
        .fetch_all(pool)
        .await?)
}

/// Watched content with titles, for the filter-by-page selector.
pub async fn list_watched_content(
    pool: &PgPool,
    account_id: AccountId,
) -> Result<Vec<WatchedContent>> {
    Ok(sqlx::query_as::<_, WatchedContent>(
        "SELECT w.content_id, COALESCE(c.title, '') AS title FROM watchlist w \
         LEFT JOIN content c ON w.content_id = c.id \
         WHERE w.account_id = $1 \
         ORDER BY c.title ASC, w.content_id ASC",
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?)
}

/// Title lookup for the presenter's source-page column. Ids without a
/// matching content row are simply absent from the map.
pub async fn content_titles(
    pool: &PgPool,
    content_ids: &[ContentId],
) -> Result<HashMap<ContentId, String>> {
    if content_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(ContentId, String)> =
        sqlx::query_as("SELECT id, title FROM content WHERE id = ANY($1)")
            .bind(content_ids)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().collect())
}
