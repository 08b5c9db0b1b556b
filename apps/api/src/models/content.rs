use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::feedback::ContentId;

/// A watched content item with its display title, as listed in the
/// filter-by-page selector.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WatchedContent {
    pub content_id: ContentId,
    pub title: String,
}
