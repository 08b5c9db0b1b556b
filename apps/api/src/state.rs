use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::feedback::query::QueryBuilder;
use crate::upstream::FeedbackGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// All external feedback API traffic goes through this gateway.
    pub gateway: Arc<dyn FeedbackGateway>,
    /// Holds the sorting-variant table and the configured page size.
    pub query_builder: QueryBuilder,
    /// Retained deployment configuration; the gateway and builder carry
    /// their own copies of what they need.
    #[allow(dead_code)]
    pub config: Config,
}
