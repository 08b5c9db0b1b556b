/// Feedback Gateway — the single point of entry for all upstream feedback
/// API calls.
///
/// ARCHITECTURAL RULE: no other module may talk to the feedback API
/// directly. All four operations (tag catalog, feedback page, tag add,
/// tag remove) MUST go through `FeedbackGateway`.
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::models::feedback::{
    AccountId, AssignmentId, ContentId, FeedbackId, FeedbackItem, FeedbackPage, Tag, TagId,
};

pub const FEEDBACK_ENDPOINT: &str = "feedback/";
pub const TAGS_ENDPOINT: &str = "tags/";
pub const TAG_LOOKUP_ENDPOINT: &str = "tag_lookup/";

/// Fixed referer marker sent on every upstream call.
const REFERER: &str = "edit.feedback-loop";
/// One bounded attempt per call; a failed round trip surfaces immediately.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The only error kind that crosses the gateway boundary. Transport detail
/// is logged at the boundary and never propagated further.
#[derive(Debug, Error)]
#[error("upstream feedback API unavailable")]
pub struct UpstreamUnavailable;

/// Request descriptor produced by the query builder: everything the gateway
/// needs to execute one feedback fetch, with no I/O attached.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub path: &'static str,
    pub body: FeedbackRequestBody,
}

/// Wire body for the `feedback/` endpoint. Optional filters are omitted
/// entirely rather than sent as sentinels.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequestBody {
    pub node_id: Vec<ContentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<TagId>,
    pub order_by: &'static str,
    pub desc: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_found: Option<bool>,
    pub author_id: AccountId,
    pub per_page: u32,
    pub page: u32,
}

#[derive(Debug, Serialize)]
struct TagLookupBody {
    author_id: AccountId,
}

#[derive(Debug, Serialize)]
struct AddTagBody {
    comment_id: FeedbackId,
    tag_id: TagId,
    author_id: AccountId,
}

/// `id` is the per-feedback assignment handle, distinct from `tag_id`.
#[derive(Debug, Serialize)]
struct RemoveTagBody {
    comment_id: FeedbackId,
    tag_id: TagId,
    id: AssignmentId,
    author_id: AccountId,
}

/// Response envelope for `feedback/`. Unknown fields are ignored; missing
/// fields decode to an empty page.
#[derive(Debug, Deserialize)]
struct FeedbackEnvelope {
    #[serde(default)]
    results: Vec<FeedbackItem>,
    #[serde(default)]
    total: i64,
}

/// Raw `tag_lookup/` record; either field may be missing or empty upstream.
#[derive(Debug, Deserialize)]
struct TagRecord {
    #[serde(default)]
    tag_id: Option<TagId>,
    #[serde(default)]
    tag_name: Option<String>,
}

/// Drops tag records missing an id or a name and sorts the rest by display
/// name ascending. This order is what the tag selector shows.
fn normalize_tags(records: Vec<TagRecord>) -> Vec<Tag> {
    let mut tags: Vec<Tag> = records
        .into_iter()
        .filter_map(|r| match (r.tag_id, r.tag_name) {
            (Some(tag_id), Some(tag_name)) if tag_id != 0 && !tag_name.is_empty() => {
                Some(Tag { tag_id, tag_name })
            }
            _ => None,
        })
        .collect();
    tags.sort_by(|a, b| a.tag_name.cmp(&b.tag_name));
    tags
}

/// The gateway trait. `AppState` holds an `Arc<dyn FeedbackGateway>` so the
/// HTTP surface, the workflow, and the tests never depend on the concrete
/// transport.
///
/// Failure policy: read operations degrade to an empty result (the failure
/// is logged); write operations return `UpstreamUnavailable` so callers
/// cannot claim success.
#[async_trait]
pub trait FeedbackGateway: Send + Sync {
    /// Tag catalog for the acting author, sorted by display name.
    async fn fetch_tags(&self, author_id: AccountId) -> Vec<Tag>;

    /// One page of feedback for a non-empty scope. Callers must short-circuit
    /// an empty scope before reaching this.
    async fn fetch_feedback(&self, request: UpstreamRequest) -> FeedbackPage;

    async fn add_tag(
        &self,
        feedback_id: FeedbackId,
        tag_id: TagId,
        author_id: AccountId,
    ) -> Result<(), UpstreamUnavailable>;

    async fn remove_tag(
        &self,
        feedback_id: FeedbackId,
        tag_id: TagId,
        assignment_id: AssignmentId,
        author_id: AccountId,
    ) -> Result<(), UpstreamUnavailable>;
}

/// Production gateway backed by reqwest. Carries the fixed transport
/// metadata (JSON content type, referer marker, `Authenticate` secret) on
/// every call. The secret is never logged.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    auth_token: String,
}

impl UpstreamClient {
    pub fn new(base_url: String, auth_token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            auth_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Executes one upstream call. Any transport failure or non-2xx status
    /// is logged here with method, URI and response body, then collapsed
    /// into `UpstreamUnavailable`.
    async fn execute<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &'static str,
        body: &B,
    ) -> Result<reqwest::Response, UpstreamUnavailable> {
        let url = self.url(path);
        let response = self
            .client
            .request(method.clone(), &url)
            .header("Content-Type", "application/json")
            .header("Referer", REFERER)
            .header("Authenticate", &self.auth_token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("{} {}: {}", method, url, e);
                UpstreamUnavailable
            })?;

        let status = response.status();
        if !status.is_success() {
            let response_body = response.text().await.unwrap_or_default();
            error!("{} {} returned {}: {}", method, url, status, response_body);
            return Err(UpstreamUnavailable);
        }
        Ok(response)
    }
}

#[async_trait]
impl FeedbackGateway for UpstreamClient {
    async fn fetch_tags(&self, author_id: AccountId) -> Vec<Tag> {
        let body = TagLookupBody { author_id };
        let response = match self.execute(Method::GET, TAG_LOOKUP_ENDPOINT, &body).await {
            Ok(r) => r,
            Err(UpstreamUnavailable) => return Vec::new(),
        };
        match response.json::<Vec<TagRecord>>().await {
            Ok(records) => normalize_tags(records),
            Err(e) => {
                error!("GET {}: undecodable tag catalog: {}", TAG_LOOKUP_ENDPOINT, e);
                Vec::new()
            }
        }
    }

    async fn fetch_feedback(&self, request: UpstreamRequest) -> FeedbackPage {
        let per_page = request.body.per_page;
        let response = match self
            .execute(request.method.clone(), request.path, &request.body)
            .await
        {
            Ok(r) => r,
            Err(UpstreamUnavailable) => return FeedbackPage::degraded(per_page),
        };
        match response.json::<FeedbackEnvelope>().await {
            Ok(envelope) => FeedbackPage {
                results: envelope.results,
                total: envelope.total,
                per_page,
                is_scope_non_empty: true,
            },
            Err(e) => {
                error!("{} {}: undecodable feedback response: {}", request.method, request.path, e);
                FeedbackPage::degraded(per_page)
            }
        }
    }

    async fn add_tag(
        &self,
        feedback_id: FeedbackId,
        tag_id: TagId,
        author_id: AccountId,
    ) -> Result<(), UpstreamUnavailable> {
        let body = AddTagBody {
            comment_id: feedback_id,
            tag_id,
            author_id,
        };
        self.execute(Method::POST, TAGS_ENDPOINT, &body).await?;
        Ok(())
    }

    async fn remove_tag(
        &self,
        feedback_id: FeedbackId,
        tag_id: TagId,
        assignment_id: AssignmentId,
        author_id: AccountId,
    ) -> Result<(), UpstreamUnavailable> {
        let body = RemoveTagBody {
            comment_id: feedback_id,
            tag_id,
            id: assignment_id,
            author_id,
        };
        self.execute(Method::DELETE, TAGS_ENDPOINT, &body).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted gateway used by the service and workflow tests.

    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum GatewayCall {
        FetchTags {
            author_id: AccountId,
        },
        FetchFeedback {
            body: serde_json::Value,
        },
        AddTag {
            feedback_id: FeedbackId,
            tag_id: TagId,
            author_id: AccountId,
        },
        RemoveTag {
            feedback_id: FeedbackId,
            tag_id: TagId,
            assignment_id: AssignmentId,
            author_id: AccountId,
        },
    }

    #[derive(Default)]
    pub struct ScriptedGateway {
        pub calls: Mutex<Vec<GatewayCall>>,
        pub tags: Vec<Tag>,
        pub page: Option<FeedbackPage>,
        pub fail_writes: bool,
    }

    impl ScriptedGateway {
        pub fn calls(&self) -> Vec<GatewayCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FeedbackGateway for ScriptedGateway {
        async fn fetch_tags(&self, author_id: AccountId) -> Vec<Tag> {
            self.calls
                .lock()
                .unwrap()
                .push(GatewayCall::FetchTags { author_id });
            self.tags.clone()
        }

        async fn fetch_feedback(&self, request: UpstreamRequest) -> FeedbackPage {
            let per_page = request.body.per_page;
            self.calls.lock().unwrap().push(GatewayCall::FetchFeedback {
                body: serde_json::to_value(&request.body).unwrap(),
            });
            self.page
                .clone()
                .unwrap_or_else(|| FeedbackPage::degraded(per_page))
        }

        async fn add_tag(
            &self,
            feedback_id: FeedbackId,
            tag_id: TagId,
            author_id: AccountId,
        ) -> Result<(), UpstreamUnavailable> {
            self.calls.lock().unwrap().push(GatewayCall::AddTag {
                feedback_id,
                tag_id,
                author_id,
            });
            if self.fail_writes {
                Err(UpstreamUnavailable)
            } else {
                Ok(())
            }
        }

        async fn remove_tag(
            &self,
            feedback_id: FeedbackId,
            tag_id: TagId,
            assignment_id: AssignmentId,
            author_id: AccountId,
        ) -> Result<(), UpstreamUnavailable> {
            self.calls.lock().unwrap().push(GatewayCall::RemoveTag {
                feedback_id,
                tag_id,
                assignment_id,
                author_id,
            });
            if self.fail_writes {
                Err(UpstreamUnavailable)
            } else {
                Ok(())
            }
        }
    }
}
