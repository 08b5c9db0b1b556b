//! Tag Action Workflow — the two-step add/remove interaction behind the
//! per-row "Add tag" and per-chip "Remove tag" actions. Stateless across
//! invocations; each submission is exactly one gateway round trip.

use crate::errors::AppError;
use crate::models::feedback::{AccountId, AssignmentId, FeedbackId, TagId};
use crate::upstream::FeedbackGateway;

/// A submitted tag dialog.
#[derive(Debug, Clone, Copy)]
pub enum TagSubmission {
    /// Attach a tag. The selection comes from the catalog select list and
    /// is required; submission without one is rejected locally.
    Add {
        feedback_id: FeedbackId,
        selected_tag: Option<TagId>,
    },
    /// Detach one specific assignment. The assignment id, not the tag id,
    /// identifies what gets removed.
    Remove {
        feedback_id: FeedbackId,
        tag_id: TagId,
        assignment_id: AssignmentId,
    },
}

/// What the caller should do with the dialog after a workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogSignal {
    /// Mutation accepted upstream: re-fetch the catalog and the table, then
    /// close the dialog.
    RefreshAndClose,
    /// Nothing changed; just close.
    Close,
}

/// Submits one tag dialog. Upstream failures propagate so the caller never
/// refreshes as if the mutation succeeded.
pub async fn submit(
    gateway: &dyn FeedbackGateway,
    author_id: AccountId,
    submission: TagSubmission,
) -> Result<DialogSignal, AppError> {
    match submission {
        TagSubmission::Add {
            feedback_id,
            selected_tag,
        } => {
            let tag_id = selected_tag
                .ok_or_else(|| AppError::Validation("a tag must be selected".to_string()))?;
            gateway.add_tag(feedback_id, tag_id, author_id).await?;
        }
        TagSubmission::Remove {
            feedback_id,
            tag_id,
            assignment_id,
        } => {
            gateway
                .remove_tag(feedback_id, tag_id, assignment_id, author_id)
                .await?;
        }
    }
    Ok(DialogSignal::RefreshAndClose)
}

/// Cancel from either dialog state: close with no gateway call.
pub fn cancel() -> DialogSignal {
    DialogSignal::Close
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::testing::{GatewayCall, ScriptedGateway};

    #[tokio::test]
    async fn test_add_requires_a_selection() {
        let gateway = ScriptedGateway::default();
        let err = submit(
            &gateway,
            5,
            TagSubmission::Add {
                feedback_id: 42,
                selected_tag: None,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_calls_gateway_and_signals_refresh() {
        let gateway = ScriptedGateway::default();
        let signal = submit(
            &gateway,
            5,
            TagSubmission::Add {
                feedback_id: 42,
                selected_tag: Some(7),
            },
        )
        .await
        .unwrap();

        assert_eq!(signal, DialogSignal::RefreshAndClose);
        assert_eq!(
            gateway.calls(),
            vec![GatewayCall::AddTag {
                feedback_id: 42,
                tag_id: 7,
                author_id: 5,
            }]
        );
    }

    #[tokio::test]
    async fn test_remove_passes_the_assignment_handle() {
        let gateway = ScriptedGateway::default();
        let signal = submit(
            &gateway,
            5,
            TagSubmission::Remove {
                feedback_id: 42,
                tag_id: 7,
                assignment_id: 99,
            },
        )
        .await
        .unwrap();

        assert_eq!(signal, DialogSignal::RefreshAndClose);
        assert_eq!(
            gateway.calls(),
            vec![GatewayCall::RemoveTag {
                feedback_id: 42,
                tag_id: 7,
                assignment_id: 99,
                author_id: 5,
            }]
        );
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let gateway = ScriptedGateway {
            fail_writes: true,
            ..Default::default()
        };
        let err = submit(
            &gateway,
            5,
            TagSubmission::Add {
                feedback_id: 42,
                selected_tag: Some(7),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[test]
    fn test_cancel_closes_without_gateway_call() {
        assert_eq!(cancel(), DialogSignal::Close);
    }
}
