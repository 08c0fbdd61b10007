//! Approval status of an experience.

use serde::{Deserialize, Serialize};

/// Server-side approval status of an experience.
///
/// The server owns this value; the editor only ever reads it and requests
/// transitions through the submission coordinator. `Unknown` absorbs any
/// status value this client does not model yet, so deserialization never
/// fails when the platform introduces a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Being authored; never submitted, or reverted by the host.
    Draft,
    /// Submitted and awaiting platform review.
    PendingReview,
    /// Approved and live on the marketplace.
    Published,
    /// Review failed; the host must correct and resubmit.
    Rejected,
    /// Taken down by the platform.
    Suspended,
    /// Temporarily hidden by the host.
    Paused,
    /// Any status value this client does not model.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::Published => "published",
            Self::Rejected => "rejected",
            Self::Suspended => "suspended",
            Self::Paused => "paused",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
