//! Wayfare Policy — which fields may be edited under which status.
//!
//! One pure lookup table shared by the create and edit flows, so the two
//! can never drift apart. No I/O, no caching: callers re-derive the set on
//! every status read, because editability must always reflect the latest
//! status the server reported.

use std::collections::BTreeSet;

use wayfare_core::field::FieldName;
use wayfare_core::status::Status;

/// Fields that stay editable while the listing is under review.
///
/// Descriptive content, list fields, media, and the route tail may change;
/// the identity, pricing, and logistics fields that define the bookable
/// contract already being reviewed may not.
const PENDING_REVIEW_EDITABLE: &[FieldName] = &[
    FieldName::Title,
    FieldName::Description,
    FieldName::Inclusions,
    FieldName::Exclusions,
    FieldName::Deliverables,
    FieldName::Equipment,
    FieldName::Itinerary,
    FieldName::Media,
    FieldName::EndingPoint,
    FieldName::WalkingDistance,
];

/// Fields that stay editable once the listing is live.
///
/// No itinerary or route changes after publication; descriptive content,
/// list fields, and media remain open.
const PUBLISHED_EDITABLE: &[FieldName] = &[
    FieldName::Title,
    FieldName::Description,
    FieldName::Inclusions,
    FieldName::Exclusions,
    FieldName::Deliverables,
    FieldName::Equipment,
    FieldName::Media,
];

/// Returns the set of fields the host may mutate under `status`.
///
/// `None` means no entity is loaded (create flow): everything is editable.
/// `Draft` and `Rejected` open everything so the host can fully correct
/// and resubmit. `Suspended`, `Paused`, and `Unknown` fail open so hosts
/// are never locked out by an unmodeled state.
#[must_use]
pub fn editable_fields(status: Option<Status>) -> BTreeSet<FieldName> {
    let allowed: &[FieldName] = match status {
        Some(Status::PendingReview) => PENDING_REVIEW_EDITABLE,
        Some(Status::Published) => PUBLISHED_EDITABLE,
        None
        | Some(
            Status::Draft
            | Status::Rejected
            | Status::Suspended
            | Status::Paused
            | Status::Unknown,
        ) => &FieldName::ALL,
    };
    allowed.iter().copied().collect()
}

/// Convenience check for a single field.
#[must_use]
pub fn is_editable(status: Option<Status>, field: FieldName) -> bool {
    editable_fields(status).contains(&field)
}
