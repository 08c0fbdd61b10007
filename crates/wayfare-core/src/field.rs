//! Field names of the editable experience surface.

use serde::{Deserialize, Serialize};

/// Closed enumeration of every field the editor can mutate.
///
/// The policy tables in `wayfare-policy` are keyed by these names, and the
/// draft's dirty-tracking records them, so the set must stay in sync with
/// `ExperienceFields`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Title,
    Description,
    Category,
    ExperienceType,
    City,
    PricePerPackage,
    MinGuests,
    MaxGuests,
    DurationHours,
    MeetingPoint,
    EndingPoint,
    WalkingDistance,
    Inclusions,
    Exclusions,
    Deliverables,
    Equipment,
    Itinerary,
    Media,
}

impl FieldName {
    /// Every field, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::Title,
        Self::Description,
        Self::Category,
        Self::ExperienceType,
        Self::City,
        Self::PricePerPackage,
        Self::MinGuests,
        Self::MaxGuests,
        Self::DurationHours,
        Self::MeetingPoint,
        Self::EndingPoint,
        Self::WalkingDistance,
        Self::Inclusions,
        Self::Exclusions,
        Self::Deliverables,
        Self::Equipment,
        Self::Itinerary,
        Self::Media,
    ];
}
