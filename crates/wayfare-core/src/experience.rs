//! The experience entity and its editable fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::list::OrderedList;
use crate::media::MediaRef;
use crate::status::Status;

/// One step of an experience itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryStep {
    /// 1-based position, kept contiguous by `Itinerary::remove_step`.
    pub step_number: u32,
    /// Short label shown in the step list.
    pub title: String,
    /// Longer description of what happens during the step.
    pub description: String,
}

/// Ordered itinerary with contiguous 1-based step numbering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary {
    steps: OrderedList<ItineraryStep>,
}

impl Itinerary {
    /// Creates an empty itinerary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step, assigning it the next step number.
    #[allow(clippy::cast_possible_truncation)]
    pub fn append_step(&mut self, title: impl Into<String>, description: impl Into<String>) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.append(ItineraryStep {
            step_number,
            title: title.into(),
            description: description.into(),
        });
    }

    /// Removes the step at `index` and renumbers the remainder so step
    /// numbers stay contiguous and 1-based. Returns the removed step, or
    /// `None` when the index is out of bounds.
    #[allow(clippy::cast_possible_truncation)]
    pub fn remove_step(&mut self, index: usize) -> Option<ItineraryStep> {
        let removed = self.steps.remove(index)?;
        self.steps
            .reindex(|position, step| step.step_number = position as u32 + 1);
        Some(removed)
    }

    /// Steps in order.
    #[must_use]
    pub fn steps(&self) -> &[ItineraryStep] {
        self.steps.as_slice()
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the itinerary has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl From<Vec<ItineraryStep>> for Itinerary {
    fn from(steps: Vec<ItineraryStep>) -> Self {
        Self {
            steps: steps.into(),
        }
    }
}

/// The editable field surface of an experience.
///
/// Mirrors `FieldName` one-to-one except for media, which the editor tracks
/// through its reconciler rather than a stored field value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceFields {
    pub title: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub experience_type_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    /// Price per bookable package, in minor currency units.
    pub price_per_package: Option<u64>,
    pub min_guests: u32,
    pub max_guests: u32,
    pub duration_hours: u32,
    pub meeting_point: Option<String>,
    pub ending_point: Option<String>,
    /// Approximate walking distance in kilometres.
    pub walking_distance_km: Option<f64>,
    pub inclusions: OrderedList<String>,
    pub exclusions: OrderedList<String>,
    pub deliverables: OrderedList<String>,
    pub equipment: OrderedList<String>,
    pub itinerary: Itinerary,
}

/// An experience as fetched from the platform.
#[derive(Debug, Clone, Deserialize)]
pub struct Experience {
    /// Entity identifier.
    pub id: Uuid,
    /// Server-side approval status.
    pub status: Status,
    /// Current field values.
    #[serde(flatten)]
    pub fields: ExperienceFields,
    /// Persisted media in display order; index 0 is primary.
    #[serde(default)]
    pub media: Vec<MediaRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sparse update payload: only fields the host actually changed.
///
/// The coordinator builds this from the draft's dirty set, so a field can
/// only appear here if it was editable under the status in effect when it
/// was written. Media changes travel separately as a `MediaDiff`.
///
/// The clearable logistics fields are doubly optional: the outer `None`
/// means untouched (omitted from the JSON body), while `Some(None)`
/// serializes as an explicit `null` so the server clears the stored value.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_type_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_package: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_guests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_point: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_point: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walking_distance_km: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inclusions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliverables: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<Vec<ItineraryStep>>,
}

impl FieldsPatch {
    /// True when no field changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Shape of a category as served by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Behavioural flavour driving editor defaulting.
    pub kind: CategoryKind,
}

/// Behavioural flavour of a category.
///
/// Most categories are in-person outings; a few change how the editor
/// treats physical-logistics fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Ordinary in-person experience.
    Standard,
    /// Remote, consultation-style session with no physical logistics.
    Consultation,
    /// Planning deliverable; the route fields are hidden in the UI.
    TripPlanner,
    /// Any kind this client does not model.
    #[serde(other)]
    Other,
}

/// An experience type (e.g. walking tour, workshop).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceType {
    pub id: Uuid,
    pub name: String,
}

/// A city as returned by the typeahead search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub country: String,
}
