//! The in-memory draft and its policy-gated mutation surface.

use std::collections::BTreeSet;

use uuid::Uuid;

use wayfare_core::experience::{Category, Experience, ExperienceFields, FieldsPatch};
use wayfare_core::field::FieldName;
use wayfare_core::media::{MediaRef, PendingMedia};
use wayfare_core::status::Status;
use wayfare_media::{MediaReconciler, StageReport};

use crate::category::apply_category_defaults;

/// Seeding lifecycle of a draft.
///
/// An explicit state machine instead of a "loaded once" boolean: `seed`
/// only fires in `Loading`, so a re-render or duplicate fetch response
/// cannot clobber in-progress edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedState {
    /// Edit flow created, fetch not yet started.
    Uninitialized,
    /// Fetch in flight; the first successful response seeds the draft.
    Loading,
    /// Draft holds live state; further seeds are ignored.
    Ready,
}

/// A single scalar field mutation.
///
/// Each variant carries the new value for exactly one field, so the
/// editability check and the write can never disagree about which field is
/// being touched. Category selection has its own entry point because it
/// also applies defaulting; list fields have positional operations.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPatch {
    Title(String),
    Description(String),
    ExperienceType(Uuid),
    City(Uuid),
    PricePerPackage(u64),
    MinGuests(u32),
    MaxGuests(u32),
    DurationHours(u32),
    MeetingPoint(Option<String>),
    EndingPoint(Option<String>),
    WalkingDistance(Option<f64>),
}

impl FieldPatch {
    /// The field this patch writes.
    #[must_use]
    pub fn field_name(&self) -> FieldName {
        match self {
            Self::Title(_) => FieldName::Title,
            Self::Description(_) => FieldName::Description,
            Self::ExperienceType(_) => FieldName::ExperienceType,
            Self::City(_) => FieldName::City,
            Self::PricePerPackage(_) => FieldName::PricePerPackage,
            Self::MinGuests(_) => FieldName::MinGuests,
            Self::MaxGuests(_) => FieldName::MaxGuests,
            Self::DurationHours(_) => FieldName::DurationHours,
            Self::MeetingPoint(_) => FieldName::MeetingPoint,
            Self::EndingPoint(_) => FieldName::EndingPoint,
            Self::WalkingDistance(_) => FieldName::WalkingDistance,
        }
    }
}

/// The string-list fields with positional editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Inclusions,
    Exclusions,
    Deliverables,
    Equipment,
}

impl ListField {
    /// The corresponding policy field name.
    #[must_use]
    pub fn field_name(self) -> FieldName {
        match self {
            Self::Inclusions => FieldName::Inclusions,
            Self::Exclusions => FieldName::Exclusions,
            Self::Deliverables => FieldName::Deliverables,
            Self::Equipment => FieldName::Equipment,
        }
    }
}

/// The union of everything being edited in one session.
///
/// Created empty (create flow) or seeded exactly once from a fetched
/// experience (edit flow); discarded on successful submission or
/// navigation away, never persisted locally.
#[derive(Debug)]
pub struct DraftState {
    entity_id: Option<Uuid>,
    status: Option<Status>,
    fields: ExperienceFields,
    media: MediaReconciler,
    dirty: BTreeSet<FieldName>,
    seed_state: SeedState,
}

impl DraftState {
    /// Creates an empty draft for the create flow. No entity exists yet,
    /// so every field is editable and the draft is immediately `Ready`.
    #[must_use]
    pub fn new_create() -> Self {
        Self {
            entity_id: None,
            status: None,
            fields: ExperienceFields::default(),
            media: MediaReconciler::new(),
            dirty: BTreeSet::new(),
            seed_state: SeedState::Ready,
        }
    }

    /// Creates an unseeded draft for the edit flow.
    #[must_use]
    pub fn new_edit() -> Self {
        Self {
            entity_id: None,
            status: None,
            fields: ExperienceFields::default(),
            media: MediaReconciler::new(),
            dirty: BTreeSet::new(),
            seed_state: SeedState::Uninitialized,
        }
    }

    /// Marks the fetch as started. Only meaningful in `Uninitialized`.
    pub fn begin_load(&mut self) {
        if self.seed_state == SeedState::Uninitialized {
            self.seed_state = SeedState::Loading;
        }
    }

    /// Seeds the draft from the fetched experience.
    ///
    /// Fires only in `Loading`; duplicate responses and re-renders after
    /// `Ready` are ignored so in-progress edits are never clobbered.
    /// Returns whether the seed was applied.
    pub fn seed(&mut self, experience: Experience) -> bool {
        if self.seed_state != SeedState::Loading {
            tracing::debug!(state = ?self.seed_state, "ignoring seed outside Loading");
            return false;
        }
        self.entity_id = Some(experience.id);
        self.status = Some(experience.status);
        self.fields = experience.fields;
        self.media = MediaReconciler::from_persisted(experience.media);
        self.dirty.clear();
        self.seed_state = SeedState::Ready;
        true
    }

    /// Current seeding state.
    #[must_use]
    pub fn seed_state(&self) -> SeedState {
        self.seed_state
    }

    /// The entity id, once seeded.
    #[must_use]
    pub fn entity_id(&self) -> Option<Uuid> {
        self.entity_id
    }

    /// The server-side status, once seeded. `None` in the create flow.
    #[must_use]
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Current field values.
    #[must_use]
    pub fn fields(&self) -> &ExperienceFields {
        &self.fields
    }

    /// The media reconciler, for read access and diff computation.
    #[must_use]
    pub fn media(&self) -> &MediaReconciler {
        &self.media
    }

    /// Fields the host touched since the last seed.
    #[must_use]
    pub fn dirty_fields(&self) -> &BTreeSet<FieldName> {
        &self.dirty
    }

    /// Whether `field` may currently be mutated. Re-derived from the
    /// status on every call; never cached.
    #[must_use]
    pub fn is_editable(&self, field: FieldName) -> bool {
        wayfare_policy::is_editable(self.status, field)
    }

    /// Applies a scalar field patch.
    ///
    /// A patch against a field the current status locks is silently
    /// ignored and the draft is unchanged; this mirrors "the control is
    /// rendered disabled" and protects against races between permission
    /// computation and user input. Returns whether the patch was applied.
    pub fn set_field(&mut self, patch: FieldPatch) -> bool {
        let field = patch.field_name();
        if !self.is_editable(field) {
            return false;
        }
        match patch {
            FieldPatch::Title(v) => self.fields.title = v,
            FieldPatch::Description(v) => self.fields.description = v,
            FieldPatch::ExperienceType(v) => self.fields.experience_type_id = Some(v),
            FieldPatch::City(v) => self.fields.city_id = Some(v),
            FieldPatch::PricePerPackage(v) => self.fields.price_per_package = Some(v),
            FieldPatch::MinGuests(v) => self.fields.min_guests = v,
            FieldPatch::MaxGuests(v) => self.fields.max_guests = v,
            FieldPatch::DurationHours(v) => self.fields.duration_hours = v,
            FieldPatch::MeetingPoint(v) => self.fields.meeting_point = v,
            FieldPatch::EndingPoint(v) => self.fields.ending_point = v,
            FieldPatch::WalkingDistance(v) => self.fields.walking_distance_km = v,
        }
        self.dirty.insert(field);
        true
    }

    /// Selects a category and applies its defaults in one step.
    ///
    /// The defaulting patch is computed by a pure function at the moment
    /// of selection and never re-applied on re-render. Fields changed by
    /// the defaults are marked dirty alongside the category itself.
    /// Ignored when the category field is locked.
    pub fn select_category(&mut self, category: &Category) -> bool {
        if !self.is_editable(FieldName::Category) {
            return false;
        }
        let (patched, changed) = apply_category_defaults(&self.fields, category);
        self.fields = patched;
        self.fields.category_id = Some(category.id);
        self.dirty.insert(FieldName::Category);
        self.dirty.extend(changed);
        true
    }

    /// Appends an item to a string-list field. No-op when locked.
    pub fn append_list_item(&mut self, list: ListField, item: impl Into<String>) -> bool {
        if !self.is_editable(list.field_name()) {
            return false;
        }
        self.list_mut(list).append(item.into());
        self.dirty.insert(list.field_name());
        true
    }

    /// Removes an item from a string-list field by position. No-op when
    /// locked or out of bounds.
    pub fn remove_list_item(&mut self, list: ListField, index: usize) -> bool {
        if !self.is_editable(list.field_name()) {
            return false;
        }
        if self.list_mut(list).remove(index).is_none() {
            return false;
        }
        self.dirty.insert(list.field_name());
        true
    }

    fn list_mut(&mut self, list: ListField) -> &mut wayfare_core::list::OrderedList<String> {
        match list {
            ListField::Inclusions => &mut self.fields.inclusions,
            ListField::Exclusions => &mut self.fields.exclusions,
            ListField::Deliverables => &mut self.fields.deliverables,
            ListField::Equipment => &mut self.fields.equipment,
        }
    }

    /// Appends an itinerary step. No-op when the itinerary is locked.
    pub fn append_itinerary_step(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> bool {
        if !self.is_editable(FieldName::Itinerary) {
            return false;
        }
        self.fields.itinerary.append_step(title, description);
        self.dirty.insert(FieldName::Itinerary);
        true
    }

    /// Removes an itinerary step by position; remaining steps are
    /// renumbered contiguously. No-op when locked or out of bounds.
    pub fn remove_itinerary_step(&mut self, index: usize) -> bool {
        if !self.is_editable(FieldName::Itinerary) {
            return false;
        }
        if self.fields.itinerary.remove_step(index).is_none() {
            return false;
        }
        self.dirty.insert(FieldName::Itinerary);
        true
    }

    /// Stages picked files into the media set. Returns `None` when media
    /// changes are locked for the current status.
    pub fn stage_media(&mut self, files: Vec<PendingMedia>) -> Option<StageReport> {
        if !self.is_editable(FieldName::Media) {
            return None;
        }
        Some(self.media.stage(files))
    }

    /// Removes a staged blob by position. No-op when media is locked.
    pub fn unstage_media(&mut self, index: usize) -> Option<PendingMedia> {
        if !self.is_editable(FieldName::Media) {
            return None;
        }
        self.media.unstage(index)
    }

    /// Marks a persisted image for deletion. No-op when media is locked.
    pub fn mark_media_removed(&mut self, media_ref: &MediaRef) -> bool {
        if !self.is_editable(FieldName::Media) {
            return false;
        }
        self.media.mark_removed(media_ref);
        true
    }

    /// Restores a persisted image marked for deletion. No-op when media is
    /// locked.
    pub fn unmark_media_removed(&mut self, media_ref: &MediaRef) -> bool {
        if !self.is_editable(FieldName::Media) {
            return false;
        }
        self.media.unmark_removed(media_ref);
        true
    }

    /// Builds the sparse update payload from the dirty set.
    ///
    /// Only touched fields appear, and a field can only become dirty
    /// through a permitted mutation, so the payload can never carry a
    /// changed value for a field that was locked when the status was read.
    #[must_use]
    pub fn fields_patch(&self) -> FieldsPatch {
        let mut patch = FieldsPatch::default();
        for field in &self.dirty {
            match field {
                FieldName::Title => patch.title = Some(self.fields.title.clone()),
                FieldName::Description => {
                    patch.description = Some(self.fields.description.clone());
                }
                FieldName::Category => patch.category_id = self.fields.category_id,
                FieldName::ExperienceType => {
                    patch.experience_type_id = self.fields.experience_type_id;
                }
                FieldName::City => patch.city_id = self.fields.city_id,
                FieldName::PricePerPackage => {
                    patch.price_per_package = self.fields.price_per_package;
                }
                FieldName::MinGuests => patch.min_guests = Some(self.fields.min_guests),
                FieldName::MaxGuests => patch.max_guests = Some(self.fields.max_guests),
                FieldName::DurationHours => {
                    patch.duration_hours = Some(self.fields.duration_hours);
                }
                // Dirty-and-cleared must survive as an explicit null in the
                // payload, so these wrap the stored value instead of copying
                // it.
                FieldName::MeetingPoint => {
                    patch.meeting_point = Some(self.fields.meeting_point.clone());
                }
                FieldName::EndingPoint => {
                    patch.ending_point = Some(self.fields.ending_point.clone());
                }
                FieldName::WalkingDistance => {
                    patch.walking_distance_km = Some(self.fields.walking_distance_km);
                }
                FieldName::Inclusions => {
                    patch.inclusions = Some(self.fields.inclusions.as_slice().to_vec());
                }
                FieldName::Exclusions => {
                    patch.exclusions = Some(self.fields.exclusions.as_slice().to_vec());
                }
                FieldName::Deliverables => {
                    patch.deliverables = Some(self.fields.deliverables.as_slice().to_vec());
                }
                FieldName::Equipment => {
                    patch.equipment = Some(self.fields.equipment.as_slice().to_vec());
                }
                FieldName::Itinerary => {
                    patch.itinerary = Some(self.fields.itinerary.steps().to_vec());
                }
                // Media changes travel separately as a MediaDiff.
                FieldName::Media => {}
            }
        }
        patch
    }
}
