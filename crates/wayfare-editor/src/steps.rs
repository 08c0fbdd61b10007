//! The five-step wizard state machine.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::draft::DraftState;

/// Wizard steps in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    /// Title, description, category and type selection entry point.
    Identity,
    /// Pricing, guest counts, duration, city, meeting point.
    Logistics,
    /// Category-specific configuration.
    CategoryConfig,
    /// Itinerary steps and the media set.
    ItineraryMedia,
    /// Final review; exposes both completion actions.
    Review,
}

impl Step {
    /// Steps in wizard order.
    pub const ALL: [Self; 5] = [
        Self::Identity,
        Self::Logistics,
        Self::CategoryConfig,
        Self::ItineraryMedia,
        Self::Review,
    ];

    /// 1-based position for the step indicator.
    #[must_use]
    pub fn position(self) -> usize {
        match self {
            Self::Identity => 1,
            Self::Logistics => 2,
            Self::CategoryConfig => 3,
            Self::ItineraryMedia => 4,
            Self::Review => 5,
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::Identity => Some(Self::Logistics),
            Self::Logistics => Some(Self::CategoryConfig),
            Self::CategoryConfig => Some(Self::ItineraryMedia),
            Self::ItineraryMedia => Some(Self::Review),
            Self::Review => None,
        }
    }

    fn back(self) -> Option<Self> {
        match self {
            Self::Identity => None,
            Self::Logistics => Some(Self::Identity),
            Self::CategoryConfig => Some(Self::Logistics),
            Self::ItineraryMedia => Some(Self::CategoryConfig),
            Self::Review => Some(Self::ItineraryMedia),
        }
    }
}

/// Why the wizard refused to advance.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdvanceError {
    /// The current step's requirements are not met.
    #[error("{0}")]
    Blocked(String),

    /// Already on the review step; use the completion actions instead.
    #[error("already at the final step")]
    AtFinalStep,
}

/// Per-step "can advance" predicate over the draft.
///
/// Advancement rules vary by category, so callers may swap any step's rule
/// instead of relying on the defaults below.
pub type StepValidator = Box<dyn Fn(&DraftState) -> Result<(), String> + Send + Sync>;

fn default_validators() -> BTreeMap<Step, StepValidator> {
    let mut validators: BTreeMap<Step, StepValidator> = BTreeMap::new();

    validators.insert(
        Step::Identity,
        Box::new(|draft| {
            let fields = draft.fields();
            if fields.title.trim().is_empty() || fields.description.trim().is_empty() {
                return Err("title and description are required".to_owned());
            }
            Ok(())
        }),
    );

    validators.insert(
        Step::Logistics,
        Box::new(|draft| {
            let fields = draft.fields();
            if !fields.price_per_package.is_some_and(|p| p > 0) {
                return Err("a package price is required".to_owned());
            }
            if fields.min_guests == 0 {
                return Err("minimum guest count must be at least 1".to_owned());
            }
            if fields.max_guests < fields.min_guests {
                return Err("maximum guests cannot be below the minimum".to_owned());
            }
            if fields.duration_hours == 0 {
                return Err("a duration is required".to_owned());
            }
            if fields.city_id.is_none() {
                return Err("a city is required".to_owned());
            }
            Ok(())
        }),
    );

    validators.insert(
        Step::CategoryConfig,
        Box::new(|draft| {
            if draft.fields().category_id.is_none() {
                return Err("a category is required".to_owned());
            }
            Ok(())
        }),
    );

    validators.insert(
        Step::ItineraryMedia,
        Box::new(|draft| {
            if draft.media().visible_count() == 0 {
                return Err("at least one photo is required".to_owned());
            }
            Ok(())
        }),
    );

    validators
}

/// Drives the draft through the wizard.
///
/// `try_next` is gated by the current step's validator; `back` is
/// unconditional above the first step. The review step does not advance:
/// it exposes the two completion intents (save as draft, submit for
/// review), which the submission coordinator executes.
pub struct StepFormEngine {
    draft: DraftState,
    step: Step,
    validators: BTreeMap<Step, StepValidator>,
}

impl std::fmt::Debug for StepFormEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepFormEngine")
            .field("step", &self.step)
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

impl StepFormEngine {
    /// Creates an engine on the first step with the default per-step rules.
    #[must_use]
    pub fn new(draft: DraftState) -> Self {
        Self {
            draft,
            step: Step::Identity,
            validators: default_validators(),
        }
    }

    /// Replaces the advancement rule for one step.
    #[must_use]
    pub fn with_validator(
        mut self,
        step: Step,
        validator: impl Fn(&DraftState) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validators.insert(step, Box::new(validator));
        self
    }

    /// The current step.
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// True on the terminal review step.
    #[must_use]
    pub fn at_review(&self) -> bool {
        self.step == Step::Review
    }

    /// Read access to the draft.
    #[must_use]
    pub fn draft(&self) -> &DraftState {
        &self.draft
    }

    /// Mutable access to the draft for field edits.
    pub fn draft_mut(&mut self) -> &mut DraftState {
        &mut self.draft
    }

    /// Advances to the next step if the current step's rule allows it.
    ///
    /// # Errors
    ///
    /// Returns `AdvanceError::Blocked` with a renderable reason when the
    /// rule fails, or `AdvanceError::AtFinalStep` on the review step.
    pub fn try_next(&mut self) -> Result<Step, AdvanceError> {
        let Some(next) = self.step.next() else {
            return Err(AdvanceError::AtFinalStep);
        };
        if let Some(validator) = self.validators.get(&self.step) {
            validator(&self.draft).map_err(AdvanceError::Blocked)?;
        }
        self.step = next;
        Ok(self.step)
    }

    /// Steps back unconditionally; stays put on the first step.
    pub fn back(&mut self) -> Step {
        if let Some(previous) = self.step.back() {
            self.step = previous;
        }
        self.step
    }
}
