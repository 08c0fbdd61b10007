//! Wayfare Submission — the two-phase commit behind the editor's buttons.
//!
//! Phase one persists the field patch plus the media diff as a single
//! update request; phase two, conditional on the first and on the host's
//! intent, requests the transition to `pending_review`. A phase-two
//! failure is a distinct outcome ("saved, but review submission failed"),
//! never collapsed into a save failure: the fields are already persisted
//! and only the transition needs retrying.
//!
//! Failures are surfaced, never retried automatically. The draft itself is
//! untouched on failure; it is not authoritative until acknowledged, so
//! the host simply corrects and resubmits.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use uuid::Uuid;

use wayfare_core::client::{CredentialStore, MarketplaceApi};
use wayfare_core::error::ApiError;
use wayfare_core::status::Status;
use wayfare_editor::DraftState;

/// Completion intent chosen on the review step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Whether to request the `pending_review` transition after saving.
    pub advance_to_review: bool,
}

/// The user-facing actions the coordinator runs, each with its own
/// in-flight flag so the UI can disable exactly the triggering control
/// and tell the host which action is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Persist changes without touching the status.
    SaveDraft,
    /// Persist changes, then request the review transition.
    SubmitForReview,
    /// Create a new experience.
    Create,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SaveDraft => "saving the draft",
            Self::SubmitForReview => "submitting for review",
            Self::Create => "creating the experience",
        };
        f.write_str(name)
    }
}

/// Successful completion of a coordinator action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Fields and media were persisted; status unchanged.
    Saved {
        /// The persisted entity.
        entity_id: Uuid,
    },
    /// Fields and media were persisted and the review transition
    /// succeeded.
    SubmittedForReview {
        /// The persisted entity.
        entity_id: Uuid,
    },
    /// A new experience was created.
    Created {
        /// The new entity.
        entity_id: Uuid,
        /// The status it was created with.
        initial_status: Status,
    },
}

/// Failure of a coordinator action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// No bearer token is present locally; nothing was sent.
    #[error("you are signed out, please sign in and try again")]
    MissingCredentials,

    /// The same action is already running.
    #[error("{0} is already in progress")]
    AlreadyInFlight(ActionKind),

    /// The draft has no persisted entity to update.
    #[error("this draft has not been created yet")]
    MissingEntity,

    /// Neither fields nor media changed; nothing was sent.
    #[error("there are no changes to submit")]
    NothingToSubmit,

    /// Phase one failed; nothing was persisted.
    #[error("save failed: {0}")]
    SaveFailed(#[source] ApiError),

    /// Phase one succeeded but the review transition failed. The entity
    /// keeps its prior status; retry the transition alone via
    /// `retry_review_transition`.
    #[error("saved, but review submission failed: {cause}")]
    ReviewTransitionFailed {
        /// The entity whose fields were saved.
        entity_id: Uuid,
        /// Why the transition failed.
        cause: ApiError,
    },
}

#[derive(Debug, Default)]
struct InFlight {
    save_draft: bool,
    submit_review: bool,
    create: bool,
}

impl InFlight {
    fn flag_mut(&mut self, action: ActionKind) -> &mut bool {
        match action {
            ActionKind::SaveDraft => &mut self.save_draft,
            ActionKind::SubmitForReview => &mut self.submit_review,
            ActionKind::Create => &mut self.create,
        }
    }
}

/// Clears the in-flight flag when the action finishes, on every path.
struct InFlightGuard<'a> {
    flags: &'a Mutex<InFlight>,
    action: ActionKind,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        *self.flags.lock().unwrap().flag_mut(self.action) = false;
    }
}

/// Orchestrates submission against the marketplace API.
pub struct SubmissionCoordinator {
    api: Arc<dyn MarketplaceApi>,
    credentials: Arc<dyn CredentialStore>,
    in_flight: Mutex<InFlight>,
}

impl std::fmt::Debug for SubmissionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionCoordinator").finish_non_exhaustive()
    }
}

impl SubmissionCoordinator {
    /// Creates a coordinator over the given API and credential store.
    #[must_use]
    pub fn new(api: Arc<dyn MarketplaceApi>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            api,
            credentials,
            in_flight: Mutex::new(InFlight::default()),
        }
    }

    /// Whether the given action is currently running.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn in_flight(&self, action: ActionKind) -> bool {
        *self.in_flight.lock().unwrap().flag_mut(action)
    }

    fn begin(&self, action: ActionKind) -> Result<InFlightGuard<'_>, SubmissionError> {
        if self.credentials.bearer_token().is_none() {
            return Err(SubmissionError::MissingCredentials);
        }
        let mut flags = self.in_flight.lock().unwrap();
        let flag = flags.flag_mut(action);
        if *flag {
            return Err(SubmissionError::AlreadyInFlight(action));
        }
        *flag = true;
        Ok(InFlightGuard {
            flags: &self.in_flight,
            action,
        })
    }

    /// Persists the draft's changes, optionally advancing to review.
    ///
    /// Two network calls at most, never parallel, the second conditional
    /// on the first succeeding and on `options.advance_to_review`.
    ///
    /// # Errors
    ///
    /// `MissingCredentials` before any network call when no token is held;
    /// `MissingEntity` when the draft was never persisted;
    /// `NothingToSubmit` when neither fields nor media changed;
    /// `SaveFailed` when phase one fails (server validation detail
    /// preserved); `ReviewTransitionFailed` when phase one succeeded and
    /// phase two did not; `AlreadyInFlight` on duplicate invocation.
    pub async fn submit(
        &self,
        draft: &DraftState,
        options: SubmitOptions,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let action = if options.advance_to_review {
            ActionKind::SubmitForReview
        } else {
            ActionKind::SaveDraft
        };
        let _guard = self.begin(action)?;

        let entity_id = draft.entity_id().ok_or(SubmissionError::MissingEntity)?;
        let patch = draft.fields_patch();
        let diff = draft.media().diff();
        if patch.is_empty() && diff.is_empty() {
            return Err(SubmissionError::NothingToSubmit);
        }

        tracing::info!(
            %entity_id,
            advance_to_review = options.advance_to_review,
            uploads = diff.to_upload.len(),
            deletions = diff.to_delete.len(),
            "submitting experience update"
        );

        self.api
            .update_experience(entity_id, &patch, &diff)
            .await
            .map_err(SubmissionError::SaveFailed)?;

        if !options.advance_to_review {
            tracing::info!(%entity_id, "experience saved as draft");
            return Ok(SubmissionOutcome::Saved { entity_id });
        }

        match self
            .api
            .transition_status(entity_id, Status::PendingReview)
            .await
        {
            Ok(()) => {
                tracing::info!(%entity_id, "experience submitted for review");
                Ok(SubmissionOutcome::SubmittedForReview { entity_id })
            }
            Err(cause) => {
                tracing::warn!(%entity_id, %cause, "saved but review transition failed");
                Err(SubmissionError::ReviewTransitionFailed { entity_id, cause })
            }
        }
    }

    /// Creates a new experience from the draft, with `pending_review` as
    /// the initial status when the host submits directly.
    ///
    /// # Errors
    ///
    /// `MissingCredentials` before any network call when no token is held;
    /// `SaveFailed` when the create call fails; `AlreadyInFlight` on
    /// duplicate invocation.
    pub async fn create(
        &self,
        draft: &DraftState,
        options: SubmitOptions,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let _guard = self.begin(ActionKind::Create)?;

        let initial_status = if options.advance_to_review {
            Status::PendingReview
        } else {
            Status::Draft
        };
        let patch = draft.fields_patch();
        let uploads = draft.media().diff().to_upload;

        tracing::info!(
            %initial_status,
            uploads = uploads.len(),
            "creating experience"
        );

        let entity_id = self
            .api
            .create_experience(&patch, &uploads, initial_status)
            .await
            .map_err(SubmissionError::SaveFailed)?;

        tracing::info!(%entity_id, "experience created");
        Ok(SubmissionOutcome::Created {
            entity_id,
            initial_status,
        })
    }

    /// Retries only the review transition after a
    /// `ReviewTransitionFailed`, without resubmitting fields.
    ///
    /// # Errors
    ///
    /// `MissingCredentials` before any network call when no token is held;
    /// `ReviewTransitionFailed` when the transition fails again;
    /// `AlreadyInFlight` on duplicate invocation.
    pub async fn retry_review_transition(
        &self,
        entity_id: Uuid,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let _guard = self.begin(ActionKind::SubmitForReview)?;

        self.api
            .transition_status(entity_id, Status::PendingReview)
            .await
            .map_err(|cause| SubmissionError::ReviewTransitionFailed { entity_id, cause })?;

        tracing::info!(%entity_id, "experience submitted for review");
        Ok(SubmissionOutcome::SubmittedForReview { entity_id })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Notify;
    use uuid::Uuid;

    use wayfare_core::client::MarketplaceApi;
    use wayfare_core::error::{ApiError, FieldError};
    use wayfare_core::experience::{Category, City, Experience, ExperienceType, FieldsPatch};
    use wayfare_core::media::{MediaDiff, PendingMedia};
    use wayfare_core::status::Status;
    use wayfare_editor::draft::FieldPatch;
    use wayfare_editor::DraftState;
    use wayfare_test_support::{
        init_tracing, jpeg_fixture, sample_experience, FailingApi, FixedCredentials, RecordingApi,
    };

    use super::*;

    fn seeded_draft(status: Status) -> DraftState {
        let mut draft = DraftState::new_edit();
        draft.begin_load();
        assert!(draft.seed(sample_experience(status)));
        draft
    }

    fn coordinator(api: Arc<dyn MarketplaceApi>) -> SubmissionCoordinator {
        init_tracing();
        SubmissionCoordinator::new(api, Arc::new(FixedCredentials::signed_in()))
    }

    #[tokio::test]
    async fn test_save_as_draft_updates_without_touching_status() {
        // Arrange
        let api = Arc::new(RecordingApi::new());
        let coordinator = coordinator(api.clone());
        let mut draft = seeded_draft(Status::Draft);
        draft.set_field(FieldPatch::Title("Sharper title".to_owned()));

        // Act
        let outcome = coordinator
            .submit(&draft, SubmitOptions { advance_to_review: false })
            .await
            .unwrap();

        // Assert
        let entity_id = draft.entity_id().unwrap();
        assert_eq!(outcome, SubmissionOutcome::Saved { entity_id });

        let updates = api.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, entity_id);
        assert_eq!(updates[0].1.title, Some("Sharper title".to_owned()));
        assert!(api.transitions().is_empty());
    }

    #[tokio::test]
    async fn test_submit_for_review_issues_the_transition_after_the_update() {
        // Arrange
        let api = Arc::new(RecordingApi::new());
        let coordinator = coordinator(api.clone());
        let mut draft = seeded_draft(Status::Draft);
        draft.set_field(FieldPatch::Description("Fresh copy".to_owned()));
        draft.stage_media(vec![jpeg_fixture("extra.jpg")]);

        // Act
        let outcome = coordinator
            .submit(&draft, SubmitOptions { advance_to_review: true })
            .await
            .unwrap();

        // Assert
        let entity_id = draft.entity_id().unwrap();
        assert_eq!(outcome, SubmissionOutcome::SubmittedForReview { entity_id });

        let updates = api.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].2.to_upload.len(), 1);
        assert_eq!(api.transitions(), vec![(entity_id, Status::PendingReview)]);
    }

    #[tokio::test]
    async fn test_transition_failure_after_a_successful_save_is_a_distinct_outcome() {
        // Arrange
        let api = Arc::new(
            RecordingApi::new()
                .with_transition_error(ApiError::Transport("gateway timeout".into())),
        );
        let coordinator = coordinator(api.clone());
        let mut draft = seeded_draft(Status::Draft);
        draft.set_field(FieldPatch::Title("Final title".to_owned()));

        // Act
        let err = coordinator
            .submit(&draft, SubmitOptions { advance_to_review: true })
            .await
            .unwrap_err();

        // Assert
        let entity_id = draft.entity_id().unwrap();
        assert_eq!(
            err,
            SubmissionError::ReviewTransitionFailed {
                entity_id,
                cause: ApiError::Transport("gateway timeout".into()),
            }
        );
        // The save itself went through.
        assert_eq!(api.updates().len(), 1);
        assert!(err.to_string().starts_with("saved, but review submission failed"));
    }

    #[tokio::test]
    async fn test_save_failure_preserves_server_validation_detail_and_skips_the_transition() {
        // Arrange
        let field_errors = vec![FieldError {
            field: "title".to_owned(),
            message: "must not be empty".to_owned(),
        }];
        let api = Arc::new(
            RecordingApi::new().with_update_error(ApiError::Validation(field_errors.clone())),
        );
        let coordinator = coordinator(api.clone());
        let mut draft = seeded_draft(Status::Draft);
        draft.set_field(FieldPatch::Title(String::new()));

        // Act
        let err = coordinator
            .submit(&draft, SubmitOptions { advance_to_review: true })
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err, SubmissionError::SaveFailed(ApiError::Validation(field_errors)));
        assert!(api.transitions().is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_short_circuits_before_any_network_call() {
        // Arrange
        let api = Arc::new(RecordingApi::new());
        let coordinator = SubmissionCoordinator::new(
            api.clone(),
            Arc::new(FixedCredentials::signed_out()),
        );
        let draft = seeded_draft(Status::Draft);

        // Act
        let err = coordinator
            .submit(&draft, SubmitOptions { advance_to_review: true })
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err, SubmissionError::MissingCredentials);
        assert!(api.updates().is_empty());
        assert!(api.transitions().is_empty());
    }

    #[tokio::test]
    async fn test_submitting_an_uncreated_draft_is_rejected() {
        // Arrange
        let api = Arc::new(RecordingApi::new());
        let coordinator = coordinator(api.clone());
        let draft = DraftState::new_create();

        // Act
        let err = coordinator
            .submit(&draft, SubmitOptions { advance_to_review: false })
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err, SubmissionError::MissingEntity);
        assert!(api.updates().is_empty());
    }

    #[tokio::test]
    async fn test_pristine_draft_has_nothing_to_submit() {
        // Arrange
        let api = Arc::new(RecordingApi::new());
        let coordinator = coordinator(api.clone());
        let draft = seeded_draft(Status::Draft);

        // Act
        let err = coordinator
            .submit(&draft, SubmitOptions { advance_to_review: false })
            .await
            .unwrap_err();

        // Assert: rejected locally, nothing went over the wire.
        assert_eq!(err, SubmissionError::NothingToSubmit);
        assert!(api.updates().is_empty());
        assert!(api.transitions().is_empty());
    }

    #[tokio::test]
    async fn test_edit_flow_seeds_the_draft_from_the_fetched_experience() {
        // Arrange
        let experience = sample_experience(Status::PendingReview);
        let entity_id = experience.id;
        let api = Arc::new(RecordingApi::new().with_experience(experience));

        // Act
        let mut draft = DraftState::new_edit();
        draft.begin_load();
        let fetched = api.fetch_experience(entity_id).await.unwrap();
        assert!(draft.seed(fetched));

        // Assert
        assert_eq!(draft.entity_id(), Some(entity_id));
        assert_eq!(draft.status(), Some(Status::PendingReview));
        assert_eq!(draft.fields().title, "Old town food walk");
        assert_eq!(draft.media().visible_count(), 1);
    }

    #[tokio::test]
    async fn test_create_failure_surfaces_as_save_failed() {
        // Arrange
        let api = Arc::new(RecordingApi::new().with_create_error(ApiError::Forbidden));
        let coordinator = coordinator(api.clone());
        let mut draft = DraftState::new_create();
        draft.set_field(FieldPatch::Title("Hidden courtyards".to_owned()));

        // Act
        let err = coordinator
            .create(&draft, SubmitOptions { advance_to_review: false })
            .await
            .unwrap_err();

        // Assert: the attempt went out, the failure is a save failure.
        assert_eq!(err, SubmissionError::SaveFailed(ApiError::Forbidden));
        assert_eq!(api.creates().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_backend_surfaces_a_transport_failure() {
        // Arrange
        let coordinator = coordinator(Arc::new(FailingApi));
        let mut draft = seeded_draft(Status::Draft);
        draft.set_field(FieldPatch::Title("Night market tour".to_owned()));

        // Act
        let err = coordinator
            .submit(&draft, SubmitOptions { advance_to_review: true })
            .await
            .unwrap_err();

        // Assert
        assert_eq!(
            err,
            SubmissionError::SaveFailed(ApiError::Transport("connection refused".into()))
        );
    }

    #[tokio::test]
    async fn test_create_with_direct_submission_uses_pending_review_as_initial_status() {
        // Arrange
        let api = Arc::new(RecordingApi::new());
        let coordinator = coordinator(api.clone());
        let mut draft = DraftState::new_create();
        draft.set_field(FieldPatch::Title("City kayak loop".to_owned()));
        draft.stage_media(vec![jpeg_fixture("cover.jpg")]);

        // Act
        let outcome = coordinator
            .create(&draft, SubmitOptions { advance_to_review: true })
            .await
            .unwrap();

        // Assert
        let SubmissionOutcome::Created { initial_status, .. } = outcome else {
            panic!("expected Created, got {outcome:?}");
        };
        assert_eq!(initial_status, Status::PendingReview);

        let creates = api.creates();
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0].0.title, Some("City kayak loop".to_owned()));
        assert_eq!(creates[0].1.len(), 1);
        assert_eq!(creates[0].2, Status::PendingReview);
    }

    #[tokio::test]
    async fn test_retry_review_transition_resends_only_the_transition() {
        // Arrange
        let api = Arc::new(RecordingApi::new());
        let coordinator = coordinator(api.clone());
        let entity_id = Uuid::new_v4();

        // Act
        let outcome = coordinator.retry_review_transition(entity_id).await.unwrap();

        // Assert
        assert_eq!(outcome, SubmissionOutcome::SubmittedForReview { entity_id });
        assert!(api.updates().is_empty());
        assert_eq!(api.transitions(), vec![(entity_id, Status::PendingReview)]);
    }

    /// An API whose update call parks until the test releases it, so a
    /// second action can be attempted while the first is in flight.
    struct ParkedApi {
        release: Notify,
    }

    #[async_trait]
    impl MarketplaceApi for ParkedApi {
        async fn fetch_experience(&self, _id: Uuid) -> Result<Experience, ApiError> {
            Err(ApiError::NotFound)
        }

        async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
            Ok(Vec::new())
        }

        async fn fetch_types(&self) -> Result<Vec<ExperienceType>, ApiError> {
            Ok(Vec::new())
        }

        async fn search_cities(&self, _query: &str) -> Result<Vec<City>, ApiError> {
            Ok(Vec::new())
        }

        async fn create_experience(
            &self,
            _fields: &FieldsPatch,
            _media: &[PendingMedia],
            _initial_status: Status,
        ) -> Result<Uuid, ApiError> {
            Ok(Uuid::new_v4())
        }

        async fn update_experience(
            &self,
            _id: Uuid,
            _fields: &FieldsPatch,
            _media: &MediaDiff,
        ) -> Result<(), ApiError> {
            self.release.notified().await;
            Ok(())
        }

        async fn transition_status(&self, _id: Uuid, _target: Status) -> Result<(), ApiError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_duplicate_action_is_rejected_while_the_first_is_in_flight() {
        // Arrange
        let api = Arc::new(ParkedApi {
            release: Notify::new(),
        });
        let coordinator = Arc::new(SubmissionCoordinator::new(
            api.clone(),
            Arc::new(FixedCredentials::signed_in()),
        ));

        let first = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                let mut draft = seeded_draft(Status::Draft);
                draft.set_field(FieldPatch::Title("First submission".to_owned()));
                coordinator
                    .submit(&draft, SubmitOptions { advance_to_review: true })
                    .await
            })
        };
        while !coordinator.in_flight(ActionKind::SubmitForReview) {
            tokio::task::yield_now().await;
        }

        // Act: a second submit-for-review while the first is parked.
        let mut draft = seeded_draft(Status::Draft);
        draft.set_field(FieldPatch::Title("Second submission".to_owned()));
        let err = coordinator
            .submit(&draft, SubmitOptions { advance_to_review: true })
            .await
            .unwrap_err();

        // Assert: rejected, and the flags stay distinct per action.
        assert_eq!(err, SubmissionError::AlreadyInFlight(ActionKind::SubmitForReview));
        assert!(!coordinator.in_flight(ActionKind::SaveDraft));
        assert!(!coordinator.in_flight(ActionKind::Create));

        api.release.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert!(matches!(outcome, SubmissionOutcome::SubmittedForReview { .. }));
        assert!(!coordinator.in_flight(ActionKind::SubmitForReview));
    }
}
