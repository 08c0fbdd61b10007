//! Test API doubles — mock `MarketplaceApi` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use wayfare_core::client::MarketplaceApi;
use wayfare_core::error::ApiError;
use wayfare_core::experience::{Category, City, Experience, ExperienceType, FieldsPatch};
use wayfare_core::media::{MediaDiff, PendingMedia};
use wayfare_core::status::Status;

/// A marketplace API that records every write call and returns the
/// configured results. Reads return the configured fixtures (empty lists
/// and `NotFound` by default).
#[derive(Debug, Default)]
pub struct RecordingApi {
    fetch_result: Mutex<Option<Experience>>,
    update_error: Mutex<Option<ApiError>>,
    transition_error: Mutex<Option<ApiError>>,
    create_error: Mutex<Option<ApiError>>,
    updates: Mutex<Vec<(Uuid, FieldsPatch, MediaDiff)>>,
    transitions: Mutex<Vec<(Uuid, Status)>>,
    creates: Mutex<Vec<(FieldsPatch, Vec<PendingMedia>, Status)>>,
}

impl RecordingApi {
    /// Creates a double where every write succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures `fetch_experience` to return the given experience.
    #[must_use]
    pub fn with_experience(self, experience: Experience) -> Self {
        *self.fetch_result.lock().unwrap() = Some(experience);
        self
    }

    /// Configures `update_experience` to fail.
    #[must_use]
    pub fn with_update_error(self, error: ApiError) -> Self {
        *self.update_error.lock().unwrap() = Some(error);
        self
    }

    /// Configures `transition_status` to fail.
    #[must_use]
    pub fn with_transition_error(self, error: ApiError) -> Self {
        *self.transition_error.lock().unwrap() = Some(error);
        self
    }

    /// Configures `create_experience` to fail.
    #[must_use]
    pub fn with_create_error(self, error: ApiError) -> Self {
        *self.create_error.lock().unwrap() = Some(error);
        self
    }

    /// Snapshot of every recorded `update_experience` call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn updates(&self) -> Vec<(Uuid, FieldsPatch, MediaDiff)> {
        self.updates.lock().unwrap().clone()
    }

    /// Snapshot of every recorded `transition_status` call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn transitions(&self) -> Vec<(Uuid, Status)> {
        self.transitions.lock().unwrap().clone()
    }

    /// Snapshot of every recorded `create_experience` call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn creates(&self) -> Vec<(FieldsPatch, Vec<PendingMedia>, Status)> {
        self.creates.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketplaceApi for RecordingApi {
    async fn fetch_experience(&self, _id: Uuid) -> Result<Experience, ApiError> {
        self.fetch_result
            .lock()
            .unwrap()
            .clone()
            .ok_or(ApiError::NotFound)
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
        fields: &FieldsPatch,
        media: &[PendingMedia],
        initial_status: Status,
    ) -> Result<Uuid, ApiError> {
        self.creates
            .lock()
            .unwrap()
            .push((fields.clone(), media.to_vec(), initial_status));
        match self.create_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(Uuid::new_v4()),
        }
    }

    async fn update_experience(
        &self,
        id: Uuid,
        fields: &FieldsPatch,
        media: &MediaDiff,
    ) -> Result<(), ApiError> {
        self.updates
            .lock()
            .unwrap()
            .push((id, fields.clone(), media.clone()));
        match self.update_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn transition_status(&self, id: Uuid, target: Status) -> Result<(), ApiError> {
        self.transitions.lock().unwrap().push((id, target));
        match self.transition_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// A marketplace API where every call fails with a transport error.
#[derive(Debug)]
pub struct FailingApi;

#[async_trait]
impl MarketplaceApi for FailingApi {
    async fn fetch_experience(&self, _id: Uuid) -> Result<Experience, ApiError> {
        Err(ApiError::Transport("connection refused".into()))
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        Err(ApiError::Transport("connection refused".into()))
    }

    async fn fetch_types(&self) -> Result<Vec<ExperienceType>, ApiError> {
        Err(ApiError::Transport("connection refused".into()))
    }

    async fn search_cities(&self, _query: &str) -> Result<Vec<City>, ApiError> {
        Err(ApiError::Transport("connection refused".into()))
    }

    async fn create_experience(
        &self,
        _fields: &FieldsPatch,
        _media: &[PendingMedia],
        _initial_status: Status,
    ) -> Result<Uuid, ApiError> {
        Err(ApiError::Transport("connection refused".into()))
    }

    async fn update_experience(
        &self,
        _id: Uuid,
        _fields: &FieldsPatch,
        _media: &MediaDiff,
    ) -> Result<(), ApiError> {
        Err(ApiError::Transport("connection refused".into()))
    }

    async fn transition_status(&self, _id: Uuid, _target: Status) -> Result<(), ApiError> {
        Err(ApiError::Transport("connection refused".into()))
    }
}
