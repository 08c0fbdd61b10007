//! Marketplace API abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiError;
use crate::experience::{Category, City, Experience, ExperienceType, FieldsPatch};
use crate::media::{MediaDiff, PendingMedia};
use crate::status::Status;

/// The remote marketplace API this editor is a client of.
///
/// Concrete transport (REST over HTTP with bearer-token auth) lives in
/// `wayfare-client`; everything above this seam is transport-agnostic, and
/// tests substitute recording doubles.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Fetches an experience by id for the edit flow.
    async fn fetch_experience(&self, id: Uuid) -> Result<Experience, ApiError>;

    /// Fetches all selectable categories.
    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError>;

    /// Fetches all selectable experience types.
    async fn fetch_types(&self) -> Result<Vec<ExperienceType>, ApiError>;

    /// Typeahead city search; the server performs the matching.
    async fn search_cities(&self, query: &str) -> Result<Vec<City>, ApiError>;

    /// Creates a new experience and returns its id.
    async fn create_experience(
        &self,
        fields: &FieldsPatch,
        media: &[PendingMedia],
        initial_status: Status,
    ) -> Result<Uuid, ApiError>;

    /// Persists a sparse field patch plus the media change set.
    async fn update_experience(
        &self,
        id: Uuid,
        fields: &FieldsPatch,
        media: &MediaDiff,
    ) -> Result<(), ApiError>;

    /// Requests a server-side status transition.
    async fn transition_status(&self, id: Uuid, target: Status) -> Result<(), ApiError>;
}

/// Source of the locally stored bearer token.
///
/// The coordinator consults this before any network call so a signed-out
/// host gets a re-login prompt instead of a doomed request.
pub trait CredentialStore: Send + Sync {
    /// Returns the bearer token, if one is present locally.
    fn bearer_token(&self) -> Option<String>;
}
