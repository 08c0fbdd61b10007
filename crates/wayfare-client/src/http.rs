//! The reqwest implementation of `MarketplaceApi`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use wayfare_core::client::{CredentialStore, MarketplaceApi};
use wayfare_core::error::{ApiError, FieldError};
use wayfare_core::experience::{Category, City, Experience, ExperienceType, FieldsPatch};
use wayfare_core::media::{MediaDiff, PendingMedia};
use wayfare_core::status::Status;

use crate::config::ClientConfig;

/// REST client for the marketplace API.
pub struct HttpMarketplaceApi {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for HttpMarketplaceApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMarketplaceApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct CreatedBody {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct ValidationBody {
    errors: Vec<FieldError>,
}

#[derive(Debug, serde::Serialize)]
struct TransitionBody {
    status: Status,
}

fn transport(err: &reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Whether an update must ride on a multipart request.
///
/// Only when the diff uploads blobs or requests deletions; a pure field
/// update stays a plain JSON payload.
fn wants_multipart(diff: &MediaDiff) -> bool {
    !diff.is_empty()
}

/// Maps an error response to the taxonomy, preferring the server's
/// structured validation errors over a generic message.
async fn decode_failure(response: Response) -> ApiError {
    let status = response.status();
    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
            let errors = response
                .json::<ValidationBody>()
                .await
                .map(|body| body.errors)
                .unwrap_or_default();
            ApiError::Validation(errors)
        }
        other => ApiError::Transport(format!("unexpected status {other}")),
    }
}

async fn checked(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(decode_failure(response).await)
    }
}

impl HttpMarketplaceApi {
    /// Builds the client from connection settings and a credential store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| transport(&e))?;
        Ok(Self {
            http,
            base_url: config.base_url().to_owned(),
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn token(&self) -> Result<String, ApiError> {
        self.credentials.bearer_token().ok_or(ApiError::Unauthorized)
    }

    fn media_form(fields: &FieldsPatch, diff: &MediaDiff) -> Result<Form, ApiError> {
        let payload =
            serde_json::to_string(fields).map_err(|e| ApiError::Transport(e.to_string()))?;
        let mut form = Form::new().text("payload", payload);

        if !diff.to_delete.is_empty() {
            let deletions = serde_json::to_string(&diff.to_delete)
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            form = form.text("delete_media", deletions);
        }
        for blob in &diff.to_upload {
            let part = Part::bytes(blob.bytes.clone())
                .file_name(blob.file_name.clone())
                .mime_str(&blob.content_type)
                .map_err(|e| transport(&e))?;
            form = form.part("media[]", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl MarketplaceApi for HttpMarketplaceApi {
    async fn fetch_experience(&self, id: Uuid) -> Result<Experience, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/v1/experiences/{id}")))
            .bearer_auth(self.token()?)
            .send()
            .await
            .map_err(|e| transport(&e))?;
        checked(response)
            .await?
            .json::<Experience>()
            .await
            .map_err(|e| transport(&e))
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        let response = self
            .http
            .get(self.url("/api/v1/categories"))
            .bearer_auth(self.token()?)
            .send()
            .await
            .map_err(|e| transport(&e))?;
        checked(response)
            .await?
            .json::<Vec<Category>>()
            .await
            .map_err(|e| transport(&e))
    }

    async fn fetch_types(&self) -> Result<Vec<ExperienceType>, ApiError> {
        let response = self
            .http
            .get(self.url("/api/v1/experience-types"))
            .bearer_auth(self.token()?)
            .send()
            .await
            .map_err(|e| transport(&e))?;
        checked(response)
            .await?
            .json::<Vec<ExperienceType>>()
            .await
            .map_err(|e| transport(&e))
    }

    async fn search_cities(&self, query: &str) -> Result<Vec<City>, ApiError> {
        let response = self
            .http
            .get(self.url("/api/v1/cities"))
            .query(&[("query", query)])
            .bearer_auth(self.token()?)
            .send()
            .await
            .map_err(|e| transport(&e))?;
        checked(response)
            .await?
            .json::<Vec<City>>()
            .await
            .map_err(|e| transport(&e))
    }

    async fn create_experience(
        &self,
        fields: &FieldsPatch,
        media: &[PendingMedia],
        initial_status: Status,
    ) -> Result<Uuid, ApiError> {
        let mut request = self
            .http
            .post(self.url("/api/v1/experiences"))
            .query(&[("initial_status", initial_status.to_string())])
            .bearer_auth(self.token()?);

        if media.is_empty() {
            request = request.json(fields);
        } else {
            let diff = MediaDiff {
                to_upload: media.to_vec(),
                to_delete: Vec::new(),
            };
            request = request.multipart(Self::media_form(fields, &diff)?);
        }

        let response = request.send().await.map_err(|e| transport(&e))?;
        let body = checked(response)
            .await?
            .json::<CreatedBody>()
            .await
            .map_err(|e| transport(&e))?;
        Ok(body.id)
    }

    async fn update_experience(
        &self,
        id: Uuid,
        fields: &FieldsPatch,
        media: &MediaDiff,
    ) -> Result<(), ApiError> {
        let multipart = wants_multipart(media);
        tracing::debug!(%id, multipart, "encoding experience update");

        let mut request = self
            .http
            .patch(self.url(&format!("/api/v1/experiences/{id}")))
            .bearer_auth(self.token()?);

        if multipart {
            request = request.multipart(Self::media_form(fields, media)?);
        } else {
            request = request.json(fields);
        }

        let response = request.send().await.map_err(|e| transport(&e))?;
        checked(response).await?;
        Ok(())
    }

    async fn transition_status(&self, id: Uuid, target: Status) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url(&format!("/api/v1/experiences/{id}/status")))
            .bearer_auth(self.token()?)
            .json(&TransitionBody { status: target })
            .send()
            .await
            .map_err(|e| transport(&e))?;
        checked(response).await?;
        Ok(())
    }
}
