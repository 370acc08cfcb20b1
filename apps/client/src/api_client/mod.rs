//! JobAlign API client: the single point of entry for calls to the resume
//! parsing and job matching service.
//!
//! Controllers never talk to `reqwest` directly; they hold an
//! `Arc<dyn JobAlignApi>` so tests can swap in a recording fake.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::ClientError;
use crate::models::matches::MatchSet;
use crate::models::resume::{ExperienceLevel, ParsedResumeData};
use crate::workflow::file_acquisition::SelectedFile;

pub const UPLOAD_RESUME_PATH: &str = "/resume_parser/api/upload-resume/";
pub const MATCH_JOBS_PATH: &str = "/jobs/api/match-jobs/";

/// Body of the match request. `skills` is forwarded as the raw
/// comma-delimited text the parser produced and omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    pub experience: String,
}

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    data: ParsedResumeData,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// The two exchanges the workflow performs against the service.
#[async_trait]
pub trait JobAlignApi: Send + Sync {
    async fn upload_resume(
        &self,
        file: &SelectedFile,
        experience: ExperienceLevel,
    ) -> Result<ParsedResumeData, ClientError>;

    async fn match_jobs(&self, token: &str, request: &MatchRequest)
        -> Result<MatchSet, ClientError>;
}

#[derive(Clone)]
pub struct JobAlignClient {
    client: Client,
    base_url: String,
}

impl JobAlignClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl JobAlignApi for JobAlignClient {
    /// POST the resume as multipart (`resume` + `experience`).
    /// The content-type is checked before the body is touched so that HTML
    /// error pages and proxy text never reach the JSON decoder.
    async fn upload_resume(
        &self,
        file: &SelectedFile,
        experience: ExperienceLevel,
    ) -> Result<ParsedResumeData, ClientError> {
        let part = Part::bytes(file.content().to_vec()).file_name(file.name().to_string());
        let form = Form::new()
            .part("resume", part)
            .text("experience", experience.as_wire());

        let response = self
            .client
            .post(self.endpoint(UPLOAD_RESUME_PATH))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !is_json_content_type(content_type.as_deref()) {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                content_type = ?content_type,
                "Parse endpoint returned a non-JSON body: {body}"
            );
            return Err(ClientError::InvalidResponse { content_type });
        }

        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            return Err(ClientError::UploadRejected {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: UploadEnvelope = serde_json::from_slice(&body)?;
        debug!(
            has_email = envelope.data.email.is_some(),
            has_skills = envelope.data.skills.is_some(),
            "Resume parsed"
        );
        Ok(envelope.data)
    }

    async fn match_jobs(
        &self,
        token: &str,
        request: &MatchRequest,
    ) -> Result<MatchSet, ClientError> {
        let response = self
            .client
            .post(self.endpoint(MATCH_JOBS_PATH))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Match endpoint returned {}: {}", status, body);
            return Err(ClientError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let set: MatchSet = serde_json::from_slice(&body)?;
        debug!(
            matches = set.matches.len(),
            max_matches = ?set.max_matches,
            "Job matches received"
        );
        Ok(set)
    }
}

fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}
