use crate::adapters::endpoint;
use crate::core::report::Reportable;
use crate::domain::model::{Credential, HttpMethod, RawResponse, RequestDescriptor};
use crate::domain::ports::ApiCall;
use crate::utils::error::{Result, RunnerError};
use crate::utils::validation::{validate_non_empty_string, validate_remote_path};
use base64::Engine;
use chrono::{DateTime, Utc};
use std::path::Path;
use url::Url;

pub const TEST_CONTENT: &[u8] = b"Test logo content";

/// Repository coordinates on the source-hosting service.
#[derive(Debug, Clone)]
pub struct Repository {
    pub base_url: Url,
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

/// Remote file name `<stem>-<unix seconds>[.<ext>]`. A new name every second,
/// so repeated uploads never overwrite each other.
pub fn timestamped_name(local: Option<&Path>, now: DateTime<Utc>) -> String {
    let (stem, ext) = match local {
        Some(path) => (
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("upload")
                .to_string(),
            path.extension().and_then(|s| s.to_str()).map(str::to_string),
        ),
        None => ("test-logo".to_string(), Some("txt".to_string())),
    };
    match ext {
        Some(ext) => format!("{}-{}.{}", stem, now.timestamp(), ext),
        None => format!("{}-{}", stem, now.timestamp()),
    }
}

/// `PUT {base}/repos/<owner>/<repo>/contents/<path>` creating or updating one file.
#[derive(Debug, Clone)]
pub struct UploadFile {
    repository: Repository,
    remote_path: String,
    content: Vec<u8>,
    message: String,
}

impl UploadFile {
    pub fn new(repository: Repository, remote_path: impl Into<String>, content: Vec<u8>) -> Result<Self> {
        let remote_path = remote_path.into();
        validate_remote_path("upload.path", &remote_path)?;
        validate_non_empty_string("upload.owner", &repository.owner)?;
        validate_non_empty_string("upload.repo", &repository.repo)?;
        validate_non_empty_string("upload.branch", &repository.branch)?;

        let file_name = remote_path.rsplit('/').next().unwrap_or(&remote_path);
        let message = format!("Upload test file {}", file_name);
        Ok(Self {
            repository,
            remote_path,
            content,
            message,
        })
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub path: String,
    pub html_url: String,
    pub created: bool,
}

impl Reportable for UploadedFile {
    fn headline(&self) -> String {
        let action = if self.created { "created" } else { "updated" };
        format!("Upload successful! ({} {})", action, self.path)
    }

    fn details(&self) -> Vec<String> {
        vec![format!("📁 File URL: {}", self.html_url)]
    }
}

impl ApiCall for UploadFile {
    type Output = UploadedFile;

    fn name(&self) -> &str {
        "upload"
    }

    fn describe(&self, credential: &Credential) -> Result<RequestDescriptor> {
        let url = endpoint(
            &self.repository.base_url,
            &format!(
                "repos/{}/{}/contents/{}",
                self.repository.owner, self.repository.repo, self.remote_path
            ),
        )?;
        let body = serde_json::json!({
            "message": self.message,
            "content": base64::engine::general_purpose::STANDARD.encode(&self.content),
            "branch": self.repository.branch,
        });

        Ok(RequestDescriptor::builder(HttpMethod::Put, url)
            .header("Authorization", format!("token {}", credential.expose()))
            .header("Content-Type", "application/json")
            .header("Accept", "application/vnd.github+json")
            .json(body)
            .build())
    }

    fn interpret(&self, response: RawResponse) -> Result<UploadedFile> {
        let json = response.json()?;
        let html_url = json
            .get("content")
            .and_then(|content| content.get("html_url"))
            .and_then(|url| url.as_str())
            .ok_or_else(|| RunnerError::UnexpectedResponse {
                message: "missing content.html_url in upload response".to_string(),
            })?;

        Ok(UploadedFile {
            path: self.remote_path.clone(),
            html_url: html_url.to_string(),
            created: response.status == 201,
        })
    }
}
