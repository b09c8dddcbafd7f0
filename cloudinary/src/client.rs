use std::{collections::BTreeMap, time::Duration};

use reqwest::{
    multipart::{Form, Part},
    StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize};
use strum::{AsRefStr, Display};
use thiserror::Error;
use time::OffsetDateTime;

use crate::{sign_params, Credentials, SignatureAlgorithm};

pub const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceType {
    Image,
}

/// Where and how an upload is published.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub folder: String,
    pub public_id: String,
    pub overwrite: bool,
    pub resource_type: ResourceType,
}

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// The published asset. `public_id` includes the folder prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedAsset {
    pub secure_url: String,
    pub public_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    Deleted,
    NotFound,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Error, Debug)]
pub enum CloudinaryError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("failed to parse response: {0}")]
    Parsing(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for CloudinaryError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the cloud name; keep it out of error text.
        Self::Request(err.without_url().to_string())
    }
}

pub struct CloudinaryClient {
    http: reqwest::Client,
    credentials: Credentials,
    base_url: String,
    signature_algorithm: SignatureAlgorithm,
}

impl CloudinaryClient {
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self, CloudinaryError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            signature_algorithm: SignatureAlgorithm::default(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_signature_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.signature_algorithm = algorithm;
        self
    }

    fn endpoint(&self, resource_type: ResourceType, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.base_url, self.credentials.cloud_name, resource_type, action
        )
    }

    /// Signs the parameters and appends `api_key` and `signature`.
    fn signed(&self, params: BTreeMap<&'static str, String>) -> Vec<(&'static str, String)> {
        let signature = sign_params(
            &params,
            self.credentials.api_secret(),
            self.signature_algorithm,
        );

        let mut signed = params
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect::<Vec<_>>();
        signed.push(("api_key", self.credentials.api_key.clone()));
        signed.push(("signature", signature));
        signed
    }

    pub async fn upload(
        &self,
        file: UploadFile,
        options: &UploadOptions,
    ) -> Result<UploadedAsset, CloudinaryError> {
        let params = upload_params(options, OffsetDateTime::now_utc().unix_timestamp());

        let mut form = Form::new();
        for (key, value) in self.signed(params) {
            form = form.text(key, value);
        }
        form = form.part("file", file_part(file)?);

        tracing::debug!(public_id = %options.public_id, folder = %options.folder, "uploading asset");

        let resp = self
            .http
            .post(self.endpoint(options.resource_type, "upload"))
            .multipart(form)
            .send()
            .await?;

        read_response(resp).await
    }

    /// Deletes an asset. A missing asset is reported as
    /// [`DestroyOutcome::NotFound`], not as an error.
    pub async fn destroy(
        &self,
        public_id: &str,
        resource_type: ResourceType,
    ) -> Result<DestroyOutcome, CloudinaryError> {
        let params = destroy_params(public_id, OffsetDateTime::now_utc().unix_timestamp());

        let resp = self
            .http
            .post(self.endpoint(resource_type, "destroy"))
            .form(&self.signed(params))
            .send()
            .await?;

        let response: DestroyResponse = read_response(resp).await?;
        match response.result.as_str() {
            "ok" => Ok(DestroyOutcome::Deleted),
            "not found" => Ok(DestroyOutcome::NotFound),
            other => Err(CloudinaryError::Rejected {
                status: StatusCode::OK.as_u16(),
                message: format!("unexpected destroy result: {other}"),
            }),
        }
    }
}

fn upload_params(options: &UploadOptions, timestamp: i64) -> BTreeMap<&'static str, String> {
    BTreeMap::from([
        ("folder", options.folder.clone()),
        ("public_id", options.public_id.clone()),
        ("overwrite", options.overwrite.to_string()),
        ("timestamp", timestamp.to_string()),
    ])
}

fn destroy_params(public_id: &str, timestamp: i64) -> BTreeMap<&'static str, String> {
    BTreeMap::from([
        ("public_id", public_id.to_string()),
        ("invalidate", "true".to_string()),
        ("timestamp", timestamp.to_string()),
    ])
}

fn file_part(file: UploadFile) -> Result<Part, CloudinaryError> {
    let part =
        Part::bytes(file.bytes).file_name(file.file_name.unwrap_or_else(|| "upload".to_string()));

    match file.content_type {
        Some(content_type) => part
            .mime_str(&content_type)
            .map_err(|_| CloudinaryError::InvalidRequest(format!("bad content type: {content_type}"))),
        None => Ok(part),
    }
}

async fn read_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, CloudinaryError> {
    let status = resp.status();
    let body = resp.text().await?;

    parse_body(status, &body)
}

fn parse_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, CloudinaryError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|resp| resp.error.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        return Err(CloudinaryError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(body).map_err(|e| CloudinaryError::Parsing(e.to_string()))
}
