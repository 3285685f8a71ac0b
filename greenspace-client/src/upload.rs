//! Image upload
//!
//! Signatures and review photos go to Cloudinary through an unsigned
//! upload preset; the backend only ever sees the resulting URL.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::CloudinaryConfig;
use crate::error::{ClientError, ClientResult};

/// Destination for image bytes
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload an image and return its public HTTPS URL.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<String>;
}

#[derive(Deserialize)]
struct CloudinaryResponse {
    secure_url: Option<String>,
    error: Option<CloudinaryError>,
}

#[derive(Deserialize)]
struct CloudinaryError {
    message: String,
}

/// Cloudinary unsigned uploader
#[derive(Debug, Clone)]
pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<String> {
        if bytes.is_empty() {
            return Err(ClientError::Upload("empty image".into()));
        }
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.config.upload_preset.clone());

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body: CloudinaryResponse = response.json().await?;

        match (body.secure_url, body.error) {
            (Some(url), _) if status.is_success() => {
                tracing::debug!(file_name, %url, "Image uploaded");
                Ok(url)
            }
            (_, Some(err)) => Err(ClientError::Upload(err.message)),
            _ => Err(ClientError::Upload(format!(
                "unexpected Cloudinary response ({status})"
            ))),
        }
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/png",
    }
}
