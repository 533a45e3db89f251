//! HTTP relay client for the region-fill service

use std::time::Duration;

use data_url::DataUrl;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{InpaintBackend, InpaintError, InpaintResult, SubmissionRequest};
use crate::source::SourceImage;

/// File name the mask part is uploaded under
const MASK_FILE_NAME: &str = "mask.png";

/// Client that posts multipart requests to the relay endpoint
pub struct RemoteInpaint {
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteInpaint {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, InpaintError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InpaintError::Connection(e.to_string()))?;
        Ok(Self::with_client(endpoint, client))
    }

    /// Use an already configured HTTP client
    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(request: SubmissionRequest) -> Result<Form, InpaintError> {
        let image = Part::bytes(request.image)
            .file_name(request.image_file_name)
            .mime_str(&request.image_mime)
            .map_err(|e| InpaintError::InvalidRequest(e.to_string()))?;
        let mask = Part::bytes(request.mask_png)
            .file_name(MASK_FILE_NAME)
            .mime_str("image/png")
            .map_err(|e| InpaintError::InvalidRequest(e.to_string()))?;
        Ok(Form::new()
            .part("image", image)
            .part("mask", mask)
            .text("prompt", request.prompt))
    }

    /// Download the generated image when the relay only returned its URL
    async fn fetch_generated(&self, url: &str) -> Result<Vec<u8>, InpaintError> {
        log::info!("Fetching generated image from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| InpaintError::Connection(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(InpaintError::Status {
                code: status.as_u16(),
                message: "Failed to fetch generated image".to_string(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| InpaintError::Connection(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl InpaintBackend for RemoteInpaint {
    async fn inpaint(&self, request: SubmissionRequest) -> Result<InpaintResult, InpaintError> {
        log::info!(
            "Submitting {} ({} bytes) with {} byte mask to {}",
            request.image_file_name,
            request.image.len(),
            request.mask_png.len(),
            self.endpoint
        );
        let form = Self::build_form(request)?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| InpaintError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| InpaintError::Connection(e.to_string()))?;

        if !status.is_success() {
            let message = error_detail(&body);
            log::warn!("Relay returned {}: {}", status, message);
            return Err(InpaintError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let reply = parse_reply(&body)?;
        let bytes = match &reply.base64 {
            Some(data) => decode_data_url(data)?,
            None => match &reply.url {
                Some(url) => self.fetch_generated(url).await?,
                None => {
                    return Err(InpaintError::InvalidResponse(
                        "Response carried neither base64 nor url".into(),
                    ));
                }
            },
        };

        let mut image = SourceImage::from_bytes(bytes, "generated-image")
            .map_err(|e| InpaintError::Decode(e.to_string()))?;
        image.file_name = format!("generated-image.{}", image.extension());
        log::info!(
            "Received generated image {}x{} ({})",
            image.width(),
            image.height(),
            image.mime
        );
        Ok(InpaintResult {
            image,
            url: reply.url,
        })
    }
}

/// Successful relay reply
#[derive(Debug, Deserialize)]
struct EditReply {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    url: Option<String>,
    /// `data:<mime>;base64,<payload>` URL of the generated image
    #[serde(default)]
    base64: Option<String>,
}

fn parse_reply(body: &[u8]) -> Result<EditReply, InpaintError> {
    let reply: EditReply =
        serde_json::from_slice(body).map_err(|e| InpaintError::InvalidResponse(e.to_string()))?;
    if reply.success == Some(false) {
        return Err(InpaintError::InvalidResponse(
            "Service reported failure".into(),
        ));
    }
    Ok(reply)
}

/// Decode an inline `data:` URL into raw bytes
fn decode_data_url(data: &str) -> Result<Vec<u8>, InpaintError> {
    let url = DataUrl::process(data)
        .map_err(|e| InpaintError::InvalidResponse(format!("Malformed data URL: {:?}", e)))?;
    let (bytes, _) = url
        .decode_to_vec()
        .map_err(|e| InpaintError::InvalidResponse(format!("Malformed base64 payload: {:?}", e)))?;
    Ok(bytes)
}

/// Pull a human-readable message out of an error body
///
/// The relay answers `{"detail": "..."}`; some deployments use
/// `{"error": "..."}` or `{"error": {"message": "..."}}`.
fn error_detail(body: &[u8]) -> String {
    let fallback = || {
        let text = String::from_utf8_lossy(body).trim().to_string();
        if text.is_empty() {
            "Image generation failed".to_string()
        } else {
            text
        }
    };
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return fallback();
    };
    let detail = value
        .get("detail")
        .or_else(|| value.get("error"))
        .map(|v| match v {
            serde_json::Value::String(s) => Some(s.clone()),
            other => other
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
        });
    match detail {
        Some(Some(message)) => message,
        _ => fallback(),
    }
}
