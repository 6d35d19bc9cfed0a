//! HTTP client for the remote detection service.
//!
//! The service is the only external collaborator that can block or fail: one
//! multipart POST per image, a bounded timeout, and a fail-fast contract: any
//! transport error or non-200 status halts the flow with a diagnostic, no
//! retries, no partial results.

pub mod response;

pub use response::{DetectionBox, DetectionResult};

use std::time::Duration;

use rand::distr::Alphanumeric;
use rand::RngExt;

use crate::error::PlastiscanError;

/// The multipart field name the service expects the image under.
const IMAGE_FIELD: &str = "file";

/// File name reported for the uploaded part.
const IMAGE_FILE_NAME: &str = "image.jpg";

/// Content type of the uploaded part. The service accepts JPEG and PNG bytes
/// under this label; it sniffs the actual codec server-side.
const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Client for the detection endpoint.
#[derive(Debug)]
pub struct DetectionClient {
    agent: ureq::Agent,
    url: String,
}

impl DetectionClient {
    /// Creates a client for the given endpoint.
    ///
    /// # Errors
    /// Returns an error if `api_url` is not a valid absolute URL.
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, PlastiscanError> {
        let url = url::Url::parse(api_url).map_err(|source| PlastiscanError::InvalidEndpoint {
            url: api_url.to_string(),
            source,
        })?;

        // Non-2xx statuses come back as responses so their body can be
        // surfaced as diagnostics instead of a bare status error.
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        let agent: ureq::Agent = config.into();

        Ok(Self {
            agent,
            url: url.to_string(),
        })
    }

    /// Submits image bytes for detection and returns the parsed result.
    ///
    /// # Errors
    /// - `Transport` on connection failure or timeout.
    /// - `Api` on any non-200 status, carrying the response body.
    /// - `ResponseParse` if a 200 body is not a JSON object.
    pub fn detect(&self, image: &[u8]) -> Result<DetectionResult, PlastiscanError> {
        let boundary = random_boundary();
        let body = multipart_body(&boundary, IMAGE_FIELD, IMAGE_FILE_NAME, image);

        log::debug!(
            "posting {} image bytes to {} ({} byte request body)",
            image.len(),
            self.url,
            body.len()
        );

        let mut response = self
            .agent
            .post(&self.url)
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send(&body[..])
            .map_err(|source| PlastiscanError::Transport {
                url: self.url.clone(),
                message: source.to_string(),
            })?;

        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|source| PlastiscanError::Transport {
                url: self.url.clone(),
                message: source.to_string(),
            })?;

        if status != 200 {
            return Err(PlastiscanError::Api { status, body: text });
        }

        log::debug!("detection service answered with {} bytes", text.len());
        response::from_json_slice(text.as_bytes())
    }
}

/// Generate a random multipart boundary.
fn random_boundary() -> String {
    let tail: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    format!("plastiscan-{tail}")
}

/// Assemble a single-part multipart/form-data body.
fn multipart_body(boundary: &str, field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {IMAGE_CONTENT_TYPE}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
