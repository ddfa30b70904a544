// src/novelai/client.rs

use once_cell::sync::Lazy;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, AUTHORIZATION,
    CACHE_CONTROL, CONTENT_TYPE, ORIGIN, PRAGMA, REFERER, USER_AGENT,
};
use reqwest::StatusCode;

use crate::error::StudioError;
use crate::types::{GenerationRequest, RawResponse};

pub const GENERATE_IMAGE_URL: &str = "https://api.novelai.net/ai/generate-image";

/// Headers the service expects from its own web client. Requests without
/// this exact set are turned away, so it must stay as is.
static BROWSER_HEADERS: Lazy<HeaderMap> = Lazy::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8,en-GB;q=0.7,en-US;q=0.6"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://novelai.net"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(REFERER, HeaderValue::from_static("https://novelai.net/"));
    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        HeaderValue::from_static(
            "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Microsoft Edge\";v=\"120\"",
        ),
    );
    headers.insert(HeaderName::from_static("sec-ch-ua-mobile"), HeaderValue::from_static("?0"));
    headers.insert(
        HeaderName::from_static("sec-ch-ua-platform"),
        HeaderValue::from_static("\"Windows\""),
    );
    headers.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("empty"));
    headers.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("cors"));
    headers.insert(HeaderName::from_static("sec-fetch-site"), HeaderValue::from_static("same-site"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
        ),
    );
    headers
});

/// The Authorization header for `credential`, kept out of debug output.
pub fn authorization(credential: &str) -> Result<HeaderValue, StudioError> {
    let mut value = HeaderValue::from_str(credential).map_err(|_| {
        StudioError::InvalidParameter(
            "credential contains characters not allowed in a header".to_string(),
        )
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Talks to the image generation endpoint. Cheap to clone.
#[derive(Clone, Debug)]
pub struct GenerationClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for GenerationClient {
    fn default() -> Self {
        Self::new(GENERATE_IMAGE_URL)
    }
}

impl GenerationClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one request and wait for the whole response.
    ///
    /// There is no retry and no timeout: image synthesis can take a while,
    /// and the call only ends when the server answers or the connection
    /// fails.
    pub async fn submit(
        &self,
        request: &GenerationRequest,
        credential: &str,
    ) -> Result<RawResponse, StudioError> {
        let mut headers = BROWSER_HEADERS.clone();
        headers.insert(AUTHORIZATION, authorization(credential)?);

        tracing::info!(
            "Requesting {}x{} image ({} steps) from {}",
            request.parameters.width,
            request.parameters.height,
            request.parameters.steps,
            self.endpoint
        );

        let response = self
            .http
            .post(&self.endpoint)
            .headers(headers)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("Generation rejected with status {}", status);
            return Err(StudioError::RemoteRejected(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        tracing::debug!("Received {} bytes ({:?})", body.len(), content_type);
        Ok(RawResponse { body, content_type })
    }
}
