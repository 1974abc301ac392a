use crate::{Client, Error, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

/// A response that made it through signature verification.
///
/// The body is kept as the raw received bytes; decoding is explicit and
/// happens after verification, so a tampered body can never reach the
/// caller as decoded data.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    client: Client,
}

impl ApiResponse {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: Bytes, client: Client) -> Self {
        Self {
            status,
            headers,
            body,
            client,
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers, exactly as received.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes, exactly as received.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Handle to the client that produced this response.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| Error::response_invalid("failed to decode response body").with_source(e))
    }
}
