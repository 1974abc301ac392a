use crate::{Error, Result};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue, Method};
use serde::Serialize;

/// The kind of operation a request performs against the API.
///
/// The credential selector and the request signer dispatch on this tag:
/// bootstrap operations are authenticated and signed differently from
/// ordinary session traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Registers the client key pair with the service. Goes out without a
    /// token and with an empty signature; this call establishes trust.
    Install,
    /// Registers the calling device, authenticated with the installation token.
    RegisterDevice,
    /// Opens a session, authenticated with the installation token.
    CreateSession,
    /// Any ordinary operation, authenticated with the session token.
    Other,
}

/// A request to the Numera API, carried through the pipeline.
///
/// Headers are an ordered list: duplicate names are allowed and insertion
/// order is preserved until the canonical sort at signing time. Every
/// pipeline stage consumes the request and returns a new value, so the
/// signature header is always the last header attached before transport.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Operation kind, used for credential selection and signing dispatch.
    pub kind: OperationKind,
    /// HTTP method.
    pub method: Method,
    /// Request path including any query string, e.g. `/v1/user`.
    pub path: String,
    /// Ordered header list.
    pub headers: Vec<(HeaderName, HeaderValue)>,
    /// Serialized payload body.
    pub body: Bytes,
}

impl ApiRequest {
    /// Create a new request with an empty header set and body.
    pub fn new(kind: OperationKind, method: Method, path: impl Into<String>) -> Self {
        Self {
            kind,
            method,
            path: path.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// GET request for an ordinary session operation.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(OperationKind::Other, Method::GET, path)
    }

    /// POST request for an ordinary session operation.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(OperationKind::Other, Method::POST, path)
    }

    /// Attach a caller-supplied header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Set the raw body bytes.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Serialize `payload` as the JSON body.
    ///
    /// Serialization is deterministic for a fixed payload value, which the
    /// request signature depends on.
    pub fn with_json<T: Serialize>(mut self, payload: &T) -> Result<Self> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| Error::request_invalid("failed to serialize request body").with_source(e))?;
        self.body = Bytes::from(body);
        self.headers
            .push((CONTENT_TYPE, HeaderValue::from_static("application/json")));
        Ok(self)
    }

    pub(crate) fn prepend_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(0, (name, value));
        self
    }
}

/// Render a header subset as the canonical block used for signing and
/// verification: sorted by name as stored, rendered `name: value`, joined by
/// a single newline.
///
/// ```shell
/// [(b, 2), (a, 1)] => "a: 1\nb: 2"
/// ```
pub(crate) fn canonical_header_block(mut headers: Vec<(String, String)>) -> String {
    let mut s = String::with_capacity(64);

    // Stable sort by name; duplicate names keep their insertion order.
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    for (idx, (k, v)) in headers.into_iter().enumerate() {
        if idx != 0 {
            s.push('\n');
        }

        s.push_str(&k);
        s.push_str(": ");
        s.push_str(&v);
    }

    s
}
