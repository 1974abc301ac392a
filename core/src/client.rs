use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_GEOLOCATION, DEFAULT_LANGUAGE, DEFAULT_REGION, DEFAULT_USER_AGENT,
};
use crate::utils::Redact;
use crate::{Error, Result};
use http::{HeaderName, HeaderValue};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs1v15::{SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Immutable per-session state of an API client.
///
/// A `Client` holds the api key, the client key pair used to sign outgoing
/// requests, the optional server public key used to verify responses, the
/// bootstrap tokens, and the default headers attached to every call. It is a
/// cheap-clone handle: clones share the same inner state, which the pipeline
/// never mutates. Token rotation produces a new value via
/// [`Client::with_installation_token`] / [`Client::with_session_token`], so a
/// `Client` can be shared freely across concurrent callers.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Clone)]
struct ClientInner {
    api_key: String,
    base_url: String,
    user_agent: HeaderValue,
    language: HeaderValue,
    region: HeaderValue,
    geolocation: HeaderValue,
    signing_key: SigningKey<Sha256>,
    server_key: Option<VerifyingKey<Sha256>>,
    installation_token: Option<String>,
    session_token: Option<String>,
    default_headers: Vec<(HeaderName, HeaderValue)>,
    require_signed_responses: bool,
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &Redact::from(&self.inner.api_key))
            .field("base_url", &self.inner.base_url)
            .field(
                "installation_token",
                &Redact::from(&self.inner.installation_token),
            )
            .field("session_token", &Redact::from(&self.inner.session_token))
            .field("server_key", &self.inner.server_key.is_some())
            .field(
                "require_signed_responses",
                &self.inner.require_signed_responses,
            )
            .finish()
    }
}

impl Client {
    /// Start building a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The api key this client was created with.
    pub fn api_key(&self) -> &str {
        &self.inner.api_key
    }

    /// Endpoint all request paths are resolved against.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Installation token obtained during bootstrap, if any.
    pub fn installation_token(&self) -> Option<&str> {
        self.inner.installation_token.as_deref()
    }

    /// Session token obtained during login, if any.
    pub fn session_token(&self) -> Option<&str> {
        self.inner.session_token.as_deref()
    }

    /// New client with the installation token replaced.
    ///
    /// The current value is untouched; in-flight calls keep the state they
    /// started with.
    pub fn with_installation_token(&self, token: impl Into<String>) -> Self {
        let mut inner = (*self.inner).clone();
        inner.installation_token = Some(token.into());
        Self {
            inner: Arc::new(inner),
        }
    }

    /// New client with the session token replaced.
    pub fn with_session_token(&self, token: impl Into<String>) -> Self {
        let mut inner = (*self.inner).clone();
        inner.session_token = Some(token.into());
        Self {
            inner: Arc::new(inner),
        }
    }

    pub(crate) fn user_agent(&self) -> &HeaderValue {
        &self.inner.user_agent
    }

    pub(crate) fn language(&self) -> &HeaderValue {
        &self.inner.language
    }

    pub(crate) fn region(&self) -> &HeaderValue {
        &self.inner.region
    }

    pub(crate) fn geolocation(&self) -> &HeaderValue {
        &self.inner.geolocation
    }

    pub(crate) fn signing_key(&self) -> &SigningKey<Sha256> {
        &self.inner.signing_key
    }

    pub(crate) fn server_key(&self) -> Option<&VerifyingKey<Sha256>> {
        self.inner.server_key.as_ref()
    }

    pub(crate) fn default_headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.inner.default_headers
    }

    pub(crate) fn require_signed_responses(&self) -> bool {
        self.inner.require_signed_responses
    }
}

/// Builder for [`Client`].
///
/// PEM key material is decoded once at [`build`](ClientBuilder::build), so a
/// malformed key surfaces as [`ErrorKind::ConfigInvalid`](crate::ErrorKind)
/// before the first request goes out.
#[derive(Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    region: Option<String>,
    geolocation: Option<String>,
    private_key_pem: Option<String>,
    server_public_key_pem: Option<String>,
    installation_token: Option<String>,
    session_token: Option<String>,
    default_headers: Vec<(HeaderName, HeaderValue)>,
    require_signed_responses: bool,
}

impl ClientBuilder {
    /// Create a builder with library defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the api key. Required.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the endpoint requests are sent to.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the locale sent with every request.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Override the region sent with every request.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Override the geolocation placeholder.
    pub fn geolocation(mut self, geolocation: impl Into<String>) -> Self {
        self.geolocation = Some(geolocation.into());
        self
    }

    /// Set the client private key as PEM. Required.
    ///
    /// PKCS#8 (`BEGIN PRIVATE KEY`) and PKCS#1 (`BEGIN RSA PRIVATE KEY`)
    /// encodings are accepted.
    pub fn private_key_pem(mut self, pem: impl Into<String>) -> Self {
        self.private_key_pem = Some(pem.into());
        self
    }

    /// Set the server public key as PEM, enabling response verification.
    ///
    /// SPKI (`BEGIN PUBLIC KEY`) and PKCS#1 (`BEGIN RSA PUBLIC KEY`)
    /// encodings are accepted. Without a server key, responses pass through
    /// unverified.
    pub fn server_public_key_pem(mut self, pem: impl Into<String>) -> Self {
        self.server_public_key_pem = Some(pem.into());
        self
    }

    /// Set the installation token obtained during bootstrap.
    pub fn installation_token(mut self, token: impl Into<String>) -> Self {
        self.installation_token = Some(token.into());
        self
    }

    /// Set the session token obtained during login.
    pub fn session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Attach a default header to every request built with this client.
    pub fn default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.push((name, value));
        self
    }

    /// Treat a response without a server signature as a verification failure
    /// when a server public key is configured.
    ///
    /// The protocol does not sign every response, so this is off by default;
    /// turn it on for deployments that want the stricter guarantee.
    pub fn require_signed_responses(mut self, require: bool) -> Self {
        self.require_signed_responses = require;
        self
    }

    /// Build the client, decoding key material.
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .ok_or_else(|| Error::config_invalid("api key is required"))?;
        let pem = self
            .private_key_pem
            .ok_or_else(|| Error::config_invalid("client private key is required"))?;
        let signing_key = SigningKey::new(decode_private_key_pem(&pem)?);
        let server_key = match &self.server_public_key_pem {
            Some(pem) => Some(VerifyingKey::new(decode_public_key_pem(pem)?)),
            None => None,
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                api_key,
                base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                user_agent: header_value(self.user_agent, DEFAULT_USER_AGENT, "user agent")?,
                language: header_value(self.language, DEFAULT_LANGUAGE, "language")?,
                region: header_value(self.region, DEFAULT_REGION, "region")?,
                geolocation: header_value(self.geolocation, DEFAULT_GEOLOCATION, "geolocation")?,
                signing_key,
                server_key,
                installation_token: self.installation_token,
                session_token: self.session_token,
                default_headers: self.default_headers,
                require_signed_responses: self.require_signed_responses,
            }),
        })
    }
}

fn header_value(value: Option<String>, default: &'static str, what: &str) -> Result<HeaderValue> {
    match value {
        Some(v) => HeaderValue::from_str(&v)
            .map_err(|e| Error::config_invalid(format!("{what} is not a valid header value")).with_source(e)),
        None => Ok(HeaderValue::from_static(default)),
    }
}

fn decode_private_key_pem(pem: &str) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| Error::config_invalid("failed to decode client private key").with_source(e))
}

fn decode_public_key_pem(pem: &str) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| Error::config_invalid("failed to decode server public key").with_source(e))
}
