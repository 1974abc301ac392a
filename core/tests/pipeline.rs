//! End-to-end pipeline tests against a scripted in-memory transport.
//!
//! The transport double re-derives the canonical strings on its own instead
//! of calling into the crate, so these tests pin the wire format as well as
//! the behavior.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use http::{HeaderValue, StatusCode};
use numera_core::constants::{
    HEADER_CLIENT_AUTHENTICATION, HEADER_CLIENT_SIGNATURE, HEADER_SERVER_SIGNATURE,
};
use numera_core::{
    ApiRequest, Client, ClientBuilder, Context, ErrorKind, HttpSend, OperationKind, Result,
};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::RsaPrivateKey;
use serde::Deserialize;
use sha2::Sha256;
use std::fmt::{Debug, Formatter};
use std::sync::OnceLock;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn client_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("generate client key")
    })
}

fn server_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("generate server key")
    })
}

fn client_builder() -> ClientBuilder {
    let pem = client_key()
        .to_pkcs8_pem(LineEnding::LF)
        .expect("encode client key");
    Client::builder()
        .api_key("test-api-key")
        .base_url("https://api.numera.test")
        .private_key_pem(pem.to_string())
}

fn verifying_client_builder() -> ClientBuilder {
    let pem = server_key()
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .expect("encode server public key");
    client_builder().server_public_key_pem(pem)
}

/// Re-derive the request canonicalization from the received wire request.
fn canonical_request(req: &http::Request<Bytes>) -> Vec<u8> {
    let mut headers: Vec<(String, String)> = req
        .headers()
        .iter()
        .filter(|(name, _)| {
            let name = name.as_str();
            name == "cache-control"
                || name == "user-agent"
                || (name.starts_with("x-numera-") && name != "x-numera-client-signature")
        })
        .map(|(name, value)| (name.to_string(), value.to_str().unwrap().to_string()))
        .collect();
    headers.sort_by(|a, b| a.0.cmp(&b.0));
    let block = headers
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = format!(
        "{} {}\n{}\n\n",
        req.method().as_str(),
        req.uri()
            .path_and_query()
            .map(|p| p.as_str())
            .unwrap_or("/"),
        block
    )
    .into_bytes();
    out.extend_from_slice(req.body());
    out
}

/// Re-derive the response canonicalization the way the server would sign it.
fn canonical_response(resp: &http::Response<Bytes>) -> Vec<u8> {
    let mut headers: Vec<(String, String)> = resp
        .headers()
        .iter()
        .filter(|(name, _)| {
            name.as_str().starts_with("x-numera-") && name.as_str() != "x-numera-server-signature"
        })
        .map(|(name, value)| (name.to_string(), value.to_str().unwrap().to_string()))
        .collect();
    headers.sort_by(|a, b| a.0.cmp(&b.0));
    let block = headers
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = format!("{}\n{}\n\n", resp.status().as_str(), block).into_bytes();
    out.extend_from_slice(resp.body());
    out
}

/// In-memory stand-in for the Numera endpoint.
struct ScriptedServer {
    status: StatusCode,
    body: &'static [u8],
    /// Expected value of the single authentication header; `None` asserts
    /// the header is absent.
    expected_token: Option<&'static str>,
    /// Check the client signature against the client public key.
    verify_request_signature: bool,
    /// Assert the signature header is present but empty (install calls).
    expect_empty_signature: bool,
    /// Sign the response with the server key.
    sign_response: bool,
    /// Corrupt the body after signing to simulate in-transit tampering.
    tamper_after_signing: bool,
}

impl Default for ScriptedServer {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            body: b"{}",
            expected_token: Some("S"),
            verify_request_signature: true,
            expect_empty_signature: false,
            sign_response: false,
            tamper_after_signing: false,
        }
    }
}

impl Debug for ScriptedServer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedServer").finish()
    }
}

#[async_trait]
impl HttpSend for ScriptedServer {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let tokens: Vec<_> = req
            .headers()
            .get_all(HEADER_CLIENT_AUTHENTICATION)
            .iter()
            .collect();
        match self.expected_token {
            Some(expected) => {
                assert_eq!(tokens.len(), 1, "expected exactly one authentication header");
                assert_eq!(tokens[0], expected);
            }
            None => assert!(tokens.is_empty(), "expected no authentication header"),
        }

        let signatures: Vec<_> = req
            .headers()
            .get_all(HEADER_CLIENT_SIGNATURE)
            .iter()
            .collect();
        assert_eq!(signatures.len(), 1, "expected exactly one signature header");
        if self.expect_empty_signature {
            assert!(signatures[0].is_empty(), "expected an empty signature");
        }
        if self.verify_request_signature {
            let signature = general_purpose::STANDARD
                .decode(signatures[0].to_str().unwrap())
                .expect("signature must be base64");
            let signature = Signature::try_from(signature.as_slice()).unwrap();
            VerifyingKey::<Sha256>::new(client_key().to_public_key())
                .verify(&canonical_request(&req), &signature)
                .expect("client signature must verify");
        }

        let mut response = http::Response::builder()
            .status(self.status)
            .header("content-type", "application/json")
            .header("x-numera-client-request-id", "correlation-echo")
            .body(Bytes::from_static(self.body))?;

        if self.sign_response {
            let signature = SigningKey::<Sha256>::new(server_key().clone())
                .try_sign(&canonical_response(&response))
                .unwrap();
            let value =
                HeaderValue::from_str(&general_purpose::STANDARD.encode(signature.to_bytes()))
                    .unwrap();
            response.headers_mut().insert(HEADER_SERVER_SIGNATURE, value);

            if self.tamper_after_signing {
                *response.body_mut() = Bytes::from_static(b"{\"tampered\":true}");
            }
        }

        Ok(response)
    }
}

fn context(server: ScriptedServer) -> Context {
    Context::new().with_http_send(server)
}

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u64,
    name: String,
}

#[tokio::test]
async fn test_list_round_trip() {
    init();

    let client = verifying_client_builder()
        .session_token("S")
        .build()
        .unwrap();
    let ctx = context(ScriptedServer {
        body: br#"{"id":7,"name":"alice"}"#,
        sign_response: true,
        ..Default::default()
    });

    let resp = client.get(&ctx, "/v1/user").await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.json::<User>().unwrap(),
        User {
            id: 7,
            name: "alice".to_string()
        }
    );
}

#[tokio::test]
async fn test_install_goes_out_unsigned_and_unauthenticated() {
    init();

    let client = client_builder().build().unwrap();
    let ctx = context(ScriptedServer {
        expected_token: None,
        verify_request_signature: false,
        expect_empty_signature: true,
        body: br#"{"token":"new-installation-token"}"#,
        ..Default::default()
    });

    let req = ApiRequest::new(
        OperationKind::Install,
        http::Method::POST,
        "/v1/installation",
    )
    .with_json(&serde_json::json!({"client_public_key": "..."}))
    .unwrap();

    let resp = client.execute(&ctx, req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_session_uses_installation_token() {
    init();

    let client = client_builder()
        .installation_token("I")
        .build()
        .unwrap();
    let ctx = context(ScriptedServer {
        expected_token: Some("I"),
        body: br#"{"token":"fresh-session-token"}"#,
        ..Default::default()
    });

    let req = ApiRequest::new(
        OperationKind::CreateSession,
        http::Method::POST,
        "/v1/session",
    )
    .with_json(&serde_json::json!({"secret": "test-api-key"}))
    .unwrap();

    let resp = client.execute(&ctx, req).await.unwrap();

    // Rotation hands back a new client; the original is untouched.
    let rotated = client.with_session_token("fresh-session-token");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(client.session_token(), None);
    assert_eq!(rotated.session_token(), Some("fresh-session-token"));
}

#[tokio::test]
async fn test_tampered_response_fails_the_call() {
    init();

    let client = verifying_client_builder()
        .session_token("S")
        .build()
        .unwrap();
    let ctx = context(ScriptedServer {
        body: br#"{"id":7,"name":"alice"}"#,
        sign_response: true,
        tamper_after_signing: true,
        ..Default::default()
    });

    let err = client.get(&ctx, "/v1/user").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureInvalid);
}

#[tokio::test]
async fn test_unsigned_response_passes_when_lenient() {
    init();

    let client = verifying_client_builder()
        .session_token("S")
        .build()
        .unwrap();
    let ctx = context(ScriptedServer::default());

    let resp = client.get(&ctx, "/v1/user").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unsigned_response_fails_in_strict_mode() {
    init();

    let client = verifying_client_builder()
        .session_token("S")
        .require_signed_responses(true)
        .build()
        .unwrap();
    let ctx = context(ScriptedServer::default());

    let err = client.get(&ctx, "/v1/user").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureInvalid);
}

#[tokio::test]
async fn test_missing_session_token_fails_before_transport() {
    init();

    let client = client_builder().build().unwrap();
    // No transport configured: reaching it would fail with Unexpected.
    let ctx = Context::new();

    let err = client.get(&ctx, "/v1/user").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialMissing);
}
