//! Shared fixtures for unit tests.
//!
//! Key generation is expensive, so both test key pairs are generated once
//! and reused across the whole test run.

use crate::{Client, ClientBuilder};
use rsa::pkcs1v15::{SigningKey, VerifyingKey};
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use std::sync::OnceLock;

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

pub(crate) fn private_key_pem() -> &'static str {
    static PEM: OnceLock<String> = OnceLock::new();
    PEM.get_or_init(|| {
        client_key()
            .to_pkcs8_pem(LineEnding::LF)
            .expect("encode client key")
            .to_string()
    })
}

pub(crate) fn server_public_key_pem() -> &'static str {
    static PEM: OnceLock<String> = OnceLock::new();
    PEM.get_or_init(|| {
        server_key()
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .expect("encode server public key")
    })
}

/// Public half of the client key pair, for checking request signatures.
pub(crate) fn client_verifying_key() -> VerifyingKey<Sha256> {
    VerifyingKey::new(client_key().to_public_key())
}

/// Private half of the server key pair, for signing test responses.
pub(crate) fn server_signing_key() -> SigningKey<Sha256> {
    SigningKey::new(server_key().clone())
}

/// Builder primed with an api key and the test private key.
pub(crate) fn builder() -> ClientBuilder {
    Client::builder()
        .api_key("test-api-key")
        .private_key_pem(private_key_pem())
}

/// Fully provisioned client with both bootstrap tokens.
pub(crate) fn client() -> Client {
    builder()
        .installation_token("test-installation-token")
        .session_token("test-session-token")
        .build()
        .expect("build test client")
}

/// Client that verifies responses against the test server key.
pub(crate) fn verifying_client() -> Client {
    verifying_client_with(|b| b)
}

pub(crate) fn verifying_client_with(f: impl FnOnce(ClientBuilder) -> ClientBuilder) -> Client {
    f(builder().server_public_key_pem(server_public_key_pem()))
        .build()
        .expect("build test client")
}
