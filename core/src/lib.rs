//! Core components of the Numera API client.
//!
//! This crate implements the request/response authentication pipeline for
//! the Numera banking API: header composition, credential selection, request
//! signing, and response verification. Transport and runtime concerns stay
//! behind the [`Context`] abstraction, so the pipeline itself has no opinion
//! about HTTP clients or async runtimes.
//!
//! ## Overview
//!
//! Every call flows through the same stages:
//!
//! 1. [`compose`] attaches the client's default headers and the library-wide
//!    defaults, including a fresh per-request correlation id.
//! 2. [`authenticate`] attaches the bearer token the operation kind calls
//!    for: nothing for the install bootstrap, the installation token for
//!    device/session bootstrap, the session token for everything else.
//! 3. [`sign`] canonicalizes the signable subset of the request and prepends
//!    an RSA-SHA256 signature header.
//! 4. The transport configured on the [`Context`] executes the call.
//! 5. [`verify`] checks the server signature over the raw response bytes
//!    against the configured server public key, when one is present.
//!
//! Each stage consumes the request and returns a new value; a [`Client`] is
//! never mutated and can be shared freely across concurrent callers.
//!
//! ## Example
//!
//! ```no_run
//! use numera_core::{Client, Context};
//!
//! # async fn example() -> numera_core::Result<()> {
//! let client = Client::builder()
//!     .api_key("my-api-key")
//!     .private_key_pem(std::fs::read_to_string("client-key.pem")?)
//!     .session_token("session-token-from-login")
//!     .build()?;
//!
//! // Configure a transport (e.g. numera-http-send-reqwest) here.
//! let ctx = Context::new();
//!
//! let resp = client.get(&ctx, "/v1/user").await?;
//! println!("{}", resp.status());
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod constants;
pub mod utils;

mod auth;
pub use auth::authenticate;
mod client;
pub use client::{Client, ClientBuilder};
mod compose;
pub use compose::compose;
mod config;
pub use config::Config;
mod context;
pub use context::{
    Context, Env, FileRead, HttpSend, NoopEnv, NoopFileRead, NoopHttpSend, OsEnv, StaticEnv,
};
mod error;
pub use error::{Error, ErrorKind, Result};
mod execute;
mod request;
pub use request::{ApiRequest, OperationKind};
mod response;
pub use response::ApiResponse;
mod sign;
pub use sign::sign;
mod verify;
pub use verify::verify;

#[cfg(test)]
pub(crate) mod testing;
