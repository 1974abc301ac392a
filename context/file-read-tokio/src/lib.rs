//! Tokio-based file reading implementation for numera.
//!
//! This crate provides `TokioFileRead`, an async file reader that implements
//! the `FileRead` trait from `numera_core` using Tokio's file system
//! operations. It is the usual way to load PEM key material referenced by a
//! [`Config`](numera_core::Config).
//!
//! ## Example
//!
//! ```no_run
//! use numera_core::Context;
//! use numera_file_read_tokio::TokioFileRead;
//!
//! # async fn example() -> numera_core::Result<()> {
//! let ctx = Context::new().with_file_read(TokioFileRead);
//!
//! let pem = ctx.file_read_as_string("client-key.pem").await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use numera_core::{Error, FileRead, Result};

/// Tokio-based implementation of the `FileRead` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::unexpected("failed to read file").with_source(e))
    }
}
