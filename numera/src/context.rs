use numera_core::{Context, OsEnv};
use numera_file_read_tokio::TokioFileRead;
use numera_http_send_reqwest::ReqwestHttpSend;

/// Batteries-included context components: tokio file reading, a reqwest HTTP
/// client, and the process environment, wired into one [`Context`].
#[derive(Debug, Default)]
pub struct DefaultContext {
    http: ReqwestHttpSend,
}

impl DefaultContext {
    /// Create a default context with a fresh reqwest client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a default context around an existing reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            http: ReqwestHttpSend::new(client),
        }
    }

    /// Assemble the [`Context`] backed by these components.
    pub fn into_context(self) -> Context {
        Context::new()
            .with_file_read(TokioFileRead)
            .with_http_send(self.http)
            .with_env(OsEnv)
    }
}
