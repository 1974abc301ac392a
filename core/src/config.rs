use crate::constants::{
    NUMERA_API_KEY, NUMERA_BASE_URL, NUMERA_INSTALLATION_TOKEN, NUMERA_LANGUAGE,
    NUMERA_PRIVATE_KEY_FILE, NUMERA_REGION, NUMERA_SERVER_PUBLIC_KEY_FILE, NUMERA_SESSION_TOKEN,
};
use crate::utils::Redact;
use crate::{Client, Context, Error, Result};
use std::fmt::{Debug, Formatter};

/// Static configuration for building a [`Client`].
///
/// Key material is referenced by file path and read through the context's
/// file reader when the client is built; bootstrap (which generates keys and
/// obtains tokens) is expected to have written these files already.
#[derive(Clone, Default)]
pub struct Config {
    /// The api key issued for this client.
    pub api_key: Option<String>,
    /// Endpoint override.
    pub base_url: Option<String>,
    /// Path to the client private key PEM.
    pub private_key_file: Option<String>,
    /// Path to the server public key PEM.
    pub server_public_key_file: Option<String>,
    /// Installation token obtained during bootstrap.
    pub installation_token: Option<String>,
    /// Session token obtained during login.
    pub session_token: Option<String>,
    /// Locale override.
    pub language: Option<String>,
    /// Region override.
    pub region: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &Redact::from(&self.api_key))
            .field("base_url", &self.base_url)
            .field("private_key_file", &self.private_key_file)
            .field("server_public_key_file", &self.server_public_key_file)
            .field(
                "installation_token",
                &Redact::from(&self.installation_token),
            )
            .field("session_token", &Redact::from(&self.session_token))
            .field("language", &self.language)
            .field("region", &self.region)
            .finish()
    }
}

impl Config {
    /// Load config from environment variables.
    pub fn from_env(ctx: &Context) -> Self {
        Self {
            api_key: ctx.env_var(NUMERA_API_KEY),
            base_url: ctx.env_var(NUMERA_BASE_URL),
            private_key_file: ctx.env_var(NUMERA_PRIVATE_KEY_FILE),
            server_public_key_file: ctx.env_var(NUMERA_SERVER_PUBLIC_KEY_FILE),
            installation_token: ctx.env_var(NUMERA_INSTALLATION_TOKEN),
            session_token: ctx.env_var(NUMERA_SESSION_TOKEN),
            language: ctx.env_var(NUMERA_LANGUAGE),
            region: ctx.env_var(NUMERA_REGION),
        }
    }
}

impl Client {
    /// Build a client from static configuration, reading key material
    /// through the context's file reader.
    pub async fn from_config(ctx: &Context, config: Config) -> Result<Client> {
        let mut builder = Client::builder();

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        let key_file = config
            .private_key_file
            .ok_or_else(|| Error::config_invalid("private key file is not set"))?;
        builder = builder.private_key_pem(ctx.file_read_as_string(&key_file).await?);

        if let Some(path) = config.server_public_key_file {
            builder = builder.server_public_key_pem(ctx.file_read_as_string(&path).await?);
        }
        if let Some(base_url) = config.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(token) = config.installation_token {
            builder = builder.installation_token(token);
        }
        if let Some(token) = config.session_token {
            builder = builder.session_token(token);
        }
        if let Some(language) = config.language {
            builder = builder.language(language);
        }
        if let Some(region) = config.region {
            builder = builder.region(region);
        }

        builder.build()
    }
}
