//! Protocol constants for the Numera API.

// Protocol metadata headers. The signing filter keys on the shared prefix.

/// Name prefix shared by all Numera protocol headers.
pub const HEADER_PREFIX: &str = "x-numera-";

/// Bearer token header attached by the credential selector.
pub const HEADER_CLIENT_AUTHENTICATION: &str = "x-numera-client-authentication";
/// Request signature header.
pub const HEADER_CLIENT_SIGNATURE: &str = "x-numera-client-signature";
/// Response signature header.
pub const HEADER_SERVER_SIGNATURE: &str = "x-numera-server-signature";
/// Per-request correlation id header, freshly generated for every call.
pub const HEADER_CLIENT_REQUEST_ID: &str = "x-numera-client-request-id";
/// Locale header.
pub const HEADER_LANGUAGE: &str = "x-numera-language";
/// Region header.
pub const HEADER_REGION: &str = "x-numera-region";
/// Geolocation header.
pub const HEADER_GEOLOCATION: &str = "x-numera-geolocation";

// Library-wide defaults, overridable per client.

/// Default production endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.numera.com";
/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("numera-rust/", env!("CARGO_PKG_VERSION"));
/// Default locale.
pub const DEFAULT_LANGUAGE: &str = "en_US";
/// Default region.
pub const DEFAULT_REGION: &str = "nl_NL";
/// Geolocation placeholder sent when the caller does not supply one.
pub const DEFAULT_GEOLOCATION: &str = "0 0 0 0 000";

// Env values used by Config::from_env.

/// Env value for the API key.
pub const NUMERA_API_KEY: &str = "NUMERA_API_KEY";
/// Env value for the endpoint override.
pub const NUMERA_BASE_URL: &str = "NUMERA_BASE_URL";
/// Env value for the client private key PEM file path.
pub const NUMERA_PRIVATE_KEY_FILE: &str = "NUMERA_PRIVATE_KEY_FILE";
/// Env value for the server public key PEM file path.
pub const NUMERA_SERVER_PUBLIC_KEY_FILE: &str = "NUMERA_SERVER_PUBLIC_KEY_FILE";
/// Env value for the installation token.
pub const NUMERA_INSTALLATION_TOKEN: &str = "NUMERA_INSTALLATION_TOKEN";
/// Env value for the session token.
pub const NUMERA_SESSION_TOKEN: &str = "NUMERA_SESSION_TOKEN";
/// Env value for the locale.
pub const NUMERA_LANGUAGE: &str = "NUMERA_LANGUAGE";
/// Env value for the region.
pub const NUMERA_REGION: &str = "NUMERA_REGION";
