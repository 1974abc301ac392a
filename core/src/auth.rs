use crate::constants::HEADER_CLIENT_AUTHENTICATION;
use crate::{ApiRequest, Client, Error, OperationKind, Result};
use http::{HeaderName, HeaderValue};

/// Attach the bearer token the operation kind calls for.
///
/// | kind            | token attached     |
/// |-----------------|--------------------|
/// | install         | none               |
/// | register-device | installation token |
/// | create-session  | installation token |
/// | anything else   | session token      |
///
/// A missing or empty required token is a usage error: the caller skipped a
/// bootstrap step, so the failure propagates immediately and is never
/// retried.
pub fn authenticate(req: ApiRequest, client: &Client) -> Result<ApiRequest> {
    let token = match req.kind {
        OperationKind::Install => return Ok(req),
        OperationKind::RegisterDevice | OperationKind::CreateSession => client
            .installation_token()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::credential_missing(
                    "operation requires an installation token; run the install call first",
                )
            })?,
        OperationKind::Other => client
            .session_token()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::credential_missing(
                    "operation requires a session token; create a session first",
                )
            })?,
    };

    let mut value = HeaderValue::from_str(token)?;
    value.set_sensitive(true);

    Ok(req.prepend_header(
        HeaderName::from_static(HEADER_CLIENT_AUTHENTICATION),
        value,
    ))
}
