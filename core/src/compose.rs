use crate::constants::{
    HEADER_CLIENT_REQUEST_ID, HEADER_GEOLOCATION, HEADER_LANGUAGE, HEADER_REGION,
};
use crate::{ApiRequest, Client};
use http::header::{CACHE_CONTROL, USER_AGENT};
use http::{HeaderName, HeaderValue};
use uuid::Uuid;

/// Attach the client's default headers and the library-wide defaults.
///
/// Headers are concatenated in precedence order: the request's own headers
/// first, then the client defaults, then the library defaults (user agent,
/// cache control, locale, region, a fresh correlation id, and the
/// geolocation placeholder). Nothing is deduplicated; the canonical sort at
/// signing time fixes the signed order.
///
/// The correlation id is the only source of randomness in the pipeline and
/// is drawn fresh per call, so composing the same request twice never yields
/// the same header set.
pub fn compose(mut req: ApiRequest, client: &Client) -> ApiRequest {
    req.headers.extend(client.default_headers().iter().cloned());

    req.headers.push((USER_AGENT, client.user_agent().clone()));
    req.headers
        .push((CACHE_CONTROL, HeaderValue::from_static("no-cache")));
    req.headers.push((
        HeaderName::from_static(HEADER_LANGUAGE),
        client.language().clone(),
    ));
    req.headers.push((
        HeaderName::from_static(HEADER_REGION),
        client.region().clone(),
    ));
    req.headers.push((
        HeaderName::from_static(HEADER_CLIENT_REQUEST_ID),
        request_id(),
    ));
    req.headers.push((
        HeaderName::from_static(HEADER_GEOLOCATION),
        client.geolocation().clone(),
    ));

    req
}

fn request_id() -> HeaderValue {
    HeaderValue::try_from(Uuid::new_v4().to_string()).expect("uuid is a valid header value")
}
