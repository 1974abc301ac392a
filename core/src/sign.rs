use crate::constants::{HEADER_CLIENT_SIGNATURE, HEADER_PREFIX};
use crate::request::canonical_header_block;
use crate::{ApiRequest, Client, Error, OperationKind, Result};
use base64::{engine::general_purpose, Engine as _};
use http::header::{CACHE_CONTROL, USER_AGENT};
use http::{HeaderName, HeaderValue};
use log::debug;
use rsa::signature::{SignatureEncoding, Signer};

/// Attach the request signature header.
///
/// The install call is the bootstrap that registers the key pair, so it goes
/// out with an empty signature. Every other request is signed with the
/// client private key over [`signable_bytes`], and the base64 signature is
/// prepended as the signature header.
///
/// Signing must be the last change to the request: any header attached after
/// this point would not be covered by the signature.
pub fn sign(req: ApiRequest, client: &Client) -> Result<ApiRequest> {
    if req.kind == OperationKind::Install {
        return Ok(req.prepend_header(
            HeaderName::from_static(HEADER_CLIENT_SIGNATURE),
            HeaderValue::from_static(""),
        ));
    }

    let signable = signable_bytes(&req)?;
    debug!(
        "signable request string: {}",
        String::from_utf8_lossy(&signable)
    );

    let signature = client
        .signing_key()
        .try_sign(&signable)
        .map_err(|e| Error::unexpected("failed to sign request").with_source(e))?;
    let encoded = general_purpose::STANDARD.encode(signature.to_bytes());

    let mut value = HeaderValue::from_str(&encoded)?;
    value.set_sensitive(true);

    Ok(req.prepend_header(HeaderName::from_static(HEADER_CLIENT_SIGNATURE), value))
}

/// Exact bytes covered by the request signature.
///
/// Layout: uppercased method, one space, the path, a newline, the canonical
/// header block over the signed subset (cache-control, user-agent, and every
/// protocol-prefixed header), a blank line, then the body. Deterministic for
/// fixed inputs, which is what makes signatures testable against fixed keys.
pub(crate) fn signable_bytes(req: &ApiRequest) -> Result<Vec<u8>> {
    let mut signed = Vec::new();
    for (name, value) in &req.headers {
        if is_signed_header(name) {
            signed.push((name.as_str().to_string(), value.to_str()?.to_string()));
        }
    }
    let block = canonical_header_block(signed);

    let mut bytes =
        Vec::with_capacity(req.path.len() + block.len() + req.body.len() + 16);
    bytes.extend_from_slice(req.method.as_str().as_bytes());
    bytes.push(b' ');
    bytes.extend_from_slice(req.path.as_bytes());
    bytes.push(b'\n');
    bytes.extend_from_slice(block.as_bytes());
    bytes.extend_from_slice(b"\n\n");
    bytes.extend_from_slice(&req.body);

    Ok(bytes)
}

fn is_signed_header(name: &HeaderName) -> bool {
    *name == CACHE_CONTROL || *name == USER_AGENT || name.as_str().starts_with(HEADER_PREFIX)
}
