use crate::constants::{HEADER_PREFIX, HEADER_SERVER_SIGNATURE};
use crate::request::canonical_header_block;
use crate::{Client, Error, Result};
use base64::{engine::general_purpose, Engine as _};
use http::{HeaderMap, StatusCode};
use log::debug;
use rsa::pkcs1v15::Signature;
use rsa::signature::Verifier;

/// Verify the server signature over a received response.
///
/// Without a configured server public key the response passes through
/// unchanged: callers opt into verification by supplying a key. With a key,
/// a present signature header is checked against [`verifiable_bytes`]; a
/// mismatch fails the whole call, since it means the response was tampered
/// with in transit or the key is wrong. A response without a signature
/// header passes through — not every response is signed — unless the client
/// was built with `require_signed_responses`.
///
/// Verification runs over the raw body bytes, before any decoding, so a
/// tampered-but-undecodable body still fails here first.
pub fn verify(client: &Client, status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Result<()> {
    let Some(server_key) = client.server_key() else {
        return Ok(());
    };

    let Some(signature) = headers.get(HEADER_SERVER_SIGNATURE) else {
        if client.require_signed_responses() {
            return Err(Error::signature_invalid(
                "response carries no server signature",
            ));
        }
        return Ok(());
    };

    let signature = general_purpose::STANDARD
        .decode(signature.to_str()?)
        .map_err(|e| {
            Error::signature_invalid("server signature is not valid base64").with_source(e)
        })?;
    let signature = Signature::try_from(signature.as_slice())
        .map_err(|e| Error::signature_invalid("server signature is malformed").with_source(e))?;

    let verifiable = verifiable_bytes(status, headers, body)?;
    debug!(
        "verifiable response string: {}",
        String::from_utf8_lossy(&verifiable)
    );

    server_key.verify(&verifiable, &signature).map_err(|e| {
        Error::signature_invalid(
            "server signature does not match the response: \
             the response was tampered with or the configured server key is wrong",
        )
        .with_source(e)
    })
}

/// Exact bytes covered by the server signature.
///
/// Layout mirrors request signing: the status code in decimal, a newline,
/// the canonical header block over every protocol-prefixed header except the
/// signature header itself, a blank line, then the raw body bytes.
pub(crate) fn verifiable_bytes(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Vec<u8>> {
    let mut signed = Vec::new();
    for (name, value) in headers {
        if name.as_str().starts_with(HEADER_PREFIX) && name.as_str() != HEADER_SERVER_SIGNATURE {
            signed.push((name.as_str().to_string(), value.to_str()?.to_string()));
        }
    }
    let block = canonical_header_block(signed);

    let mut bytes = Vec::with_capacity(block.len() + body.len() + 8);
    bytes.extend_from_slice(status.as_str().as_bytes());
    bytes.push(b'\n');
    bytes.extend_from_slice(block.as_bytes());
    bytes.extend_from_slice(b"\n\n");
    bytes.extend_from_slice(body);

    Ok(bytes)
}
