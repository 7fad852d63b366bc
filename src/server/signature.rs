//! HMAC-SHA256 signatures carried in the `x-hub-signature` header.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-hub-signature";
const SIGNATURE_PREFIX: &str = "sha256=";

/// Header value the sender is expected to attach to `body`.
///
/// `None` only if the MAC rejects the key, which HMAC-SHA256 never does.
#[must_use]
pub fn sign(body: &[u8], secret: &str) -> Option<String> {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return None;
    };
    mac.update(body);
    Some(format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Compares the whole header value in constant time, prefix included.
#[must_use]
pub fn verify(body: &[u8], signature: &str, secret: &str) -> bool {
    let Some(expected) = sign(body, secret) else {
        return false;
    };
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}
