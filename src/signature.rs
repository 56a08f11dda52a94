//! Webhook request signing
//!
//! Bots with "signature verification" enabled must send `timestamp` and
//! `sign` with every request. The signature is an HMAC-SHA256 whose *key* is
//! `"{timestamp}\n{secret}"` over an empty message, base64 encoded.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Sign a request timestamp (Unix seconds) with the bot secret
///
/// # Errors
///
/// Returns [`Error::Signature`] if the MAC cannot be keyed
pub fn sign(timestamp: i64, secret: &str) -> Result<String> {
    let key = format!("{timestamp}\n{secret}");
    let mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| Error::Signature(format!("invalid key: {e}")))?;
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
