//! ddrop-link: share-link fragment codec
//!
//! A share link carries everything a receiver needs inside a URL fragment,
//! which browsers and HTTP clients never send to any server:
//! ```text
//! <id>/<base64url(key), no padding>/<percent-encoded filename>
//! ```
//! There is no `/` ambiguity: the identifier is forbidden to contain `/`,
//! and both the base64url and percent-encoding alphabets exclude it. This
//! encoding is the one wire-exposed artifact that must stay bit-exact so
//! previously generated links keep working.
//!
//! Decoding is pure — it performs no I/O and rejects malformed fragments
//! before any network call happens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use ddrop_core::{ShareError, ShareResult};
use ddrop_crypto::KEY_SIZE;

/// Filename used when the link's filename segment is empty
pub const DEFAULT_FILENAME: &str = "download";

/// Escape everything a URL component escape would, mirroring the JS
/// `encodeURIComponent` alphabet so links interop across clients.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The decoded contents of one share link.
#[derive(Clone, PartialEq, Eq)]
pub struct ShareLink {
    /// Store-assigned opaque identifier (never contains `/`)
    pub id: String,
    /// Raw 256-bit drop key
    pub key: [u8; KEY_SIZE],
    /// Display filename for delivery
    pub filename: String,
}

impl std::fmt::Debug for ShareLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareLink")
            .field("id", &self.id)
            .field("key", &"[REDACTED]")
            .field("filename", &self.filename)
            .finish()
    }
}

/// Encode a (id, key, filename) triple as a URL fragment (no leading `#`).
pub fn encode(id: &str, key: &[u8; KEY_SIZE], filename: &str) -> String {
    let key_b64 = URL_SAFE_NO_PAD.encode(key);
    let name = utf8_percent_encode(filename, COMPONENT);
    format!("{id}/{key_b64}/{name}")
}

/// Decode a URL fragment back into its (id, key, filename) triple.
///
/// Fails with `InvalidLinkFormat` when fewer than three segments are
/// present, the identifier is empty, the key segment is not valid base64url,
/// or the decoded key is not exactly 32 bytes. An empty filename segment is
/// not an error; it falls back to [`DEFAULT_FILENAME`].
pub fn decode(fragment: &str) -> ShareResult<ShareLink> {
    let mut parts = fragment.splitn(3, '/');
    let (id, key_seg, name_seg) = match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(key), Some(name)) => (id, key, name),
        _ => {
            return Err(ShareError::InvalidLinkFormat(
                "expected <id>/<key>/<filename>".into(),
            ))
        }
    };

    if id.is_empty() {
        return Err(ShareError::InvalidLinkFormat("empty identifier".into()));
    }

    let key_bytes = URL_SAFE_NO_PAD
        .decode(key_seg)
        .map_err(|_| ShareError::InvalidLinkFormat("key segment is not base64url".into()))?;

    let key: [u8; KEY_SIZE] = key_bytes.try_into().map_err(|_| {
        ShareError::InvalidLinkFormat(format!("key must decode to {KEY_SIZE} bytes"))
    })?;

    let filename = percent_decode_str(name_seg)
        .decode_utf8_lossy()
        .into_owned();
    let filename = if filename.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        filename
    };

    Ok(ShareLink {
        id: id.to_string(),
        key,
        filename,
    })
}

/// Pull the fragment out of a pasted value: a full share URL, a
/// `#`-prefixed fragment, or a bare fragment all work.
pub fn extract_fragment(input: &str) -> &str {
    match input.split_once('#') {
        Some((_, fragment)) => fragment,
        None => input,
    }
}
