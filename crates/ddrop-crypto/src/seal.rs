//! Seal/open a payload as a self-describing framed blob
//!
//! Frame: `[16B salt][12B nonce][ciphertext][16B tag]`, no associated data.
//! The frame carries no plaintext metadata worth binding — the filename
//! lives only in the share link — so the AEAD runs without AAD.
//!
//! Design note: `seal` exports the derived key so the sender can embed it in
//! the share link. Link possession alone is therefore sufficient to open the
//! blob regardless of passphrase strength; the passphrase only raises the
//! cost of attacking a captured blob *without* the link (e.g. for a
//! compromised relay operator). This is a deliberate trade-off, not a bug:
//! `open` takes the final key and never re-derives from a passphrase.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use secrecy::SecretString;

use crate::kdf::{derive_key, generate_salt, DerivedKey, KdfParams};
use crate::{NONCE_SIZE, SALT_SIZE, TAG_SIZE};

use ddrop_core::{ShareError, ShareResult};

/// Minimum length of a structurally valid frame (empty plaintext)
pub const MIN_BLOB_SIZE: usize = SALT_SIZE + NONCE_SIZE + TAG_SIZE;

/// Result of sealing one payload: the uploadable frame plus the exported key.
pub struct Sealed {
    /// `salt ‖ nonce ‖ ciphertext ‖ tag`, ready for the object store
    pub blob: Vec<u8>,
    /// The raw key the receiver needs; embedded in the share link
    pub key: DerivedKey,
}

/// Encrypt a payload under a passphrase, producing the framed blob and the
/// derived key for export.
///
/// Salt and nonce are fresh random values per call, so sealing the same
/// payload twice yields frames that differ in their first 28 bytes. Neither
/// value is ever reused with the same key.
pub fn seal(
    payload: &[u8],
    passphrase: &SecretString,
    params: &KdfParams,
) -> ShareResult<Sealed> {
    let salt = generate_salt();

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let key = derive_key(passphrase, &salt, params)?;

    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, payload)
        .map_err(|e| anyhow::anyhow!("payload encryption failed: {e}"))?;

    let mut blob = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);

    tracing::debug!(
        payload_len = payload.len(),
        blob_len = blob.len(),
        "payload sealed"
    );

    Ok(Sealed { blob, key })
}

/// Decrypt a framed blob with the supplied key.
///
/// The salt at bytes `[0,16)` is informational only — the key handed to this
/// call is already the final derived material. Fails with `MalformedBlob`
/// when the frame is shorter than the fixed header, and with
/// `DecryptionFailed` on any tag mismatch or truncation; the latter is
/// deliberately ambiguous between a wrong key and corrupted data so probing
/// blobs yields no oracle.
pub fn open(blob: &[u8], key: &DerivedKey) -> ShareResult<Vec<u8>> {
    if blob.len() < MIN_BLOB_SIZE {
        return Err(ShareError::MalformedBlob {
            len: blob.len(),
            min: MIN_BLOB_SIZE,
        });
    }

    let (_salt, rest) = blob.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| ShareError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KEY_SIZE;
    use proptest::prelude::*;

    fn fast_params() -> KdfParams {
        KdfParams {
            mem_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let passphrase = SecretString::from("correct-horse");
        let sealed = seal(b"hello world", &passphrase, &fast_params()).unwrap();
        let opened = open(&sealed.blob, &sealed.key).unwrap();

        assert_eq!(opened, b"hello world");
    }

    #[test]
    fn test_seal_open_empty_payload() {
        let passphrase = SecretString::from("pw");
        let sealed = seal(b"", &passphrase, &fast_params()).unwrap();

        assert_eq!(sealed.blob.len(), MIN_BLOB_SIZE);
        assert_eq!(open(&sealed.blob, &sealed.key).unwrap(), b"");
    }

    #[test]
    fn test_fresh_salt_and_nonce_per_seal() {
        // Same inputs, two calls: header bytes [0,28) must differ while each
        // frame still opens with its own exported key.
        let passphrase = SecretString::from("correct-horse");
        let a = seal(b"hello world", &passphrase, &fast_params()).unwrap();
        let b = seal(b"hello world", &passphrase, &fast_params()).unwrap();

        assert_ne!(
            &a.blob[..SALT_SIZE + NONCE_SIZE],
            &b.blob[..SALT_SIZE + NONCE_SIZE],
            "salt+nonce must be fresh per seal"
        );
        assert_eq!(open(&a.blob, &a.key).unwrap(), b"hello world");
        assert_eq!(open(&b.blob, &b.key).unwrap(), b"hello world");
    }

    #[test]
    fn test_open_wrong_key() {
        let sealed = seal(b"secret data", &SecretString::from("right"), &fast_params()).unwrap();
        let wrong = DerivedKey::from_bytes([0x42; KEY_SIZE]);

        let result = open(&sealed.blob, &wrong);
        assert!(matches!(result, Err(ShareError::DecryptionFailed)));
    }

    #[test]
    fn test_open_truncated_blob() {
        let sealed = seal(b"secret data", &SecretString::from("pw"), &fast_params()).unwrap();
        let truncated = &sealed.blob[..sealed.blob.len() - 1];

        let result = open(truncated, &sealed.key);
        assert!(matches!(result, Err(ShareError::DecryptionFailed)));
    }

    #[test]
    fn test_open_too_short_for_header() {
        let key = DerivedKey::from_bytes([0u8; KEY_SIZE]);

        let result = open(&[0u8; MIN_BLOB_SIZE - 1], &key);
        assert!(matches!(
            result,
            Err(ShareError::MalformedBlob { len: 43, min: 44 })
        ));
    }

    #[test]
    fn test_tamper_any_ciphertext_bit_fails() {
        let sealed = seal(b"secret data", &SecretString::from("pw"), &fast_params()).unwrap();

        // Flip one bit in every ciphertext/tag byte position in turn
        for pos in (SALT_SIZE + NONCE_SIZE)..sealed.blob.len() {
            let mut tampered = sealed.blob.clone();
            tampered[pos] ^= 0x01;

            let result = open(&tampered, &sealed.key);
            assert!(
                matches!(result, Err(ShareError::DecryptionFailed)),
                "bit flip at byte {pos} must fail authentication"
            );
        }
    }

    #[test]
    fn test_tampered_nonce_fails() {
        let sealed = seal(b"secret data", &SecretString::from("pw"), &fast_params()).unwrap();
        let mut tampered = sealed.blob.clone();
        tampered[SALT_SIZE] ^= 0xFF;

        assert!(matches!(
            open(&tampered, &sealed.key),
            Err(ShareError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_blob_layout_sizes() {
        let sealed = seal(&[0u8; 1000], &SecretString::from("pw"), &fast_params()).unwrap();

        // salt (16) + nonce (12) + plaintext (1000) + tag (16)
        assert_eq!(sealed.blob.len(), SALT_SIZE + NONCE_SIZE + 1000 + TAG_SIZE);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_roundtrip(payload in proptest::collection::vec(any::<u8>(), 0..512),
                          passphrase in "[a-zA-Z0-9 ]{0,24}") {
            let sealed = seal(&payload, &SecretString::from(passphrase), &fast_params()).unwrap();
            let opened = open(&sealed.blob, &sealed.key).unwrap();
            prop_assert_eq!(opened, payload);
        }
    }
}
