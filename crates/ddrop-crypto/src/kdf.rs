//! Key derivation: Argon2id passphrase → drop key

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{KEY_SIZE, SALT_SIZE};

/// The 256-bit symmetric key protecting one drop.
///
/// Derived from (passphrase, salt) at seal time and exported as raw bytes
/// inside the share link — the receiver needs this key, not the passphrase.
/// Zeroized on drop to prevent secrets lingering in memory.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    /// Reconstruct a key from the raw bytes carried in a share link.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DerivedKey").field(&"[REDACTED]").finish()
    }
}

/// Argon2id cost parameters
#[derive(Debug, Clone)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub mem_cost_kib: u32,
    /// Time cost / iterations (default: 3)
    pub time_cost: u32,
    /// Parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            mem_cost_kib: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl From<&ddrop_core::config::CryptoConfig> for KdfParams {
    fn from(cfg: &ddrop_core::config::CryptoConfig) -> Self {
        Self {
            mem_cost_kib: cfg.argon2_mem_cost_kib,
            time_cost: cfg.argon2_time_cost,
            parallelism: cfg.argon2_parallelism,
        }
    }
}

/// Generate a fresh random salt for one seal operation.
///
/// The salt is not secret; it rides in the frame header so the blob stays
/// self-describing.
pub fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

fn hasher(params: &KdfParams) -> ddrop_core::ShareResult<Argon2<'static>> {
    let costs = Params::new(
        params.mem_cost_kib,
        params.time_cost,
        params.parallelism,
        Some(KEY_SIZE),
    )
    .map_err(|e| anyhow::anyhow!("unusable KDF cost parameters: {e}"))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, costs))
}

/// Derive a 256-bit drop key from a passphrase and salt using Argon2id.
///
/// Deterministic for identical inputs. Whether an empty passphrase is
/// acceptable is the caller's policy; it is not rejected here.
pub fn derive_key(
    passphrase: &SecretString,
    salt: &[u8; SALT_SIZE],
    params: &KdfParams,
) -> ddrop_core::ShareResult<DerivedKey> {
    let mut key = [0u8; KEY_SIZE];
    hasher(params)?
        .hash_password_into(passphrase.expose_secret().as_bytes(), salt, &mut key)
        .map_err(|e| anyhow::anyhow!("key derivation failed: {e}"))?;
    Ok(DerivedKey(key))
}
