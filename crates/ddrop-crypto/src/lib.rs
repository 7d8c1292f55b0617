//! ddrop-crypto: client-side encryption for one-time file drops
//!
//! Framed blob layout (what is uploaded to the relay):
//! ```text
//! [16 bytes: random salt][12 bytes: random nonce][N bytes: ciphertext][16 bytes: Poly1305 tag]
//! ```
//!
//! The salt feeds Argon2id key derivation at seal time; the blob carries it
//! so the frame stays self-describing. Opening a blob needs only the frame
//! plus the 256-bit derived key — never the passphrase.

pub mod kdf;
pub mod seal;

pub use kdf::{derive_key, generate_salt, DerivedKey, KdfParams};
pub use seal::{open, seal, Sealed};

/// Size of a derived key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the Argon2id salt stored in the frame header
pub const SALT_SIZE: usize = 16;

/// Size of a ChaCha20-Poly1305 (IETF) nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;
