//! Delivery capability: how a decrypted payload reaches the receiver
//!
//! Delivering bytes and erasing the used fragment are both side effects of
//! the receiver's environment (a browser download prompt and the location
//! bar in the original; a directory write and nothing in the CLI), so they
//! are injected rather than baked into the orchestrator. That keeps the
//! receive flow testable without a real file-save mechanism.

use std::path::{Path, PathBuf};

use ddrop_core::ShareResult;

pub trait Deliver: Send + Sync {
    /// Hand the decrypted payload to the receiver under its display name.
    fn deliver(&self, payload: &[u8], filename: &str) -> ShareResult<()>;

    /// Erase the fragment from the receiver's visible location context so
    /// the single-use link cannot be accidentally resubmitted. Default
    /// no-op for environments with no such context.
    fn clear_fragment(&self) {}
}

/// Writes the payload into a target directory.
///
/// Only the final path component of the display name is used, so a hostile
/// link filename cannot traverse outside the target directory.
pub struct FsDeliver {
    dir: PathBuf,
}

impl FsDeliver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn safe_name(filename: &str) -> &str {
        Path::new(filename)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(ddrop_link::DEFAULT_FILENAME)
    }
}

impl Deliver for FsDeliver {
    fn deliver(&self, payload: &[u8], filename: &str) -> ShareResult<()> {
        let target = self.dir.join(Self::safe_name(filename));
        std::fs::write(&target, payload)?;
        tracing::info!(path = %target.display(), bytes = payload.len(), "payload delivered");
        Ok(())
    }
}
