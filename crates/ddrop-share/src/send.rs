//! Send path: encrypt → upload → publish link

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use secrecy::SecretString;
use tokio::sync::watch;

use ddrop_core::{ShareError, ShareResult};
use ddrop_crypto::{seal, KdfParams, Sealed};
use ddrop_store::{ObjectStore, ProgressFn};

use crate::message::user_message;
use crate::phase::SendPhase;

/// Result of a completed send: the uploaded object id and the share-link
/// fragment. The fragment is not stored anywhere by this system — handing
/// it to the receiver is the sender's job.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub id: String,
    pub fragment: String,
    pub filename: String,
}

/// One send operation, owning its phase channel.
///
/// The operation is consumed by `run`; a failed or finished operation can
/// only be followed by constructing a brand-new one.
pub struct SendOp {
    phase: Arc<watch::Sender<SendPhase>>,
}

impl SendOp {
    pub fn new() -> (Self, watch::Receiver<SendPhase>) {
        let (tx, rx) = watch::channel(SendPhase::Idle);
        (
            Self {
                phase: Arc::new(tx),
            },
            rx,
        )
    }

    /// Drive the whole send path. The KDF and AEAD run on the blocking pool
    /// so the caller's runtime threads stay responsive; cancellation is
    /// dropping the returned future, though a completed upload is not
    /// retracted (no compensating delete exists against a single-read
    /// store).
    pub async fn run<S: ObjectStore>(
        self,
        store: &S,
        payload: Vec<u8>,
        filename: &str,
        passphrase: SecretString,
        kdf: KdfParams,
    ) -> ShareResult<SendOutcome> {
        match self.drive(store, payload, filename, passphrase, kdf).await {
            Ok(outcome) => {
                tracing::info!(id = %outcome.id, "share link ready");
                self.phase.send_replace(SendPhase::LinkReady {
                    fragment: outcome.fragment.clone(),
                });
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(error = %err, "send operation failed");
                self.phase.send_replace(SendPhase::Failed {
                    message: user_message(&err),
                });
                Err(err)
            }
        }
    }

    async fn drive<S: ObjectStore>(
        &self,
        store: &S,
        payload: Vec<u8>,
        filename: &str,
        passphrase: SecretString,
        kdf: KdfParams,
    ) -> ShareResult<SendOutcome> {
        self.phase.send_replace(SendPhase::Encrypting);
        let Sealed { blob, key } =
            tokio::task::spawn_blocking(move || seal(&payload, &passphrase, &kdf))
                .await
                .map_err(|e| anyhow::anyhow!("encryption task panicked: {e}"))??;

        self.phase.send_replace(SendPhase::Uploading { percent: 0 });
        let phase = self.phase.clone();
        let high_water = Arc::new(AtomicU8::new(0));
        let progress: ProgressFn = Arc::new(move |pct| {
            // Clamp and keep the published value monotone even if the store
            // reports out of order
            let clamped = pct.min(100);
            let prev = high_water.fetch_max(clamped, Ordering::SeqCst);
            phase.send_replace(SendPhase::Uploading {
                percent: clamped.max(prev),
            });
        });

        let id = store.store(Bytes::from(blob), Some(progress)).await?;
        if id.contains('/') {
            return Err(ShareError::Upload(
                "store returned an identifier containing '/'".into(),
            ));
        }

        let fragment = ddrop_link::encode(&id, key.as_bytes(), filename);
        Ok(SendOutcome {
            id,
            fragment,
            filename: filename.to_string(),
        })
    }
}
