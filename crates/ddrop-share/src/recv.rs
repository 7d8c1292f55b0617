//! Receive path: decode → retrieve → decrypt → deliver

use std::sync::Arc;

use tokio::sync::watch;

use ddrop_core::{ShareError, ShareResult};
use ddrop_crypto::DerivedKey;
use ddrop_link::ShareLink;
use ddrop_store::ObjectStore;

use crate::deliver::Deliver;
use crate::message::user_message;
use crate::phase::RecvPhase;

/// One receive operation, owning its phase channel.
pub struct RecvOp {
    phase: Arc<watch::Sender<RecvPhase>>,
}

impl RecvOp {
    pub fn new() -> (Self, watch::Receiver<RecvPhase>) {
        let (tx, rx) = watch::channel(RecvPhase::Idle);
        (
            Self {
                phase: Arc::new(tx),
            },
            rx,
        )
    }

    /// Decode a pasted link or fragment without touching the network.
    ///
    /// On success the operation moves to `AwaitingConfirmation` — the
    /// receiver sees the filename and decides whether to download. A
    /// malformed fragment fails here, before any network call.
    pub fn inspect(&self, pasted: &str) -> ShareResult<ShareLink> {
        let fragment = ddrop_link::extract_fragment(pasted);
        match ddrop_link::decode(fragment) {
            Ok(link) => {
                self.phase.send_replace(RecvPhase::AwaitingConfirmation {
                    filename: link.filename.clone(),
                });
                Ok(link)
            }
            Err(err) => {
                tracing::warn!(error = %err, "rejected share link");
                self.phase.send_replace(RecvPhase::Failed {
                    message: user_message(&err),
                });
                Err(err)
            }
        }
    }

    /// Retrieve, decrypt, and deliver. On success the delivery capability's
    /// `clear_fragment` is invoked so the consumed link cannot be
    /// accidentally resubmitted.
    pub async fn run<S: ObjectStore>(
        self,
        store: &S,
        link: ShareLink,
        deliver: &dyn Deliver,
    ) -> ShareResult<()> {
        let filename = link.filename.clone();
        match self.drive(store, link, deliver).await {
            Ok(()) => {
                self.phase.send_replace(RecvPhase::Delivered { filename });
                Ok(())
            }
            Err(err) => {
                // A consumed link replay is the expected end of a drop's
                // lifecycle, not a system fault
                match &err {
                    ShareError::NotFoundOrAlreadyConsumed => {
                        tracing::info!("link already consumed or expired")
                    }
                    other => tracing::warn!(error = %other, "receive operation failed"),
                }
                self.phase.send_replace(RecvPhase::Failed {
                    message: user_message(&err),
                });
                Err(err)
            }
        }
    }

    async fn drive<S: ObjectStore>(
        &self,
        store: &S,
        link: ShareLink,
        deliver: &dyn Deliver,
    ) -> ShareResult<()> {
        self.phase.send_replace(RecvPhase::Retrieving);
        let blob = store.retrieve(&link.id).await?;

        self.phase.send_replace(RecvPhase::Decrypting);
        let key = DerivedKey::from_bytes(link.key);
        let payload = tokio::task::spawn_blocking(move || ddrop_crypto::open(&blob, &key))
            .await
            .map_err(|e| anyhow::anyhow!("decryption task panicked: {e}"))??;

        deliver.deliver(&payload, &link.filename)?;
        deliver.clear_fragment();
        Ok(())
    }
}
