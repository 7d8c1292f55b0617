//! Explicit operation phases, published through a per-operation watch channel

/// Phase of one send operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendPhase {
    Idle,
    Encrypting,
    /// Upload in flight; percent is a non-decreasing value in `[0,100]`
    Uploading { percent: u8 },
    /// Terminal: the share link fragment is ready to hand to the sender
    LinkReady { fragment: String },
    /// Terminal: the operation failed with a user-facing message
    Failed { message: String },
}

/// Phase of one receive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecvPhase {
    Idle,
    /// Fragment decoded; waiting for the receiver to confirm the download
    AwaitingConfirmation { filename: String },
    Retrieving,
    Decrypting,
    /// Terminal: payload handed to the delivery capability
    Delivered { filename: String },
    /// Terminal: the operation failed with a user-facing message
    Failed { message: String },
}

impl SendPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SendPhase::LinkReady { .. } | SendPhase::Failed { .. })
    }
}

impl RecvPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecvPhase::Delivered { .. } | RecvPhase::Failed { .. })
    }
}
