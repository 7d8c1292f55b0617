//! ddrop-share: the orchestrated send and receive flows
//!
//! One operation = one async task with strictly sequential stages. The send
//! path walks `Idle → Encrypting → Uploading → LinkReady`; the receive path
//! walks `Idle → AwaitingConfirmation → Retrieving → Decrypting →
//! Delivered`. Every non-terminal state can fall into the shared `Failed`
//! terminal, which carries the one user-facing message for whatever went
//! wrong and always leaves the system able to start a fresh operation.
//!
//! Each operation owns its phase channel, salt, nonce, and key — nothing is
//! shared or cached across operations, so concurrent sends and receives
//! never interfere.

pub mod deliver;
pub mod message;
pub mod phase;
pub mod recv;
pub mod send;

pub use deliver::{Deliver, FsDeliver};
pub use message::user_message;
pub use phase::{RecvPhase, SendPhase};
pub use recv::RecvOp;
pub use send::{SendOp, SendOutcome};
