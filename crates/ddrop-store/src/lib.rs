//! ddrop-store: blob storage behind the share flow
//!
//! The store holds opaque framed blobs and enforces the single-read
//! contract: a successful `retrieve` atomically deletes the object, so at
//! most one retrieval per identifier ever succeeds — two racing receivers
//! get exactly one winner. Nothing client-side de-duplicates concurrent
//! retrievals; that guarantee lives entirely in the store.

pub mod http;
pub mod memory;
pub mod store;

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use store::{ObjectStore, ProgressFn};
