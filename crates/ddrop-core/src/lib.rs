pub mod config;
pub mod error;

pub use config::DdropConfig;
pub use error::{ShareError, ShareResult};
