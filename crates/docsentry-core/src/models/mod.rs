//! Data models for the ingestion pipeline
//!
//! Every value here lives for a single ingestion call; nothing is shared
//! between files or persisted.

mod extraction;
mod threat;
mod upload;

pub use extraction::*;
pub use threat::*;
pub use upload::*;
