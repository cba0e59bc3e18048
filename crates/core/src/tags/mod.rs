//! Tag bridge: format-agnostic reading and writing of metadata tags.
//!
//! The pipeline only ever calls a bridge in the order read-or-construct,
//! update, save, and treats every failure as fatal for the file's tag step.

mod error;
mod lofty_bridge;
mod traits;
mod types;

pub use error::TagError;
pub use lofty_bridge::LoftyTagBridge;
pub use traits::TagBridge;
pub use types::{keys, TagSet};
