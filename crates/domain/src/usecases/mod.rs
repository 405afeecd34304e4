//! Consumer-facing use cases

pub mod feed;

pub use feed::{FeedController, FeedState};
