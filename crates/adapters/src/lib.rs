//! postfeed adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `ghost`: Ghost Content API adapter (REST)
//! - `hashnode`: Hashnode GraphQL adapter
//! - `notion`: Notion database-as-CMS adapter
//! - `stub`: Deterministic in-memory source for tests and offline runs
//! - `cache`: Caching decorator with in-flight request de-duplication
//!
//! Exactly one provider adapter is active per deployment; they are
//! interchangeable strategies behind `ContentSource`, selected at
//! construction time.

pub mod cache;
pub mod ghost;
pub mod hashnode;
mod normalize;
pub mod notion;
pub mod stub;

pub use cache::CachedContentSource;
pub use ghost::GhostContentSource;
pub use hashnode::HashnodeContentSource;
pub use notion::NotionContentSource;
pub use stub::StubContentSource;
