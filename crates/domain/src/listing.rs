//! Listing normalization rules shared by every provider adapter
//!
//! Adapters map raw provider rows into `Post` and then run the result
//! through `finalize_listing` so all backends honor the same contract:
//! malformed rows are dropped, drafts are excluded, ordering is
//! `published_at` descending, and the page never exceeds the requested
//! limit.

use crate::model::Post;

/// Apply the listing contract to freshly normalized posts.
///
/// Rows without an id or title are skipped silently (one bad provider row
/// must not fail the whole listing). Drafts carry no `published_at` and
/// never appear in listings.
pub fn finalize_listing(posts: Vec<Post>, limit: usize) -> Vec<Post> {
    let mut posts: Vec<Post> = posts
        .into_iter()
        .filter(|post| {
            if !post.is_well_formed() {
                tracing::debug!(slug = %post.slug, "Skipping malformed post record");
                return false;
            }
            if post.published_at.is_none() {
                tracing::debug!(slug = %post.slug, "Skipping draft post");
                return false;
            }
            true
        })
        .collect();

    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    posts.truncate(limit);
    posts
}
