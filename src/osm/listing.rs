//! Cursor-follow pagination over a user's changesets.
//!
//! This loop has no failure-recovery contract of its own: the first error
//! aborts the whole listing and propagates to the caller.

use super::error::ApiError;
use super::gateway::OsmGateway;
use super::models::Changeset;

/// Page size of the changesets listing endpoint.
pub const PAGE_SIZE: usize = 100;

/// Orders changesets newest-closed first and extracts their ids.
///
/// Open changesets (no close time) sort last. The result is ready to be
/// written as a queue file seed.
#[must_use]
pub fn ids_newest_first(mut changesets: Vec<Changeset>) -> Vec<u64> {
    changesets.sort_by_key(|changeset| std::cmp::Reverse(changeset.closed_at));
    changesets.into_iter().map(|changeset| changeset.id).collect()
}

/// Fetches every changeset of a user by following the `time` upper bound.
///
/// Each page is bounded above by the `created_at` of the previous page's last
/// entry; the loop stops when a page holds fewer than [`PAGE_SIZE`] entries.
///
/// # Errors
///
/// Propagates the first [`ApiError`] unchanged; no retries are attempted.
pub async fn list_all_changesets<Gateway>(
    gateway: &Gateway,
    user: u64,
) -> Result<Vec<Changeset>, ApiError>
where
    Gateway: OsmGateway + ?Sized,
{
    let mut all = Vec::new();
    let mut created_before = None;

    loop {
        let page = gateway.changesets_page(user, created_before).await?;
        let page_len = page.len();
        let oldest = page.last().map(|changeset| changeset.created_at);
        all.extend(page);

        if page_len < PAGE_SIZE {
            break;
        }
        created_before = oldest;
    }

    Ok(all)
}
