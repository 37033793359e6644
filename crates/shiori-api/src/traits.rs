//! The metadata service seam.
//!
//! The entry point only talks to this trait, so the concrete AniList client can be swapped
//! for a fake in tests.

use std::future::Future;

use crate::models::{Candidate, Category, MediaRecord};

/// A remote catalogue that can be searched and queried for full records.
pub trait MetadataService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Search for records of one category by free text. Returns at most one page of hits.
    fn search(
        &self,
        category: Category,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Candidate>, Self::Error>> + Send;

    /// Fetch the full record for a search hit.
    fn fetch_details(
        &self,
        id: u64,
    ) -> impl Future<Output = Result<MediaRecord, Self::Error>> + Send;
}
