//! Write-once storage of analyses keyed by video id.

mod memory;
mod postgres;

use std::future::Future;

use async_trait::async_trait;

use crate::error::{AnalysisError, StoreError};
use crate::identify::VideoId;
use crate::types::{NewVideoAnalysis, VideoAnalysisRecord};

pub use memory::MemoryAnalysisStore;
pub use postgres::PgAnalysisStore;

/// Outcome of a lookup by video id.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(VideoAnalysisRecord),
    Missing,
}

/// Where a record returned by [`get_or_create`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Served from storage; nothing was computed.
    Stored,
    /// Computed and inserted by this call.
    Created,
}

/// Owner of the analysis record lifecycle.
///
/// Implementations must reject a second insert for the same video id with
/// [`StoreError::DuplicateKey`]; records are never updated.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the backend cannot be queried.
    async fn lookup(&self, video_id: &VideoId) -> Result<Lookup, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if a record for the video exists,
    /// or [`StoreError::Backend`] for any other failure.
    async fn insert(&self, analysis: NewVideoAnalysis) -> Result<VideoAnalysisRecord, StoreError>;
}

/// Return the stored record for `video_id`, or run `compute` and insert its result.
///
/// `compute` is not invoked on a hit. A writer that loses the insert race
/// gets [`AnalysisError::DuplicateKeyConflict`] and should call
/// [`AnalysisStore::lookup`] to read the winner's record.
///
/// # Errors
///
/// Propagates errors from `compute`, and maps store failures via
/// `From<StoreError> for AnalysisError`.
pub async fn get_or_create<F, Fut>(
    store: &dyn AnalysisStore,
    video_id: &VideoId,
    compute: F,
) -> Result<(VideoAnalysisRecord, Provenance), AnalysisError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<NewVideoAnalysis, AnalysisError>>,
{
    if let Lookup::Found(record) = store.lookup(video_id).await? {
        return Ok((record, Provenance::Stored));
    }

    let analysis = compute().await?;
    match store.insert(analysis).await {
        Ok(record) => Ok((record, Provenance::Created)),
        Err(StoreError::DuplicateKey { video_id }) => {
            tracing::warn!(video_id = %video_id, "lost insert race for video");
            Err(AnalysisError::DuplicateKeyConflict { video_id })
        }
        Err(other) => Err(other.into()),
    }
}
