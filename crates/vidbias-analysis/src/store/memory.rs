use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{AnalysisStore, Lookup};
use crate::error::StoreError;
use crate::identify::VideoId;
use crate::types::{NewVideoAnalysis, VideoAnalysisRecord};

/// Process-local store, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryAnalysisStore {
    records: RwLock<HashMap<String, VideoAnalysisRecord>>,
}

impl MemoryAnalysisStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn lookup(&self, video_id: &VideoId) -> Result<Lookup, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .get(video_id.as_str())
            .cloned()
            .map_or(Lookup::Missing, Lookup::Found))
    }

    async fn insert(&self, analysis: NewVideoAnalysis) -> Result<VideoAnalysisRecord, StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&analysis.video_id) {
            return Err(StoreError::DuplicateKey {
                video_id: analysis.video_id,
            });
        }
        let record = VideoAnalysisRecord::from_new(analysis, Utc::now());
        records.insert(record.video_id.clone(), record.clone());
        Ok(record)
    }
}
