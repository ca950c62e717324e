//! Call data sources
//!
//! The session never reads files itself; it is handed a [`CallTimeline`]
//! built from whatever a [`CallDataProvider`] returns.

use crate::call::CallTimeline;
use crate::error::{TimelineError, TimelineResult};
use async_trait::async_trait;
use callscope_core::{CallId, CallRecord, utils::call_file_name};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Core trait for call data sources
#[async_trait]
pub trait CallDataProvider: Send + Sync {
    /// Load the raw record of one call
    async fn load_call(&self, call_id: &str) -> TimelineResult<CallRecord>;

    /// Summaries of every call this source can load
    async fn list_calls(&self) -> TimelineResult<Vec<CallSummary>>;

    /// Get provider name
    fn name(&self) -> &str;

    /// Load a call and validate it into a timeline
    async fn open_call(&self, call_id: &str) -> TimelineResult<CallTimeline> {
        let record = self.load_call(call_id).await?;
        CallTimeline::new(record)
    }
}

/// Listing entry for one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSummary {
    /// Call identifier
    pub id: CallId,
    /// Title, if any
    pub title: Option<String>,
    /// Length in seconds
    pub total_duration: f64,
    /// Number of transcript lines
    pub lines: usize,
    /// Number of event markers
    pub markers: usize,
}

impl From<&CallRecord> for CallSummary {
    fn from(record: &CallRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            total_duration: record.total_duration,
            lines: record.transcript.len(),
            markers: record.markers.len(),
        }
    }
}

/// Reads `<dir>/<call_id>.json` documents
#[derive(Debug, Clone)]
pub struct JsonCallProvider {
    dir: PathBuf,
}

impl JsonCallProvider {
    /// Serve calls from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory being served
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_record(path: &Path) -> TimelineResult<CallRecord> {
        let contents = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[async_trait]
impl CallDataProvider for JsonCallProvider {
    async fn load_call(&self, call_id: &str) -> TimelineResult<CallRecord> {
        let path = self.dir.join(call_file_name(call_id)?);
        debug!(path = %path.display(), "reading call record");

        let record = match Self::read_record(&path).await {
            Err(TimelineError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                return Err(TimelineError::call_not_found(call_id));
            }
            other => other?,
        };
        if record.id != call_id {
            warn!(
                call_id,
                record_id = %record.id,
                "record id does not match file name"
            );
        }
        Ok(record)
    }

    async fn list_calls(&self) -> TimelineResult<Vec<CallSummary>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut summaries = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match Self::read_record(&path).await {
                Ok(record) => summaries.push(CallSummary::from(&record)),
                Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable call"),
            }
        }

        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    fn name(&self) -> &str {
        "json"
    }
}
