//! Commit hand-off to the downstream collaborator.

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use import_model::ProjectedRecord;

/// Errors reported by a [`CommitSink`].
#[derive(Debug, Error)]
pub enum CommitError {
    /// The collaborator refused the batch.
    #[error("commit rejected: {0}")]
    Rejected(String),

    /// The collaborator failed while handling the batch.
    #[error("commit failed: {source}")]
    Failed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CommitError {
    pub fn failed(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Failed {
            source: source.into(),
        }
    }
}

/// Final record set for one import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitBatch {
    /// Mapped or defaulted fields, in catalog order.
    pub fields: Vec<String>,
    /// One projected record per uploaded row, in upload order.
    pub records: Vec<ProjectedRecord>,
}

impl CommitBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Downstream collaborator that receives the final records.
///
/// Resolves once with success or failure; there is no partial
/// acknowledgement.
pub trait CommitSink {
    fn commit(&mut self, batch: CommitBatch) -> impl Future<Output = Result<(), CommitError>> + Send;
}

/// Proof that a commit was started; hand it back to
/// [`ImportSession::finish_commit`](crate::ImportSession::finish_commit).
#[derive(Debug)]
#[must_use = "a started commit stays pending until finished"]
pub struct CommitTicket {
    pub(crate) id: u64,
    batch: CommitBatch,
}

impl CommitTicket {
    pub(crate) fn new(id: u64, batch: CommitBatch) -> Self {
        Self { id, batch }
    }

    pub fn batch(&self) -> &CommitBatch {
        &self.batch
    }

    /// Takes the batch out, leaving an empty one behind.
    pub fn take_batch(&mut self) -> CommitBatch {
        CommitBatch {
            fields: std::mem::take(&mut self.batch.fields),
            records: std::mem::take(&mut self.batch.records),
        }
    }
}

/// Result of [`ImportSession::commit`](crate::ImportSession::commit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    /// The sink accepted `records` records.
    Committed { records: usize },
    /// Not in preview, or another commit is still pending.
    Skipped,
}
