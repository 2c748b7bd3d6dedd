//! Append-only JSON Lines audit sink.
//!
//! One record per line. Each write is flushed and `sync_data`'d before the
//! call returns, so a verdict is only released once it is on disk.
//!
//! Writes run on a spawned task that owns the writer state. A caller that
//! stops waiting (an attempt timeout) does not interrupt the write; the task
//! still finishes and remembers the evaluation id, and the retry that follows
//! finds the id and skips.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::application::ports::{AuditError, AuditRecord, AuditRecorderPort};

/// Evaluation ids remembered for duplicate suppression.
const RECENT_IDS_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
struct WriterState {
    file: Option<File>,
    recent: VecDeque<String>,
    recent_set: HashSet<String>,
}

impl WriterState {
    fn remember(&mut self, evaluation_id: &str) {
        let overflow = (self.recent.len() + 1).saturating_sub(RECENT_IDS_CAPACITY);
        for oldest in self.recent.drain(..overflow) {
            self.recent_set.remove(&oldest);
        }
        self.recent.push_back(evaluation_id.to_string());
        self.recent_set.insert(evaluation_id.to_string());
    }

    async fn append(
        &mut self,
        path: &Path,
        evaluation_id: &str,
        line: &[u8],
    ) -> Result<(), AuditError> {
        if self.recent_set.contains(evaluation_id) {
            tracing::debug!(evaluation_id, "Audit record already written, skipping duplicate");
            return Ok(());
        }

        let mut file = match self.file.take() {
            Some(file) => file,
            None => open(path).await?,
        };

        let written = async {
            file.write_all(line).await?;
            file.flush().await?;
            file.sync_data().await
        }
        .await;

        match written {
            Ok(()) => {
                self.file = Some(file);
                self.remember(evaluation_id);
                Ok(())
            }
            // handle is dropped and reopened on the next write
            Err(e) => Err(AuditError::WriteFailed(format!("write {}: {e}", path.display()))),
        }
    }
}

async fn open(path: &Path) -> Result<File, AuditError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AuditError::WriteFailed(format!("create {}: {e}", parent.display())))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| AuditError::WriteFailed(format!("open {}: {e}", path.display())))
}

/// Durable audit recorder writing JSON Lines to a local file.
#[derive(Debug)]
pub struct JsonlAuditRecorder {
    path: PathBuf,
    state: Arc<Mutex<WriterState>>,
}

impl JsonlAuditRecorder {
    /// Create a recorder for `path`. The file and its parent directory are
    /// created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Arc::new(Mutex::new(WriterState::default())),
        }
    }

    /// Target file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditRecorderPort for JsonlAuditRecorder {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut line =
            serde_json::to_vec(record).map_err(|e| AuditError::Serialization(e.to_string()))?;
        line.push(b'\n');

        let state = Arc::clone(&self.state);
        let path = self.path.clone();
        let evaluation_id = record.evaluation_id.clone();
        let write = tokio::spawn(async move {
            let mut state = state.lock().await;
            state.append(&path, &evaluation_id, &line).await
        });

        write
            .await
            .map_err(|e| AuditError::WriteFailed(format!("audit writer task failed: {e}")))?
    }
}
