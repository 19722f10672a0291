use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::app::ports::{RecordSinkPort, RecordSourcePort};
use crate::domain::RecordBatch;

/// In-memory source and sink; clones share the same state
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    input: Arc<Mutex<Option<RecordBatch>>>,
    stored: Arc<Mutex<Vec<RecordBatch>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(batch: RecordBatch) -> Self {
        Self {
            input: Arc::new(Mutex::new(Some(batch))),
            stored: Arc::default(),
        }
    }

    /// Every batch handed to `store`, oldest first
    pub async fn stored(&self) -> Vec<RecordBatch> {
        self.stored.lock().await.clone()
    }
}

#[async_trait]
impl RecordSourcePort for InMemoryRecordStore {
    async fn load(&self) -> anyhow::Result<RecordBatch> {
        self.input
            .lock()
            .await
            .clone()
            .ok_or_else(|| anyhow!("no input batch has been set"))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[async_trait]
impl RecordSinkPort for InMemoryRecordStore {
    async fn store(&self, batch: &RecordBatch) -> anyhow::Result<()> {
        self.stored.lock().await.push(batch.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
