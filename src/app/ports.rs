use async_trait::async_trait;

use crate::domain::RecordBatch;

/// Where a raw batch comes from
#[async_trait]
pub trait RecordSourcePort: Send + Sync {
    async fn load(&self) -> anyhow::Result<RecordBatch>;

    /// Human-readable location, used in logs
    fn describe(&self) -> String;
}

/// Where a cleaned batch goes
#[async_trait]
pub trait RecordSinkPort: Send + Sync {
    async fn store(&self, batch: &RecordBatch) -> anyhow::Result<()>;

    fn describe(&self) -> String;
}
