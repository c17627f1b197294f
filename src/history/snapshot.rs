use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs as async_fs;
use crate::error::{Error, Result};
use crate::history::MarketChart;

/// Snapshot Store - Day-bucketed chart files on local disk
///
/// ## Format
/// - **Serialization**: JSON of [`MarketChart`]
/// - **Naming Convention**: `{date}_{coin}.json`, date as `YYYY-MM-DD` (UTC)
///
/// ## Atomicity
/// - **Write**: serialized to a temp file unique to the write
///   (`{name}.{pid}-{seq}.tmp`), then renamed over the final path. Concurrent
///   writers of the same day and coin never share a temp file; the last
///   rename wins.
/// - **Read**: a file that fails to parse is reported, never half-returned
///
/// ## Retention
/// None. Old days stay on disk until removed by hand.
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

pub struct SnapshotStore {
    snapshot_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(snapshot_dir: impl AsRef<Path>) -> Self {
        SnapshotStore {
            snapshot_dir: snapshot_dir.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self, date: &str, coin: &str) -> PathBuf {
        self.snapshot_dir.join(format!("{}_{}.json", date, coin))
    }

    pub async fn exists(&self, date: &str, coin: &str) -> bool {
        async_fs::try_exists(self.path(date, coin))
            .await
            .unwrap_or(false)
    }

    pub async fn load(&self, date: &str, coin: &str) -> Result<MarketChart> {
        let data = async_fs::read(self.path(date, coin)).await?;

        serde_json::from_slice(&data)
            .map_err(|e| Error::DeserializationError(e.to_string()))
    }

    pub async fn save(&self, date: &str, coin: &str, chart: &MarketChart) -> Result<()> {
        async_fs::create_dir_all(&self.snapshot_dir).await?;

        let data = serde_json::to_vec(chart)
            .map_err(|e| Error::SerializationError(e.to_string()))?;

        let filepath = self.path(date, coin);
        let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp_path = filepath.with_extension(format!("json.{}-{}.tmp", std::process::id(), seq));
        async_fs::write(&tmp_path, data).await?;
        if let Err(e) = async_fs::rename(&tmp_path, &filepath).await {
            let _ = async_fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        tracing::info!("Saved chart snapshot to {:?}", filepath);
        Ok(())
    }
}
