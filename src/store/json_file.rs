use std::path::PathBuf;
use tokio::fs;

use crate::error::LedgerError;
use crate::store::Store;
use crate::types::Expense;

/// Store backed by one pretty-printed JSON array file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`. Creates parent directories and an empty `[]` file if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, LedgerError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        if !fs::try_exists(&file_path).await? {
            fs::write(&file_path, b"[]").await?;
        }
        Ok(Self { file_path })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.file_path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[ractor::async_trait]
impl Store for JsonFileStore {
    async fn load(&self) -> Result<Vec<Expense>, LedgerError> {
        let bytes = fs::read(&self.file_path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn persist(&self, expenses: &[Expense]) -> Result<(), LedgerError> {
        let data = serde_json::to_vec_pretty(expenses)?;
        // rename is atomic on the same filesystem; readers see old or new, never half
        let tmp = self.temp_path();
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &self.file_path).await?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.file_path.display())
    }
}
