mod csv_store;
mod sqlite_store;

use std::path::Path;
use log::info;
use crate::transaction::Transaction;

pub(crate) use csv_store::{CsvStore, write_csv};
pub(crate) use sqlite_store::SqliteStore;

/// Persistence backend of a ledger.
pub(crate) trait Store {
    /// Read every stored transaction
    fn load(&mut self) -> anyhow::Result<Vec<Transaction>>;

    fn append(&mut self, t: &Transaction) -> anyhow::Result<()>;

    /// Remove the transactions with the given ids. Ids not in the store are ignored.
    fn delete(&mut self, ids: &[u32]) -> anyhow::Result<()>;

    /// Where the data lives, for messages
    fn location(&self) -> &Path;
}

/// Open the store for `path`, picking the backend from the file extension.
pub(crate) fn open_store(path: &Path) -> anyhow::Result<Box<dyn Store>> {
    let extension = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "db" | "sqlite" | "sqlite3" => {
            info!("Using sqlite database {}", path.display());
            Ok(Box::new(SqliteStore::open(path)?))
        },
        _ => {
            info!("Using csv file {}", path.display());
            Ok(Box::new(CsvStore::new(path)))
        }
    }
}
