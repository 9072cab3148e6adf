use std::path::{Path, PathBuf};
use anyhow::Context;
use rusqlite::{params, Connection};
use rusqlite::types::Type;
use crate::store::Store;
use crate::transaction::{DATE_TIME_FORMAT, Kind, Transaction};
use crate::util::parse_date;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS transactions (
      id INTEGER PRIMARY KEY,
      date TEXT NOT NULL,
      type TEXT NOT NULL,
      category TEXT NOT NULL,
      amount REAL NOT NULL,
      description TEXT NOT NULL DEFAULT ''
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions (date);
"#;

/// Transactions kept in a sqlite database, table `transactions`.
pub(crate) struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    pub(crate) fn open(path: &Path) -> anyhow::Result<SqliteStore> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Unable to open database {}", path.display()))?;
        SqliteStore::init(conn, path)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> anyhow::Result<SqliteStore> {
        SqliteStore::init(Connection::open_in_memory()?, Path::new(":memory:"))
    }

    fn init(conn: Connection, path: &Path) -> anyhow::Result<SqliteStore> {
        conn.execute_batch(SCHEMA)
            .with_context(|| format!("Unable to initialise schema in {}", path.display()))?;
        Ok(SqliteStore { conn, path: path.to_path_buf() })
    }
}

/// Wrap a conversion failure of column `index` the way rusqlite reports them
fn conversion_error<E: std::error::Error + Send + Sync + 'static>(index: usize, e: E) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
}

impl Store for SqliteStore {
    fn load(&mut self) -> anyhow::Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, type, category, amount, description FROM transactions ORDER BY date, id")?;

        let rows = stmt.query_map([], |row| {
            let date: String = row.get(1)?;
            let date = parse_date(&date).ok_or_else(|| rusqlite::Error::InvalidColumnType(1, "date".into(), Type::Text))?;
            let kind: String = row.get(2)?;
            let kind = kind.parse::<Kind>().map_err(|e| conversion_error(2, e))?;
            let category: String = row.get(3)?;
            let description: String = row.get(5)?;
            Ok(Transaction::new(row.get(0)?, date, kind, &category, row.get(4)?, &description))
        })?;

        let mut transactions = Vec::new();
        for t in rows {
            transactions.push(t.with_context(|| format!("Invalid row in {}", self.path.display()))?);
        }
        Ok(transactions)
    }

    fn append(&mut self, t: &Transaction) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO transactions (id, date, type, category, amount, description) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![t.id, t.date.format(DATE_TIME_FORMAT).to_string(), t.kind.to_string(), t.category, t.amount, t.description],
        ).with_context(|| format!("Unable to save transaction {} to {}", t.id, self.path.display()))?;
        Ok(())
    }

    fn delete(&mut self, ids: &[u32]) -> anyhow::Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("DELETE FROM transactions WHERE id = ?1")?;
            for id in ids {
                stmt.execute(params![id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
