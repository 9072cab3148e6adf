use std::fs;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::info;
use serde::Deserialize;
use crate::common::TrackerError;
use crate::store::Store;
use crate::transaction::{Kind, Transaction};
use crate::util::parse_date;

/// A row in the csv file. `id` is absent in files written before ids were introduced.
#[derive(Deserialize, Debug)]
struct CsvRow {
    #[serde(default)]
    id: Option<u32>,
    date: String,
    #[serde(rename = "type")]
    kind: String,
    category: String,
    amount: f64,
    #[serde(default)]
    description: String,
}

/// Transactions kept in a single csv file with columns `id,date,type,category,amount,description`.
pub(crate) struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub(crate) fn new(path: &Path) -> CsvStore {
        CsvStore { path: path.to_path_buf() }
    }

    fn read_rows(&self) -> anyhow::Result<Vec<CsvRow>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("Unable to open {}", self.path.display()))?;

        let mut rows = vec![];
        for (i, result) in rdr.deserialize::<CsvRow>().enumerate() {
            // +2 for the header row and 1-based line numbers
            let row = result.with_context(|| format!("Invalid row at line {} of {}", i + 2, self.path.display()))?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// True if appending must start with a header row
    fn needs_header(&self) -> bool {
        match fs::metadata(&self.path) {
            Ok(metadata) => metadata.len() == 0,
            Err(_) => true,
        }
    }
}

impl Store for CsvStore {
    fn load(&mut self) -> anyhow::Result<Vec<Transaction>> {
        if !self.path.exists() {
            info!("{} does not exist yet, starting with an empty ledger", self.path.display());
            return Ok(vec![]);
        }
        if self.needs_header() {
            return Ok(vec![]);
        }

        let rows = self.read_rows()?;
        // next id for rows without one, None once u32::MAX is taken
        let mut id_seed = match rows.iter().filter_map(|r| r.id).max() {
            Some(max_id) => max_id.checked_add(1),
            None => Some(1),
        };
        let mut ids_assigned = 0usize;

        let mut transactions = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            let line = i + 2;
            let id = match row.id {
                Some(id) => id,
                None => {
                    let id = id_seed
                        .ok_or_else(|| TrackerError::InvalidRecord(format!("line {line}: id space exhausted")))?;
                    ids_assigned += 1;
                    id_seed = id.checked_add(1);
                    id
                }
            };

            let date = parse_date(&row.date)
                .ok_or_else(|| TrackerError::InvalidRecord(format!("line {line}: unrecognised date '{}'", row.date)))?;
            let kind = row.kind.parse::<Kind>()
                .map_err(|e| anyhow!("line {line}: {e}"))?;
            if !(row.amount.is_finite() && row.amount > 0.0) {
                return Err(TrackerError::InvalidRecord(format!("line {line}: amount must be a positive number")).into());
            }

            transactions.push(Transaction::new(id, date, kind, &row.category, row.amount, &row.description));
        }

        if ids_assigned > 0 {
            info!("Assigned ids to {ids_assigned} records, rewriting {}", self.path.display());
            write_csv(&self.path, &transactions)?;
        }

        Ok(transactions)
    }

    fn append(&mut self, t: &Transaction) -> anyhow::Result<()> {
        let needs_header = self.needs_header();
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open {} for writing", self.path.display()))?;
        let mut writer = WriterBuilder::new().has_headers(needs_header).from_writer(file);
        writer.serialize(t)?;
        writer.flush()?;
        Ok(())
    }

    fn delete(&mut self, ids: &[u32]) -> anyhow::Result<()> {
        let remaining: Vec<Transaction> = self.load()?
            .into_iter()
            .filter(|t| !ids.contains(&t.id))
            .collect();

        // write a sibling file, then rename it over the data file
        let tmp_path = self.path.with_extension("csv.tmp");
        write_csv(&tmp_path, &remaining)?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Unable to replace {}", self.path.display()))?;
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Write transactions to `path` in the csv store layout, replacing any existing file.
pub(crate) fn write_csv(path: &Path, transactions: &[Transaction]) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Unable to write {}", path.display()))?;
    if transactions.is_empty() {
        writer.write_record(["id", "date", "type", "category", "amount", "description"])?;
    }
    for t in transactions {
        writer.serialize(t)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use chrono::NaiveDate;
    use super::*;

    /// Return the path to a file within the test data directory
    fn fixture_filename(filename: &str) -> PathBuf {
        let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        dir.push("fixture");
        dir.push(filename);
        dir
    }

    fn transaction(id: u32, day: u32, kind: Kind, category: &str, amount: f64) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap().and_hms_opt(8, 0, 0).unwrap();
        Transaction::new(id, date, kind, category, amount, "")
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::new(&dir.path().join("none.csv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_fixture() {
        let mut store = CsvStore::new(&fixture_filename("records.csv"));
        let transactions = store.load().unwrap();
        assert_eq!(transactions.len(), 5);
        assert_eq!(transactions[0].id, 1);
        assert_eq!(transactions[0].kind, Kind::Income);
        assert_eq!(transactions[0].category, "Salary");
        assert_eq!(transactions[1].description, "Groceries, weekly");
        assert_eq!(transactions[4].date.to_string(), "2024-02-03 00:00:00");
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tracker.csv");
        let mut store = CsvStore::new(&path);
        store.append(&transaction(1, 1, Kind::Income, "Salary", 3000.0)).unwrap();
        store.append(&transaction(2, 2, Kind::Expense, "Food", 12.5)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "id,date,type,category,amount,description");
        assert_eq!(lines[1], "1,2024-03-01 08:00:00,Income,Salary,3000.0,");
        assert_eq!(lines.len(), 3);

        let loaded = store.load().unwrap();
        assert_eq!(loaded[1], transaction(2, 2, Kind::Expense, "Food", 12.5));
    }

    #[test]
    fn test_legacy_file_gets_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        fs::copy(fixture_filename("legacy.csv"), &path).unwrap();

        let mut store = CsvStore::new(&path);
        let transactions = store.load().unwrap();
        assert_eq!(transactions.iter().map(|t| t.id).collect::<Vec<u32>>(), vec![1, 2, 3]);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id,date,type,category,amount,description"));

        // second load reads the ids back
        assert_eq!(store.load().unwrap(), transactions);
    }

    #[test]
    fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.csv");
        let mut store = CsvStore::new(&path);
        for id in 1..=3 {
            store.append(&transaction(id, id, Kind::Expense, "Food", id as f64)).unwrap();
        }

        store.delete(&[2, 42]).unwrap();
        let ids: Vec<u32> = store.load().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);

        store.delete(&[1, 3]).unwrap();
        assert!(store.load().unwrap().is_empty());
        store.append(&transaction(4, 4, Kind::Expense, "Food", 4.0)).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");

        fs::write(&path, "id,date,type,category,amount,description\n1,yesterday,Expense,Food,3,\n").unwrap();
        let err = CsvStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("unrecognised date"));

        fs::write(&path, "id,date,type,category,amount,description\n1,2024-01-01,Transfer,Food,3,\n").unwrap();
        assert!(CsvStore::new(&path).load().is_err());

        fs::write(&path, "id,date,type,category,amount,description\n1,2024-01-01,Expense,Food,-3,\n").unwrap();
        assert!(CsvStore::new(&path).load().is_err());
    }

    #[test]
    fn test_largest_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.csv");

        fs::write(&path, "id,date,type,category,amount,description\n4294967295,2024-01-01,Expense,Food,3,\n").unwrap();
        let transactions = CsvStore::new(&path).load().unwrap();
        assert_eq!(transactions[0].id, u32::MAX);

        // a row without id can not be given one
        fs::write(&path, "id,date,type,category,amount,description\n4294967295,2024-01-01,Expense,Food,3,\n,2024-01-02,Expense,Food,4,\n").unwrap();
        let err = CsvStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("id space exhausted"));
    }
}
