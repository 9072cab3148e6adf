use std::fs;
use std::path::Path;
use anyhow::Context;
use rust_xlsxwriter::Workbook;
use crate::common::TrackerError;
use crate::controller::history::render_history_plain;
use crate::db::Ledger;
use crate::store::write_csv;
use crate::transaction::Transaction;

const XLSX_HEADER: [&str; 6] = ["id", "date", "type", "category", "amount", "description"];

/// Export every transaction to a file. The format follows the file extension.
/// Returns the number of records written.
pub(crate) fn export(ledger: &Ledger, file_path: &str) -> anyhow::Result<usize> {
    let path = Path::new(file_path);
    let extension = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let transactions = ledger.all();

    match extension.as_str() {
        "csv" => write_csv(path, &transactions)?,
        "json" => {
            let json = serde_json::to_string_pretty(&transactions)?;
            fs::write(path, json).with_context(|| format!("Unable to write {file_path}"))?;
        },
        "txt" => {
            fs::write(path, render_history_plain(&transactions)).with_context(|| format!("Unable to write {file_path}"))?;
        },
        "xlsx" => write_xlsx(path, &transactions)?,
        _ => return Err(TrackerError::UnsupportedFormat(file_path.to_string()).into()),
    }

    Ok(transactions.len())
}

/// One worksheet, a header row then one row per transaction
fn write_xlsx(path: &Path, transactions: &[Transaction]) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, name) in XLSX_HEADER.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }
    for (i, t) in transactions.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_number(row, 0, t.id)?;
        worksheet.write_string(row, 1, t.date_display())?;
        worksheet.write_string(row, 2, t.kind.to_string())?;
        worksheet.write_string(row, 3, &t.category)?;
        worksheet.write_number(row, 4, t.amount)?;
        worksheet.write_string(row, 5, &t.description)?;
    }
    workbook.save(path).with_context(|| format!("Unable to write {}", path.display()))?;
    Ok(())
}
