use comfy_table::{Cell, CellAlignment, Color, Table};
use crate::chart::{format_amount, new_table, NO_DATA};
use crate::summary::{totals, Totals};
use crate::transaction::{Kind, Transaction};

/// The `n` most recent transactions of a date ordered list
pub(crate) fn last_n(transactions: &[Transaction], limit: Option<usize>) -> &[Transaction] {
    match limit {
        Some(n) if n < transactions.len() => &transactions[transactions.len() - n..],
        _ => transactions,
    }
}

/// Transaction table followed by the income, expense and balance of the listed rows.
pub(crate) fn render_history(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return NO_DATA.to_string();
    }
    let table = history_table(transactions, true);
    format!("{table}\n{}", totals_line(&totals(transactions)))
}

/// Same as `render_history` without any terminal styling, for files
pub(crate) fn render_history_plain(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return NO_DATA.to_string();
    }
    let mut table = history_table(transactions, false);
    table.force_no_tty();
    format!("{table}\n{}", totals_line(&totals(transactions)))
}

pub(crate) fn history_table(transactions: &[Transaction], colored: bool) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Date", "Type", "Category", "Amount", "Description"]);
    for t in transactions {
        let mut kind_cell = Cell::new(t.kind);
        if colored && t.kind == Kind::Income {
            kind_cell = kind_cell.fg(Color::Green);
        }
        table.add_row(vec![
            Cell::new(t.id).set_alignment(CellAlignment::Right),
            Cell::new(t.date_display()),
            kind_cell,
            Cell::new(&t.category),
            Cell::new(format_amount(t.amount)).set_alignment(CellAlignment::Right),
            Cell::new(&t.description),
        ]);
    }
    table
}

pub(crate) fn totals_line(totals: &Totals) -> String {
    format!(
        "{} records. Income: {}  Expense: {}  Balance: {}",
        totals.count,
        format_amount(totals.income),
        format_amount(totals.expense),
        format_amount(totals.net()),
    )
}

#[cfg(test)]
mod tests {
    use crate::controller::history::{history_table, last_n, render_history, render_history_plain};
    use crate::chart::NO_DATA;
    use crate::db::tests::sample_ledger;

    #[test]
    fn test_last_n() {
        let transactions = sample_ledger().query(None);
        let ids: Vec<u32> = last_n(&transactions, Some(2)).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![5, 6]);
        assert_eq!(last_n(&transactions, Some(100)).len(), 6);
        assert_eq!(last_n(&transactions, None).len(), 6);
        assert!(last_n(&transactions, Some(0)).is_empty());
    }

    #[test]
    fn test_render_history() {
        let transactions = sample_ledger().query(None);
        let output = render_history(&transactions);
        assert!(output.contains("Description"));
        assert!(output.contains("2024-01-05 10:00:00"));
        assert!(output.contains("Salary 3000"));
        assert!(output.ends_with("6 records. Income: 3100.00  Expense: 300.00  Balance: 2800.00"));

        assert_eq!(render_history(&[]), NO_DATA);
    }

    #[test]
    fn test_plain_history_has_no_escape_codes() {
        let transactions = sample_ledger().query(None);

        let mut colored = history_table(&transactions, true);
        colored.enforce_styling();
        assert!(colored.to_string().contains('\x1b'));

        let mut plain = history_table(&transactions, false);
        plain.enforce_styling();
        assert!(!plain.to_string().contains('\x1b'));

        let output = render_history_plain(&transactions);
        assert!(!output.contains('\x1b'));
        assert!(output.contains("Income"));
    }
}
