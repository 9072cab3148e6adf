use comfy_table::{Cell, CellAlignment};
use crate::category::Categories;
use crate::chart::{format_amount, new_table, NO_DATA, render_distribution, render_income_vs_expense};
use crate::controller::history::totals_line;
use crate::summary::{expense_by_category, GroupBy, income_vs_expense, Period, summarise, totals};
use crate::transaction::{Kind, Transaction};

/// Expense distribution, monthly income vs. expense and the overall totals
pub(crate) fn render_dashboard(transactions: &[Transaction], chart_width: usize) -> String {
    if transactions.is_empty() {
        return NO_DATA.to_string();
    }

    let distribution = render_distribution(&expense_by_category(transactions), chart_width);
    let monthly = render_income_vs_expense(&income_vs_expense(transactions, Period::Month), chart_width);
    format!("{distribution}\n\n{monthly}\n\n{}", totals_line(&totals(transactions)))
}

pub(crate) fn render_summary(transactions: &[Transaction], group_by: GroupBy) -> String {
    let rows = summarise(transactions, group_by);
    if rows.is_empty() {
        return NO_DATA.to_string();
    }

    let period_header = |period: Period| match period {
        Period::Day => "Day",
        Period::Month => "Month",
    };
    let mut header: Vec<&str> = match group_by {
        GroupBy::Period(p) => vec![period_header(p)],
        GroupBy::Category => vec!["Category"],
        GroupBy::PeriodAndCategory(p) => vec![period_header(p), "Category"],
    };
    header.extend(["Income", "Expense", "Net", "Count"]);

    let mut table = new_table();
    table.set_header(header);
    for row in rows {
        let mut cells = vec![];
        if let Some(period) = row.period {
            cells.push(Cell::new(period));
        }
        if let Some(category) = &row.category {
            cells.push(Cell::new(category));
        }
        cells.push(Cell::new(format_amount(row.totals.income)).set_alignment(CellAlignment::Right));
        cells.push(Cell::new(format_amount(row.totals.expense)).set_alignment(CellAlignment::Right));
        cells.push(Cell::new(format_amount(row.totals.net())).set_alignment(CellAlignment::Right));
        cells.push(Cell::new(row.totals.count).set_alignment(CellAlignment::Right));
        table.add_row(cells);
    }

    table.to_string()
}

/// Category names per type, optionally for one type only
pub(crate) fn render_categories(categories: &Categories, kind: Option<Kind>) -> String {
    let kinds = match kind {
        Some(k) => vec![k],
        None => Kind::all().to_vec(),
    };

    let mut table = new_table();
    table.set_header(vec!["Type", "Category"]);
    for kind in kinds {
        for name in categories.for_kind(kind) {
            table.add_row(vec![Cell::new(kind), Cell::new(name)]);
        }
    }
    table.to_string()
}
