use std::collections::BTreeMap;
use comfy_table::{Cell, CellAlignment, Color, Table, TableComponent};
use crate::summary::{CategoryShare, PeriodKey, Totals};

pub(crate) const NO_DATA: &str = "No data to display. Please add some records first.";
const BAR_CHAR: char = '█';

/// Table without horizontal rules between rows
pub(crate) fn new_table() -> Table {
    let mut table = Table::new();
    table.remove_style(TableComponent::HorizontalLines);
    table.remove_style(TableComponent::MiddleIntersections);
    table.remove_style(TableComponent::LeftBorderIntersections);
    table.remove_style(TableComponent::RightBorderIntersections);
    table
}

/// Format $ amount
pub(crate) fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Bar of at most `width` cells, proportional to value / max. Non-zero values get at least one cell.
pub(crate) fn bar(value: f64, max: f64, width: usize) -> String {
    if value <= 0.0 || max <= 0.0 {
        return String::new();
    }
    let cells = ((value / max) * width as f64).round() as usize;
    BAR_CHAR.to_string().repeat(cells.clamp(1, width.max(1)))
}

/// Horizontal bar version of a pie chart
pub(crate) fn render_distribution(shares: &[CategoryShare], width: usize) -> String {
    if shares.is_empty() {
        return NO_DATA.to_string();
    }

    let max = shares.iter().map(|s| s.percent).fold(0.0, f64::max);
    let mut table = new_table();
    table.set_header(vec!["Category", "", "Share", "Amount"]);
    for s in shares {
        table.add_row(vec![
            Cell::new(&s.category),
            Cell::new(bar(s.percent, max, width)).fg(Color::Cyan),
            Cell::new(format!("{:.1}%", s.percent)).set_alignment(CellAlignment::Right),
            Cell::new(format_amount(s.total)).set_alignment(CellAlignment::Right),
        ]);
    }

    format!("Expense Distribution by Category\n{table}")
}

/// One row per period, income and expense bars side by side on the same scale
pub(crate) fn render_income_vs_expense(totals: &BTreeMap<PeriodKey, Totals>, width: usize) -> String {
    if totals.is_empty() {
        return NO_DATA.to_string();
    }

    let max = totals.values().map(|t| t.income.max(t.expense)).fold(0.0, f64::max);
    let mut table = new_table();
    table.set_header(vec!["Month", "Income", "", "Expense", ""]);
    for (period, t) in totals {
        table.add_row(vec![
            Cell::new(period),
            Cell::new(format_amount(t.income)).set_alignment(CellAlignment::Right),
            Cell::new(bar(t.income, max, width)).fg(Color::Green),
            Cell::new(format_amount(t.expense)).set_alignment(CellAlignment::Right),
            Cell::new(bar(t.expense, max, width)).fg(Color::Red),
        ]);
    }

    format!("Monthly Income vs. Expense\n{table}")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use super::*;

    #[test]
    fn test_bar() {
        assert_eq!(bar(10.0, 10.0, 4), "████");
        assert_eq!(bar(5.0, 10.0, 4), "██");
        assert_eq!(bar(0.01, 10.0, 4), "█");
        assert_eq!(bar(0.0, 10.0, 4), "");
        assert_eq!(bar(3.0, 0.0, 4), "");
    }

    #[test]
    fn test_render_distribution() {
        let shares = vec![
            CategoryShare { category: "Food".into(), total: 75.0, percent: 75.0 },
            CategoryShare { category: "Transport".into(), total: 25.0, percent: 25.0 },
        ];
        let chart = render_distribution(&shares, 8);
        assert!(chart.starts_with("Expense Distribution by Category"));
        assert!(chart.contains("75.0%"));
        assert!(chart.contains("25.0%"));
        assert!(chart.contains("████████"));
        assert!(chart.contains("75.00"));
    }

    #[test]
    fn test_render_income_vs_expense() {
        let mut totals = BTreeMap::new();
        let month = PeriodKey::Month(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        totals.insert(month, Totals { income: 100.0, expense: 50.0, count: 3 });
        let chart = render_income_vs_expense(&totals, 10);
        assert!(chart.starts_with("Monthly Income vs. Expense"));
        assert!(chart.contains("2024-02"));
        assert!(chart.contains("██████████"));
        assert!(chart.contains("50.00"));
    }

    #[test]
    fn test_empty_charts() {
        assert_eq!(render_distribution(&[], 10), NO_DATA);
        assert_eq!(render_income_vs_expense(&BTreeMap::new(), 10), NO_DATA);
    }
}
