//! Grouped totals over a list of transactions.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use chrono::NaiveDate;
use crate::transaction::{Kind, Transaction};
use crate::util::month_start;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Period {
    Day,
    Month,
}

/// A day or a month. Months are keyed by their first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum PeriodKey {
    Day(NaiveDate),
    Month(NaiveDate),
}

impl PeriodKey {
    pub(crate) fn of(period: Period, date: NaiveDate) -> PeriodKey {
        match period {
            Period::Day => PeriodKey::Day(date),
            Period::Month => PeriodKey::Month(month_start(date)),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PeriodKey::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            PeriodKey::Month(d) => write!(f, "{}", d.format("%Y-%m")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum GroupBy {
    Period(Period),
    Category,
    PeriodAndCategory(Period),
}

/// Income and expense sums of a group
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Totals {
    pub(crate) income: f64,
    pub(crate) expense: f64,
    pub(crate) count: usize,
}

impl Totals {
    fn add(&mut self, t: &Transaction) {
        match t.kind {
            Kind::Income => self.income += t.amount,
            Kind::Expense => self.expense += t.amount,
        }
        self.count += 1;
    }

    pub(crate) fn net(&self) -> f64 {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryShare {
    pub(crate) category: String,
    pub(crate) total: f64,
    /// 0 - 100
    pub(crate) percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SummaryRow {
    pub(crate) period: Option<PeriodKey>,
    pub(crate) category: Option<String>,
    pub(crate) totals: Totals,
}

pub(crate) fn totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();
    for t in transactions {
        totals.add(t);
    }
    totals
}

/// Expense amount per category with its share of all expenses, sorted by category.
pub(crate) fn expense_by_category(transactions: &[Transaction]) -> Vec<CategoryShare> {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.kind == Kind::Expense) {
        *by_category.entry(t.category.as_str()).or_insert(0.0) += t.amount;
    }

    let grand_total: f64 = by_category.values().sum();
    by_category.into_iter()
        .map(|(category, total)| CategoryShare {
            category: category.to_string(),
            total,
            percent: if grand_total > 0.0 { total / grand_total * 100.0 } else { 0.0 },
        })
        .collect()
}

/// Income and expense totals per period, in chronological order.
pub(crate) fn income_vs_expense(transactions: &[Transaction], period: Period) -> BTreeMap<PeriodKey, Totals> {
    let mut result: BTreeMap<PeriodKey, Totals> = BTreeMap::new();
    for t in transactions {
        result.entry(PeriodKey::of(period, t.date.date())).or_default().add(t);
    }
    result
}

/// Group transactions and sum each group. Rows are sorted by period then category.
pub(crate) fn summarise(transactions: &[Transaction], group_by: GroupBy) -> Vec<SummaryRow> {
    let mut groups: HashMap<(Option<PeriodKey>, Option<&str>), Totals> = HashMap::new();
    for t in transactions {
        let key = match group_by {
            GroupBy::Period(period) => (Some(PeriodKey::of(period, t.date.date())), None),
            GroupBy::Category => (None, Some(t.category.as_str())),
            GroupBy::PeriodAndCategory(period) => (Some(PeriodKey::of(period, t.date.date())), Some(t.category.as_str())),
        };
        groups.entry(key).or_default().add(t);
    }

    let mut rows: Vec<SummaryRow> = groups.into_iter()
        .map(|((period, category), totals)| SummaryRow {
            period,
            category: category.map(str::to_string),
            totals,
        })
        .collect();
    rows.sort_by(|a, b| a.period.cmp(&b.period).then_with(|| a.category.cmp(&b.category)));
    rows
}
