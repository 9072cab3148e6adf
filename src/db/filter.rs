use std::ops::Range;
use chrono::NaiveDate;
use crate::category::same_name;
use crate::transaction::{Kind, Transaction};

#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) enum Operator {
    Eq,
    Gt,
    GtEq,
    Lt,
    LtEq,
}

impl Operator {
    pub(crate) fn compare(&self, left: f64, right: f64) -> bool {
        match self {
            Operator::Eq => (left - right).abs() < 1e-9,
            Operator::Gt => left > right,
            Operator::GtEq => left >= right,
            Operator::Lt => left < right,
            Operator::LtEq => left <= right,
        }
    }
}

impl TryFrom<&str> for Operator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "=" => Ok(Operator::Eq),
            ">" => Ok(Operator::Gt),
            "<" => Ok(Operator::Lt),
            ">=" => Ok(Operator::GtEq),
            "<=" => Ok(Operator::LtEq),
            _ => Err(format!("Unable to parse operator {value}")),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub(crate) enum Condition {
    /// None means all types
    Type(Option<Kind>),
    /// None means all categories
    Category(Option<String>),
    /// Start date(inclusive) and end date(exclusive) for the period
    Date(Range<NaiveDate>),
    Amount(Operator, f64),
    /// Case-insensitive substring of the description
    Description(String),
    And(Box<(Condition, Condition)>),
    Or(Box<(Condition, Condition)>),
}

impl Condition {
    /// Check a single transaction against this condition
    pub(crate) fn matches(&self, t: &Transaction) -> bool {
        match self {
            Condition::Type(None) | Condition::Category(None) => true,
            Condition::Type(Some(kind)) => t.kind == *kind,
            Condition::Category(Some(category)) => same_name(&t.category, category),
            Condition::Date(range) => range.contains(&t.date.date()),
            Condition::Amount(op, amount) => op.compare(t.amount, *amount),
            Condition::Description(text) => t.description.to_lowercase().contains(&text.to_lowercase()),
            Condition::And(c) => c.0.matches(t) && c.1.matches(t),
            Condition::Or(c) => c.0.matches(t) || c.1.matches(t),
        }
    }
}
