use std::fmt;
use std::str::FromStr;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::common::TrackerError;

/// Format used when writing dates to csv and sqlite
pub(crate) const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub(crate) fn all() -> [Kind; 2] {
        [Kind::Expense, Kind::Income]
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Kind::Income => write!(f, "Income"),
            Kind::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for Kind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Kind::Income),
            "expense" => Ok(Kind::Expense),
            _ => Err(TrackerError::InvalidRecord(format!("unknown transaction type '{s}'"))),
        }
    }
}

/// Hold transaction info returned from ledger query
#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct Transaction {
    pub(crate) id: u32,
    #[serde(with = "date_time_format")]
    pub(crate) date: NaiveDateTime,
    #[serde(rename = "type")]
    pub(crate) kind: Kind,
    pub(crate) category: String,
    /// Always positive, the sign comes from `kind`
    pub(crate) amount: f64,
    pub(crate) description: String,
}

impl Transaction {
    pub(crate) fn new(id: u32, date: NaiveDateTime, kind: Kind, category: &str, amount: f64, description: &str) -> Transaction {
        let description = description.replace(['\n', '\r'], " ");
        Transaction {
            id,
            date,
            kind,
            category: category.to_string(),
            amount,
            description,
        }
    }

    /// Income counts positive, expense negative
    pub(crate) fn signed_amount(&self) -> f64 {
        match self.kind {
            Kind::Income => self.amount,
            Kind::Expense => -self.amount,
        }
    }

    pub(crate) fn date_display(&self) -> String {
        self.date.format(DATE_TIME_FORMAT).to_string()
    }
}

/// serde adapter writing `NaiveDateTime` as `yyyy-mm-dd HH:MM:SS`
pub(crate) mod date_time_format {
    use chrono::NaiveDateTime;
    use serde::Serializer;
    use super::DATE_TIME_FORMAT;

    pub(crate) fn serialize<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_TIME_FORMAT).to_string())
    }
}
