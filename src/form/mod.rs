use std::io::{BufRead, Write};
use chrono::{NaiveDate, NaiveDateTime};
use crate::category::Categories;
use crate::common::TrackerError;
use crate::transaction::Kind;

/// Raw text of the "add record" form, before validation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordForm {
    pub(crate) kind: Kind,
    pub(crate) category: String,
    pub(crate) amount: String,
    pub(crate) description: String,
    pub(crate) date: Option<NaiveDate>,
}

/// A validated record waiting for an id
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewRecord {
    pub(crate) date: NaiveDateTime,
    pub(crate) kind: Kind,
    pub(crate) category: String,
    pub(crate) amount: f64,
    pub(crate) description: String,
}

impl RecordForm {
    pub(crate) fn new(kind: Kind, category: &str, amount: &str, description: &str) -> RecordForm {
        RecordForm {
            kind,
            category: category.to_string(),
            amount: amount.to_string(),
            description: description.to_string(),
            date: None,
        }
    }

    /// Validate the form. `now` is used as the record date unless the form carries one.
    pub(crate) fn validate(&self, categories: &Categories, now: NaiveDateTime) -> Result<NewRecord, TrackerError> {
        let category = self.category.trim();
        if category.is_empty() {
            return Err(TrackerError::Validation("Please select a category.".into()));
        }

        let category = match categories.resolve(self.kind, category) {
            Some(c) => c.to_string(),
            None => {
                return Err(TrackerError::Validation(format!("Unknown {} category '{}'.", self.kind.to_string().to_lowercase(), category)));
            }
        };

        let amount = match self.amount.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => amount,
            _ => return Err(TrackerError::Validation("Amount must be a valid number.".into())),
        };
        if amount <= 0.0 {
            return Err(TrackerError::Validation("Amount must be a positive number.".into()));
        }

        let date = match self.date {
            Some(d) => d.and_hms_opt(0, 0, 0).unwrap_or(now),
            None => now,
        };

        Ok(NewRecord {
            date,
            kind: self.kind,
            category,
            amount,
            description: self.description.trim().to_string(),
        })
    }
}

/// Ask the user for category, amount and description, one line each.
/// Category can be given by its number in the printed list or by name.
pub(crate) fn prompt_form<R: BufRead, W: Write>(kind: Kind, categories: &Categories, input: &mut R, output: &mut W) -> anyhow::Result<RecordForm> {
    let choices = categories.for_kind(kind);
    writeln!(output, "New {} record. Categories:", kind.to_string().to_lowercase())?;
    for (i, c) in choices.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, c)?;
    }

    let category = ask(input, output, "Category: ")?;
    let category = match category.parse::<usize>() {
        Ok(n) if n >= 1 && n <= choices.len() => choices[n - 1].clone(),
        _ => category,
    };
    let amount = ask(input, output, "Amount: ")?;
    let description = ask(input, output, "Description: ")?;

    Ok(RecordForm::new(kind, &category, &amount, &description))
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> anyhow::Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(9, 15, 0).unwrap()
    }

    fn validate(form: RecordForm) -> Result<NewRecord, TrackerError> {
        form.validate(&Categories::default(), now())
    }

    #[test]
    fn test_valid_form() {
        let record = validate(RecordForm::new(Kind::Expense, "food", " 12.50 ", "  lunch ")).unwrap();
        assert_eq!(record, NewRecord {
            date: now(),
            kind: Kind::Expense,
            category: "Food".into(),
            amount: 12.5,
            description: "lunch".into(),
        });
    }

    #[test]
    fn test_explicit_date() {
        let mut form = RecordForm::new(Kind::Income, "Salary", "3000", "");
        form.date = NaiveDate::from_ymd_opt(2024, 1, 31);
        let record = validate(form).unwrap();
        assert_eq!(record.date.to_string(), "2024-01-31 00:00:00");
    }

    #[test]
    fn test_validation_errors() {
        let message = |form| validate(form).unwrap_err().to_string();
        assert_eq!(message(RecordForm::new(Kind::Expense, " ", "1", "")), "Please select a category.");
        assert_eq!(message(RecordForm::new(Kind::Expense, "Salary", "1", "")), "Unknown expense category 'Salary'.");
        assert_eq!(message(RecordForm::new(Kind::Expense, "Food", "abc", "")), "Amount must be a valid number.");
        assert_eq!(message(RecordForm::new(Kind::Expense, "Food", "NaN", "")), "Amount must be a valid number.");
        assert_eq!(message(RecordForm::new(Kind::Expense, "Food", "0", "")), "Amount must be a positive number.");
        assert_eq!(message(RecordForm::new(Kind::Expense, "Food", "-3", "")), "Amount must be a positive number.");
    }

    #[test]
    fn test_category_checked_before_amount() {
        let err = validate(RecordForm::new(Kind::Income, "", "abc", "")).unwrap_err();
        assert_eq!(err, TrackerError::Validation("Please select a category.".into()));
    }

    #[test]
    fn test_prompt_form() {
        let mut input = Cursor::new("2\n42\nbus fare\n");
        let mut output: Vec<u8> = vec![];
        let form = prompt_form(Kind::Expense, &Categories::default(), &mut input, &mut output).unwrap();
        assert_eq!(form, RecordForm::new(Kind::Expense, "Transport", "42", "bus fare"));

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("1) Food"));
        assert!(printed.contains("Amount: "));
    }

    #[test]
    fn test_prompt_form_by_name() {
        let mut input = Cursor::new("gift\n10\n\n");
        let mut output: Vec<u8> = vec![];
        let form = prompt_form(Kind::Income, &Categories::default(), &mut input, &mut output).unwrap();
        assert_eq!(form.category, "gift");
        assert_eq!(validate(form).unwrap().category, "Gift");
    }
}
