mod add;
mod condition;
mod delete;
mod export;
mod listing;

use chrono::NaiveDate;
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_till, take_while1};
use nom::character::complete::{char, digit1, multispace1};
use nom::combinator::{map_opt, map_res, opt, recognize, value};
use nom::sequence::{delimited, preceded, tuple};
use nom::{InputTakeAtPosition, IResult};
use crate::common::TrackerError;
use crate::db::filter::Condition;
use crate::form::RecordForm;
use crate::summary::GroupBy;
use crate::transaction::Kind;

/// Command keywords, used for tab completion
pub(crate) const KEYWORDS: &[&str] = &[
    "ADD", "HISTORY", "BROWSE", "DASHBOARD", "SUMMARY", "CATEGORIES", "DELETE", "EXPORT", "HELP",
    "WHERE", "AND", "OR", "LIMIT", "BY", "EXPENSE", "INCOME", "TYPE", "CATEGORY", "MONTH",
];

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Statement {
    /// ADD [EXPENSE|INCOME] category amount ['description'] [ON yyyy-mm-dd]
    Add(RecordForm),
    /// ADD [EXPENSE|INCOME] without record fields, ask for them
    AddInteractive(Kind),
    /// HISTORY [WHERE ...] [LIMIT n]
    History(Option<Condition>, Option<usize>),
    /// BROWSE [WHERE ...]
    Browse(Option<Condition>),
    /// DASHBOARD [WHERE ...]
    Dashboard(Option<Condition>),
    /// SUMMARY [BY ...] [WHERE ...]
    Summary(GroupBy, Option<Condition>),
    /// CATEGORIES [EXPENSE|INCOME]
    Categories(Option<Kind>),
    /// DELETE id, id ...
    Delete(Vec<u32>),
    /// EXPORT TO file_path
    Export(String),
    Help,
}

/// Parse one command. A trailing ';' is optional.
pub(crate) fn parse(input: &str) -> Result<Statement, TrackerError> {
    let command = input.trim().trim_end_matches(';').trim_end();
    let result = alt((
        add::add,
        listing::history,
        listing::browse,
        listing::dashboard,
        listing::summary,
        categories,
        delete::delete,
        export::export,
        help,
    ))(command);

    match result {
        Ok((rest, statement)) => {
            let rest = rest.trim();
            if rest.is_empty() {
                Ok(statement)
            } else {
                Err(TrackerError::Parse(format!("unexpected '{rest}'")))
            }
        },
        Err(_) => Err(TrackerError::Parse(format!("'{command}'. Type HELP for a list of commands"))),
    }
}

/// CATEGORIES [EXPENSE|INCOME]
fn categories(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("CATEGORIES")(input)?;
    let (input, kind) = opt(preceded(multispace1, kind))(input)?;
    Ok((input, Statement::Categories(kind)))
}

fn help(input: &str) -> IResult<&str, Statement> {
    value(Statement::Help, tag_no_case("HELP"))(input)
}

/// 'expense' or 'income', any case
pub(crate) fn kind(input: &str) -> IResult<&str, Kind> {
    map_res(word, |w: &str| w.parse::<Kind>())(input)
}

/// Letters, digits, '-' and '_'
pub(crate) fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

pub(crate) fn non_space1(input: &str) -> IResult<&str, &str> {
    input.split_at_position1_complete(char::is_whitespace, nom::error::ErrorKind::Space)
}

/// Text in single or double quotes, quotes removed. May be empty.
pub(crate) fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_till(|c| c == '\''), char('\'')),
        delimited(char('"'), take_till(|c| c == '"'), char('"')),
    ))(input)
}

/// One or more spaces or commas
pub(crate) fn space_comma1(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c == ',' || c.is_whitespace())(input)
}

pub(crate) fn yyyy_mm_dd_date(input: &str) -> IResult<&str, NaiveDate> {
    map_opt(
        recognize(tuple((digit1, char('-'), digit1, char('-'), digit1))),
        |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
    )(input)
}

#[cfg(test)]
mod tests {
    use crate::parser::{parse, quoted, Statement, yyyy_mm_dd_date};
    use crate::summary::{GroupBy, Period};
    use crate::transaction::Kind;

    #[test]
    fn test() {
        assert_eq!(parse("help;"), Ok(Statement::Help));
        assert_eq!(parse("  categories income ; "), Ok(Statement::Categories(Some(Kind::Income))));
        assert_eq!(parse("CATEGORIES"), Ok(Statement::Categories(None)));
        assert_eq!(parse("summary"), Ok(Statement::Summary(GroupBy::Period(Period::Month), None)));
        assert_eq!(parse("EXPORT TO './out/data.json'"), Ok(Statement::Export("./out/data.json".into())));
    }

    #[test]
    fn test_errors() {
        assert!(parse("frobnicate").is_err());
        assert!(parse("history please").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_helpers() {
        assert_eq!(quoted("'Other Expense' rest"), Ok((" rest", "Other Expense")));
        assert_eq!(quoted("\"\""), Ok(("", "")));
        assert!(yyyy_mm_dd_date("2024-02-30").is_err());
        assert_eq!(yyyy_mm_dd_date("2024-02-29").unwrap().1.to_string(), "2024-02-29");
    }
}
