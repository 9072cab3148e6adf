use chrono::NaiveDate;
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::multispace1;
use nom::combinator::{opt, verify};
use nom::IResult;
use nom::sequence::{preceded, tuple};
use crate::form::RecordForm;
use crate::parser::{kind, non_space1, quoted, Statement, yyyy_mm_dd_date};
use crate::transaction::Kind;

/// Parse `ADD [EXPENSE|INCOME] [category amount ['description'] [ON yyyy-mm-dd]]`.
/// Without a type the record is an expense.
pub(crate) fn add(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("ADD")(input)?;
    let (input, kind) = opt(preceded(multispace1, kind))(input)?;
    let kind = kind.unwrap_or(Kind::Expense);

    let (input, fields) = opt(preceded(multispace1, record_fields))(input)?;
    match fields {
        Some((category, amount, description, date)) => {
            let mut form = RecordForm::new(kind, category, amount, description.unwrap_or(""));
            form.date = date;
            Ok((input, Statement::Add(form)))
        },
        None => Ok((input, Statement::AddInteractive(kind))),
    }
}

type RecordFields<'a> = (&'a str, &'a str, Option<&'a str>, Option<NaiveDate>);

fn record_fields(input: &str) -> IResult<&str, RecordFields> {
    let (input, category) = alt((quoted, non_space1))(input)?;
    let (input, _) = multispace1(input)?;
    let (input, amount) = non_space1(input)?;
    let (input, description) = opt(preceded(multispace1, description))(input)?;
    let (input, date) = opt(preceded(multispace1, on_date))(input)?;
    Ok((input, (category, amount, description, date)))
}

/// Quoted text, or a single word that is not the `ON` keyword
fn description(input: &str) -> IResult<&str, &str> {
    alt((quoted, verify(non_space1, |s: &str| !s.eq_ignore_ascii_case("on"))))(input)
}

/// ON yyyy-mm-dd
fn on_date(input: &str) -> IResult<&str, NaiveDate> {
    let (input, (_, _, date)) = tuple((tag_no_case("ON"), multispace1, yyyy_mm_dd_date))(input)?;
    Ok((input, date))
}
