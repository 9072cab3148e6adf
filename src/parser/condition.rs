use std::ops::Range;
use chrono::{Duration, Local, NaiveDate};
use log::warn;
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case};
use nom::character::complete::{char, i32, multispace0, multispace1, u32};
use nom::combinator::{map, map_opt, map_res, verify};
use nom::IResult;
use nom::multi::many0;
use nom::number::complete::double;
use nom::sequence::tuple;
use crate::common::TrackerError;
use crate::db::filter::{Condition, Operator};
use crate::parser::{quoted, word, yyyy_mm_dd_date};
use crate::transaction::Kind;
use crate::util::{month_of, month_range, year_of};

#[derive(Debug, PartialEq)]
enum LogicalOperator {
    And,
    Or,
}

/// WHERE ...
pub(crate) fn where_parser(input: &str) -> IResult<&str, Condition> {
    let (input, _) = tag_no_case("WHERE")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, first_condition) = single_condition(input)?;

    // Followed by 0 or more AND/OR conditions
    match many0(alt((and_condition, or_condition)))(input) {
        Ok((input, more_conditions)) => {
            Ok((input, combine_logical_conditions(first_condition, more_conditions)))
        },
        Err(_) => {
            warn!("Unable to parse additional where condition {}", input);
            Ok((input, first_condition))
        }
    }
}

/// AND/OR bind equally, evaluated left to right
fn combine_logical_conditions(first: Condition, logical_conditions: Vec<(LogicalOperator, Condition)>) -> Condition {
    let mut current = first;
    for (logical_op, next_cond) in logical_conditions {
        current = match logical_op {
            LogicalOperator::And => Condition::And(Box::new((current, next_cond))),
            LogicalOperator::Or => Condition::Or(Box::new((current, next_cond))),
        };
    }

    current
}

fn single_condition(input: &str) -> IResult<&str, Condition> {
    let (input, condition) = alt((
        where_type,
        where_category,
        where_date,
        where_month,
        where_year,
        where_amount,
        where_description))(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, condition))
}

/// AND single_condition
fn and_condition(input: &str) -> IResult<&str, (LogicalOperator, Condition)> {
    let (input, _) = tag_no_case("AND")(input)?;
    let (input, _) = multispace1(input)?;
    single_condition(input).map(|(input, c)| (input, (LogicalOperator::And, c)))
}

/// OR single_condition
fn or_condition(input: &str) -> IResult<&str, (LogicalOperator, Condition)> {
    let (input, _) = tag_no_case("OR")(input)?;
    let (input, _) = multispace1(input)?;
    single_condition(input).map(|(input, c)| (input, (LogicalOperator::Or, c)))
}

/// '=' with optional surrounding spaces
fn eq_operator(input: &str) -> IResult<&str, ()> {
    let (input, _) = multispace0(input)?;
    let (input, _) = tag("=")(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, ()))
}

/// Quoted text or a bare word. 'all' means no filter.
fn all_or_text(input: &str) -> IResult<&str, Option<&str>> {
    map(alt((quoted, word)), |s: &str| {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") { None } else { Some(s) }
    })(input)
}

/// type = income|expense|all
fn where_type(input: &str) -> IResult<&str, Condition> {
    let (input, _) = tag_no_case("type")(input)?;
    let (input, _) = eq_operator(input)?;
    let (input, kind) = map_res(all_or_text, |s: Option<&str>| -> Result<Option<Kind>, TrackerError> { match s {
        None => Ok(None),
        Some(s) => s.parse::<Kind>().map(Some),
    }})(input)?;
    Ok((input, Condition::Type(kind)))
}

/// category = 'Other Expense'|Food|all
fn where_category(input: &str) -> IResult<&str, Condition> {
    let (input, _) = tag_no_case("category")(input)?;
    let (input, _) = eq_operator(input)?;
    let (input, category) = all_or_text(input)?;
    Ok((input, Condition::Category(category.map(str::to_string))))
}

/// date = yyyy-mm-dd   date between yyyy-mm-dd and yyyy-mm-dd
fn where_date(input: &str) -> IResult<&str, Condition> {
    let (input, _) = tag_no_case("date")(input)?;
    alt((
        map(tuple((eq_operator, yyyy_mm_dd_date)), |(_, date)| Condition::Date(date..date + Duration::days(1))),
        map(between(yyyy_mm_dd_date), |(from, to)| Condition::Date(from..to + Duration::days(1))),
    ))(input)
}

/// month = 3   month = 2024-03   month between 2024-01 and 2024-03
fn where_month(input: &str) -> IResult<&str, Condition> {
    let (input, _) = tag_no_case("month")(input)?;
    alt((
        map(tuple((eq_operator, month)), |(_, range)| Condition::Date(range)),
        map(between(month), |(from, to)| Condition::Date(from.start..to.end)),
    ))(input)
}

/// year = 2024
fn where_year(input: &str) -> IResult<&str, Condition> {
    let (input, _) = tag_no_case("year")(input)?;
    let (input, _) = eq_operator(input)?;
    let (input, range) = map_opt(i32, year_of)(input)?;
    Ok((input, Condition::Date(range)))
}

/// amount >= 100
fn where_amount(input: &str) -> IResult<&str, Condition> {
    let (input, _) = tag_no_case("amount")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, operator) = map_res(
        alt((tag(">="), tag("<="), tag("="), tag(">"), tag("<"))),
        Operator::try_from,
    )(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = double(input)?;
    Ok((input, Condition::Amount(operator, value)))
}

/// description|desc like|match|= '...'
fn where_description(input: &str) -> IResult<&str, Condition> {
    let (input, _) = alt((tag_no_case("description"), tag_no_case("desc")))(input)?;
    let (input, _) = multispace1(input)?;
    let (input, _) = alt((tag_no_case("like"), tag_no_case("match"), tag("=")))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, text) = quoted(input)?;
    Ok((input, Condition::Description(text.into())))
}

/// ` between <a> and <b>`
fn between<'a, O, F>(mut item: F) -> impl FnMut(&'a str) -> IResult<&'a str, (O, O)>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    move |input: &'a str| {
        let (input, _) = multispace1(input)?;
        let (input, _) = tag_no_case("between")(input)?;
        let (input, _) = multispace1(input)?;
        let (input, from) = item(input)?;
        let (input, _) = multispace1(input)?;
        let (input, _) = tag_no_case("and")(input)?;
        let (input, _) = multispace1(input)?;
        let (input, to) = item(input)?;
        Ok((input, (from, to)))
    }
}

/// month can be in format 'yyyy-mm' or just a single int, e.g. 12.
fn month(input: &str) -> IResult<&str, Range<NaiveDate>> {
    alt((month_yyyy_mm, month_int))(input)
}

fn month_yyyy_mm(input: &str) -> IResult<&str, Range<NaiveDate>> {
    map_opt(tuple((i32, char('-'), u32)), |(year, _, month)| month_range(year, month))(input)
}

fn month_int(input: &str) -> IResult<&str, Range<NaiveDate>> {
    let (input, month) = verify(u32, |m| (1..=12).contains(m))(input)?;
    match month_of(month, Local::now().date_naive()) {
        Some(range) => Ok((input, range)),
        None => Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate};
    use crate::db::filter::{Condition, Operator};
    use crate::parser::condition::where_parser;
    use crate::transaction::Kind;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test() {
        let query = "where type = income";
        assert_eq!(where_parser(query), Ok(("", Condition::Type(Some(Kind::Income)))));

        let query = "WHERE type=all";
        assert_eq!(where_parser(query), Ok(("", Condition::Type(None))));

        let query = "where category = 'Other Expense'";
        assert_eq!(where_parser(query), Ok(("", Condition::Category(Some("Other Expense".into())))));

        let query = "where category = All";
        assert_eq!(where_parser(query), Ok(("", Condition::Category(None))));

        let query = "where amount >= 100";
        assert_eq!(where_parser(query), Ok(("", Condition::Amount(Operator::GtEq, 100.0))));

        let query = "where desc like 'coffee'";
        assert_eq!(where_parser(query), Ok(("", Condition::Description("coffee".into()))));

        let query = "where date = 2024-02-29";
        assert_eq!(where_parser(query), Ok(("", Condition::Date(ymd(2024, 2, 29)..ymd(2024, 3, 1)))));

        let query = "where date between 2024-01-01 and 2024-01-31";
        assert_eq!(where_parser(query), Ok(("", Condition::Date(ymd(2024, 1, 1)..ymd(2024, 2, 1)))));

        let query = "where year = 2023";
        assert_eq!(where_parser(query), Ok(("", Condition::Date(ymd(2023, 1, 1)..ymd(2024, 1, 1)))));
    }

    #[test]
    fn test_month() {
        let query = "where month = 2023-04";
        assert_eq!(where_parser(query), Ok(("", Condition::Date(ymd(2023, 4, 1)..ymd(2023, 5, 1)))));

        let query = "where month between 2023-11 and 2024-02";
        assert_eq!(where_parser(query), Ok(("", Condition::Date(ymd(2023, 11, 1)..ymd(2024, 3, 1)))));

        let query = "where month = 12";
        let result = where_parser(query).unwrap().1;
        if let Condition::Date(date_range) = result {
            assert_eq!(date_range.start.month(), 12);
            assert_eq!(date_range.start.day(), 1);
        } else {
            panic!("Unexpected condition {result:?}");
        }

        assert!(where_parser("where month = 13").is_err());
        assert!(where_parser("where month = 2024-13").is_err());
    }

    #[test]
    fn test_logical() {
        let query = "WHERE type = expense AND category = Food";
        assert_eq!(where_parser(query), Ok(("", Condition::And(Box::new((
            Condition::Type(Some(Kind::Expense)),
            Condition::Category(Some("Food".into())),
        ))))));

        let query = "WHERE desc like 'abc' AND amount > 1000 OR type = income limit 3";
        assert_eq!(where_parser(query), Ok(("limit 3", Condition::Or(
            Box::new((
                Condition::And(Box::new((
                    Condition::Description("abc".into()),
                    Condition::Amount(Operator::Gt, 1000.0),
                ))),
                Condition::Type(Some(Kind::Income)))
            ))
        )));
    }

    #[test]
    fn test_invalid() {
        assert!(where_parser("where type = transfer").is_err());
        assert!(where_parser("where amount ! 3").is_err());
        assert!(where_parser("where colour = red").is_err());
    }
}
