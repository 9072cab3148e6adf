use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{char, multispace0, multispace1, u32};
use nom::combinator::{map, opt, value};
use nom::IResult;
use nom::sequence::{preceded, tuple};
use crate::db::filter::Condition;
use crate::parser::condition::where_parser;
use crate::parser::Statement;
use crate::summary::{GroupBy, Period};

/// HISTORY [WHERE ...] [LIMIT n]
pub(crate) fn history(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("HISTORY")(input)?;
    let (input, condition) = where_clause(input)?;
    let (input, limit) = opt(preceded(multispace0, limit))(input)?;
    Ok((input, Statement::History(condition, limit)))
}

/// BROWSE [WHERE ...]
pub(crate) fn browse(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("BROWSE")(input)?;
    let (input, condition) = where_clause(input)?;
    Ok((input, Statement::Browse(condition)))
}

/// DASHBOARD [WHERE ...]
pub(crate) fn dashboard(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("DASHBOARD")(input)?;
    let (input, condition) = where_clause(input)?;
    Ok((input, Statement::Dashboard(condition)))
}

/// SUMMARY [BY day|month|category|day,category|month,category] [WHERE ...]
pub(crate) fn summary(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag_no_case("SUMMARY")(input)?;
    let (input, group_by) = opt(preceded(multispace1, group_by))(input)?;
    let (input, condition) = where_clause(input)?;
    Ok((input, Statement::Summary(group_by.unwrap_or(GroupBy::Period(Period::Month)), condition)))
}

fn where_clause(input: &str) -> IResult<&str, Option<Condition>> {
    opt(preceded(multispace1, where_parser))(input)
}

/// LIMIT n
fn limit(input: &str) -> IResult<&str, usize> {
    let (input, (_, _, n)) = tuple((tag_no_case("LIMIT"), multispace1, u32))(input)?;
    Ok((input, n as usize))
}

fn group_by(input: &str) -> IResult<&str, GroupBy> {
    let (input, _) = tag_no_case("BY")(input)?;
    let (input, _) = multispace1(input)?;
    alt((
        period_and_category,
        value(GroupBy::Category, tag_no_case("category")),
        map(period, GroupBy::Period),
    ))(input)
}

/// day,category or month, category
fn period_and_category(input: &str) -> IResult<&str, GroupBy> {
    let (input, period) = period(input)?;
    let (input, _) = tuple((multispace0, char(','), multispace0))(input)?;
    let (input, _) = tag_no_case("category")(input)?;
    Ok((input, GroupBy::PeriodAndCategory(period)))
}

fn period(input: &str) -> IResult<&str, Period> {
    alt((
        value(Period::Day, tag_no_case("day")),
        value(Period::Month, tag_no_case("month")),
    ))(input)
}
