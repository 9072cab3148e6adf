use std::ops::Range;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use crate::transaction::DATE_TIME_FORMAT;

lazy_static! {
    static ref YYYYMMDD_HHMMSS: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").unwrap();
    static ref YYYYMMDD_T_HHMMSS: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").unwrap();
    static ref YYYYMMDD: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref DDMMYYYY: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
}

pub(crate) fn year_of(year: i32) -> Option<Range<NaiveDate>> {
    let first_day = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let first_day_next_year = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
    Some(first_day..first_day_next_year)
}

/// First day of the given month up to (excluding) first day of the following month.
pub(crate) fn month_range(year: i32, month: u32) -> Option<Range<NaiveDate>> {
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_month_year = if month == 12 { year + 1 } else { year };
    let first_day_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    Some(first_day..first_day_next_month)
}

/// Compute month from an int, based on `today`. If the month given is in future return the
/// same month in last year. E.g. if today is 2024-03, input 6 will return 2023-06.
pub(crate) fn month_of(month: u32, today: NaiveDate) -> Option<Range<NaiveDate>> {
    let mut month = month % 12;
    if month == 0 {
        month = 12;
    }

    let mut year = today.year();
    if month > today.month() {
        year -= 1;
    }

    month_range(year, month)
}

/// First day of the month `date` falls in
pub(crate) fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Parse a date cell from a data file. Dates written by us use `yyyy-mm-dd HH:MM:SS`,
/// older or hand edited files may carry plain dates.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if YYYYMMDD_HHMMSS.is_match(s) {
        NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT).ok()
    } else if YYYYMMDD_T_HHMMSS.is_match(s) {
        // ignore fractions and zone suffix
        NaiveDateTime::parse_from_str(&s[0..19], "%Y-%m-%dT%H:%M:%S").ok()
    } else if DDMMYYYY.is_match(s) {
        NaiveDate::parse_from_str(s, "%d/%m/%Y").ok().and_then(|d| d.and_hms_opt(0, 0, 0))
    } else if YYYYMMDD.is_match(s) {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0))
    } else {
        None
    }
}
