//! Parser for raid-log timestamp tokens.
//!
//! This module uses the `nom` parsing library to parse the two token shapes
//! that appear in Beemo raid logs. The parser is designed with correctness as
//! the primary goal, followed by performance.
//!
//! # Token Formats
//!
//! Join-time tokens carry a clock time plus a 4-digit UTC offset:
//! ```text
//! 17:23:05.128-0700
//! ```
//!
//! Date tokens carry the calendar date shared by every join time in the
//! document, with either separator:
//! ```text
//! 2022/01/15
//! 2022-01-15
//! ```

use chrono::{NaiveDate, NaiveTime};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take,
    character::complete::char,
    combinator::{map_res, value},
};
use thiserror::Error;

use crate::token::TimeToken;

/// Errors that can occur during token parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    #[error("Invalid clock time: {0}")]
    InvalidTime(String),

    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a fixed-width run of ASCII digits into a number.
fn fixed_digits(width: usize) -> impl FnMut(&str) -> IResult<&str, u32> {
    move |input| {
        map_res(take(width), |s: &str| {
            if s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse::<u32>().map_err(|_| "not a number")
            } else {
                Err("not a number")
            }
        })
        .parse(input)
    }
}

/// Parse the sign of a UTC offset suffix.
fn parse_offset_sign(input: &str) -> IResult<&str, i32> {
    alt((value(1, char('+')), value(-1, char('-')))).parse(input)
}

/// Parse the separator of a date token (`/` or `-`).
fn parse_date_separator(input: &str) -> IResult<&str, char> {
    alt((char('/'), char('-'))).parse(input)
}

/// Parse a complete join-time token like `17:23:05.128-0700`.
///
/// The clock fields are validated as a real time of day; the offset suffix is
/// converted to signed minutes. Out-of-range clock values (e.g. hour 25)
/// produce [`ParseError::InvalidTime`].
///
/// # Example
///
/// ```
/// use beemo_log_analyzer::parser::parse_time_token;
///
/// let token = parse_time_token("17:23:05.128-0700").unwrap();
/// assert_eq!(token.offset_minutes, -420);
/// ```
pub fn parse_time_token(input: &str) -> ParseResult<TimeToken> {
    let result: IResult<&str, (u32, u32, u32, u32, i32)> = (|input| {
        let (input, hour) = fixed_digits(2)(input)?;
        let (input, _) = char(':')(input)?;
        let (input, minute) = fixed_digits(2)(input)?;
        let (input, _) = char(':')(input)?;
        let (input, second) = fixed_digits(2)(input)?;
        let (input, _) = char('.')(input)?;
        let (input, milli) = fixed_digits(3)(input)?;
        let (input, sign) = parse_offset_sign(input)?;
        let (input, offset_hours) = fixed_digits(2)(input)?;
        let (input, offset_mins) = fixed_digits(2)(input)?;
        let offset = sign * (offset_hours as i32 * 60 + offset_mins as i32);
        Ok((input, (hour, minute, second, milli, offset)))
    })(input);

    let (hour, minute, second, milli, offset_minutes) = match result {
        Ok((_, fields)) => fields,
        Err(e) => return Err(ParseError::InvalidFormat(format!("{:?}", e))),
    };

    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, milli)
        .ok_or_else(|| ParseError::InvalidTime(input.to_string()))?;

    Ok(TimeToken {
        time,
        offset_minutes,
    })
}

/// Parse a date token like `2022/01/15` or `2022-01-15`.
///
/// Separators may be mixed; both are normalized away by parsing straight into
/// a [`NaiveDate`]. Impossible calendar dates (month 13, day 32) produce
/// [`ParseError::InvalidDate`].
pub fn parse_log_date(input: &str) -> ParseResult<NaiveDate> {
    let result: IResult<&str, (u32, u32, u32)> = (|input| {
        let (input, year) = fixed_digits(4)(input)?;
        let (input, _) = parse_date_separator(input)?;
        let (input, month) = fixed_digits(2)(input)?;
        let (input, _) = parse_date_separator(input)?;
        let (input, day) = fixed_digits(2)(input)?;
        Ok((input, (year, month, day)))
    })(input);

    let (year, month, day) = match result {
        Ok((_, fields)) => fields,
        Err(e) => return Err(ParseError::InvalidFormat(format!("{:?}", e))),
    };

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| ParseError::InvalidDate(input.to_string()))
}
