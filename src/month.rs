//! Parsing of the `month` query parameter and the SQL condition that filters by it.
//!
//! Every month filtered query matches on the calendar month of the UTC sale
//! date. Only the year-month form, e.g. "2022-03", also restricts the year;
//! month names and numbers match that month in every year.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::Value;
use time::Month;

use crate::{Error, db::WhereClause};

/// The column holding the sale date as text that SQLite's date functions understand.
const DATE_COLUMN: &str = "date_of_sale";

/// Identifies the month that a query should be filtered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSelector {
    /// The calendar month.
    pub month: Month,
    /// The year, when the selector was given in year-month form.
    pub year: Option<i32>,
}

impl MonthSelector {
    /// Select `month` in every year.
    pub fn any_year(month: Month) -> Self {
        Self { month, year: None }
    }

    /// Select `month` in `year` only.
    pub fn in_year(year: i32, month: Month) -> Self {
        Self {
            month,
            year: Some(year),
        }
    }

    /// The zero-based index of the month, January is 0 and December is 11.
    pub fn month_index(&self) -> u8 {
        u8::from(self.month) - 1
    }

    /// Parse an optional `month` query parameter.
    ///
    /// Blank values are treated as missing.
    ///
    /// # Errors
    /// Returns [Error::MissingMonth] if there is no value, or
    /// [Error::InvalidMonth] if the value is not a valid month.
    pub(crate) fn from_query(month: Option<&str>) -> Result<Self, Error> {
        match month.map(str::trim).filter(|month| !month.is_empty()) {
            Some(month) => month.parse(),
            None => Err(Error::MissingMonth),
        }
    }

    /// The condition matching transactions sold in this month.
    pub(crate) fn where_clause(&self) -> WhereClause {
        let clause = WhereClause::default().and(
            format!("CAST(strftime('%m', {DATE_COLUMN}) AS INTEGER) = ?"),
            vec![Value::Integer(u8::from(self.month).into())],
        );

        match self.year {
            Some(year) => clause.and(
                format!("CAST(strftime('%Y', {DATE_COLUMN}) AS INTEGER) = ?"),
                vec![Value::Integer(year.into())],
            ),
            None => clause,
        }
    }
}

impl FromStr for MonthSelector {
    type Err = Error;

    /// Parse a month name ("March", "mar"), a month number (3, "03"), or a year
    /// and month ("2022-03").
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let invalid = || Error::InvalidMonth(text.to_owned());

        if let Some((year, month)) = text.split_once('-') {
            if year.len() != 4 || month.len() != 2 {
                return Err(invalid());
            }

            let year = parse_digits(year).ok_or_else(invalid)?;
            let month = parse_digits(month)
                .and_then(month_from_number)
                .ok_or_else(invalid)?;

            return Ok(Self::in_year(year, month));
        }

        if let Some(number) = parse_digits(text) {
            return month_from_number(number)
                .map(Self::any_year)
                .ok_or_else(invalid);
        }

        month_from_name(text).map(Self::any_year).ok_or_else(invalid)
    }
}

impl Display for MonthSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.year {
            Some(year) => write!(f, "{year:04}-{:02}", u8::from(self.month)),
            None => write!(f, "{}", self.month),
        }
    }
}

/// Parse a non-empty string made up only of ASCII digits.
///
/// Signs and whitespace are rejected, unlike [str::parse].
fn parse_digits(text: &str) -> Option<i32> {
    if text.is_empty() || text.len() > 4 || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    text.parse().ok()
}

fn month_from_number(number: i32) -> Option<Month> {
    u8::try_from(number)
        .ok()
        .and_then(|number| Month::try_from(number).ok())
}

fn month_from_name(name: &str) -> Option<Month> {
    const MONTHS: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    MONTHS.into_iter().find(|month| {
        let full_name = month.to_string();
        name.eq_ignore_ascii_case(&full_name) || name.eq_ignore_ascii_case(&full_name[..3])
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::types::Value;
    use time::Month;

    use crate::{Error, month::MonthSelector};

    #[track_caller]
    fn assert_parses_to(text: &str, want: MonthSelector) {
        assert_eq!(text.parse::<MonthSelector>(), Ok(want));
    }

    #[test]
    fn parses_month_names() {
        assert_parses_to("March", MonthSelector::any_year(Month::March));
        assert_parses_to("march", MonthSelector::any_year(Month::March));
        assert_parses_to("SEP", MonthSelector::any_year(Month::September));
        assert_parses_to(" December ", MonthSelector::any_year(Month::December));
    }

    #[test]
    fn parses_month_numbers() {
        assert_parses_to("3", MonthSelector::any_year(Month::March));
        assert_parses_to("03", MonthSelector::any_year(Month::March));
        assert_parses_to("12", MonthSelector::any_year(Month::December));
    }

    #[test]
    fn parses_year_month() {
        assert_parses_to("2022-03", MonthSelector::in_year(2022, Month::March));
    }

    #[test]
    fn rejects_invalid_months() {
        for text in [
            "", "0", "13", "-1", "+3", "Smarch", "Ma", "2022-3", "22-03", "2022-13", "2022-00",
            "2022-03-01", "3.0",
        ] {
            assert_eq!(
                text.parse::<MonthSelector>(),
                Err(Error::InvalidMonth(text.to_owned())),
                "expected \"{text}\" to be rejected"
            );
        }
    }

    #[test]
    fn month_index_is_zero_based() {
        assert_eq!(MonthSelector::any_year(Month::January).month_index(), 0);
        assert_eq!(MonthSelector::any_year(Month::December).month_index(), 11);
    }

    #[test]
    fn missing_or_blank_query_is_an_error() {
        assert_eq!(MonthSelector::from_query(None), Err(Error::MissingMonth));
        assert_eq!(
            MonthSelector::from_query(Some("  ")),
            Err(Error::MissingMonth)
        );
        assert_eq!(
            MonthSelector::from_query(Some("4")),
            Ok(MonthSelector::any_year(Month::April))
        );
    }

    #[test]
    fn displays_in_the_form_it_matches() {
        assert_eq!(MonthSelector::any_year(Month::March).to_string(), "March");
        assert_eq!(
            MonthSelector::in_year(2022, Month::March).to_string(),
            "2022-03"
        );
    }

    #[test]
    fn year_is_only_filtered_when_given() {
        let any_year = MonthSelector::any_year(Month::March).where_clause();
        let in_year = MonthSelector::in_year(2022, Month::March).where_clause();

        assert_eq!(any_year.params(), &[Value::Integer(3)]);
        assert_eq!(in_year.params(), &[Value::Integer(3), Value::Integer(2022)]);
        assert!(in_year.to_sql().contains("'%Y'"));
    }
}
