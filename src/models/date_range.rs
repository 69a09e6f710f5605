//! Half-open date intervals used for stays, restrictions and availability queries.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::BookingError;

/// Wire format for dates in forms, query strings and JSON.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated `[start, end)` interval of calendar days.
///
/// `end` is the checkout day and is not occupied, so a stay ending on a given
/// day never conflicts with a stay starting that same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting empty or inverted intervals.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidRange`] unless `start < end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, BookingError> {
        if start >= end {
            return Err(BookingError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses two `YYYY-MM-DD` strings into a range.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidInput`] for an unparseable date and
    /// [`BookingError::InvalidRange`] when the dates are out of order.
    pub fn parse(start: &str, end: &str) -> Result<Self, BookingError> {
        let start = parse_date(start, "start")?;
        let end = parse_date(end, "end")?;
        Self::new(start, end)
    }

    /// The one-night range starting on `date`.
    pub fn single_day(date: NaiveDate) -> Result<Self, BookingError> {
        let end = date
            .succ_opt()
            .ok_or_else(|| BookingError::InvalidInput(format!("Date out of range: {date}")))?;
        Self::new(date, end)
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// `[a1, a2)` and `[b1, b2)` overlap iff `a1 < b2 && b1 < a2`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Every occupied day, checkout excluded.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}

/// Parses a `YYYY-MM-DD` value, naming `field` in the error.
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| BookingError::InvalidInput(format!("Invalid {field} date: '{value}'")))
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_rejects_empty_and_inverted_ranges() {
        assert!(matches!(
            DateRange::new(d("2050-01-02"), d("2050-01-02")),
            Err(BookingError::InvalidRange { .. })
        ));
        assert!(matches!(
            DateRange::new(d("2050-01-03"), d("2050-01-02")),
            Err(BookingError::InvalidRange { .. })
        ));
        assert!(DateRange::new(d("2050-01-01"), d("2050-01-02")).is_ok());
    }

    #[test]
    fn test_parse_reports_bad_dates_as_invalid_input() {
        assert!(matches!(
            DateRange::parse("2050-13-01", "2050-01-02"),
            Err(BookingError::InvalidInput(_))
        ));
        assert!(matches!(
            DateRange::parse("2050-01-01", "tomorrow"),
            Err(BookingError::InvalidInput(_))
        ));
        let range = DateRange::parse(" 2050-01-01 ", "2050-01-04").unwrap();
        assert_eq!(range.nights(), 3);
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        let stay = DateRange::parse("2050-01-01", "2050-01-05").unwrap();
        let next = DateRange::parse("2050-01-05", "2050-01-06").unwrap();
        let before = DateRange::parse("2049-12-30", "2050-01-01").unwrap();
        assert!(!stay.overlaps(&next));
        assert!(!next.overlaps(&stay));
        assert!(!stay.overlaps(&before));
    }

    #[test]
    fn test_overlap_cases() {
        let stay = DateRange::parse("2050-01-03", "2050-01-07").unwrap();
        for (s, e) in [
            ("2050-01-01", "2050-01-04"),
            ("2050-01-06", "2050-01-10"),
            ("2050-01-04", "2050-01-05"),
            ("2050-01-01", "2050-01-10"),
            ("2050-01-03", "2050-01-07"),
        ] {
            let other = DateRange::parse(s, e).unwrap();
            assert!(stay.overlaps(&other), "{s}..{e} should overlap");
            assert!(other.overlaps(&stay), "{s}..{e} should overlap (symmetric)");
        }
    }

    #[test]
    fn test_days_excludes_checkout() {
        let range = DateRange::parse("2050-01-30", "2050-02-02").unwrap();
        let days: Vec<String> = range.days().map(format_date).collect();
        assert_eq!(days, vec!["2050-01-30", "2050-01-31", "2050-02-01"]);
        assert!(range.contains(d("2050-02-01")));
        assert!(!range.contains(d("2050-02-02")));
    }

    #[test]
    fn test_single_day() {
        let range = DateRange::single_day(d("2050-02-28")).unwrap();
        assert_eq!(range.end(), d("2050-03-01"));
        assert_eq!(range.nights(), 1);
    }
}
