use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

// Synthetic anchor years used for all window-internal date arithmetic.
// 1972 is a leap year, so an END of Feb 29 stays representable.
const ANCHOR_START_YEAR: i32 = 1971;
const ANCHOR_END_YEAR: i32 = 1972;

/// A season boundary defined by (month, day) pairs, usually wrapping the year
/// boundary (e.g. Dec 1 – Feb 29, Nov 1 – Mar 31, Oct 1 – Apr 30).
///
/// All internal arithmetic places START and END on two consecutive synthetic
/// years when END's calendar position precedes START's, so `days_count` is
/// independent of which real year a date falls in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinterWindow {
    start_month: u32,
    start_day: u32,
    end_month: u32,
    end_day: u32,
}

impl WinterWindow {
    /// The default season used by the original study: Dec 1 through Feb 29.
    pub fn december_to_february() -> Self {
        // Boundaries are known-valid, construction cannot fail.
        Self::new(12, 1, 2, 29).unwrap()
    }

    pub fn new(start_month: u32, start_day: u32, end_month: u32, end_day: u32) -> Result<Self> {
        let window = Self {
            start_month,
            start_day,
            end_month,
            end_day,
        };
        // Validate both boundaries against the leap anchor year so Feb 29
        // is accepted as an END.
        if NaiveDate::from_ymd_opt(ANCHOR_END_YEAR, start_month, start_day).is_none() {
            return Err(AnalysisError::configuration(format!(
                "invalid window start {start_day:02}.{start_month:02}"
            )));
        }
        if NaiveDate::from_ymd_opt(ANCHOR_END_YEAR, end_month, end_day).is_none() {
            return Err(AnalysisError::configuration(format!(
                "invalid window end {end_day:02}.{end_month:02}"
            )));
        }
        if !window.wraps() && (start_month, start_day) == (end_month, end_day) {
            return Err(AnalysisError::configuration(
                "window start and end coincide",
            ));
        }
        Ok(window)
    }

    /// True when the window crosses the year boundary (END's calendar
    /// position precedes START's). Every window used by the source datasets
    /// wraps; non-wrapping windows are supported but see `is_within`.
    pub fn wraps(&self) -> bool {
        (self.end_month, self.end_day) < (self.start_month, self.start_day)
    }

    fn anchor_start(&self) -> NaiveDate {
        let year = if self.wraps() {
            ANCHOR_START_YEAR
        } else {
            ANCHOR_END_YEAR
        };
        // Validated in `new`
        NaiveDate::from_ymd_opt(year, self.start_month, self.start_day).unwrap()
    }

    fn anchor_end(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(ANCHOR_END_YEAR, self.end_month, self.end_day).unwrap()
    }

    /// Inclusive day span between START and END.
    pub fn days_count(&self) -> i64 {
        (self.anchor_end() - self.anchor_start()).num_days() + 1
    }

    /// Map `date` into `[0, days_count)`.
    ///
    /// The synthetic year is chosen by the half-year heuristic: months after
    /// June belong to START's year, the rest to END's. This is valid for the
    /// autumn-to-spring windows the datasets use; behavior for a window
    /// spanning May–September is unspecified.
    pub fn day_index(&self, date: NaiveDate) -> Result<usize> {
        let year = if self.wraps() && date.month() > 6 {
            ANCHOR_START_YEAR
        } else {
            ANCHOR_END_YEAR
        };
        // Feb 29 projected onto a non-leap anchor year has no index.
        let synthetic = NaiveDate::from_ymd_opt(year, date.month(), date.day())
            .ok_or(AnalysisError::OutOfRange { date })?;
        let days = (synthetic - self.anchor_start()).num_days();
        if (0..self.days_count()).contains(&days) {
            Ok(days as usize)
        } else {
            Err(AnalysisError::OutOfRange { date })
        }
    }

    /// Loose membership predicate used for seasonal gating.
    ///
    /// For a wrapping window the two boundary comparisons are OR-ed: a date
    /// qualifies if it is on/after START or on/before END in calendar terms.
    /// A non-wrapping window AND-s them instead (OR would admit every date).
    pub fn is_within(&self, date: NaiveDate) -> bool {
        let on_or_after_start = date.month() > self.start_month
            || (date.month() == self.start_month && date.day() >= self.start_day);
        let on_or_before_end = date.month() < self.end_month
            || (date.month() == self.end_month && date.day() <= self.end_day);

        if self.wraps() {
            on_or_after_start || on_or_before_end
        } else {
            on_or_after_start && on_or_before_end
        }
    }

    /// The window's start date placed in a concrete year. Used by the
    /// control-sample generator to turn a (year, window-day) draw into a date.
    pub fn start_in_year(&self, year: i32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.start_month, self.start_day).ok_or_else(|| {
            AnalysisError::configuration(format!(
                "window start {:02}.{:02} does not exist in {year}",
                self.start_day, self.start_month
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn default_window_spans_91_days() {
        // Dec 1 .. Feb 29 across the 1971/1972 anchor pair
        assert_eq!(WinterWindow::december_to_february().days_count(), 91);
    }

    #[test]
    fn days_count_is_independent_of_observation_year() {
        let w = WinterWindow::new(11, 1, 3, 31).unwrap();
        let count = w.days_count();
        for year in [1975, 1988, 2000] {
            assert!(w.day_index(d(year, 12, 15)).is_ok());
            assert_eq!(w.days_count(), count);
        }
        assert_eq!(count, 152);
    }

    #[test]
    fn day_index_maps_both_sides_of_new_year() {
        let w = WinterWindow::december_to_february();
        assert_eq!(w.day_index(d(1999, 12, 1)).unwrap(), 0);
        assert_eq!(w.day_index(d(1999, 12, 31)).unwrap(), 30);
        assert_eq!(w.day_index(d(2000, 1, 1)).unwrap(), 31);
        assert_eq!(w.day_index(d(2000, 2, 29)).unwrap(), 90);
    }

    #[test]
    fn day_index_rejects_out_of_window_dates() {
        let w = WinterWindow::december_to_february();
        assert!(matches!(
            w.day_index(d(2000, 7, 1)),
            Err(AnalysisError::OutOfRange { .. })
        ));
        assert!(matches!(
            w.day_index(d(2000, 3, 1)),
            Err(AnalysisError::OutOfRange { .. })
        ));
    }

    #[test]
    fn wrapping_membership_is_or_based() {
        let w = WinterWindow::new(11, 1, 3, 31).unwrap();
        assert!(w.is_within(d(1990, 11, 1)));
        assert!(w.is_within(d(1990, 12, 25)));
        assert!(w.is_within(d(1991, 1, 10)));
        assert!(w.is_within(d(1991, 3, 31)));
        assert!(!w.is_within(d(1991, 4, 1)));
        assert!(!w.is_within(d(1990, 10, 31)));
        assert!(!w.is_within(d(1990, 7, 15)));
    }

    #[test]
    fn non_wrapping_membership_is_and_based() {
        let w = WinterWindow::new(1, 10, 2, 20).unwrap();
        assert!(w.is_within(d(1990, 1, 10)));
        assert!(w.is_within(d(1990, 2, 1)));
        assert!(w.is_within(d(1990, 2, 20)));
        assert!(!w.is_within(d(1990, 1, 9)));
        assert!(!w.is_within(d(1990, 2, 21)));
        assert!(!w.is_within(d(1990, 8, 1)));
    }

    #[test]
    fn rejects_nonsensical_boundaries() {
        assert!(WinterWindow::new(13, 1, 2, 28).is_err());
        assert!(WinterWindow::new(12, 32, 2, 28).is_err());
        assert!(WinterWindow::new(2, 30, 12, 1).is_err());
        assert!(WinterWindow::new(12, 1, 12, 1).is_err());
    }

    #[test]
    fn start_in_year_resolves_concrete_dates() {
        let w = WinterWindow::new(10, 1, 4, 30).unwrap();
        assert_eq!(w.start_in_year(1985).unwrap(), d(1985, 10, 1));
    }
}
