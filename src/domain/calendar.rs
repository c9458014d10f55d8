use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A (month, day) key ignoring year, used for climatological aggregation.
///
/// February 29 never appears as a key: leap-day readings are excluded
/// upstream, and every date-arithmetic helper below remaps a computed Feb 29
/// so lookups never miss.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay {
    pub month: u32,
    pub day: u32,
}

impl CalendarDay {
    pub fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl std::fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}.{:02}", self.day, self.month)
    }
}

/// Forward shift rule used during event alignment.
///
/// A shifted lookup date advances one day when it lands on Feb 29, and also
/// when its month is one of `dodge_months` (the spring months whose source
/// tables have known one-day gaps). The months are configurable per dataset
/// rather than baked in.
pub fn dodge_forward(date: NaiveDate, dodge_months: &[u32]) -> NaiveDate {
    if (date.month() == 2 && date.day() == 29) || dodge_months.contains(&date.month()) {
        date + Duration::days(1)
    } else {
        date
    }
}

/// Backward shift rule used by the Monte-Carlo samplers: an interval date that
/// lands on Feb 29 retreats to Feb 28.
pub fn retreat_from_leap_day(date: NaiveDate) -> NaiveDate {
    if date.month() == 2 && date.day() == 29 {
        date - Duration::days(1)
    } else {
        date
    }
}
