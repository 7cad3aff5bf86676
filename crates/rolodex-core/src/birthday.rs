//! The "birthday soon" notice derived from a contact's birth date.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Utc};

/// Length of the notice window, in days. `today + NOTICE_WINDOW_DAYS` itself
/// is outside the window.
pub const NOTICE_WINDOW_DAYS: i64 = 14;

/// Whether the next occurrence of `birth_date`'s month/day falls in
/// `[today, today + 14 days)`.
///
/// When this year's birthday has already passed, the next year's occurrence
/// is used; if that date minus 365 days lands exactly on `birth_date`
/// (compared as a UTC date-time, so only midnight birth dates can match) the
/// candidate is moved back by one day.
pub fn birthday_soon(birth_date: DateTime<Utc>, today: NaiveDate) -> bool {
  let (month, day) = (birth_date.month(), birth_date.day());

  let Some(mut candidate) = occurrence(today.year(), month, day) else {
    return false;
  };

  if candidate < today {
    let Some(next) = occurrence(today.year() + 1, month, day) else {
      return false;
    };
    let shifted =
      next.and_time(NaiveTime::MIN) - TimeDelta::days(365) == birth_date.naive_utc();
    candidate = if shifted { next - TimeDelta::days(1) } else { next };
  }

  let window_end = today + TimeDelta::days(NOTICE_WINDOW_DAYS);
  today <= candidate && candidate < window_end
}

/// `month/day` in `year`; Feb 29 becomes Feb 28 in non-leap years.
fn occurrence(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
  NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
    (month == 2 && day == 29)
      .then(|| NaiveDate::from_ymd_opt(year, 2, 28))
      .flatten()
  })
}
