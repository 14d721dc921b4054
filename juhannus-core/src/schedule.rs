//! Midsummer date rules.
//!
//! Midsummer Saturday is the Saturday between June 20 and 26. Voting closes on
//! the Thursday before it at 23:59:59 and results are due on the Sunday after
//! it at 22:00, both in local time of the configured zone.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;

const MIDSUMMER_MONTH: u32 = 6;
const FIRST_CANDIDATE_DAY: u32 = 20;
const LAST_CANDIDATE_DAY: u32 = 26;

/// Range of years the date rules accept. Well inside chrono's calendar.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Calendar date of midsummer Saturday in `year`.
///
/// Seven consecutive days always contain exactly one Saturday, so the scan
/// cannot come up empty for any year chrono can represent. Callers taking
/// years from user input should bound them to `MIN_YEAR..=MAX_YEAR`.
pub fn midsummer_date(year: i32) -> NaiveDate {
    (FIRST_CANDIDATE_DAY..=LAST_CANDIDATE_DAY)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, MIDSUMMER_MONTH, day))
        .find(|date| date.weekday() == Weekday::Sat)
        .unwrap_or_else(|| {
            unreachable!("June {FIRST_CANDIDATE_DAY}-{LAST_CANDIDATE_DAY} of {year} has no Saturday")
        })
}

/// Deadline computations pinned to one timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    tz: Tz,
}

impl Schedule {
    pub fn new(tz: Tz) -> Self {
        Schedule { tz }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Midsummer Saturday at local midnight.
    pub fn midsummer_saturday(&self, year: i32) -> DateTime<Tz> {
        self.at_local(midsummer_date(year), NaiveTime::MIN)
    }

    /// Thursday before midsummer Saturday, 23:59:59 local.
    pub fn voting_deadline(&self, year: i32) -> DateTime<Tz> {
        let thursday = midsummer_date(year) - Duration::days(2);
        self.at_local(thursday, hms(23, 59, 59))
    }

    /// Sunday after midsummer Saturday, 22:00:00 local.
    pub fn results_deadline(&self, year: i32) -> DateTime<Tz> {
        let sunday = midsummer_date(year) + Duration::days(1);
        self.at_local(sunday, hms(22, 0, 0))
    }

    /// Voting is open up to and including the deadline instant.
    ///
    /// `now` may be in any zone; the comparison is between instants.
    pub fn is_voting_open<T: TimeZone>(&self, year: i32, now: &DateTime<T>) -> bool {
        *now <= self.voting_deadline(year)
    }

    /// Whether `now` falls in the ISO week of its own year's midsummer Saturday.
    pub fn is_midsummer_week<T: TimeZone>(&self, now: &DateTime<T>) -> bool {
        let local = now.with_timezone(&self.tz);
        local.iso_week() == self.midsummer_saturday(local.year()).iso_week()
    }

    /// Resolve a local wall-clock time. A time inside a DST gap falls back to
    /// the same wall-clock reading taken as UTC.
    fn at_local(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
        let naive = date.and_time(time);
        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .unwrap_or_else(|| self.tz.from_utc_datetime(&naive))
    }
}

fn hms(hour: u32, min: u32, sec: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, sec)
        .unwrap_or_else(|| unreachable!("{hour:02}:{min:02}:{sec:02} is a valid time"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};
    use chrono_tz::Europe::Helsinki;
    use proptest::prelude::*;

    fn schedule() -> Schedule {
        Schedule::new(Helsinki)
    }

    #[test]
    fn midsummer_saturday_known_years() {
        assert_eq!(schedule().midsummer_saturday(2018).day(), 23);
        assert_eq!(schedule().midsummer_saturday(2020).day(), 20);
        assert_eq!(schedule().midsummer_saturday(2019).day(), 22);
        assert_eq!(schedule().midsummer_saturday(2021).day(), 26);
    }

    #[test]
    fn midsummer_saturday_is_local_midnight() {
        let sat = schedule().midsummer_saturday(2018);
        assert_eq!(sat.to_rfc3339(), "2018-06-23T00:00:00+03:00");
        assert_eq!((sat.hour(), sat.minute(), sat.second()), (0, 0, 0));
    }

    #[test]
    fn midsummer_week_number() {
        assert_eq!(schedule().midsummer_saturday(2018).iso_week().week(), 25);
    }

    #[test]
    fn voting_deadline_known_years() {
        assert_eq!(
            schedule().voting_deadline(2018).to_rfc3339(),
            "2018-06-21T23:59:59+03:00"
        );
        assert_eq!(
            schedule().voting_deadline(2020).to_rfc3339(),
            "2020-06-18T23:59:59+03:00"
        );
    }

    #[test]
    fn results_deadline_known_years() {
        assert_eq!(
            schedule().results_deadline(2018).to_rfc3339(),
            "2018-06-24T22:00:00+03:00"
        );
        assert_eq!(
            schedule().results_deadline(2020).to_rfc3339(),
            "2020-06-21T22:00:00+03:00"
        );
    }

    #[test]
    fn voting_open_until_deadline_inclusive() {
        let s = schedule();
        let deadline = s.voting_deadline(2018);

        assert!(s.is_voting_open(2018, &(deadline - Duration::seconds(1))));
        assert!(s.is_voting_open(2018, &deadline));
        assert!(!s.is_voting_open(2018, &(deadline + Duration::seconds(1))));
    }

    #[test]
    fn voting_open_compares_instants_not_wall_clock() {
        let s = schedule();
        // 23:59:59 in Helsinki (UTC+3) is 20:59:59 UTC
        let last_second = Utc.with_ymd_and_hms(2018, 6, 21, 20, 59, 59).unwrap();
        let first_closed = Utc.with_ymd_and_hms(2018, 6, 21, 21, 0, 0).unwrap();
        // Same wall-clock reading as the deadline, but in UTC: three hours late
        let naive_lookalike = Utc.with_ymd_and_hms(2018, 6, 21, 23, 59, 59).unwrap();

        assert!(s.is_voting_open(2018, &last_second));
        assert!(!s.is_voting_open(2018, &first_closed));
        assert!(!s.is_voting_open(2018, &naive_lookalike));
    }

    #[test]
    fn voting_open_far_past_and_future() {
        let s = schedule();
        let past = Helsinki.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap();
        let future = Helsinki.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();

        assert!(s.is_voting_open(2018, &past));
        assert!(!s.is_voting_open(2018, &future));
    }

    #[test]
    fn midsummer_week_bounds() {
        let s = schedule();
        // 2018: Saturday June 23, ISO week runs Mon June 18 .. Sun June 24
        let monday = Helsinki.with_ymd_and_hms(2018, 6, 18, 0, 0, 0).unwrap();
        let sunday = Helsinki.with_ymd_and_hms(2018, 6, 24, 23, 59, 59).unwrap();
        let prev_sunday = Helsinki.with_ymd_and_hms(2018, 6, 17, 23, 59, 59).unwrap();
        let next_monday = Helsinki.with_ymd_and_hms(2018, 6, 25, 0, 0, 0).unwrap();

        assert!(s.is_midsummer_week(&monday));
        assert!(s.is_midsummer_week(&sunday));
        assert!(!s.is_midsummer_week(&prev_sunday));
        assert!(!s.is_midsummer_week(&next_monday));
    }

    #[test]
    fn midsummer_week_uses_local_date() {
        let s = schedule();
        // Sunday 22:30 UTC is already Monday 01:30 in Helsinki
        let utc = Utc.with_ymd_and_hms(2018, 6, 17, 22, 30, 0).unwrap();
        assert!(s.is_midsummer_week(&utc));
    }

    proptest! {
        #[test]
        fn saturday_always_in_range(year in MIN_YEAR..=MAX_YEAR) {
            let date = midsummer_date(year);
            prop_assert_eq!(date.weekday(), Weekday::Sat);
            prop_assert!((20..=26).contains(&date.day()));
            prop_assert_eq!(date.month(), 6);
        }

        #[test]
        fn deadlines_follow_saturday(year in 1900i32..=2200) {
            let s = schedule();
            let sat = s.midsummer_saturday(year).date_naive();
            let voting = s.voting_deadline(year);
            let results = s.results_deadline(year);

            prop_assert_eq!(voting.date_naive(), sat - Duration::days(2));
            prop_assert_eq!(voting.time(), NaiveTime::from_hms_opt(23, 59, 59).unwrap());
            prop_assert_eq!(results.date_naive(), sat + Duration::days(1));
            prop_assert_eq!(results.time(), NaiveTime::from_hms_opt(22, 0, 0).unwrap());
        }
    }
}
