//! Date helpers.

use chrono::{DateTime, TimeZone, Timelike, Utc};

/// Checks whether a timestamp carries a time of day other than midnight.
///
/// Returns `true` if any of the hour, minute, second or sub-second components is non-zero.
pub fn date_has_time<T: Timelike>(date: &T) -> bool {
    date.hour() != 0 || date.minute() != 0 || date.second() != 0 || date.nanosecond() != 0
}

/// Checks whether `date` falls on the current calendar day.
///
/// "Today" is taken from the wall clock and evaluated in the time zone of `date`. Use
/// [`is_same_day`] where the current moment must be controlled.
pub fn is_today<Tz: TimeZone>(date: &DateTime<Tz>) -> bool {
    let now = Utc::now().with_timezone(&date.timezone());
    is_same_day(date, &now)
}

/// Checks whether two timestamps fall on the same calendar day in their own time zone.
pub fn is_same_day<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    a.date_naive() == b.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, NaiveDate};

    fn at(h: u32, m: u32, s: u32, milli: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 29)
            .and_then(|d| d.and_hms_milli_opt(h, m, s, milli))
            .expect("valid timestamp")
    }

    #[test]
    fn midnight_has_no_time() {
        assert!(!date_has_time(&at(0, 0, 0, 0)));
        assert!(!date_has_time(&Utc.from_utc_datetime(&at(0, 0, 0, 0))));
    }

    #[test]
    fn any_non_zero_component_has_time() {
        assert!(date_has_time(&at(12, 0, 0, 0)));
        assert!(date_has_time(&at(0, 1, 0, 0)));
        assert!(date_has_time(&at(0, 0, 1, 0)));
        assert!(date_has_time(&at(0, 0, 0, 1)));
        assert!(date_has_time(&at(23, 59, 59, 999)));
    }

    #[test]
    fn start_of_today_is_today() {
        let now = Utc::now();
        let start = Utc.from_utc_datetime(
            &now.date_naive()
                .and_hms_opt(0, 0, 0)
                .expect("midnight exists in UTC"),
        );
        assert!(is_same_day(&start, &now));
        assert!(is_same_day(&now, &now));
        assert!(is_today(&Utc::now()));
    }

    #[test]
    fn more_than_a_day_away_is_not_today() {
        let now = Utc::now();
        assert!(!is_today(&(now - Duration::hours(25))));
        assert!(!is_today(&(now + Duration::hours(25))));
    }

    #[test]
    fn same_day_compares_calendar_days_not_durations() {
        let tz = FixedOffset::east_opt(3 * 3600).expect("valid offset");
        let late = tz.from_local_datetime(&at(23, 59, 0, 0)).single().expect("unambiguous");
        let early = tz.from_local_datetime(&at(0, 1, 0, 0)).single().expect("unambiguous");
        let next_morning = late + Duration::minutes(2);

        assert!(is_same_day(&early, &late));
        assert!(!is_same_day(&late, &next_morning));
    }
}
