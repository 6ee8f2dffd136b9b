use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

pub fn same_calendar_day(a: DateTime<Utc>, b: DateTime<Utc>, tz: Tz) -> bool {
    a.with_timezone(&tz).date_naive() == b.with_timezone(&tz).date_naive()
}

pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

pub fn time_from_minute(minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
}

pub fn local_instant(tz: Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive).earliest() {
        Some(instant) => instant.with_timezone(&Utc),
        // Nonexistent local time (spring-forward gap); read it as UTC rather than fail.
        None => Utc.from_utc_datetime(&naive),
    }
}

pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fixed_time(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("valid datetime")
            .with_timezone(&Utc)
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        let a_start = fixed_time("2026-03-02T10:00:00Z");
        let a_end = fixed_time("2026-03-02T11:00:00Z");
        let b_end = fixed_time("2026-03-02T12:00:00Z");
        assert!(!overlaps(a_start, a_end, a_end, b_end));
        assert!(!overlaps(a_end, b_end, a_start, a_end));
    }

    #[test]
    fn contained_interval_overlaps() {
        assert!(overlaps(0u32, 100, 40, 50));
        assert!(overlaps(40u32, 50, 0, 100));
    }

    #[test]
    fn same_calendar_day_uses_local_dates() {
        let late_evening = fixed_time("2026-03-02T23:30:00Z");
        let next_utc_day = fixed_time("2026-03-03T00:30:00Z");
        assert!(!same_calendar_day(late_evening, next_utc_day, chrono_tz::UTC));
        // Both fall on March 2nd in New York.
        assert!(same_calendar_day(
            late_evening,
            next_utc_day,
            chrono_tz::America::New_York
        ));
    }

    #[test]
    fn minute_of_day_roundtrip() {
        let half_past_nine = NaiveTime::from_hms_opt(9, 30, 0).expect("valid time");
        assert_eq!(minute_of_day(half_past_nine), 570);
        assert_eq!(time_from_minute(570), Some(half_past_nine));
        assert_eq!(time_from_minute(24 * 60), None);
    }

    #[test]
    fn local_instant_maps_through_timezone() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
        let nine = NaiveTime::from_hms_opt(9, 0, 0).expect("valid time");
        let instant = local_instant(chrono_tz::America::New_York, date, nine);
        assert_eq!(instant, fixed_time("2026-03-02T14:00:00Z"));
        assert_eq!(local_date(instant, chrono_tz::America::New_York), date);
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            a_start in 0i64..10_000,
            a_len in 1i64..500,
            b_start in 0i64..10_000,
            b_len in 1i64..500
        ) {
            let a_end = a_start + a_len;
            let b_end = b_start + b_len;
            prop_assert_eq!(
                overlaps(a_start, a_end, b_start, b_end),
                overlaps(b_start, b_end, a_start, a_end)
            );
        }

        #[test]
        fn non_degenerate_interval_overlaps_itself(start in 0i64..10_000, len in 1i64..500) {
            prop_assert!(overlaps(start, start + len, start, start + len));
        }
    }
}
