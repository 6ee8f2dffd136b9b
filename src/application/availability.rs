use crate::application::conflict::{break_for_span, has_conflict};
use crate::domain::interval::{local_instant, minute_of_day, time_from_minute};
use crate::domain::models::{Appointment, CandidateSlot, SlotReason, WorkingWindow};
use crate::infrastructure::break_registry::BreakRegistry;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::error::EngineError;
use chrono::{DateTime, Duration, NaiveDate, Utc};

#[allow(clippy::too_many_arguments)]
pub fn compute_slots(
    config: &EngineConfig,
    registry: &BreakRegistry,
    date: NaiveDate,
    window: &WorkingWindow,
    duration_minutes: u32,
    appointments: &[Appointment],
    staff_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<CandidateSlot>, EngineError> {
    if duration_minutes == 0 {
        return Err(EngineError::InvalidInterval(
            "duration_minutes must be > 0".to_string(),
        ));
    }
    window.validate().map_err(EngineError::InvalidConfig)?;

    let open_minute = minute_of_day(window.open);
    let close_minute = minute_of_day(window.close);
    if open_minute == close_minute {
        return Ok(Vec::new());
    }

    let granularity = window
        .granularity_minutes
        .unwrap_or(config.slot_granularity_minutes)
        .max(1);
    let earliest_bookable = now + Duration::minutes(config.lead_time_minutes as i64);

    let mut slots = Vec::new();
    let mut minute = open_minute;
    while minute < close_minute {
        let slot_minute = minute;
        minute += granularity;

        if slot_minute + duration_minutes > close_minute {
            continue;
        }
        let Some(time) = time_from_minute(slot_minute) else {
            continue;
        };

        let candidate_start = local_instant(config.timezone, date, time);
        let candidate_end = candidate_start + Duration::minutes(duration_minutes as i64);
        let booked = has_conflict(
            candidate_start,
            candidate_end,
            appointments,
            Some(staff_id),
            None,
        )?;
        let past = candidate_start < earliest_bookable;
        let on_break = break_for_span(registry, time, duration_minutes)?.is_some();

        let reason = if booked {
            Some(SlotReason::Booked)
        } else if past {
            Some(SlotReason::Past)
        } else if on_break {
            Some(SlotReason::Break)
        } else {
            None
        };

        slots.push(CandidateSlot {
            time,
            label: time.format("%I:%M %p").to_string(),
            available: !booked && !past,
            reason,
        });
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AppointmentStatus, BreakSlot};
    use crate::infrastructure::break_store::InMemoryBreakStore;
    use chrono::NaiveTime;
    use std::sync::Arc;

    fn fixed_time(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("valid datetime")
            .with_timezone(&Utc)
    }

    fn time_of_day(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
    }

    fn sample_window() -> WorkingWindow {
        WorkingWindow {
            open: time_of_day(9, 0),
            close: time_of_day(17, 0),
            granularity_minutes: None,
        }
    }

    fn empty_registry() -> BreakRegistry {
        BreakRegistry::new(Arc::new(InMemoryBreakStore::default()))
    }

    fn booking(id: &str, staff_id: &str, start: &str, end: &str) -> Appointment {
        Appointment {
            id: id.to_string(),
            staff_id: staff_id.to_string(),
            service_id: "svc-colour".to_string(),
            customer_id: "cus-1".to_string(),
            start_at: fixed_time(start),
            end_at: fixed_time(end),
            status: AppointmentStatus::Confirmed,
            notes: None,
            customer_name: String::new(),
            service_name: String::new(),
            staff_name: String::new(),
        }
    }

    fn slot_at<'a>(slots: &'a [CandidateSlot], hour: u32, minute: u32) -> &'a CandidateSlot {
        slots
            .iter()
            .find(|slot| slot.time == time_of_day(hour, minute))
            .expect("slot present")
    }

    #[test]
    fn booking_shadows_every_overlapping_candidate() {
        let config = EngineConfig::default();
        let registry = empty_registry();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
        let bookings = vec![booking(
            "apt-1",
            "stf-1",
            "2026-03-02T10:00:00Z",
            "2026-03-02T11:00:00Z",
        )];

        let slots = compute_slots(
            &config,
            &registry,
            date,
            &sample_window(),
            60,
            &bookings,
            "stf-1",
            fixed_time("2026-03-02T00:00:00Z"),
        )
        .expect("compute slots");

        // 16 grid positions minus the 16:30 tail candidate whose hour overflows close.
        assert_eq!(slots.len(), 15);
        assert!(slot_at(&slots, 9, 0).available);
        for (hour, minute) in [(9, 30), (10, 0), (10, 30)] {
            let slot = slot_at(&slots, hour, minute);
            assert!(!slot.available, "{hour}:{minute:02} should be booked");
            assert_eq!(slot.reason, Some(SlotReason::Booked));
        }
        assert!(slot_at(&slots, 11, 0).available);
        assert!(slot_at(&slots, 16, 0).available);
    }

    #[test]
    fn no_bookings_leaves_all_future_slots_available() {
        let config = EngineConfig::default();
        let registry = empty_registry();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");

        let slots = compute_slots(
            &config,
            &registry,
            date,
            &sample_window(),
            30,
            &[],
            "stf-1",
            fixed_time("2026-03-01T00:00:00Z"),
        )
        .expect("compute slots");

        assert_eq!(slots.len(), 16);
        assert!(slots.iter().all(|slot| slot.available));
        assert!(slots.windows(2).all(|pair| pair[0].time < pair[1].time));
    }

    #[test]
    fn lead_time_marks_near_slots_past() {
        let config = EngineConfig::default();
        let registry = empty_registry();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");

        let slots = compute_slots(
            &config,
            &registry,
            date,
            &sample_window(),
            30,
            &[],
            "stf-1",
            fixed_time("2026-03-02T10:00:00Z"),
        )
        .expect("compute slots");

        let ten = slot_at(&slots, 10, 0);
        assert!(!ten.available);
        assert_eq!(ten.reason, Some(SlotReason::Past));
        // 10:30 is exactly now + lead time and therefore bookable.
        assert!(slot_at(&slots, 10, 30).available);
    }

    #[test]
    fn breaks_are_informational_not_blocking() {
        let config = EngineConfig::default();
        let registry = empty_registry();
        registry
            .add(BreakSlot {
                id: "brk-lunch".to_string(),
                label: "Lunch".to_string(),
                color: "#facc15".to_string(),
                start: time_of_day(12, 0),
                end: time_of_day(13, 0),
            })
            .expect("add break");
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");

        let slots = compute_slots(
            &config,
            &registry,
            date,
            &sample_window(),
            30,
            &[],
            "stf-1",
            fixed_time("2026-03-02T00:00:00Z"),
        )
        .expect("compute slots");

        for (hour, minute) in [(12, 0), (12, 30)] {
            let slot = slot_at(&slots, hour, minute);
            assert!(slot.available);
            assert_eq!(slot.reason, Some(SlotReason::Break));
        }
        // Touching endpoints do not intersect the break.
        assert_eq!(slot_at(&slots, 11, 30).reason, None);
        assert_eq!(slot_at(&slots, 13, 0).reason, None);
    }

    #[test]
    fn empty_window_yields_no_slots() {
        let config = EngineConfig::default();
        let registry = empty_registry();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
        let window = WorkingWindow {
            open: time_of_day(9, 0),
            close: time_of_day(9, 0),
            granularity_minutes: None,
        };

        let slots = compute_slots(
            &config,
            &registry,
            date,
            &window,
            30,
            &[],
            "stf-1",
            fixed_time("2026-03-02T00:00:00Z"),
        )
        .expect("compute slots");
        assert!(slots.is_empty());
    }

    #[test]
    fn zero_duration_is_rejected() {
        let config = EngineConfig::default();
        let registry = empty_registry();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");

        let result = compute_slots(
            &config,
            &registry,
            date,
            &sample_window(),
            0,
            &[],
            "stf-1",
            fixed_time("2026-03-02T00:00:00Z"),
        );
        assert!(matches!(result, Err(EngineError::InvalidInterval(_))));
    }

    #[test]
    fn other_staff_bookings_do_not_shadow_slots() {
        let config = EngineConfig::default();
        let registry = empty_registry();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
        let bookings = vec![booking(
            "apt-1",
            "stf-other",
            "2026-03-02T10:00:00Z",
            "2026-03-02T11:00:00Z",
        )];

        let slots = compute_slots(
            &config,
            &registry,
            date,
            &sample_window(),
            60,
            &bookings,
            "stf-1",
            fixed_time("2026-03-02T00:00:00Z"),
        )
        .expect("compute slots");
        assert!(slots.iter().all(|slot| slot.available));
    }

    #[test]
    fn identical_inputs_produce_identical_slots() {
        let config = EngineConfig::default();
        let registry = empty_registry();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
        let bookings = vec![booking(
            "apt-1",
            "stf-1",
            "2026-03-02T13:00:00Z",
            "2026-03-02T14:00:00Z",
        )];
        let now = fixed_time("2026-03-02T00:00:00Z");

        let first = compute_slots(
            &config, &registry, date, &sample_window(), 45, &bookings, "stf-1", now,
        )
        .expect("first run");
        let second = compute_slots(
            &config, &registry, date, &sample_window(), 45, &bookings, "stf-1", now,
        )
        .expect("second run");
        assert_eq!(first, second);
    }

    #[test]
    fn window_granularity_override_wins() {
        let config = EngineConfig::default();
        let registry = empty_registry();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
        let window = WorkingWindow {
            open: time_of_day(9, 0),
            close: time_of_day(11, 0),
            granularity_minutes: Some(15),
        };

        let slots = compute_slots(
            &config,
            &registry,
            date,
            &window,
            15,
            &[],
            "stf-1",
            fixed_time("2026-03-02T00:00:00Z"),
        )
        .expect("compute slots");
        assert_eq!(slots.len(), 8);
        assert_eq!(slots[1].time, time_of_day(9, 15));
    }
}
