use crate::domain::interval::{minute_of_day, overlaps};
use crate::domain::models::{Appointment, AppointmentStatus, BreakSlot};
use crate::infrastructure::break_registry::BreakRegistry;
use crate::infrastructure::error::EngineError;
use chrono::{DateTime, NaiveTime, Utc};

pub fn has_conflict(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    appointments: &[Appointment],
    staff_id: Option<&str>,
    exclude_id: Option<&str>,
) -> Result<bool, EngineError> {
    if end <= start {
        return Err(EngineError::InvalidInterval(
            "end must be after start".to_string(),
        ));
    }

    Ok(appointments
        .iter()
        .filter(|appointment| appointment.status != AppointmentStatus::Cancelled)
        .filter(|appointment| {
            exclude_id.is_none_or(|excluded| appointment.id != excluded)
        })
        .filter(|appointment| staff_id.is_none_or(|staff| appointment.staff_id == staff))
        .any(|appointment| overlaps(start, end, appointment.start_at, appointment.end_at)))
}

pub fn break_for_span(
    registry: &BreakRegistry,
    time_of_day: NaiveTime,
    duration_minutes: u32,
) -> Result<Option<BreakSlot>, EngineError> {
    if duration_minutes == 0 {
        return Err(EngineError::InvalidInterval(
            "duration_minutes must be > 0".to_string(),
        ));
    }

    let span_start = minute_of_day(time_of_day);
    let span_end = span_start + duration_minutes;
    Ok(registry.list()?.into_iter().find(|slot| {
        overlaps(
            span_start,
            span_end,
            minute_of_day(slot.start),
            minute_of_day(slot.end),
        )
    }))
}
