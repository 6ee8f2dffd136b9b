use crate::domain::interval::{local_date, minute_of_day, overlaps, time_from_minute};
use crate::domain::models::{Appointment, BreakSlot, StaffMember};
use crate::infrastructure::break_registry::BreakRegistry;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::error::EngineError;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};

pub const MONTH_GRID_CELLS: usize = 42;
pub const MONTH_INLINE_LIMIT: usize = 3;
const HALF_HOUR_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub appointments: Vec<Appointment>,
    pub blocked: bool,
}

impl MonthCell {
    pub fn inline(&self) -> &[Appointment] {
        let cutoff = self.appointments.len().min(MONTH_INLINE_LIMIT);
        &self.appointments[..cutoff]
    }

    pub fn overflow_count(&self) -> usize {
        self.appointments.len().saturating_sub(MONTH_INLINE_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub cells: Vec<MonthCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourCell {
    pub date: NaiveDate,
    pub hour: u32,
    pub appointments: Vec<Appointment>,
    pub blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekView {
    pub days: Vec<NaiveDate>,
    pub cells: Vec<HourCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRow {
    pub start: NaiveTime,
    pub appointments: Vec<Appointment>,
    pub blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub date: NaiveDate,
    pub rows: Vec<DayRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffColumn {
    pub staff_id: String,
    pub display_name: String,
    pub rows: Vec<DayRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiStaffDayView {
    pub date: NaiveDate,
    pub columns: Vec<StaffColumn>,
    pub hidden_staff: usize,
}

pub fn month_view(
    config: &EngineConfig,
    registry: &BreakRegistry,
    year: i32,
    month: u32,
    appointments: &[Appointment],
) -> Result<MonthView, EngineError> {
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_else(|| {
        let today = Utc::now().with_timezone(&config.timezone).date_naive();
        log::warn!("invalid month {year}-{month}, falling back to {today}");
        today.with_day(1).unwrap_or(today)
    });
    let grid_start = first_of_month
        - Duration::days(first_of_month.weekday().num_days_from_sunday() as i64);
    let breaks = registry.list()?;
    let day_blocked = covers_day_window(config, &breaks);

    let cells = (0..MONTH_GRID_CELLS as i64)
        .map(|offset| {
            let date = grid_start + Duration::days(offset);
            MonthCell {
                date,
                in_month: date.month() == first_of_month.month()
                    && date.year() == first_of_month.year(),
                appointments: appointments_on(config, date, appointments, None),
                blocked: day_blocked,
            }
        })
        .collect();

    Ok(MonthView { cells })
}

pub fn week_view(
    config: &EngineConfig,
    registry: &BreakRegistry,
    anchor: NaiveDate,
    appointments: &[Appointment],
) -> Result<WeekView, EngineError> {
    let week_start = anchor - Duration::days(anchor.weekday().num_days_from_sunday() as i64);
    let days = (0..7)
        .map(|offset| week_start + Duration::days(offset))
        .collect::<Vec<_>>();
    let breaks = registry.list()?;

    let mut cells = Vec::new();
    for hour in config.day_start_hour..config.day_end_hour {
        for &date in &days {
            let day_appointments = appointments_on(config, date, appointments, None)
                .into_iter()
                .filter(|appointment| {
                    appointment
                        .start_at
                        .with_timezone(&config.timezone)
                        .hour()
                        == hour
                })
                .collect();
            cells.push(HourCell {
                date,
                hour,
                appointments: day_appointments,
                blocked: range_blocked(&breaks, hour * 60, hour * 60 + 60),
            });
        }
    }

    Ok(WeekView { days, cells })
}

pub fn day_view(
    config: &EngineConfig,
    registry: &BreakRegistry,
    date: NaiveDate,
    appointments: &[Appointment],
) -> Result<DayView, EngineError> {
    let breaks = registry.list()?;
    let day_appointments = appointments_on(config, date, appointments, None);
    Ok(DayView {
        date,
        rows: half_hour_rows(config, &breaks, &day_appointments),
    })
}

pub fn multi_staff_day_view(
    config: &EngineConfig,
    registry: &BreakRegistry,
    date: NaiveDate,
    staff: &[StaffMember],
    appointments: &[Appointment],
) -> Result<MultiStaffDayView, EngineError> {
    let breaks = registry.list()?;
    let shown = staff.len().min(config.staff_column_limit);
    let columns = staff[..shown]
        .iter()
        .map(|member| {
            let member_appointments =
                appointments_on(config, date, appointments, Some(&member.id));
            StaffColumn {
                staff_id: member.id.clone(),
                display_name: member.display_name.clone(),
                rows: half_hour_rows(config, &breaks, &member_appointments),
            }
        })
        .collect();

    Ok(MultiStaffDayView {
        date,
        columns,
        hidden_staff: staff.len() - shown,
    })
}

fn appointments_on(
    config: &EngineConfig,
    date: NaiveDate,
    appointments: &[Appointment],
    staff_id: Option<&str>,
) -> Vec<Appointment> {
    let mut selected = appointments
        .iter()
        .filter(|appointment| local_date(appointment.start_at, config.timezone) == date)
        .filter(|appointment| staff_id.is_none_or(|staff| appointment.staff_id == staff))
        .cloned()
        .collect::<Vec<_>>();
    // Stable sort keeps the original order for equal start times.
    selected.sort_by(|left, right| left.start_at.cmp(&right.start_at));
    selected
}

fn half_hour_rows(
    config: &EngineConfig,
    breaks: &[BreakSlot],
    day_appointments: &[Appointment],
) -> Vec<DayRow> {
    let mut rows = Vec::new();
    let mut minute = config.day_start_hour * 60;
    let end_minute = config.day_end_hour * 60;
    while minute < end_minute {
        let Some(start) = time_from_minute(minute) else {
            break;
        };
        let row_appointments = day_appointments
            .iter()
            .filter(|appointment| {
                let start_minute = minute_of_day(
                    appointment.start_at.with_timezone(&config.timezone).time(),
                );
                start_minute >= minute && start_minute < minute + HALF_HOUR_MINUTES
            })
            .cloned()
            .collect();
        rows.push(DayRow {
            start,
            appointments: row_appointments,
            blocked: range_blocked(breaks, minute, minute + HALF_HOUR_MINUTES),
        });
        minute += HALF_HOUR_MINUTES;
    }
    rows
}

fn range_blocked(breaks: &[BreakSlot], start_minute: u32, end_minute: u32) -> bool {
    breaks.iter().any(|slot| {
        overlaps(
            start_minute,
            end_minute,
            minute_of_day(slot.start),
            minute_of_day(slot.end),
        )
    })
}

// A month cell spans a whole day; it only counts as blocked when the merged
// break coverage leaves no bookable minute inside the configured day window.
fn covers_day_window(config: &EngineConfig, breaks: &[BreakSlot]) -> bool {
    let window_start = config.day_start_hour * 60;
    let window_end = config.day_end_hour * 60;
    if window_start >= window_end {
        return false;
    }
    let mut spans = breaks
        .iter()
        .map(|slot| (minute_of_day(slot.start), minute_of_day(slot.end)))
        .collect::<Vec<_>>();
    spans.sort_unstable();
    let mut cursor = window_start;
    for (start, end) in spans {
        if start > cursor {
            return false;
        }
        cursor = cursor.max(end);
    }
    cursor >= window_end
}
