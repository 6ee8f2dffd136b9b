use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

pub fn parse_status(value: &str) -> Option<AppointmentStatus> {
    match value.trim().to_ascii_lowercase().as_str() {
        "scheduled" => Some(AppointmentStatus::Scheduled),
        "confirmed" => Some(AppointmentStatus::Confirmed),
        "in_progress" | "in-progress" => Some(AppointmentStatus::InProgress),
        "completed" => Some(AppointmentStatus::Completed),
        "cancelled" | "canceled" => Some(AppointmentStatus::Cancelled),
        "no_show" | "no-show" => Some(AppointmentStatus::NoShow),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentRecord {
    pub id: String,
    pub staff_id: String,
    pub service_id: String,
    #[serde(default)]
    pub customer_id: String,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub staff_name: String,
}

impl AppointmentRecord {
    pub fn has_start(&self) -> bool {
        self.start_at
            .as_deref()
            .map(str::trim)
            .is_some_and(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: String,
    pub staff_id: String,
    pub service_id: String,
    pub customer_id: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub staff_name: String,
}

impl Appointment {
    pub fn validate(&self) -> Result<(), String> {
        validate_non_empty(&self.id, "appointment.id")?;
        validate_non_empty(&self.staff_id, "appointment.staff_id")?;
        validate_non_empty(&self.service_id, "appointment.service_id")?;
        if self.end_at <= self.start_at {
            return Err("appointment.end_at must be after appointment.start_at".to_string());
        }
        Ok(())
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_at - self.start_at).num_minutes()
    }

    pub fn from_record(record: &AppointmentRecord, now: DateTime<Utc>) -> Self {
        let start_at = parse_instant_or(record.start_at.as_deref(), now);
        let fallback_end = start_at + Duration::minutes(DEFAULT_GRANULARITY_MINUTES as i64);
        let end_at = match parse_instant(record.end_at.as_deref()) {
            Some(parsed) if parsed > start_at => parsed,
            _ => fallback_end,
        };
        let status = record
            .status
            .as_deref()
            .and_then(parse_status)
            .unwrap_or(AppointmentStatus::Scheduled);

        Self {
            id: record.id.trim().to_string(),
            staff_id: record.staff_id.trim().to_string(),
            service_id: record.service_id.trim().to_string(),
            customer_id: record.customer_id.trim().to_string(),
            start_at,
            end_at,
            status,
            notes: record
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned),
            customer_name: record.customer_name.trim().to_string(),
            service_name: record.service_name.trim().to_string(),
            staff_name: record.staff_name.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffMember {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Service {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub duration_minutes: u32,
}

impl Service {
    pub fn validate(&self) -> Result<(), String> {
        validate_non_empty(&self.id, "service.id")?;
        if self.duration_minutes == 0 {
            return Err("service.duration_minutes must be > 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkingWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub granularity_minutes: Option<u32>,
}

impl WorkingWindow {
    pub fn validate(&self) -> Result<(), String> {
        if self.close < self.open {
            return Err("working_window.close must not be before working_window.open".to_string());
        }
        if let Some(granularity) = self.granularity_minutes {
            if granularity == 0 {
                return Err("working_window.granularity_minutes must be > 0".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreakSlot {
    pub id: String,
    pub label: String,
    pub color: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl BreakSlot {
    pub fn validate(&self) -> Result<(), String> {
        validate_non_empty(&self.id, "break_slot.id")?;
        validate_non_empty(&self.label, "break_slot.label")?;
        if self.end <= self.start {
            return Err("break_slot.end must be after break_slot.start".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlotReason {
    Booked,
    Past,
    Break,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CandidateSlot {
    pub time: NaiveTime,
    pub label: String,
    pub available: bool,
    pub reason: Option<SlotReason>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub appointment_id: String,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProposedReschedule {
    pub appointment_id: String,
    pub new_start: DateTime<Utc>,
    pub new_end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProposedStatusChange {
    pub appointment_id: String,
    pub new_status: AppointmentStatus,
}

fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field_name} must not be empty"));
    }
    Ok(())
}

fn parse_instant(value: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = value.map(str::trim).filter(|raw| !raw.is_empty())?;
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
}

fn parse_instant_or(value: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    match parse_instant(value) {
        Some(parsed) => parsed,
        None => {
            if value.map(str::trim).is_some_and(|raw| !raw.is_empty()) {
                log::warn!("unparseable instant '{}', using fallback", value.unwrap_or(""));
            }
            fallback
        }
    }
}
