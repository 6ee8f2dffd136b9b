pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::availability::compute_slots;
pub use application::calendar_views::{
    day_view, month_view, multi_staff_day_view, week_view, DayView, MonthView, MultiStaffDayView,
    WeekView, MONTH_INLINE_LIMIT,
};
pub use application::colors::ServiceColorMap;
pub use application::conflict::has_conflict;
pub use application::lifecycle::{propose_status_change, validate_transition};
pub use application::reschedule::DragController;
pub use domain::models::{
    Appointment, AppointmentRecord, AppointmentStatus, BreakSlot, CandidateSlot, Service,
    SlotReason, StaffMember, WorkingWindow,
};
pub use infrastructure::break_registry::BreakRegistry;
pub use infrastructure::break_store::{BreakStore, InMemoryBreakStore, SqliteBreakStore};
pub use infrastructure::config::{ensure_default_configs, load_engine_config, EngineConfig};
pub use infrastructure::error::EngineError;
pub use infrastructure::ics_export::export_schedule;
