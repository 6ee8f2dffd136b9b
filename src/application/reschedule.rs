use crate::application::conflict::has_conflict;
use crate::domain::models::{Appointment, DragPayload, ProposedReschedule};
use crate::infrastructure::error::EngineError;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Default)]
pub struct DragController {
    in_flight: Option<DragPayload>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_drag(&mut self, appointment: &Appointment) {
        if let Some(discarded) = self.in_flight.take() {
            log::debug!(
                "drag controller: discarding unconsumed payload for {}",
                discarded.appointment_id
            );
        }
        self.in_flight = Some(DragPayload {
            appointment_id: appointment.id.clone(),
            duration_minutes: appointment.duration_minutes(),
        });
    }

    pub fn is_dragging(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn cancel(&mut self) {
        self.in_flight = None;
    }

    pub fn drop_at(&mut self, new_start: DateTime<Utc>) -> Option<ProposedReschedule> {
        let payload = self.in_flight.take()?;
        Some(ProposedReschedule {
            appointment_id: payload.appointment_id,
            new_start,
            new_end: new_start + Duration::minutes(payload.duration_minutes),
        })
    }
}

// Advisory only: the host must re-validate against committed state at save time.
pub fn reschedule_conflicts(
    proposal: &ProposedReschedule,
    appointments: &[Appointment],
    staff_id: Option<&str>,
) -> Result<bool, EngineError> {
    has_conflict(
        proposal.new_start,
        proposal.new_end,
        appointments,
        staff_id,
        Some(&proposal.appointment_id),
    )
}
