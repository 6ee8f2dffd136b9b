use crate::domain::models::{Appointment, AppointmentStatus, ProposedStatusChange};
use crate::infrastructure::error::EngineError;

pub fn validate_transition(
    from: AppointmentStatus,
    to: AppointmentStatus,
) -> Result<(), EngineError> {
    use AppointmentStatus::{Cancelled, Completed, Confirmed, InProgress, NoShow, Scheduled};

    if from.is_terminal() {
        return Err(EngineError::InvalidTransition { from, to });
    }
    let allowed = matches!(
        (from, to),
        (Scheduled, Confirmed)
            | (Confirmed, InProgress)
            | (InProgress, Completed)
            | (_, Cancelled)
            | (_, NoShow)
    );
    if !allowed {
        return Err(EngineError::InvalidTransition { from, to });
    }
    Ok(())
}

// Completion is expected to trigger the host's checkout workflow; this only
// validates and emits the proposed mutation.
pub fn propose_status_change(
    appointment: &Appointment,
    new_status: AppointmentStatus,
) -> Result<ProposedStatusChange, EngineError> {
    validate_transition(appointment.status, new_status)?;
    Ok(ProposedStatusChange {
        appointment_id: appointment.id.clone(),
        new_status,
    })
}
