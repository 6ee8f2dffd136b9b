pub mod availability;
pub mod calendar_views;
pub mod colors;
pub mod conflict;
pub mod lifecycle;
pub mod reschedule;
