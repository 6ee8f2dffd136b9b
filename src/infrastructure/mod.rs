pub mod break_registry;
pub mod break_store;
pub mod config;
pub mod error;
pub mod ics_export;
pub mod storage;
