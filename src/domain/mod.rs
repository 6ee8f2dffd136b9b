pub mod interval;
pub mod models;
