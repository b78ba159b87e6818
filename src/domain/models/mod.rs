pub mod auth;
pub mod booking;
pub mod movie;
pub mod report;
pub mod show_timing;
pub mod theatre;
