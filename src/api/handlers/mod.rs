pub mod booking;
pub mod health;
pub mod movie;
pub mod report;
pub mod theatre;
