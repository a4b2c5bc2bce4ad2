pub mod availability;
pub mod calendar;
pub mod desk;
pub mod manager;
