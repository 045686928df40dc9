pub mod booking;
pub mod location_hours;
pub mod loyalty;
pub mod shift;
