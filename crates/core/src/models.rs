pub mod availability;
pub mod hours;
pub mod loyalty;
pub mod time_slot;
