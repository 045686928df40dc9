pub mod availability;
pub mod loyalty;
pub mod policy;
pub mod realtime;
