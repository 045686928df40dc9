pub mod availability;
pub mod health;
pub mod loyalty;
pub mod policy;
pub mod realtime;
