//! # SalonSync Core
//!
//! Domain logic for the SalonSync booking service. Nothing in this crate talks
//! to the network or the database directly; data arrives through the provider
//! traits in [`providers`].
//!
//! - [`availability`]: appointment time-slot engine
//! - [`loyalty`]: points and membership discount arithmetic
//! - [`policy`]: role based permission table
//! - [`events`]: change feed used to react to backend notifications
//! - [`services`]: fetch-then-compute orchestration over the providers

pub mod availability;
pub mod errors;
pub mod events;
pub mod loyalty;
pub mod models;
pub mod policy;
pub mod providers;
pub mod services;
