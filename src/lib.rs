//! Verdant garden controller library.
//!
//! Sensor fusion and automation core for an enclosed garden: trimmed
//! burst sampling, reservoir ranging, irrigation / fill / lighting /
//! security automation and a bounded measurement history.  Hardware is
//! reached only through the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod automation;
pub mod config;
pub mod error;
pub mod history;
pub mod record;
pub mod safety;
pub mod scheduler;
pub mod sensors;
