//! Application core: orchestration, zero I/O.
//!
//! This module wires the measurement scheduler, sensor suite, automation
//! state machine and history log into one service.  All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod action;
pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod snapshot;
