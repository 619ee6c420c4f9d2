// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! GridSentinel Tamper Detection
//!
//! An enclosure sensor on a pulled-up GPIO pin drives a three-state
//! machine: an interrupt edge marks a trigger pending, and the main loop
//! confirms it after a debounce window with a single re-read. Sensor
//! bounce therefore costs one deferred check, never a blocking wait in
//! interrupt context, and a transient that clears before the window ends
//! is discarded as a false trigger.
//!
//! A confirmed tamper is sticky: acknowledgment does not clear it, only an
//! explicit reset does.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod monitor;

pub use monitor::{TamperMonitor, TamperState};
