// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Hardware Abstraction Layer for GridSentinel
//!
//! This crate defines the narrow capability contracts through which the
//! security core reaches the platform: monotonic time, GPIO, edge
//! interrupts, entropy and checksums, persistent storage, the uplink
//! transport and the metrology front-end.
//!
//! # Architecture
//!
//! 1. **Traits**: platform-agnostic capability interfaces (`traits`)
//! 2. **Services**: an owned bundle composing the capabilities (`services`)
//! 3. **Trampoline**: the fixed-slot ISR dispatch table used by platform
//!    adapters to route context-free interrupt vectors (`trampoline`)
//! 4. **Mocks**: host-side implementations for integration tests (`mock`)
//!
//! Core logic depends on the traits only; the trampoline is strictly a
//! platform-adapter concern.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod mock;
pub mod services;
#[allow(unsafe_code)]
pub mod trampoline;
pub mod traits;

// Re-export main traits
pub use services::PlatformServices;
pub use traits::{
    GpioInterface, InterruptInterface, MeterInterface, PinMode, RawCryptoInterface,
    StorageInterface, TimeInterface, TransportInterface, TriggerEdge,
};
