// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! GridSentinel Common Library
//!
//! This crate provides the types, error definitions, configuration
//! structures and utilities shared across all GridSentinel components.
//!
//! # Features
//!
//! - `std`: Enable standard library support (disabled by default for embedded)
//! - `defmt`: Enable defmt logging support for embedded debugging
//!
//! # Constraints
//!
//! No heap allocations are performed - all buffers use fixed-size arrays or
//! heapless collections. The crate is fully `no_std` and interrupt-safe.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod constants;
pub mod errors;
pub mod log;
pub mod time;
pub mod types;

// Re-export commonly used items
pub use config::{SystemConfig, TamperConfig};
pub use errors::{Error, Result};
pub use types::*;
