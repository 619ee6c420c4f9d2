// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! HAL trait definitions
//!
//! Platform-agnostic capability interfaces that must be implemented for
//! each target. The security core consumes these and nothing else from the
//! hardware; no trait exposes platform registers or global state.

use gs_common::{MeterReading, Result};

/// GPIO pin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// High-impedance input
    Input,
    /// Input with internal pull-up
    InputPullup,
    /// Input with internal pull-down
    InputPulldown,
    /// Push-pull output
    Output,
}

/// Interrupt trigger edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEdge {
    /// Low-to-high transition
    Rising,
    /// High-to-low transition
    Falling,
    /// Either transition
    Both,
}

/// Monotonic time source
pub trait TimeInterface {
    /// Milliseconds since boot; monotonic, never decreasing
    fn now_ms(&self) -> u64;

    /// Blocking delay
    fn delay_ms(&self, ms: u32);
}

/// GPIO access
pub trait GpioInterface {
    /// Configure a pin's mode
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for an unknown pin.
    fn configure(&mut self, pin: u8, mode: PinMode) -> Result<()>;

    /// Read a pin's level (`true` = high)
    ///
    /// # Errors
    ///
    /// Returns `Error::SensorReadFailure` if the read fails.
    fn read(&self, pin: u8) -> Result<bool>;

    /// Drive an output pin
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the pin is not an output.
    fn write(&mut self, pin: u8, level: bool) -> Result<()>;
}

/// Edge interrupt control
///
/// Binding a pin to a handler function is a platform-adapter concern (see
/// the `trampoline` module); this trait only controls delivery.
pub trait InterruptInterface {
    /// Arm edge detection on a pin
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the pin cannot generate
    /// interrupts.
    fn attach(&mut self, pin: u8, edge: TriggerEdge) -> Result<()>;

    /// Disarm edge detection on a pin
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the pin was never attached.
    fn detach(&mut self, pin: u8) -> Result<()>;

    /// Enable delivery for an attached pin
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the pin was never attached.
    fn enable(&mut self, pin: u8) -> Result<()>;

    /// Disable delivery without detaching
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the pin was never attached.
    fn disable(&mut self, pin: u8) -> Result<()>;
}

/// Raw cryptographic services provided by the platform
///
/// Entropy must come from a hardware TRNG where one exists. The checksum
/// and digest have software defaults that accelerated back-ends may
/// override.
pub trait RawCryptoInterface {
    /// Fill `dest` with cryptographically secure random bytes
    ///
    /// # Errors
    ///
    /// Returns `Error::CryptoFailure` if the entropy source fails.
    fn random_bytes(&mut self, dest: &mut [u8]) -> Result<()>;

    /// CRC32 (IEEE) over `data`
    fn crc32(&self, data: &[u8]) -> u32 {
        crc32fast::hash(data)
    }

    /// SHA-256 digest of `data`
    fn sha256(&self, data: &[u8], out: &mut [u8; 32]) {
        use sha2::{Digest, Sha256};
        out.copy_from_slice(&Sha256::digest(data));
    }
}

/// Addressed persistent storage (EEPROM, flash data area)
pub trait StorageInterface {
    /// Read `buffer.len()` bytes starting at `address`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the range is out of bounds or
    /// `Error::HardwareFailure` on a device fault.
    fn read(&self, address: u32, buffer: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `address`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the range is out of bounds or
    /// `Error::HardwareFailure` on a device fault.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;

    /// Erase `length` bytes starting at `address`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the range is out of bounds.
    fn erase(&mut self, address: u32, length: usize) -> Result<()>;
}

/// Uplink transport (serial, cellular or RF modem)
///
/// Timeouts are enforced by the transport implementation, not by the core.
pub trait TransportInterface {
    /// Bring the link up
    ///
    /// # Errors
    ///
    /// Returns `Error::HardwareFailure` if the modem cannot be reached.
    fn init(&mut self) -> Result<()>;

    /// Bring the link down
    ///
    /// # Errors
    ///
    /// Returns `Error::HardwareFailure` on a device fault.
    fn shutdown(&mut self) -> Result<()>;

    /// Send a frame; returns the number of bytes accepted
    ///
    /// # Errors
    ///
    /// Returns `Error::NetworkDisconnected` or `Error::TransmissionFailed`.
    fn send(&mut self, data: &[u8]) -> Result<usize>;

    /// Receive into `buffer`, waiting at most `timeout_ms`
    ///
    /// # Errors
    ///
    /// Returns `Error::NetworkTimeout` if nothing arrives in time.
    fn receive(&mut self, buffer: &mut [u8], timeout_ms: u32) -> Result<usize>;

    /// Check link connectivity
    fn is_connected(&self) -> bool;
}

/// Metrology front-end
pub trait MeterInterface {
    /// Take a reading, stamped with the supplied clock value
    ///
    /// # Errors
    ///
    /// Returns `Error::SensorReadFailure` if the metrology chain fails.
    fn sample(&mut self, now_ms: u64) -> Result<MeterReading>;
}
