// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Mock platform for host-side testing
//!
//! Deterministic, scriptable implementations of every capability trait so
//! integration tests can drive the full stack without hardware. Fault
//! injection is a per-capability boolean toggle.

use core::cell::Cell;

use heapless::Vec;

use gs_common::{Error, MeterReading, Result};

use crate::traits::{
    GpioInterface, InterruptInterface, MeterInterface, PinMode, RawCryptoInterface,
    StorageInterface, TimeInterface, TransportInterface, TriggerEdge,
};

/// Number of emulated GPIO pins
pub const MOCK_PIN_COUNT: usize = 32;

/// Emulated storage size in bytes
pub const MOCK_STORAGE_SIZE: usize = 1024;

/// Maximum frame size retained by the mock transport
pub const MOCK_FRAME_SIZE: usize = 640;

/// Number of sent frames retained by the mock transport
pub const MOCK_FRAME_HISTORY: usize = 8;

// =============================================================================
// Time
// =============================================================================

/// Settable monotonic clock
///
/// `delay_ms` advances the clock, so code that blocks on a delay observes
/// time passing.
pub struct MockTime {
    now: Cell<u64>,
}

impl MockTime {
    /// Create a clock starting at `start_ms`
    #[must_use]
    pub const fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Advance the clock
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl TimeInterface for MockTime {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn delay_ms(&self, ms: u32) {
        self.advance(u64::from(ms));
    }
}

// =============================================================================
// GPIO
// =============================================================================

/// Pin map with scriptable levels and fault injection
pub struct MockGpio {
    modes: [Option<PinMode>; MOCK_PIN_COUNT],
    levels: [bool; MOCK_PIN_COUNT],
    /// When set, every `read` fails with `SensorReadFailure`
    pub fail_reads: bool,
}

impl MockGpio {
    /// Create with all pins unconfigured and high (pull-up idle)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            modes: [None; MOCK_PIN_COUNT],
            levels: [true; MOCK_PIN_COUNT],
            fail_reads: false,
        }
    }

    /// Script a pin's input level
    pub fn set_level(&mut self, pin: u8, level: bool) {
        if (pin as usize) < MOCK_PIN_COUNT {
            self.levels[pin as usize] = level;
        }
    }

    /// Mode a pin was configured with, if any
    #[must_use]
    pub fn mode(&self, pin: u8) -> Option<PinMode> {
        self.modes.get(pin as usize).copied().flatten()
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioInterface for MockGpio {
    fn configure(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        let slot = self
            .modes
            .get_mut(pin as usize)
            .ok_or(Error::InvalidParameter)?;
        *slot = Some(mode);
        Ok(())
    }

    fn read(&self, pin: u8) -> Result<bool> {
        if self.fail_reads {
            return Err(Error::SensorReadFailure);
        }
        self.levels
            .get(pin as usize)
            .copied()
            .ok_or(Error::InvalidParameter)
    }

    fn write(&mut self, pin: u8, level: bool) -> Result<()> {
        let slot = self
            .levels
            .get_mut(pin as usize)
            .ok_or(Error::InvalidParameter)?;
        *slot = level;
        Ok(())
    }
}

// =============================================================================
// Interrupts
// =============================================================================

/// Records attach/enable state per pin
pub struct MockInterrupt {
    attached: [Option<TriggerEdge>; MOCK_PIN_COUNT],
    enabled: [bool; MOCK_PIN_COUNT],
}

impl MockInterrupt {
    /// Create with no pins attached
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attached: [None; MOCK_PIN_COUNT],
            enabled: [false; MOCK_PIN_COUNT],
        }
    }

    /// Check whether a pin is attached
    #[must_use]
    pub fn is_attached(&self, pin: u8) -> bool {
        self.attached
            .get(pin as usize)
            .copied()
            .flatten()
            .is_some()
    }

    /// Check whether delivery is enabled for a pin
    #[must_use]
    pub fn is_enabled(&self, pin: u8) -> bool {
        self.enabled.get(pin as usize).copied().unwrap_or(false)
    }
}

impl Default for MockInterrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptInterface for MockInterrupt {
    fn attach(&mut self, pin: u8, edge: TriggerEdge) -> Result<()> {
        let slot = self
            .attached
            .get_mut(pin as usize)
            .ok_or(Error::InvalidParameter)?;
        *slot = Some(edge);
        Ok(())
    }

    fn detach(&mut self, pin: u8) -> Result<()> {
        let slot = self
            .attached
            .get_mut(pin as usize)
            .ok_or(Error::InvalidParameter)?;
        if slot.is_none() {
            return Err(Error::InvalidParameter);
        }
        *slot = None;
        self.enabled[pin as usize] = false;
        Ok(())
    }

    fn enable(&mut self, pin: u8) -> Result<()> {
        if !self.is_attached(pin) {
            return Err(Error::InvalidParameter);
        }
        self.enabled[pin as usize] = true;
        Ok(())
    }

    fn disable(&mut self, pin: u8) -> Result<()> {
        if !self.is_attached(pin) {
            return Err(Error::InvalidParameter);
        }
        self.enabled[pin as usize] = false;
        Ok(())
    }
}

// =============================================================================
// Raw Crypto
// =============================================================================

/// Deterministic entropy source (xorshift64*)
///
/// Deterministic by design so failures reproduce; never use outside tests.
pub struct MockRawCrypto {
    state: u64,
    /// When set, `random_bytes` fails with `CryptoFailure`
    pub fail_random: bool,
}

impl MockRawCrypto {
    /// Create with a seed (zero is remapped to a fixed constant)
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
            fail_random: false,
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

impl RawCryptoInterface for MockRawCrypto {
    fn random_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        if self.fail_random {
            return Err(Error::CryptoFailure);
        }
        for chunk in dest.chunks_mut(8) {
            let word = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
        Ok(())
    }
}

// =============================================================================
// Storage
// =============================================================================

/// In-memory byte-addressed storage
pub struct MockStorage {
    data: [u8; MOCK_STORAGE_SIZE],
    /// When set, every `write` fails with `HardwareFailure`
    pub fail_writes: bool,
    /// When set, every `read` fails with `HardwareFailure`
    pub fail_reads: bool,
}

impl MockStorage {
    /// Create erased (all 0xFF, flash idle state)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: [0xFF; MOCK_STORAGE_SIZE],
            fail_writes: false,
            fail_reads: false,
        }
    }

    /// Direct view of the backing bytes, for corruption in tests
    #[must_use]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageInterface for MockStorage {
    fn read(&self, address: u32, buffer: &mut [u8]) -> Result<()> {
        if self.fail_reads {
            return Err(Error::HardwareFailure);
        }
        let start = address as usize;
        let end = start.checked_add(buffer.len()).ok_or(Error::InvalidParameter)?;
        let src = self.data.get(start..end).ok_or(Error::InvalidParameter)?;
        buffer.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(Error::HardwareFailure);
        }
        let start = address as usize;
        let end = start.checked_add(data.len()).ok_or(Error::InvalidParameter)?;
        let dst = self
            .data
            .get_mut(start..end)
            .ok_or(Error::InvalidParameter)?;
        dst.copy_from_slice(data);
        Ok(())
    }

    fn erase(&mut self, address: u32, length: usize) -> Result<()> {
        let start = address as usize;
        let end = start.checked_add(length).ok_or(Error::InvalidParameter)?;
        let dst = self
            .data
            .get_mut(start..end)
            .ok_or(Error::InvalidParameter)?;
        dst.fill(0xFF);
        Ok(())
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Captures sent frames; receive is scripted
pub struct MockTransport {
    sent: Vec<Vec<u8, MOCK_FRAME_SIZE>, MOCK_FRAME_HISTORY>,
    rx_frame: Option<Vec<u8, MOCK_FRAME_SIZE>>,
    initialized: bool,
    /// Connectivity reported by `is_connected`
    pub connected: bool,
    /// When set, every `send` fails with `TransmissionFailed`
    pub fail_sends: bool,
}

impl MockTransport {
    /// Create a connected transport with no traffic
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sent: Vec::new(),
            rx_frame: None,
            initialized: false,
            connected: true,
            fail_sends: false,
        }
    }

    /// Number of frames sent so far
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }

    /// The most recently sent frame, if any
    #[must_use]
    pub fn last_sent(&self) -> Option<&[u8]> {
        self.sent.last().map(|frame| frame.as_slice())
    }

    /// All captured frames, oldest first
    #[must_use]
    pub fn sent_frames(&self) -> &[Vec<u8, MOCK_FRAME_SIZE>] {
        &self.sent
    }

    /// Script the next frame `receive` will deliver
    pub fn queue_rx(&mut self, frame: &[u8]) {
        let mut buf = Vec::new();
        let _ = buf.extend_from_slice(frame);
        self.rx_frame = Some(buf);
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportInterface for MockTransport {
    fn init(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.initialized = false;
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<usize> {
        if !self.connected {
            return Err(Error::NetworkDisconnected);
        }
        if self.fail_sends {
            return Err(Error::TransmissionFailed);
        }
        let mut frame = Vec::new();
        frame
            .extend_from_slice(data)
            .map_err(|()| Error::BufferOverflow)?;
        if self.sent.is_full() {
            self.sent.remove(0);
        }
        let _ = self.sent.push(frame);
        Ok(data.len())
    }

    fn receive(&mut self, buffer: &mut [u8], _timeout_ms: u32) -> Result<usize> {
        let frame = self.rx_frame.take().ok_or(Error::NetworkTimeout)?;
        if buffer.len() < frame.len() {
            return Err(Error::BufferOverflow);
        }
        buffer[..frame.len()].copy_from_slice(&frame);
        Ok(frame.len())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

// =============================================================================
// Meter
// =============================================================================

/// Scripted metrology front-end
pub struct MockMeter {
    /// Template returned by `sample` (timestamp is overwritten)
    pub reading: MeterReading,
    /// When set, `sample` fails with `SensorReadFailure`
    pub fail_samples: bool,
}

impl MockMeter {
    /// Create with a plausible 230 V domestic load
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reading: MeterReading {
                timestamp: 0,
                energy_wh: 1000,
                voltage_mv: 220_000,
                current_ma: 4545,
                power_factor: 950,
                phase: 1,
                reserved: [0; 3],
            },
            fail_samples: false,
        }
    }
}

impl Default for MockMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl MeterInterface for MockMeter {
    fn sample(&mut self, now_ms: u64) -> Result<MeterReading> {
        if self.fail_samples {
            return Err(Error::SensorReadFailure);
        }
        let mut reading = self.reading;
        reading.timestamp = now_ms;
        Ok(reading)
    }
}
