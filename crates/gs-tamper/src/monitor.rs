// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Tamper monitor state machine
//!
//! # Concurrency
//!
//! [`TamperMonitor::on_sensor_edge`] is the only entry that may run in
//! interrupt context. It shares exactly three fields with the main loop,
//! each with a single writer:
//!
//! - `pending`: set false-to-true by the ISR, cleared by `poll`
//! - `trigger_at_ms`: written by the ISR before `pending` is raised
//! - `confirmed`: written only by `poll` on the main loop
//!
//! The ISR is guarded so a second edge while pending or confirmed is a
//! no-op; sensor bounce cannot move the debounce timestamp. Everything
//! else in the struct is main-loop-only and stays a plain field.
//!
//! The trigger timestamp is truncated to 32 bits so it remains a
//! single-copy atomic on 32-bit cores; elapsed time uses wrapping
//! arithmetic, which is exact while a trigger is pending (debounce windows
//! are milliseconds, wraparound is 49 days).

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use gs_common::{Error, Result, TamperConfig, TamperType, TimestampMs};
use gs_hal::{GpioInterface, InterruptInterface, PinMode, TriggerEdge};

/// Tamper detection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TamperState {
    /// No trigger observed
    Idle,
    /// Edge observed, waiting out the debounce window
    PendingConfirmation,
    /// Tamper confirmed; sticky until `reset`
    Confirmed,
}

/// Interrupt-driven tamper monitor
pub struct TamperMonitor {
    config: TamperConfig,
    initialized: bool,

    // Shared with the ISR; see the module docs for the writer discipline
    pending: AtomicBool,
    trigger_at_ms: AtomicU32,
    confirmed: AtomicBool,

    // Main-loop only
    tamper_type: TamperType,
    confirmed_at_ms: TimestampMs,
}

impl TamperMonitor {
    /// Create an uninitialized monitor
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: TamperConfig::DEFAULT,
            initialized: false,
            pending: AtomicBool::new(false),
            trigger_at_ms: AtomicU32::new(0),
            confirmed: AtomicBool::new(false),
            tamper_type: TamperType::None,
            confirmed_at_ms: 0,
        }
    }

    /// Configure the sensor pins
    ///
    /// The enclosure sensor becomes a pull-up input (active low); a
    /// configured backup-power pin becomes a plain input.
    ///
    /// # Errors
    ///
    /// - `Error::SystemAlreadyInitialized` on a second call
    /// - `Error::InvalidParameter` for a zero debounce window or a
    ///   backup-power pin that duplicates the sensor pin
    /// - Any GPIO configuration error
    pub fn initialize<G: GpioInterface>(
        &mut self,
        config: TamperConfig,
        gpio: &mut G,
    ) -> Result<()> {
        if self.initialized {
            return Err(Error::SystemAlreadyInitialized);
        }
        if config.debounce_ms == 0 {
            return Err(Error::InvalidParameter);
        }
        if config.backup_power_pin == Some(config.sensor_pin) {
            return Err(Error::InvalidParameter);
        }

        gpio.configure(config.sensor_pin, PinMode::InputPullup)?;
        if let Some(backup_pin) = config.backup_power_pin {
            gpio.configure(backup_pin, PinMode::Input)?;
        }

        self.config = config;
        self.initialized = true;
        Ok(())
    }

    /// Arm and enable the falling-edge interrupt on the sensor pin
    ///
    /// # Errors
    ///
    /// Returns `Error::SystemNotInitialized` before `initialize`, or any
    /// interrupt-controller error.
    pub fn start<I: InterruptInterface>(&mut self, interrupt: &mut I) -> Result<()> {
        if !self.initialized {
            return Err(Error::SystemNotInitialized);
        }

        interrupt.attach(self.config.sensor_pin, TriggerEdge::Falling)?;
        interrupt.enable(self.config.sensor_pin)
    }

    /// Disable and detach the sensor interrupt
    ///
    /// # Errors
    ///
    /// Returns `Error::SystemNotInitialized` before `initialize`, or any
    /// interrupt-controller error.
    pub fn stop<I: InterruptInterface>(&mut self, interrupt: &mut I) -> Result<()> {
        if !self.initialized {
            return Err(Error::SystemNotInitialized);
        }

        interrupt.disable(self.config.sensor_pin)?;
        interrupt.detach(self.config.sensor_pin)
    }

    /// Interrupt entry: record a sensor edge
    ///
    /// Minimal and non-blocking: records the trigger time and raises the
    /// pending flag. Confirmation is strictly `poll`'s job. A second edge
    /// while pending or confirmed is ignored.
    pub fn on_sensor_edge(&self, now_ms: TimestampMs) {
        if self.confirmed.load(Ordering::Acquire) || self.pending.load(Ordering::Acquire) {
            return;
        }

        // Timestamp first, then the flag that publishes it
        self.trigger_at_ms.store(now_ms as u32, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
    }

    /// Main-loop confirmation step
    ///
    /// No-op unless a trigger is pending and the debounce window has
    /// elapsed. One re-read then decides: a cleared (or unreadable) sensor
    /// discards the trigger; an asserted sensor confirms the tamper and
    /// classifies it - `PowerCutAttempt` when a configured backup-power
    /// pin reads de-energized, `CasingOpened` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `Error::SystemNotInitialized` before `initialize`.
    pub fn poll<G: GpioInterface>(&mut self, now_ms: TimestampMs, gpio: &G) -> Result<()> {
        if !self.initialized {
            return Err(Error::SystemNotInitialized);
        }

        if !self.pending.load(Ordering::Acquire) || self.confirmed.load(Ordering::Acquire) {
            return Ok(());
        }

        let trigger = self.trigger_at_ms.load(Ordering::Relaxed);
        let elapsed = (now_ms as u32).wrapping_sub(trigger);
        if elapsed < u32::from(self.config.debounce_ms) {
            return Ok(());
        }

        // Sensor is active low; a high (or failed) read is a false trigger
        match gpio.read(self.config.sensor_pin) {
            Ok(false) => {}
            Ok(true) | Err(_) => {
                self.pending.store(false, Ordering::Release);
                return Ok(());
            }
        }

        self.tamper_type = self.classify(gpio);
        self.confirmed_at_ms = now_ms;
        self.confirmed.store(true, Ordering::Release);
        self.pending.store(false, Ordering::Release);

        Ok(())
    }

    /// Record an operator acknowledgment
    ///
    /// Acknowledgment never clears a confirmed tamper; deliberate
    /// intervention via [`Self::reset`] is required for that.
    ///
    /// # Errors
    ///
    /// Infallible today; the `Result` keeps the operation's contract open
    /// for persistence-backed acknowledgment.
    pub fn acknowledge_tamper(&self) -> Result<()> {
        Ok(())
    }

    /// Clear all tamper state back to `Idle`
    ///
    /// # Errors
    ///
    /// Returns `Error::SystemNotInitialized` before `initialize`.
    pub fn reset(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(Error::SystemNotInitialized);
        }

        self.pending.store(false, Ordering::Release);
        self.confirmed.store(false, Ordering::Release);
        self.trigger_at_ms.store(0, Ordering::Relaxed);
        self.tamper_type = TamperType::None;
        self.confirmed_at_ms = 0;
        Ok(())
    }

    /// Current detection state
    #[must_use]
    pub fn state(&self) -> TamperState {
        if self.confirmed.load(Ordering::Acquire) {
            TamperState::Confirmed
        } else if self.pending.load(Ordering::Acquire) {
            TamperState::PendingConfirmation
        } else {
            TamperState::Idle
        }
    }

    /// Whether a tamper is confirmed
    #[must_use]
    pub fn is_tampered(&self) -> bool {
        self.confirmed.load(Ordering::Acquire)
    }

    /// Classification of the confirmed tamper
    #[must_use]
    pub const fn tamper_type(&self) -> TamperType {
        self.tamper_type
    }

    /// Confirmation timestamp in milliseconds (zero when unconfirmed)
    #[must_use]
    pub const fn tamper_timestamp(&self) -> TimestampMs {
        self.confirmed_at_ms
    }

    /// Configured sensor pin
    #[must_use]
    pub const fn sensor_pin(&self) -> u8 {
        self.config.sensor_pin
    }

    fn classify<G: GpioInterface>(&self, gpio: &G) -> TamperType {
        if let Some(backup_pin) = self.config.backup_power_pin {
            // De-energized backup rail alongside an open enclosure points
            // at a supply-cut attempt rather than a simple casing open
            if let Ok(false) = gpio.read(backup_pin) {
                return TamperType::PowerCutAttempt;
            }
        }
        TamperType::CasingOpened
    }
}

impl Default for TamperMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_hal::mock::MockGpio;

    fn initialized_monitor(gpio: &mut MockGpio) -> TamperMonitor {
        let mut monitor = TamperMonitor::new();
        monitor
            .initialize(TamperConfig::DEFAULT, gpio)
            .expect("initialize");
        monitor
    }

    #[test]
    fn double_initialize_rejected() {
        let mut gpio = MockGpio::new();
        let mut monitor = initialized_monitor(&mut gpio);
        assert_eq!(
            monitor.initialize(TamperConfig::DEFAULT, &mut gpio),
            Err(Error::SystemAlreadyInitialized)
        );
    }

    #[test]
    fn zero_debounce_rejected() {
        let mut gpio = MockGpio::new();
        let mut monitor = TamperMonitor::new();
        let config = TamperConfig {
            debounce_ms: 0,
            ..TamperConfig::DEFAULT
        };
        assert_eq!(
            monitor.initialize(config, &mut gpio),
            Err(Error::InvalidParameter)
        );
    }

    #[test]
    fn edge_does_not_confirm_by_itself() {
        let mut gpio = MockGpio::new();
        let monitor = initialized_monitor(&mut gpio);

        monitor.on_sensor_edge(100);
        assert_eq!(monitor.state(), TamperState::PendingConfirmation);
        assert!(!monitor.is_tampered());
    }

    #[test]
    fn second_edge_keeps_original_trigger_time() {
        let mut gpio = MockGpio::new();
        let monitor = initialized_monitor(&mut gpio);

        monitor.on_sensor_edge(100);
        monitor.on_sensor_edge(140);
        assert_eq!(monitor.trigger_at_ms.load(Ordering::Relaxed), 100);
    }

    #[test]
    fn poll_before_window_stays_pending() {
        let mut gpio = MockGpio::new();
        let mut monitor = initialized_monitor(&mut gpio);
        gpio.set_level(monitor.sensor_pin(), false);

        monitor.on_sensor_edge(100);
        monitor.poll(120, &gpio).unwrap();
        assert_eq!(monitor.state(), TamperState::PendingConfirmation);
    }

    #[test]
    fn cleared_sensor_discards_trigger() {
        let mut gpio = MockGpio::new();
        let mut monitor = initialized_monitor(&mut gpio);
        gpio.set_level(monitor.sensor_pin(), true);

        monitor.on_sensor_edge(100);
        monitor.poll(200, &gpio).unwrap();
        assert_eq!(monitor.state(), TamperState::Idle);
    }

    #[test]
    fn asserted_sensor_confirms_casing_opened() {
        let mut gpio = MockGpio::new();
        let mut monitor = initialized_monitor(&mut gpio);
        gpio.set_level(monitor.sensor_pin(), false);

        monitor.on_sensor_edge(100);
        monitor.poll(200, &gpio).unwrap();

        assert_eq!(monitor.state(), TamperState::Confirmed);
        assert_eq!(monitor.tamper_type(), TamperType::CasingOpened);
        assert_eq!(monitor.tamper_timestamp(), 200);
    }
}
