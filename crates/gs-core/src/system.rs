// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! System orchestrator
//!
//! Owns the device lifecycle state machine and the periodic cycle that
//! turns component state into authenticated uplink traffic. Failure
//! triage follows one rule: anything that breaks bring-up is fatal,
//! anything that breaks a periodic send is logged and counted, and the
//! local Tampered transition never depends on network reachability.

use gs_common::constants::KEY_STORAGE_ADDRESS;
use gs_common::log::LogBuffer;
use gs_common::time::Instant;
use gs_common::{
    log_error, log_info, log_warn, Error, MeterReading, Priority, Result, SystemConfig,
    SystemState, TamperEvent,
};
use gs_crypto::{CryptoEngine, EccKeyPair, KeyStorage};
use gs_hal::{
    GpioInterface, InterruptInterface, MeterInterface, PlatformServices, RawCryptoInterface,
    StorageInterface, TimeInterface, TransportInterface,
};
use gs_net::{PacketTransport, PacketType, SecurePacket};
use gs_tamper::TamperMonitor;

use crate::analytics::{AnomalyDetector, AnomalySeverity};
use crate::validation::CrossLayerValidation;

const MODULE: &str = "system";

/// Operating mode within the `Operating`/`Tampered` states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum OperationMode {
    /// Regular telemetry cadence
    #[default]
    Normal = 0,
    /// Tamper confirmed; alerting takes precedence
    TamperResponse = 1,
    /// Reduced cadence on backup power
    LowPower = 2,
    /// Field-service mode
    Maintenance = 3,
}

/// The GridSentinel system orchestrator
///
/// Owns the platform services bundle, the crypto engine with both key
/// pairs, the tamper monitor, the anomaly detector and a single reusable
/// outbound packet, so sequence numbers are strictly monotonic across
/// every packet the device ever signs.
pub struct SentinelSystem<T, G, I, C: RawCryptoInterface, S, N, M, D> {
    config: SystemConfig,
    platform: PlatformServices<T, G, I, S, N, M>,
    crypto: CryptoEngine<C>,
    detector: D,

    tamper: TamperMonitor,
    device_keypair: EccKeyPair,
    server_keypair: EccKeyPair,
    packet: SecurePacket,

    state: SystemState,
    mode: OperationMode,
    initialized: bool,

    last_heartbeat: Instant,
    last_reading: Instant,
    send_failures: u32,

    validation: CrossLayerValidation,
    log: LogBuffer,
}

impl<T, G, I, C, S, N, M, D> SentinelSystem<T, G, I, C, S, N, M, D>
where
    T: TimeInterface,
    G: GpioInterface,
    I: InterruptInterface,
    C: RawCryptoInterface,
    S: StorageInterface,
    N: TransportInterface,
    M: MeterInterface,
    D: AnomalyDetector,
{
    /// Create an uninitialized system
    pub fn new(
        config: SystemConfig,
        platform: PlatformServices<T, G, I, S, N, M>,
        raw_crypto: C,
        detector: D,
    ) -> Self {
        Self {
            config,
            platform,
            crypto: CryptoEngine::new(raw_crypto),
            detector,
            tamper: TamperMonitor::new(),
            device_keypair: EccKeyPair::new(),
            server_keypair: EccKeyPair::new(),
            packet: SecurePacket::new(),
            state: SystemState::Uninitialized,
            mode: OperationMode::Normal,
            initialized: false,
            last_heartbeat: Instant::from_millis(0),
            last_reading: Instant::from_millis(0),
            send_failures: 0,
            validation: CrossLayerValidation::new(),
            log: LogBuffer::new(),
        }
    }

    /// Bring up every dependency in order
    ///
    /// Tamper monitor, then key material, then transport. Any failure
    /// transitions to `Error` and aborts bring-up.
    ///
    /// # Errors
    ///
    /// Returns `Error::SystemAlreadyInitialized` on a second call, or the
    /// first dependency failure.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Err(Error::SystemAlreadyInitialized);
        }

        self.transition(SystemState::Initializing);

        if let Err(error) = self.initialize_dependencies() {
            self.transition(SystemState::Error);
            let now = self.platform.now_ms();
            log_error!(self.log, now, MODULE, "bring-up failed: {error}");
            return Err(error);
        }

        self.initialized = true;
        self.transition(SystemState::Ready);
        let now = self.platform.now_ms();
        log_info!(self.log, now, MODULE, "ready, meter id {}", self.config.meter_id);
        Ok(())
    }

    /// Begin operating: enable tamper interrupts and stamp the clocks
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` unless the system is `Ready`.
    pub fn start(&mut self) -> Result<()> {
        if !self.initialized || self.state != SystemState::Ready {
            return Err(Error::InvalidState);
        }

        self.tamper.start(&mut self.platform.interrupt)?;

        self.transition(SystemState::Operating);
        let now = Instant::from_millis(self.platform.now_ms());
        self.last_heartbeat = now;
        self.last_reading = now;
        Ok(())
    }

    /// Suspend operation without releasing any resources
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` unless the system is `Operating`.
    pub fn stop(&mut self) -> Result<()> {
        if self.state != SystemState::Operating {
            return Err(Error::InvalidState);
        }

        self.tamper.stop(&mut self.platform.interrupt)?;
        self.transition(SystemState::Ready);
        Ok(())
    }

    /// One tick of the main loop
    ///
    /// Order per tick: confirm pending tamper triggers and alert, then
    /// heartbeat, then the reading pipeline, then cross-layer validation.
    /// Send failures in the periodic paths are logged and counted but
    /// never halt the cycle.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` unless the system is `Operating` or
    /// `Tampered`.
    pub fn process_cycle(&mut self) -> Result<()> {
        if self.state != SystemState::Operating && self.state != SystemState::Tampered {
            return Err(Error::InvalidState);
        }

        let now = self.platform.now_ms();

        self.tamper.poll(now, &self.platform.gpio)?;
        if self.tamper.is_tampered() && self.state != SystemState::Tampered {
            self.handle_tamper_event(now);
        }

        if self
            .last_heartbeat
            .has_elapsed(Instant::from_millis(now), u64::from(self.config.heartbeat_interval_ms))
        {
            if let Err(error) = self.send_heartbeat() {
                self.send_failures += 1;
                log_warn!(self.log, now, MODULE, "heartbeat send failed: {error}");
            }
            self.last_heartbeat = Instant::from_millis(now);
        }

        if self
            .last_reading
            .has_elapsed(Instant::from_millis(now), u64::from(self.config.reading_interval_ms))
        {
            match self.platform.meter.sample(now) {
                Ok(reading) => {
                    if let Err(error) = self.send_meter_reading(&reading) {
                        self.send_failures += 1;
                        log_warn!(self.log, now, MODULE, "reading send failed: {error}");
                    }
                }
                Err(error) => {
                    log_warn!(self.log, now, MODULE, "meter sample failed: {error}");
                }
            }
            self.last_reading = Instant::from_millis(now);
        }

        self.perform_cross_layer_validation(now);
        Ok(())
    }

    /// Orderly shutdown: stop monitoring, drop the link, erase keys
    ///
    /// # Errors
    ///
    /// Propagates tamper-monitor or transport shutdown failures; key
    /// erasure and the state transition happen regardless of the link.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.state == SystemState::Operating {
            self.stop()?;
        }

        let result = self.platform.transport.shutdown();

        self.device_keypair.clear();
        self.server_keypair.clear();

        self.transition(SystemState::Shutdown);
        self.initialized = false;

        let now = self.platform.now_ms();
        log_info!(self.log, now, MODULE, "shutdown complete");
        result
    }

    /// Analyze, profile and transmit one meter reading
    ///
    /// An analysis verdict of `High` severity or above latches the
    /// consumption-anomaly signal for cross-layer validation.
    ///
    /// # Errors
    ///
    /// Returns `Error::SystemNotInitialized` before bring-up, or any
    /// build/send error.
    pub fn send_meter_reading(&mut self, reading: &MeterReading) -> Result<()> {
        if !self.initialized {
            return Err(Error::SystemNotInitialized);
        }

        if let Ok(report) = self.detector.analyze(reading) {
            if report.severity >= AnomalySeverity::High {
                self.validation.consumption_anomaly_detected = true;
                log_warn!(
                    self.log,
                    reading.timestamp,
                    MODULE,
                    "consumption anomaly, deviation {}%",
                    report.deviation_percent
                );
            }
        }
        self.detector.update_profile(reading)?;

        self.packet.build(
            PacketType::MeterData,
            self.config.meter_id,
            Priority::Normal,
            reading.timestamp,
            &reading.to_bytes(),
            &self.crypto,
            &self.device_keypair,
        )?;
        PacketTransport::send_packet(&mut self.platform.transport, &self.packet)
    }

    /// Build and transmit a tamper alert from current monitor state
    ///
    /// # Errors
    ///
    /// Returns `Error::SystemNotInitialized` before bring-up, or any
    /// build/send error.
    pub fn send_tamper_alert(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(Error::SystemNotInitialized);
        }

        let event = TamperEvent {
            timestamp: self.tamper.tamper_timestamp(),
            metadata: 0,
            sensor_id: u16::from(self.config.tamper.sensor_pin),
            event_type: self.tamper.tamper_type() as u8,
            severity: Priority::Emergency as u8,
        };

        let now = self.platform.now_ms();
        self.packet.build(
            PacketType::TamperAlert,
            self.config.meter_id,
            Priority::Emergency,
            now,
            &event.to_bytes(),
            &self.crypto,
            &self.device_keypair,
        )?;
        PacketTransport::send_packet(&mut self.platform.transport, &self.packet)
    }

    /// Build and transmit a heartbeat
    ///
    /// # Errors
    ///
    /// Returns `Error::SystemNotInitialized` before bring-up, or any
    /// build/send error.
    pub fn send_heartbeat(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(Error::SystemNotInitialized);
        }

        let now = self.platform.now_ms();
        self.packet.build(
            PacketType::Heartbeat,
            self.config.meter_id,
            Priority::Low,
            now,
            &now.to_le_bytes(),
            &self.crypto,
            &self.device_keypair,
        )?;
        PacketTransport::send_packet(&mut self.platform.transport, &self.packet)
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> SystemState {
        self.state
    }

    /// Current operating mode
    #[must_use]
    pub const fn mode(&self) -> OperationMode {
        self.mode
    }

    /// Current cross-layer validation signals
    #[must_use]
    pub const fn validation(&self) -> &CrossLayerValidation {
        &self.validation
    }

    /// Periodic sends that failed since start
    #[must_use]
    pub const fn send_failures(&self) -> u32 {
        self.send_failures
    }

    /// The device public key, once key material is initialized
    #[must_use]
    pub fn device_public_key(&self) -> Option<&[u8; 64]> {
        self.device_keypair.public_key()
    }

    /// The tamper monitor (its interrupt entry is wired by the platform)
    #[must_use]
    pub const fn tamper(&self) -> &TamperMonitor {
        &self.tamper
    }

    /// Mutable tamper monitor access, for reset after intervention
    pub fn tamper_mut(&mut self) -> &mut TamperMonitor {
        &mut self.tamper
    }

    /// The platform services bundle
    #[must_use]
    pub const fn platform(&self) -> &PlatformServices<T, G, I, S, N, M> {
        &self.platform
    }

    /// Mutable platform access
    pub fn platform_mut(&mut self) -> &mut PlatformServices<T, G, I, S, N, M> {
        &mut self.platform
    }

    /// The retained log
    #[must_use]
    pub const fn logs(&self) -> &LogBuffer {
        &self.log
    }

    fn initialize_dependencies(&mut self) -> Result<()> {
        self.tamper
            .initialize(self.config.tamper, &mut self.platform.gpio)?;
        self.initialize_key_material()?;
        self.platform.transport.init()
    }

    /// Load the device key pair from storage, generating and persisting a
    /// fresh pair when the record is absent or corrupted; then install the
    /// provisioned server public key (or a bench placeholder).
    fn initialize_key_material(&mut self) -> Result<()> {
        let now = self.platform.now_ms();

        match KeyStorage::load(&self.platform.storage, &self.crypto, KEY_STORAGE_ADDRESS) {
            Ok(keypair) => {
                self.device_keypair = keypair;
                log_info!(self.log, now, MODULE, "device key pair loaded");
            }
            Err(_) => {
                self.device_keypair = self.crypto.generate_keypair()?;
                if let Err(error) = KeyStorage::save(
                    &mut self.platform.storage,
                    &self.crypto,
                    &self.device_keypair,
                    KEY_STORAGE_ADDRESS,
                ) {
                    log_warn!(self.log, now, MODULE, "key persist failed: {error}");
                }
                log_info!(self.log, now, MODULE, "device key pair generated");
            }
        }

        match self.config.server_public_key {
            Some(key) => self.server_keypair.load_public_key(&key)?,
            None => {
                // Bench setups without provisioning still need a
                // verification key to exercise the receive path
                self.server_keypair = self.crypto.generate_keypair()?;
                log_warn!(self.log, now, MODULE, "no provisioned server key");
            }
        }

        Ok(())
    }

    fn handle_tamper_event(&mut self, now: u64) {
        self.transition(SystemState::Tampered);
        self.mode = OperationMode::TamperResponse;

        self.validation.physical_tamper_detected = true;
        self.validation.validation_timestamp = now;

        log_error!(
            self.log,
            now,
            MODULE,
            "tamper confirmed, type {}",
            self.tamper.tamper_type() as u8
        );

        // The local state transition stands whether or not the alert
        // reaches the head end
        if let Err(error) = self.send_tamper_alert() {
            self.send_failures += 1;
            log_error!(self.log, now, MODULE, "tamper alert send failed: {error}");
        }
    }

    fn perform_cross_layer_validation(&mut self, now: u64) {
        self.validation.validation_timestamp = now;
        self.validation.physical_tamper_detected = self.tamper.is_tampered();
        self.validation.network_anomaly_detected = !self.platform.transport.is_connected();
        // The consumption signal latches in the reading pipeline

        if self.validation.requires_investigation() {
            log_warn!(
                self.log,
                now,
                MODULE,
                "cross-layer correlation requires investigation, priority {}",
                self.validation.priority() as u8
            );
        }
    }

    fn transition(&mut self, new_state: SystemState) {
        self.state = new_state;
    }
}
