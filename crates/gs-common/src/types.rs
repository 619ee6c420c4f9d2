// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Core domain types for GridSentinel
//!
//! Fixed-size value types with explicit little-endian wire layouts. Records
//! are serialized field by field rather than by reinterpreting struct
//! memory, so the wire format is independent of the host ABI.

/// Millisecond timestamp from the platform's monotonic clock
pub type TimestampMs = u64;

/// Unique meter identifier assigned at provisioning
pub type MeterId = u64;

/// Per-packet sequence number
pub type Sequence = u32;

// =============================================================================
// System State
// =============================================================================

/// Device lifecycle state, owned exclusively by the system orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemState {
    /// Power-on default; nothing is configured
    Uninitialized = 0,
    /// Dependency bring-up in progress
    Initializing = 1,
    /// Initialized and waiting for `start`
    Ready = 2,
    /// Normal periodic operation
    Operating = 3,
    /// Confirmed physical tamper; sticky until explicit intervention
    Tampered = 4,
    /// Running on backup power
    PowerLoss = 5,
    /// Unrecoverable dependency failure during bring-up
    Error = 6,
    /// Terminal state after orderly shutdown
    Shutdown = 7,
}

// =============================================================================
// Priority
// =============================================================================

/// Message and escalation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    /// Background traffic
    Lowest = 0,
    /// Routine status traffic
    Low = 1,
    /// Regular telemetry
    Normal = 2,
    /// Anomalous but uncorroborated signals
    High = 3,
    /// Corroborated attack indicators
    Critical = 4,
    /// Confirmed multi-layer attack
    Emergency = 5,
}

impl Priority {
    /// Create from a raw wire byte
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Lowest),
            1 => Some(Self::Low),
            2 => Some(Self::Normal),
            3 => Some(Self::High),
            4 => Some(Self::Critical),
            5 => Some(Self::Emergency),
            _ => None,
        }
    }
}

// =============================================================================
// Meter Reading (24-byte wire record)
// =============================================================================

/// A single metrology sample
///
/// Wire layout (little-endian, 24 bytes):
///
/// ```text
/// [0..8]   timestamp (ms)
/// [8..12]  energy_wh
/// [12..16] voltage_mv
/// [16..18] current_ma
/// [18..20] power_factor (scaled x1000)
/// [20]     phase
/// [21..24] reserved
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeterReading {
    /// Sample timestamp in milliseconds
    pub timestamp: TimestampMs,
    /// Accumulated active energy in watt-hours
    pub energy_wh: u32,
    /// Line voltage in millivolts
    pub voltage_mv: u32,
    /// Line current in milliamperes
    pub current_ma: u16,
    /// Power factor scaled by 1000 (950 = 0.95)
    pub power_factor: u16,
    /// Phase identifier
    pub phase: u8,
    /// Reserved, must be zero
    pub reserved: [u8; 3],
}

impl MeterReading {
    /// Serialized size in bytes
    pub const SIZE: usize = 24;

    /// Serialize to the wire representation
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..8].copy_from_slice(&self.timestamp.to_le_bytes());
        buf[8..12].copy_from_slice(&self.energy_wh.to_le_bytes());
        buf[12..16].copy_from_slice(&self.voltage_mv.to_le_bytes());
        buf[16..18].copy_from_slice(&self.current_ma.to_le_bytes());
        buf[18..20].copy_from_slice(&self.power_factor.to_le_bytes());
        buf[20] = self.phase;
        buf[21..24].copy_from_slice(&self.reserved);
        buf
    }

    /// Deserialize from the wire representation
    ///
    /// Returns `None` if the slice is shorter than [`Self::SIZE`].
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            timestamp: u64::from_le_bytes(bytes[0..8].try_into().ok()?),
            energy_wh: u32::from_le_bytes(bytes[8..12].try_into().ok()?),
            voltage_mv: u32::from_le_bytes(bytes[12..16].try_into().ok()?),
            current_ma: u16::from_le_bytes(bytes[16..18].try_into().ok()?),
            power_factor: u16::from_le_bytes(bytes[18..20].try_into().ok()?),
            phase: bytes[20],
            reserved: [bytes[21], bytes[22], bytes[23]],
        })
    }
}

// =============================================================================
// Tamper Types
// =============================================================================

/// Classification of a confirmed tamper condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TamperType {
    /// No tamper condition
    #[default]
    None = 0,
    /// Enclosure switch opened
    CasingOpened = 1,
    /// External magnetic field interfering with metrology
    MagneticInterference = 2,
    /// Temperature outside the operating envelope
    TemperatureAnomaly = 3,
    /// Mechanical vibration above threshold
    VibrationDetected = 4,
    /// Primary supply cut while the enclosure sensor fired
    PowerCutAttempt = 5,
    /// Physical shock to the enclosure
    PhysicalShock = 6,
}

impl TamperType {
    /// Create from a raw wire byte
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::CasingOpened,
            2 => Self::MagneticInterference,
            3 => Self::TemperatureAnomaly,
            4 => Self::VibrationDetected,
            5 => Self::PowerCutAttempt,
            6 => Self::PhysicalShock,
            _ => Self::None,
        }
    }
}

// =============================================================================
// Tamper Event (16-byte wire record)
// =============================================================================

/// A confirmed tamper occurrence, built by the orchestrator at alert time
///
/// Wire layout (little-endian, 16 bytes):
///
/// ```text
/// [0..8]   timestamp (ms)
/// [8..12]  metadata
/// [12..14] sensor_id
/// [14]     event_type
/// [15]     severity
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TamperEvent {
    /// Confirmation timestamp in milliseconds
    pub timestamp: TimestampMs,
    /// Implementation-defined metadata (zero when unused)
    pub metadata: u32,
    /// Identifier of the sensor that fired
    pub sensor_id: u16,
    /// Raw [`TamperType`] discriminant
    pub event_type: u8,
    /// Raw [`Priority`] discriminant
    pub severity: u8,
}

impl TamperEvent {
    /// Serialized size in bytes
    pub const SIZE: usize = 16;

    /// Serialize to the wire representation
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..8].copy_from_slice(&self.timestamp.to_le_bytes());
        buf[8..12].copy_from_slice(&self.metadata.to_le_bytes());
        buf[12..14].copy_from_slice(&self.sensor_id.to_le_bytes());
        buf[14] = self.event_type;
        buf[15] = self.severity;
        buf
    }

    /// Deserialize from the wire representation
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            timestamp: u64::from_le_bytes(bytes[0..8].try_into().ok()?),
            metadata: u32::from_le_bytes(bytes[8..12].try_into().ok()?),
            sensor_id: u16::from_le_bytes(bytes[12..14].try_into().ok()?),
            event_type: bytes[14],
            severity: bytes[15],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_reading_roundtrip() {
        let reading = MeterReading {
            timestamp: 0x0102_0304_0506_0708,
            energy_wh: 1000,
            voltage_mv: 220_000,
            current_ma: 4545,
            power_factor: 950,
            phase: 1,
            reserved: [0; 3],
        };
        let bytes = reading.to_bytes();
        assert_eq!(bytes.len(), MeterReading::SIZE);
        assert_eq!(MeterReading::from_bytes(&bytes), Some(reading));
    }

    #[test]
    fn meter_reading_rejects_short_buffer() {
        assert!(MeterReading::from_bytes(&[0u8; 23]).is_none());
    }

    #[test]
    fn tamper_event_roundtrip() {
        let event = TamperEvent {
            timestamp: 42,
            metadata: 7,
            sensor_id: 2,
            event_type: TamperType::PowerCutAttempt as u8,
            severity: Priority::Emergency as u8,
        };
        let bytes = event.to_bytes();
        assert_eq!(TamperEvent::from_bytes(&bytes), Some(event));
    }

    #[test]
    fn priority_from_u8_bounds() {
        assert_eq!(Priority::from_u8(5), Some(Priority::Emergency));
        assert_eq!(Priority::from_u8(6), None);
    }

    #[test]
    fn tamper_type_unknown_maps_to_none() {
        assert_eq!(TamperType::from_u8(200), TamperType::None);
    }
}
