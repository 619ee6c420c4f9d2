// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Consumption anomaly interface
//!
//! The statistical model itself lives outside this core; these are the
//! types it produces and the seam through which the orchestrator drives
//! it. The orchestrator treats the detector as a black box: one `analyze`
//! per reading, one `update_profile` after.

use gs_common::{MeterReading, Result, TimestampMs};

/// Hours of history in a consumption profile
pub const PROFILE_HOURS: usize = 24;

/// Anomaly classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AnomalyType {
    /// No anomaly
    #[default]
    None = 0,
    /// Consumption fell well below the profile
    UnexpectedDrop = 1,
    /// Consumption rose well above the profile
    UnexpectedSpike = 2,
    /// Shape of the daily pattern deviates
    PatternDeviation = 3,
    /// Zero consumption where load is expected
    ZeroConsumption = 4,
    /// Readings oscillate implausibly
    ErraticBehavior = 5,
}

/// Anomaly severity, ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum AnomalySeverity {
    /// Within profile
    #[default]
    None = 0,
    /// Slight deviation
    Low = 1,
    /// Noticeable deviation
    Medium = 2,
    /// Deviation large enough to flag for correlation
    High = 3,
    /// Deviation consistent with active manipulation
    Critical = 4,
}

/// One analysis verdict for one reading
#[derive(Debug, Clone, Copy, Default)]
pub struct AnomalyReport {
    /// Reading timestamp the verdict applies to
    pub timestamp: TimestampMs,
    /// Classification
    pub anomaly_type: AnomalyType,
    /// Severity
    pub severity: AnomalySeverity,
    /// Model confidence, 0-1000
    pub confidence: u16,
    /// Observed value (Wh)
    pub current_value: u32,
    /// Profile-expected value (Wh)
    pub expected_value: u32,
    /// Deviation from expectation in percent
    pub deviation_percent: u32,
}

/// Learned consumption profile, read-only to this core
#[derive(Debug, Clone, Copy)]
pub struct ConsumptionProfile {
    /// Hourly consumption averages (Wh)
    pub hourly_avg_wh: [u32; PROFILE_HOURS],
    /// Daily average (Wh)
    pub daily_avg_wh: u32,
    /// Weekly average (Wh)
    pub weekly_avg_wh: u32,
    /// Deviation threshold in percent before flagging
    pub variance_threshold: u16,
    /// Profile maturity, 0-100
    pub confidence: u8,
}

impl ConsumptionProfile {
    /// An empty, untrained profile with a 30 % variance threshold
    pub const EMPTY: Self = Self {
        hourly_avg_wh: [0; PROFILE_HOURS],
        daily_avg_wh: 0,
        weekly_avg_wh: 0,
        variance_threshold: 30,
        confidence: 0,
    };
}

impl Default for ConsumptionProfile {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// The consumption anomaly model, provided by the integrator
pub trait AnomalyDetector {
    /// Analyze one reading against the learned profile
    ///
    /// # Errors
    ///
    /// Returns `Error::DataInvalid` for a reading the model cannot score.
    fn analyze(&mut self, reading: &MeterReading) -> Result<AnomalyReport>;

    /// Fold a reading into the learned profile
    ///
    /// # Errors
    ///
    /// Returns `Error::DataInvalid` for a reading the model rejects.
    fn update_profile(&mut self, reading: &MeterReading) -> Result<()>;

    /// The current learned profile
    fn profile(&self) -> &ConsumptionProfile;
}
