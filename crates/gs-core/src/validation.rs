// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Cross-layer validation
//!
//! Correlates the physical, network and consumption signals into one
//! escalated priority. The state is derived, never persisted: the
//! orchestrator recomputes it every cycle from current component state.
//!
//! The escalation policy treats corroboration as the key signal - a
//! single-layer anomaly rates `High` at most, while agreement between
//! layers escalates to `Critical` or `Emergency`.

use gs_common::{Priority, TimestampMs};

/// Correlated security signals across the three layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrossLayerValidation {
    /// Confirmed physical tamper (from the tamper monitor)
    pub physical_tamper_detected: bool,
    /// Network-layer anomaly (from the transport)
    pub network_anomaly_detected: bool,
    /// Consumption anomaly at High severity or above (from the detector)
    pub consumption_anomaly_detected: bool,
    /// When the signals were last recomputed
    pub validation_timestamp: TimestampMs,
}

impl CrossLayerValidation {
    /// Signals cleared, timestamp zero
    #[must_use]
    pub const fn new() -> Self {
        Self {
            physical_tamper_detected: false,
            network_anomaly_detected: false,
            consumption_anomaly_detected: false,
            validation_timestamp: 0,
        }
    }

    /// Whether the correlation warrants investigation
    ///
    /// True iff a tamper or network signal is corroborated by a
    /// consumption anomaly; a single uncorroborated signal is not enough.
    #[must_use]
    pub const fn requires_investigation(&self) -> bool {
        (self.physical_tamper_detected && self.consumption_anomaly_detected)
            || (self.network_anomaly_detected && self.consumption_anomaly_detected)
    }

    /// Escalated priority for the current signal combination
    ///
    /// - all three signals: `Emergency`
    /// - physical tamper alone, or consumption + network: `Critical`
    /// - any single consumption or network anomaly: `High`
    /// - otherwise: `Normal`
    #[must_use]
    pub const fn priority(&self) -> Priority {
        if self.physical_tamper_detected
            && self.consumption_anomaly_detected
            && self.network_anomaly_detected
        {
            return Priority::Emergency;
        }
        if self.physical_tamper_detected
            || (self.consumption_anomaly_detected && self.network_anomaly_detected)
        {
            return Priority::Critical;
        }
        if self.consumption_anomaly_detected || self.network_anomaly_detected {
            return Priority::High;
        }
        Priority::Normal
    }
}
