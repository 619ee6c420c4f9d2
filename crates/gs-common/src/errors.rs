// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Error types for GridSentinel
//!
//! This module defines the unified error type used throughout the system.
//! All errors are no_std compatible and carry no heap-allocated context.
//! Error codes are stable and grouped by origin so that a remote operator
//! can triage a failure from the numeric code alone.

use core::fmt;

/// Result type alias for GridSentinel operations
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for GridSentinel
///
/// Each variant maps to a stable numeric code. The code ranges mirror the
/// architectural layers: system lifecycle, hardware, security, network,
/// analytics and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // System Lifecycle Errors (100-199)
    // =========================================================================
    /// Operation requires a component that was never initialized
    SystemNotInitialized,
    /// Component was already initialized and cannot be re-initialized
    SystemAlreadyInitialized,
    /// System has been shut down; no further operations permitted
    SystemShutdown,
    /// Operation is not legal in the current lifecycle state
    InvalidState,
    /// A fixed-size resource pool is exhausted
    ResourceExhausted,

    // =========================================================================
    // Hardware Errors (200-299)
    // =========================================================================
    /// Generic hardware fault
    HardwareFailure,
    /// Sensor read returned an error
    SensorReadFailure,
    /// Sensor requires calibration before use
    SensorNotCalibrated,
    /// A tamper condition is active
    TamperDetected,
    /// Loss of primary power was detected
    PowerLossDetected,

    // =========================================================================
    // Security Errors (300-399)
    // =========================================================================
    /// Generic cryptographic failure
    CryptoFailure,
    /// Authentication precondition not met (e.g. missing private key)
    AuthenticationFailed,
    /// Integrity check failed (checksum, CRC or AEAD tag mismatch)
    IntegrityViolation,
    /// Key pair generation failed
    KeyGenerationFailed,
    /// ECDSA signature did not verify
    SignatureInvalid,
    /// Symmetric encryption failed
    EncryptionFailed,
    /// Symmetric decryption failed
    DecryptionFailed,

    // =========================================================================
    // Network Errors (400-499)
    // =========================================================================
    /// Transport operation timed out
    NetworkTimeout,
    /// Transport is not connected
    NetworkDisconnected,
    /// Frame was not fully accepted by the transport
    TransmissionFailed,
    /// Received buffer is not a well-formed packet
    InvalidPacket,
    /// Payload or destination buffer exceeds a fixed limit
    BufferOverflow,

    // =========================================================================
    // Analytics Errors (500-599)
    // =========================================================================
    /// Consumption anomaly detected
    AnomalyDetected,
    /// Reading does not match the consumption profile
    ProfileMismatch,
    /// Configured variance threshold exceeded
    ThresholdExceeded,
    /// Reading contains invalid data
    DataInvalid,

    // =========================================================================
    // Configuration Errors (600-699)
    // =========================================================================
    /// A parameter is out of range or inconsistent
    InvalidParameter,
    /// Configuration is internally inconsistent
    ConfigurationError,
}

impl Error {
    /// Get the stable numeric code for this error
    ///
    /// Code ranges:
    /// - 100-199: system lifecycle
    /// - 200-299: hardware
    /// - 300-399: security
    /// - 400-499: network
    /// - 500-599: analytics
    /// - 600-699: configuration
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::SystemNotInitialized => 100,
            Self::SystemAlreadyInitialized => 101,
            Self::SystemShutdown => 102,
            Self::InvalidState => 103,
            Self::ResourceExhausted => 104,

            Self::HardwareFailure => 200,
            Self::SensorReadFailure => 201,
            Self::SensorNotCalibrated => 202,
            Self::TamperDetected => 203,
            Self::PowerLossDetected => 204,

            Self::CryptoFailure => 300,
            Self::AuthenticationFailed => 301,
            Self::IntegrityViolation => 302,
            Self::KeyGenerationFailed => 303,
            Self::SignatureInvalid => 304,
            Self::EncryptionFailed => 305,
            Self::DecryptionFailed => 306,

            Self::NetworkTimeout => 400,
            Self::NetworkDisconnected => 401,
            Self::TransmissionFailed => 402,
            Self::InvalidPacket => 403,
            Self::BufferOverflow => 404,

            Self::AnomalyDetected => 500,
            Self::ProfileMismatch => 501,
            Self::ThresholdExceeded => 502,
            Self::DataInvalid => 503,

            Self::InvalidParameter => 600,
            Self::ConfigurationError => 601,
        }
    }

    /// Check if this error indicates a security-relevant event
    ///
    /// Security errors are never downgraded or silently retried; the caller
    /// must surface them.
    #[must_use]
    pub const fn is_security_error(&self) -> bool {
        matches!(
            self,
            Self::TamperDetected
                | Self::CryptoFailure
                | Self::AuthenticationFailed
                | Self::IntegrityViolation
                | Self::KeyGenerationFailed
                | Self::SignatureInvalid
                | Self::EncryptionFailed
                | Self::DecryptionFailed
                | Self::AnomalyDetected
        )
    }

    /// Get a short description of the error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::SystemNotInitialized => "system not initialized",
            Self::SystemAlreadyInitialized => "system already initialized",
            Self::SystemShutdown => "system shut down",
            Self::InvalidState => "invalid state",
            Self::ResourceExhausted => "resource exhausted",
            Self::HardwareFailure => "hardware failure",
            Self::SensorReadFailure => "sensor read failure",
            Self::SensorNotCalibrated => "sensor not calibrated",
            Self::TamperDetected => "tamper detected",
            Self::PowerLossDetected => "power loss detected",
            Self::CryptoFailure => "crypto failure",
            Self::AuthenticationFailed => "authentication failed",
            Self::IntegrityViolation => "integrity violation",
            Self::KeyGenerationFailed => "key generation failed",
            Self::SignatureInvalid => "signature invalid",
            Self::EncryptionFailed => "encryption failed",
            Self::DecryptionFailed => "decryption failed",
            Self::NetworkTimeout => "network timeout",
            Self::NetworkDisconnected => "network disconnected",
            Self::TransmissionFailed => "transmission failed",
            Self::InvalidPacket => "invalid packet",
            Self::BufferOverflow => "buffer overflow",
            Self::AnomalyDetected => "anomaly detected",
            Self::ProfileMismatch => "profile mismatch",
            Self::ThresholdExceeded => "threshold exceeded",
            Self::DataInvalid => "data invalid",
            Self::InvalidParameter => "invalid parameter",
            Self::ConfigurationError => "configuration error",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.description())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[{}] {}", self.code(), self.description());
    }
}
