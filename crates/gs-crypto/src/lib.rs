// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! GridSentinel Cryptographic Layer
//!
//! Classical ECC primitives for packet authentication and key agreement:
//!
//! - **ECDSA** over NIST P-256 (64-byte r || s signatures, SHA-256 message
//!   hashing performed internally - callers never pass a digest)
//! - **ECDH** shared-secret derivation
//! - **AES-256-GCM** authenticated encryption with a detached tag
//! - **SHA-256** hashing and CRC32 via the platform raw-crypto capability
//! - Integrity-checked persistent key storage
//!
//! # Security Requirements
//!
//! All operations in this crate:
//! - Zeroize key material through an optimization barrier before release
//! - Never log or expose secrets
//! - Draw entropy only from the platform capability (hardware TRNG where
//!   available)
//! - Fail closed: a failed tag check scrubs any partially-produced output

#![no_std]
#![allow(unsafe_code)] // Volatile zeroization of secrets
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod key_storage;
pub mod keypair;
pub mod secure;

// Re-export main types
pub use engine::CryptoEngine;
pub use key_storage::KeyStorage;
pub use keypair::EccKeyPair;
