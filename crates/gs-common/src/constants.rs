// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! System-wide constants for GridSentinel
//!
//! Compile-time sizes and magic values shared by more than one crate.
//! Protocol framing constants live in `gs-net`; these are the
//! cryptographic and storage-layer invariants.

// =============================================================================
// Elliptic Curve Constants (NIST P-256)
// =============================================================================

/// Private key (scalar) size in bytes
pub const ECC_PRIVATE_KEY_SIZE: usize = 32;

/// Public key size in bytes (uncompressed x || y, no SEC1 tag)
pub const ECC_PUBLIC_KEY_SIZE: usize = 64;

/// ECDSA signature size in bytes (r || s)
pub const ECC_SIGNATURE_SIZE: usize = 64;

/// ECDH shared secret size in bytes
pub const ECC_SHARED_SECRET_SIZE: usize = 32;

// =============================================================================
// Symmetric Crypto Constants
// =============================================================================

/// AES-256-GCM key size in bytes
pub const AES_GCM_KEY_SIZE: usize = 32;

/// AES-GCM nonce size in bytes
pub const AES_GCM_NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size in bytes
pub const AES_GCM_TAG_SIZE: usize = 16;

/// SHA-256 digest size in bytes
pub const SHA256_OUTPUT_SIZE: usize = 32;

// =============================================================================
// Key Storage Record
// =============================================================================

/// Key storage record magic: "GSKS"
pub const KEY_STORAGE_MAGIC: u32 = 0x4753_4B53;

/// Key storage record format version
pub const KEY_STORAGE_VERSION: u8 = 1;

/// Total key storage record size in bytes
///
/// magic(4) + version(1) + reserved(3) + public(64) + private(32) + crc32(4)
pub const KEY_STORAGE_SIZE: usize = 108;

/// Default storage address for the device key record
pub const KEY_STORAGE_ADDRESS: u32 = 0;
