// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! ECC key material
//!
//! An owned pair of fixed-size key buffers with possession flags. The
//! invariants are enforced at the accessor level: a buffer is only
//! readable while its possession flag is set, signing requires the
//! private flag and verification the public flag.
//!
//! Key material is volatile-zeroed on `clear` and on drop; clearing twice
//! is safe and leaves the same all-zero, flags-down state.

use zeroize::Zeroize;

use gs_common::constants::{ECC_PRIVATE_KEY_SIZE, ECC_PUBLIC_KEY_SIZE};
use gs_common::{Error, Result};

use crate::secure::secure_zero;

/// An ECC key pair over NIST P-256
///
/// The public key is stored as uncompressed x || y coordinates without the
/// SEC1 tag byte.
#[derive(Debug)]
pub struct EccKeyPair {
    private_key: [u8; ECC_PRIVATE_KEY_SIZE],
    public_key: [u8; ECC_PUBLIC_KEY_SIZE],
    has_private: bool,
    has_public: bool,
}

impl EccKeyPair {
    /// Create an empty key pair with no material loaded
    #[must_use]
    pub const fn new() -> Self {
        Self {
            private_key: [0u8; ECC_PRIVATE_KEY_SIZE],
            public_key: [0u8; ECC_PUBLIC_KEY_SIZE],
            has_private: false,
            has_public: false,
        }
    }

    /// Load a 32-byte private scalar
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if `key` is not exactly 32 bytes.
    pub fn load_private_key(&mut self, key: &[u8]) -> Result<()> {
        if key.len() != ECC_PRIVATE_KEY_SIZE {
            return Err(Error::InvalidParameter);
        }
        self.private_key.copy_from_slice(key);
        self.has_private = true;
        Ok(())
    }

    /// Load a 64-byte uncompressed public key (x || y)
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if `key` is not exactly 64 bytes.
    pub fn load_public_key(&mut self, key: &[u8]) -> Result<()> {
        if key.len() != ECC_PUBLIC_KEY_SIZE {
            return Err(Error::InvalidParameter);
        }
        self.public_key.copy_from_slice(key);
        self.has_public = true;
        Ok(())
    }

    /// The private key, if loaded
    #[must_use]
    pub fn private_key(&self) -> Option<&[u8; ECC_PRIVATE_KEY_SIZE]> {
        self.has_private.then_some(&self.private_key)
    }

    /// The public key, if loaded
    #[must_use]
    pub fn public_key(&self) -> Option<&[u8; ECC_PUBLIC_KEY_SIZE]> {
        self.has_public.then_some(&self.public_key)
    }

    /// Check whether a private key is loaded
    #[must_use]
    pub const fn has_private_key(&self) -> bool {
        self.has_private
    }

    /// Check whether a public key is loaded
    #[must_use]
    pub const fn has_public_key(&self) -> bool {
        self.has_public
    }

    /// Securely erase both key buffers and drop the possession flags
    ///
    /// Idempotent; the zeroization goes through an optimization barrier.
    pub fn clear(&mut self) {
        secure_zero(&mut self.private_key);
        secure_zero(&mut self.public_key);
        self.has_private = false;
        self.has_public = false;
    }
}

impl Default for EccKeyPair {
    fn default() -> Self {
        Self::new()
    }
}

impl Zeroize for EccKeyPair {
    fn zeroize(&mut self) {
        self.clear();
    }
}

impl Drop for EccKeyPair {
    fn drop(&mut self) {
        self.clear();
    }
}
