// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Persistent key storage
//!
//! The device key pair is persisted as a fixed 108-byte integrity-checked
//! record:
//!
//! ```text
//! [0..4]    magic 0x4753_4B53 ("GSKS", little-endian)
//! [4]       record version
//! [5..8]    reserved
//! [8..72]   public key (64 bytes)
//! [72..104] private key (32 bytes)
//! [104..108] CRC32 over bytes 0..104
//! ```
//!
//! A magic or CRC mismatch on load is reported as `IntegrityViolation`;
//! callers treat both identically as uninitialized-or-corrupted and fall
//! back to generating a fresh pair.

use gs_common::constants::{
    ECC_PRIVATE_KEY_SIZE, ECC_PUBLIC_KEY_SIZE, KEY_STORAGE_MAGIC, KEY_STORAGE_SIZE,
    KEY_STORAGE_VERSION,
};
use gs_common::{Error, Result};
use gs_hal::{RawCryptoInterface, StorageInterface};

use crate::engine::CryptoEngine;
use crate::keypair::EccKeyPair;
use crate::secure::secure_zero;

const PUBLIC_KEY_OFFSET: usize = 8;
const PRIVATE_KEY_OFFSET: usize = PUBLIC_KEY_OFFSET + ECC_PUBLIC_KEY_SIZE;
const CRC_OFFSET: usize = KEY_STORAGE_SIZE - 4;

/// Persisted key record operations
pub struct KeyStorage;

impl KeyStorage {
    /// Persist a complete key pair at `address`
    ///
    /// The scratch buffer holding the private key is volatile-zeroed after
    /// the write completes.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyGenerationFailed` for an incomplete key pair, or
    /// the storage error on write failure.
    pub fn save<S, C>(
        storage: &mut S,
        crypto: &CryptoEngine<C>,
        keypair: &EccKeyPair,
        address: u32,
    ) -> Result<()>
    where
        S: StorageInterface,
        C: RawCryptoInterface,
    {
        let (Some(public), Some(private)) = (keypair.public_key(), keypair.private_key()) else {
            return Err(Error::KeyGenerationFailed);
        };

        let mut record = [0u8; KEY_STORAGE_SIZE];
        record[0..4].copy_from_slice(&KEY_STORAGE_MAGIC.to_le_bytes());
        record[4] = KEY_STORAGE_VERSION;
        record[PUBLIC_KEY_OFFSET..PRIVATE_KEY_OFFSET].copy_from_slice(public);
        record[PRIVATE_KEY_OFFSET..CRC_OFFSET].copy_from_slice(private);

        let crc = crypto.crc32(&record[..CRC_OFFSET]);
        record[CRC_OFFSET..].copy_from_slice(&crc.to_le_bytes());

        let result = storage.write(address, &record);
        secure_zero(&mut record);
        result
    }

    /// Load a key pair from the record at `address`
    ///
    /// # Errors
    ///
    /// Returns `Error::IntegrityViolation` on magic or CRC mismatch, or
    /// the storage error on read failure.
    pub fn load<S, C>(
        storage: &S,
        crypto: &CryptoEngine<C>,
        address: u32,
    ) -> Result<EccKeyPair>
    where
        S: StorageInterface,
        C: RawCryptoInterface,
    {
        let mut record = [0u8; KEY_STORAGE_SIZE];
        storage.read(address, &mut record)?;

        let magic = u32::from_le_bytes(record[0..4].try_into().unwrap_or([0; 4]));
        if magic != KEY_STORAGE_MAGIC {
            secure_zero(&mut record);
            return Err(Error::IntegrityViolation);
        }

        let stored_crc = u32::from_le_bytes(record[CRC_OFFSET..].try_into().unwrap_or([0; 4]));
        if crypto.crc32(&record[..CRC_OFFSET]) != stored_crc {
            secure_zero(&mut record);
            return Err(Error::IntegrityViolation);
        }

        let mut keypair = EccKeyPair::new();
        let loaded = keypair
            .load_public_key(&record[PUBLIC_KEY_OFFSET..PRIVATE_KEY_OFFSET])
            .and_then(|()| {
                keypair.load_private_key(&record[PRIVATE_KEY_OFFSET..CRC_OFFSET])
            });

        secure_zero(&mut record);
        loaded?;
        Ok(keypair)
    }

    /// Erase the record at `address`
    ///
    /// # Errors
    ///
    /// Returns the storage error on failure.
    pub fn erase<S: StorageInterface>(storage: &mut S, address: u32) -> Result<()> {
        storage.erase(address, KEY_STORAGE_SIZE)
    }
}

const _: () = assert!(PRIVATE_KEY_OFFSET + ECC_PRIVATE_KEY_SIZE == CRC_OFFSET);
