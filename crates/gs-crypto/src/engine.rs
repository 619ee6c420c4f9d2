// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Crypto engine
//!
//! Wraps the platform raw-crypto capability (entropy, CRC32, SHA-256) and
//! layers the curve and AEAD operations on top. Every operation is a pure
//! function of its explicit inputs; the only state the engine carries is
//! the entropy source itself.
//!
//! `sign` and `verify` hash the message with SHA-256 internally before the
//! curve operation - callers never pass a pre-hashed digest.

use aes_gcm::{AeadInPlace, Aes256Gcm, KeyInit, Nonce, Tag};
use p256::ecdh::diffie_hellman;
use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::generic_array::GenericArray;
use p256::elliptic_curve::sec1::FromEncodedPoint;
use p256::{EncodedPoint, PublicKey, SecretKey};

use gs_common::constants::{
    AES_GCM_KEY_SIZE, AES_GCM_NONCE_SIZE, AES_GCM_TAG_SIZE, ECC_PRIVATE_KEY_SIZE,
    ECC_PUBLIC_KEY_SIZE, ECC_SHARED_SECRET_SIZE, ECC_SIGNATURE_SIZE, SHA256_OUTPUT_SIZE,
};
use gs_common::{Error, Result};
use gs_hal::RawCryptoInterface;

use crate::keypair::EccKeyPair;
use crate::secure::secure_zero;

/// Attempts at drawing a valid P-256 scalar before giving up
const KEYGEN_ATTEMPTS: usize = 8;

/// Cryptographic engine over a platform raw-crypto capability
pub struct CryptoEngine<C: RawCryptoInterface> {
    raw: C,
}

impl<C: RawCryptoInterface> CryptoEngine<C> {
    /// Create an engine wrapping the platform capability
    pub const fn new(raw: C) -> Self {
        Self { raw }
    }

    /// Generate a fresh P-256 key pair
    ///
    /// Candidate scalars come from the platform entropy source; an
    /// out-of-range candidate is discarded and redrawn.
    ///
    /// # Errors
    ///
    /// Returns `Error::CryptoFailure` if the entropy source fails, or
    /// `Error::KeyGenerationFailed` if no valid scalar is found within the
    /// retry limit.
    pub fn generate_keypair(&mut self) -> Result<EccKeyPair> {
        let mut candidate = [0u8; ECC_PRIVATE_KEY_SIZE];

        for _ in 0..KEYGEN_ATTEMPTS {
            self.raw.random_bytes(&mut candidate)?;

            let Ok(signing_key) = SigningKey::from_slice(&candidate) else {
                continue;
            };

            let point = signing_key.verifying_key().to_encoded_point(false);
            let (Some(x), Some(y)) = (point.x(), point.y()) else {
                secure_zero(&mut candidate);
                return Err(Error::KeyGenerationFailed);
            };

            let mut public = [0u8; ECC_PUBLIC_KEY_SIZE];
            public[..32].copy_from_slice(x);
            public[32..].copy_from_slice(y);

            let mut keypair = EccKeyPair::new();
            keypair.load_private_key(&candidate)?;
            keypair.load_public_key(&public)?;

            secure_zero(&mut candidate);
            return Ok(keypair);
        }

        secure_zero(&mut candidate);
        Err(Error::KeyGenerationFailed)
    }

    /// ECDSA-sign a message; returns the 64-byte r || s signature
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthenticationFailed` if `keypair` holds no private
    /// key, or `Error::CryptoFailure` if the stored scalar is invalid.
    pub fn sign(
        &self,
        keypair: &EccKeyPair,
        message: &[u8],
    ) -> Result<[u8; ECC_SIGNATURE_SIZE]> {
        let private = keypair.private_key().ok_or(Error::AuthenticationFailed)?;

        let signing_key = SigningKey::from_slice(private).map_err(|_| Error::CryptoFailure)?;
        let signature: Signature = signing_key.sign(message);

        let mut out = [0u8; ECC_SIGNATURE_SIZE];
        out.copy_from_slice(&signature.to_bytes());
        Ok(out)
    }

    /// Verify a 64-byte r || s signature over a message
    ///
    /// Returns `Ok(true)` for a valid signature, `Ok(false)` for an
    /// invalid or malformed one.
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthenticationFailed` if `keypair` holds no public
    /// key, or `Error::CryptoFailure` if the stored point is not on the
    /// curve.
    pub fn verify(
        &self,
        keypair: &EccKeyPair,
        message: &[u8],
        signature: &[u8; ECC_SIGNATURE_SIZE],
    ) -> Result<bool> {
        let public = keypair.public_key().ok_or(Error::AuthenticationFailed)?;

        let point = EncodedPoint::from_untagged_bytes(GenericArray::from_slice(public));
        let verifying_key =
            VerifyingKey::from_encoded_point(&point).map_err(|_| Error::CryptoFailure)?;

        let Ok(signature) = Signature::from_slice(signature) else {
            return Ok(false);
        };

        Ok(verifying_key.verify(message, &signature).is_ok())
    }

    /// Derive an ECDH shared secret from our private key and a peer's
    /// 64-byte uncompressed public key
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthenticationFailed` without a private key, or
    /// `Error::CryptoFailure` for an off-curve peer point.
    pub fn derive_shared_secret(
        &self,
        our_keypair: &EccKeyPair,
        their_public_key: &[u8; ECC_PUBLIC_KEY_SIZE],
    ) -> Result<[u8; ECC_SHARED_SECRET_SIZE]> {
        let private = our_keypair
            .private_key()
            .ok_or(Error::AuthenticationFailed)?;

        let secret = SecretKey::from_slice(private).map_err(|_| Error::CryptoFailure)?;

        let point = EncodedPoint::from_untagged_bytes(GenericArray::from_slice(their_public_key));
        let public: PublicKey =
            Option::from(PublicKey::from_encoded_point(&point)).ok_or(Error::CryptoFailure)?;

        let shared = diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());

        let mut out = [0u8; ECC_SHARED_SECRET_SIZE];
        out.copy_from_slice(shared.raw_secret_bytes());
        Ok(out)
    }

    /// AES-256-GCM encrypt with a detached tag
    ///
    /// `ciphertext_out` receives exactly `plaintext.len()` bytes.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferOverflow` if the output buffer is short, or
    /// `Error::EncryptionFailed` on a cipher fault.
    pub fn encrypt_aes_gcm(
        &self,
        key: &[u8; AES_GCM_KEY_SIZE],
        nonce: &[u8; AES_GCM_NONCE_SIZE],
        plaintext: &[u8],
        ciphertext_out: &mut [u8],
        tag_out: &mut [u8; AES_GCM_TAG_SIZE],
    ) -> Result<usize> {
        if ciphertext_out.len() < plaintext.len() {
            return Err(Error::BufferOverflow);
        }

        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| Error::EncryptionFailed)?;

        ciphertext_out[..plaintext.len()].copy_from_slice(plaintext);
        let tag = cipher
            .encrypt_in_place_detached(
                Nonce::from_slice(nonce),
                b"",
                &mut ciphertext_out[..plaintext.len()],
            )
            .map_err(|_| Error::EncryptionFailed)?;

        tag_out.copy_from_slice(&tag);
        Ok(plaintext.len())
    }

    /// AES-256-GCM decrypt with a detached tag
    ///
    /// On tag mismatch the output buffer is volatile-zeroed before the
    /// error is returned; no partially-decrypted plaintext escapes.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferOverflow` if the output buffer is short,
    /// `Error::DecryptionFailed` on a cipher fault, or
    /// `Error::IntegrityViolation` when tag verification fails.
    pub fn decrypt_aes_gcm(
        &self,
        key: &[u8; AES_GCM_KEY_SIZE],
        nonce: &[u8; AES_GCM_NONCE_SIZE],
        ciphertext: &[u8],
        tag: &[u8; AES_GCM_TAG_SIZE],
        plaintext_out: &mut [u8],
    ) -> Result<usize> {
        if plaintext_out.len() < ciphertext.len() {
            return Err(Error::BufferOverflow);
        }

        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| Error::DecryptionFailed)?;

        plaintext_out[..ciphertext.len()].copy_from_slice(ciphertext);
        let result = cipher.decrypt_in_place_detached(
            Nonce::from_slice(nonce),
            b"",
            &mut plaintext_out[..ciphertext.len()],
            Tag::from_slice(tag),
        );

        if result.is_err() {
            secure_zero(&mut plaintext_out[..ciphertext.len()]);
            return Err(Error::IntegrityViolation);
        }

        Ok(ciphertext.len())
    }

    /// SHA-256 digest via the platform capability
    #[must_use]
    pub fn hash_sha256(&self, data: &[u8]) -> [u8; SHA256_OUTPUT_SIZE] {
        let mut out = [0u8; SHA256_OUTPUT_SIZE];
        self.raw.sha256(data, &mut out);
        out
    }

    /// CRC32 via the platform capability
    #[must_use]
    pub fn crc32(&self, data: &[u8]) -> u32 {
        self.raw.crc32(data)
    }

    /// Fill a buffer with cryptographically secure random bytes
    ///
    /// # Errors
    ///
    /// Returns `Error::CryptoFailure` if the entropy source fails.
    pub fn random_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        self.raw.random_bytes(dest)
    }
}
