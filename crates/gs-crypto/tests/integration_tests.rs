// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Integration tests for gs-crypto
//!
//! Exercises the engine end-to-end over the mock entropy source: key
//! generation, signing, key agreement, authenticated encryption and the
//! persisted key record.

use gs_crypto::{CryptoEngine, EccKeyPair, KeyStorage};
use gs_hal::mock::{MockRawCrypto, MockStorage};

fn engine() -> CryptoEngine<MockRawCrypto> {
    CryptoEngine::new(MockRawCrypto::new(0x5EED))
}

mod signing_tests {
    use super::*;
    use gs_common::Error;

    #[test]
    fn test_sign_verify_roundtrip() {
        let mut crypto = engine();
        let keypair = crypto.generate_keypair().unwrap();

        let message = b"meter 42 heartbeat";
        let signature = crypto.sign(&keypair, message).unwrap();

        assert!(crypto.verify(&keypair, message, &signature).unwrap());
    }

    #[test]
    fn test_tampered_message_fails_verification() {
        let mut crypto = engine();
        let keypair = crypto.generate_keypair().unwrap();

        let signature = crypto.sign(&keypair, b"original").unwrap();
        assert!(!crypto.verify(&keypair, b"originaX", &signature).unwrap());
    }

    #[test]
    fn test_wrong_key_fails_verification() {
        let mut crypto = engine();
        let signer = crypto.generate_keypair().unwrap();
        let other = crypto.generate_keypair().unwrap();

        let signature = crypto.sign(&signer, b"payload").unwrap();
        assert!(!crypto.verify(&other, b"payload", &signature).unwrap());
    }

    #[test]
    fn test_corrupted_signature_fails_verification() {
        let mut crypto = engine();
        let keypair = crypto.generate_keypair().unwrap();

        let mut signature = crypto.sign(&keypair, b"payload").unwrap();
        signature[10] ^= 0x01;
        assert!(!crypto.verify(&keypair, b"payload", &signature).unwrap());
    }

    #[test]
    fn test_sign_requires_private_key() {
        let mut crypto = engine();
        let full = crypto.generate_keypair().unwrap();

        let mut public_only = EccKeyPair::new();
        public_only
            .load_public_key(full.public_key().unwrap())
            .unwrap();

        assert_eq!(
            crypto.sign(&public_only, b"x").unwrap_err(),
            Error::AuthenticationFailed
        );
        // But verification with the same pair works
        let signature = crypto.sign(&full, b"x").unwrap();
        assert!(crypto.verify(&public_only, b"x", &signature).unwrap());
    }

    #[test]
    fn test_verify_requires_public_key() {
        let mut crypto = engine();
        let keypair = crypto.generate_keypair().unwrap();
        let signature = crypto.sign(&keypair, b"x").unwrap();

        let empty = EccKeyPair::new();
        assert_eq!(
            crypto.verify(&empty, b"x", &signature).unwrap_err(),
            Error::AuthenticationFailed
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        // RFC 6979 derivation: same key and message, same signature
        let mut crypto = engine();
        let keypair = crypto.generate_keypair().unwrap();

        let a = crypto.sign(&keypair, b"same input").unwrap();
        let b = crypto.sign(&keypair, b"same input").unwrap();
        assert_eq!(a, b);
    }
}

mod ecdh_tests {
    use super::*;
    use gs_common::Error;

    #[test]
    fn test_shared_secret_agrees_both_ways() {
        let mut crypto = engine();
        let alice = crypto.generate_keypair().unwrap();
        let bob = crypto.generate_keypair().unwrap();

        let ab = crypto
            .derive_shared_secret(&alice, bob.public_key().unwrap())
            .unwrap();
        let ba = crypto
            .derive_shared_secret(&bob, alice.public_key().unwrap())
            .unwrap();

        assert_eq!(ab, ba);
        assert!(ab.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_off_curve_peer_point_rejected() {
        let mut crypto = engine();
        let ours = crypto.generate_keypair().unwrap();

        let bogus = [0xFFu8; 64];
        assert_eq!(
            crypto.derive_shared_secret(&ours, &bogus).unwrap_err(),
            Error::CryptoFailure
        );
    }
}

mod keypair_tests {
    use super::*;

    #[test]
    fn test_generated_pair_has_both_keys() {
        let mut crypto = engine();
        let keypair = crypto.generate_keypair().unwrap();
        assert!(keypair.has_private_key());
        assert!(keypair.has_public_key());
    }

    #[test]
    fn test_secure_erase_is_idempotent() {
        let mut crypto = engine();
        let mut keypair = crypto.generate_keypair().unwrap();

        for _ in 0..2 {
            keypair.clear();
            assert!(!keypair.has_private_key());
            assert!(!keypair.has_public_key());
            assert!(keypair.private_key().is_none());
            assert!(keypair.public_key().is_none());
        }
    }
}

mod aead_tests {
    use super::*;
    use gs_common::Error;

    #[test]
    fn test_aes_gcm_roundtrip() {
        let mut crypto = engine();

        let mut key = [0u8; 32];
        let mut nonce = [0u8; 12];
        crypto.random_bytes(&mut key).unwrap();
        crypto.random_bytes(&mut nonce).unwrap();

        let plaintext = [0x42u8; 24];
        let mut ciphertext = [0u8; 24];
        let mut tag = [0u8; 16];
        let ct_len = crypto
            .encrypt_aes_gcm(&key, &nonce, &plaintext, &mut ciphertext, &mut tag)
            .unwrap();
        assert_eq!(ct_len, 24);
        assert_ne!(ciphertext, plaintext);

        let mut decrypted = [0u8; 24];
        let pt_len = crypto
            .decrypt_aes_gcm(&key, &nonce, &ciphertext, &tag, &mut decrypted)
            .unwrap();
        assert_eq!(pt_len, 24);
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_flipped_tag_fails_and_scrubs_output() {
        let mut crypto = engine();

        let mut key = [0u8; 32];
        let mut nonce = [0u8; 12];
        crypto.random_bytes(&mut key).unwrap();
        crypto.random_bytes(&mut nonce).unwrap();

        let plaintext = [0x42u8; 24];
        let mut ciphertext = [0u8; 24];
        let mut tag = [0u8; 16];
        crypto
            .encrypt_aes_gcm(&key, &nonce, &plaintext, &mut ciphertext, &mut tag)
            .unwrap();

        tag[0] ^= 0x01;

        let mut decrypted = [0xEEu8; 24];
        let result = crypto.decrypt_aes_gcm(&key, &nonce, &ciphertext, &tag, &mut decrypted);

        assert_eq!(result.unwrap_err(), Error::IntegrityViolation);
        // No plaintext byte may survive the failed tag check
        assert!(decrypted.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_flipped_ciphertext_fails() {
        let mut crypto = engine();

        let key = [0x11u8; 32];
        let nonce = [0x22u8; 12];
        let mut ciphertext = [0u8; 24];
        let mut tag = [0u8; 16];
        crypto
            .encrypt_aes_gcm(&key, &nonce, &[0u8; 24], &mut ciphertext, &mut tag)
            .unwrap();

        ciphertext[5] ^= 0x80;

        let mut decrypted = [0u8; 24];
        assert_eq!(
            crypto
                .decrypt_aes_gcm(&key, &nonce, &ciphertext, &tag, &mut decrypted)
                .unwrap_err(),
            Error::IntegrityViolation
        );
    }

    #[test]
    fn test_short_output_buffer_rejected() {
        let crypto = engine();

        let key = [0u8; 32];
        let nonce = [0u8; 12];
        let mut small = [0u8; 8];
        let mut tag = [0u8; 16];

        assert_eq!(
            crypto
                .encrypt_aes_gcm(&key, &nonce, &[0u8; 24], &mut small, &mut tag)
                .unwrap_err(),
            Error::BufferOverflow
        );
    }
}

mod key_storage_tests {
    use super::*;
    use gs_common::constants::{KEY_STORAGE_ADDRESS, KEY_STORAGE_SIZE};
    use gs_common::Error;

    #[test]
    fn test_save_load_roundtrip() {
        let mut crypto = engine();
        let mut storage = MockStorage::new();
        let keypair = crypto.generate_keypair().unwrap();

        KeyStorage::save(&mut storage, &crypto, &keypair, KEY_STORAGE_ADDRESS).unwrap();
        let loaded = KeyStorage::load(&storage, &crypto, KEY_STORAGE_ADDRESS).unwrap();

        assert_eq!(loaded.public_key(), keypair.public_key());
        assert_eq!(loaded.private_key(), keypair.private_key());
    }

    #[test]
    fn test_record_layout() {
        let mut crypto = engine();
        let mut storage = MockStorage::new();
        let keypair = crypto.generate_keypair().unwrap();

        KeyStorage::save(&mut storage, &crypto, &keypair, 0).unwrap();

        let record = &storage.data_mut()[..KEY_STORAGE_SIZE];
        // Magic "GSKS" (0x47534B53) little-endian
        assert_eq!(&record[0..4], &[0x53, 0x4B, 0x53, 0x47]);
        assert_eq!(record[4], 1); // version
        assert_eq!(&record[8..72], keypair.public_key().unwrap());
        assert_eq!(&record[72..104], keypair.private_key().unwrap());
    }

    #[test]
    fn test_corrupted_record_rejected() {
        let mut crypto = engine();
        let mut storage = MockStorage::new();
        let keypair = crypto.generate_keypair().unwrap();
        KeyStorage::save(&mut storage, &crypto, &keypair, 0).unwrap();

        // Flip one private-key byte; CRC must catch it
        storage.data_mut()[80] ^= 0x01;
        assert_eq!(
            KeyStorage::load(&storage, &crypto, 0).unwrap_err(),
            Error::IntegrityViolation
        );
    }

    #[test]
    fn test_wrong_magic_rejected() {
        let mut crypto = engine();
        let mut storage = MockStorage::new();
        let keypair = crypto.generate_keypair().unwrap();
        KeyStorage::save(&mut storage, &crypto, &keypair, 0).unwrap();

        storage.data_mut()[0] = 0x00;
        assert_eq!(
            KeyStorage::load(&storage, &crypto, 0).unwrap_err(),
            Error::IntegrityViolation
        );
    }

    #[test]
    fn test_erased_storage_reads_as_uninitialized() {
        let crypto = engine();
        let storage = MockStorage::new();

        assert_eq!(
            KeyStorage::load(&storage, &crypto, 0).unwrap_err(),
            Error::IntegrityViolation
        );
    }

    #[test]
    fn test_incomplete_pair_not_persisted() {
        let crypto = engine();
        let mut storage = MockStorage::new();

        let mut public_only = EccKeyPair::new();
        public_only.load_public_key(&[0x33u8; 64]).unwrap();

        assert_eq!(
            KeyStorage::save(&mut storage, &crypto, &public_only, 0).unwrap_err(),
            Error::KeyGenerationFailed
        );
    }

    #[test]
    fn test_erase_then_load_fails() {
        let mut crypto = engine();
        let mut storage = MockStorage::new();
        let keypair = crypto.generate_keypair().unwrap();
        KeyStorage::save(&mut storage, &crypto, &keypair, 0).unwrap();

        KeyStorage::erase(&mut storage, 0).unwrap();
        assert!(KeyStorage::load(&storage, &crypto, 0).is_err());
    }
}

mod hash_tests {
    use super::*;

    #[test]
    fn test_sha256_abc_vector() {
        let crypto = engine();
        let digest = crypto.hash_sha256(b"abc");
        assert_eq!(
            digest[..4],
            [0xba, 0x78, 0x16, 0xbf],
            "SHA-256(\"abc\") prefix mismatch"
        );
    }

    #[test]
    fn test_distinct_inputs_distinct_digests() {
        let crypto = engine();
        assert_ne!(crypto.hash_sha256(b"a"), crypto.hash_sha256(b"b"));
    }
}
