// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Integration tests for gs-hal
//!
//! Exercises the default raw-crypto implementations against known
//! vectors, the services bundle composition, and the mock platform
//! behaviors the rest of the workspace relies on.

mod raw_crypto_tests {
    use gs_hal::mock::MockRawCrypto;
    use gs_hal::RawCryptoInterface;

    #[test]
    fn test_default_sha256_matches_nist_vector() {
        // SHA-256("abc")
        let expected = [
            0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea, 0x41, 0x41, 0x40, 0xde, 0x5d, 0xae,
            0x22, 0x23, 0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c, 0xb4, 0x10, 0xff, 0x61,
            0xf2, 0x00, 0x15, 0xad,
        ];

        let crypto = MockRawCrypto::new(1);
        let mut out = [0u8; 32];
        crypto.sha256(b"abc", &mut out);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_default_crc32_matches_check_value() {
        // CRC32 (IEEE) check value for "123456789"
        let crypto = MockRawCrypto::new(1);
        assert_eq!(crypto.crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_entropy_failure_injection() {
        let mut crypto = MockRawCrypto::new(1);
        crypto.fail_random = true;

        let mut buf = [0u8; 16];
        assert!(crypto.random_bytes(&mut buf).is_err());
    }
}

mod services_tests {
    use gs_hal::mock::{
        MockGpio, MockInterrupt, MockMeter, MockStorage, MockTime, MockTransport,
    };
    use gs_hal::{MeterInterface, PlatformServices, TimeInterface};

    #[test]
    fn test_bundle_composes_and_splits_borrows() {
        let mut platform = PlatformServices::new(
            MockTime::new(500),
            MockGpio::new(),
            MockInterrupt::new(),
            MockStorage::new(),
            MockTransport::new(),
            MockMeter::new(),
        );

        assert_eq!(platform.now_ms(), 500);

        // Borrowing two capabilities at once must work field-wise
        let now = platform.time.now_ms();
        let reading = platform.meter.sample(now).unwrap();
        assert_eq!(reading.timestamp, 500);
        assert_eq!(reading.energy_wh, 1000);
    }
}

mod mock_behavior_tests {
    use gs_common::Error;
    use gs_hal::mock::{MockGpio, MockInterrupt, MockStorage};
    use gs_hal::{GpioInterface, InterruptInterface, PinMode, StorageInterface, TriggerEdge};

    #[test]
    fn test_gpio_records_configuration() {
        let mut gpio = MockGpio::new();
        gpio.configure(3, PinMode::InputPullup).unwrap();
        assert_eq!(gpio.mode(3), Some(PinMode::InputPullup));
        assert_eq!(gpio.mode(4), None);

        // Unconfigured pins idle high (pull-up convention)
        assert_eq!(gpio.read(3), Ok(true));
        gpio.set_level(3, false);
        assert_eq!(gpio.read(3), Ok(false));
    }

    #[test]
    fn test_interrupt_lifecycle_guards() {
        let mut interrupt = MockInterrupt::new();
        assert_eq!(interrupt.enable(7), Err(Error::InvalidParameter));

        interrupt.attach(7, TriggerEdge::Falling).unwrap();
        interrupt.enable(7).unwrap();
        assert!(interrupt.is_enabled(7));

        interrupt.detach(7).unwrap();
        assert!(!interrupt.is_attached(7));
        assert!(!interrupt.is_enabled(7));
    }

    #[test]
    fn test_storage_erase_restores_flash_idle() {
        let mut storage = MockStorage::new();
        storage.write(10, &[0x11, 0x22]).unwrap();
        storage.erase(10, 2).unwrap();

        let mut buf = [0u8; 2];
        storage.read(10, &mut buf).unwrap();
        assert_eq!(buf, [0xFF, 0xFF]);
    }
}

mod trampoline_tests {
    use core::sync::atomic::{AtomicU32, Ordering};
    use gs_hal::trampoline;

    static EDGE_COUNT: AtomicU32 = AtomicU32::new(0);

    fn on_edge(_context: *const ()) {
        EDGE_COUNT.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_rebind_replaces_handler_in_place() {
        // SAFETY: handler ignores its context
        unsafe {
            trampoline::register(21, on_edge, core::ptr::null()).unwrap();
            trampoline::register(21, on_edge, core::ptr::null()).unwrap();
        }

        let before = EDGE_COUNT.load(Ordering::SeqCst);
        trampoline::dispatch(21);
        assert_eq!(EDGE_COUNT.load(Ordering::SeqCst), before + 1);
        trampoline::clear(21);
    }
}
