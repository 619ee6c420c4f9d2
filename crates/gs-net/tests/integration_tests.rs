// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Integration tests for gs-net
//!
//! Builds real signed packets with the crypto engine over mock entropy
//! and drives them through serialize, the transport wrapper and parse.
//! The receiver always verifies with a public-only key pair, as the head
//! end would.

use gs_common::{Error, Priority};
use gs_crypto::{CryptoEngine, EccKeyPair};
use gs_hal::mock::{MockRawCrypto, MockTransport};
use gs_net::{
    PacketTransport, PacketType, SecurePacket, FOOTER_SIZE, HEADER_SIZE, MAX_PACKET_SIZE,
    MAX_PAYLOAD_SIZE,
};

const METER_ID: u64 = 0x00C0_FFEE_0000_0042;

fn engine() -> CryptoEngine<MockRawCrypto> {
    CryptoEngine::new(MockRawCrypto::new(0xBEEF))
}

/// Device pair for signing plus a public-only pair for verification
fn key_pairs(crypto: &mut CryptoEngine<MockRawCrypto>) -> (EccKeyPair, EccKeyPair) {
    let device = crypto.generate_keypair().unwrap();
    let mut verifier = EccKeyPair::new();
    verifier
        .load_public_key(device.public_key().unwrap())
        .unwrap();
    (device, verifier)
}

fn build_frame(
    crypto: &CryptoEngine<MockRawCrypto>,
    device: &EccKeyPair,
    packet: &mut SecurePacket,
    payload: &[u8],
) -> (usize, [u8; MAX_PACKET_SIZE]) {
    packet
        .build(
            PacketType::MeterData,
            METER_ID,
            Priority::Normal,
            123_456,
            payload,
            crypto,
            device,
        )
        .unwrap();

    let mut frame = [0u8; MAX_PACKET_SIZE];
    let frame_len = packet.serialize(&mut frame).unwrap();
    (frame_len, frame)
}

mod roundtrip_tests {
    use super::*;

    #[test]
    fn test_roundtrip_preserves_header_and_payload() {
        let mut crypto = engine();
        let (device, verifier) = key_pairs(&mut crypto);
        let mut packet = SecurePacket::new();

        let payload = [0xABu8; 24];
        let (frame_len, frame) = build_frame(&crypto, &device, &mut packet, &payload);
        assert_eq!(frame_len, HEADER_SIZE + 24 + FOOTER_SIZE);

        let mut received = SecurePacket::new();
        received.parse(&frame[..frame_len], &crypto, &verifier).unwrap();

        assert!(received.is_valid());
        assert_eq!(received.header().packet_type, PacketType::MeterData);
        assert_eq!(received.header().meter_id, METER_ID);
        assert_eq!(received.header().priority, Priority::Normal);
        assert_eq!(received.header().timestamp, 123_456);
        assert_eq!(received.payload(), &payload);
    }

    #[test]
    fn test_empty_payload_roundtrip() {
        let mut crypto = engine();
        let (device, verifier) = key_pairs(&mut crypto);
        let mut packet = SecurePacket::new();

        let (frame_len, frame) = build_frame(&crypto, &device, &mut packet, &[]);
        assert_eq!(frame_len, HEADER_SIZE + FOOTER_SIZE);

        let mut received = SecurePacket::new();
        received.parse(&frame[..frame_len], &crypto, &verifier).unwrap();
        assert!(received.payload().is_empty());
    }

    #[test]
    fn test_max_payload_roundtrip() {
        let mut crypto = engine();
        let (device, verifier) = key_pairs(&mut crypto);
        let mut packet = SecurePacket::new();

        let payload = [0x3Cu8; MAX_PAYLOAD_SIZE];
        let (frame_len, frame) = build_frame(&crypto, &device, &mut packet, &payload);
        assert_eq!(frame_len, MAX_PACKET_SIZE);

        let mut received = SecurePacket::new();
        received.parse(&frame[..frame_len], &crypto, &verifier).unwrap();
        assert_eq!(received.payload().len(), MAX_PAYLOAD_SIZE);
    }
}

mod build_tests {
    use super::*;

    #[test]
    fn test_oversized_payload_rejected() {
        let mut crypto = engine();
        let (device, _) = key_pairs(&mut crypto);
        let mut packet = SecurePacket::new();

        let oversized = [0u8; MAX_PAYLOAD_SIZE + 1];
        let result = packet.build(
            PacketType::MeterData,
            METER_ID,
            Priority::Normal,
            0,
            &oversized,
            &crypto,
            &device,
        );
        assert_eq!(result.unwrap_err(), Error::BufferOverflow);
        assert!(!packet.is_valid());
    }

    #[test]
    fn test_build_without_private_key_rejected() {
        let mut crypto = engine();
        let (_, verifier) = key_pairs(&mut crypto);
        let mut packet = SecurePacket::new();

        let result = packet.build(
            PacketType::Heartbeat,
            METER_ID,
            Priority::Low,
            0,
            &[1, 2, 3],
            &crypto,
            &verifier,
        );
        assert_eq!(result.unwrap_err(), Error::AuthenticationFailed);
    }

    #[test]
    fn test_sequence_increases_across_builds() {
        let mut crypto = engine();
        let (device, _) = key_pairs(&mut crypto);
        let mut packet = SecurePacket::new();

        let mut previous = None;
        for _ in 0..5 {
            packet
                .build(
                    PacketType::Heartbeat,
                    METER_ID,
                    Priority::Low,
                    0,
                    &[0u8; 8],
                    &crypto,
                    &device,
                )
                .unwrap();
            let sequence = packet.header().sequence;
            if let Some(previous) = previous {
                assert!(sequence > previous);
            }
            previous = Some(sequence);
        }
    }

    #[test]
    fn test_sequence_advances_even_when_send_fails() {
        let mut crypto = engine();
        let (device, _) = key_pairs(&mut crypto);
        let mut packet = SecurePacket::new();
        let mut transport = MockTransport::new();
        transport.fail_sends = true;

        packet
            .build(
                PacketType::Heartbeat,
                METER_ID,
                Priority::Low,
                0,
                &[0u8; 8],
                &crypto,
                &device,
            )
            .unwrap();
        assert_eq!(packet.header().sequence, 0);
        assert!(PacketTransport::send_packet(&mut transport, &packet).is_err());

        packet
            .build(
                PacketType::Heartbeat,
                METER_ID,
                Priority::Low,
                0,
                &[0u8; 8],
                &crypto,
                &device,
            )
            .unwrap();
        assert_eq!(packet.header().sequence, 1);
    }
}

mod tamper_rejection_tests {
    use super::*;

    fn built_frame() -> (
        CryptoEngine<MockRawCrypto>,
        EccKeyPair,
        usize,
        [u8; MAX_PACKET_SIZE],
    ) {
        let mut crypto = engine();
        let (device, verifier) = key_pairs(&mut crypto);
        let mut packet = SecurePacket::new();
        let (frame_len, frame) = build_frame(&crypto, &device, &mut packet, &[0x55u8; 32]);
        (crypto, verifier, frame_len, frame)
    }

    #[test]
    fn test_flipped_payload_byte_is_integrity_violation() {
        let (crypto, verifier, frame_len, mut frame) = built_frame();
        frame[HEADER_SIZE + 4] ^= 0x01;

        let mut received = SecurePacket::new();
        assert_eq!(
            received
                .parse(&frame[..frame_len], &crypto, &verifier)
                .unwrap_err(),
            Error::IntegrityViolation
        );
        assert!(!received.is_valid());
    }

    #[test]
    fn test_flipped_signature_byte_is_signature_invalid() {
        let (crypto, verifier, frame_len, mut frame) = built_frame();
        frame[frame_len - 2] ^= 0x01; // last signature byte, before footer magic

        let mut received = SecurePacket::new();
        assert_eq!(
            received
                .parse(&frame[..frame_len], &crypto, &verifier)
                .unwrap_err(),
            Error::SignatureInvalid
        );
    }

    #[test]
    fn test_corrupted_header_magic_is_invalid_packet() {
        let (crypto, verifier, frame_len, mut frame) = built_frame();
        frame[0] = 0x00;

        let mut received = SecurePacket::new();
        assert_eq!(
            received
                .parse(&frame[..frame_len], &crypto, &verifier)
                .unwrap_err(),
            Error::InvalidPacket
        );
    }

    #[test]
    fn test_corrupted_footer_magic_is_invalid_packet() {
        let (crypto, verifier, frame_len, mut frame) = built_frame();
        frame[frame_len - 1] = 0x00;

        let mut received = SecurePacket::new();
        assert_eq!(
            received
                .parse(&frame[..frame_len], &crypto, &verifier)
                .unwrap_err(),
            Error::InvalidPacket
        );
    }

    #[test]
    fn test_wrong_sender_key_is_signature_invalid() {
        let (crypto, _, frame_len, frame) = built_frame();

        let mut other_engine = CryptoEngine::new(MockRawCrypto::new(0x0DD));
        let stranger = other_engine.generate_keypair().unwrap();

        let mut received = SecurePacket::new();
        assert_eq!(
            received
                .parse(&frame[..frame_len], &crypto, &stranger)
                .unwrap_err(),
            Error::SignatureInvalid
        );
    }

    #[test]
    fn test_truncated_buffer_is_invalid_packet() {
        let (crypto, verifier, _, frame) = built_frame();

        let mut received = SecurePacket::new();
        // Shorter than header + footer
        assert_eq!(
            received
                .parse(&frame[..HEADER_SIZE + FOOTER_SIZE - 1], &crypto, &verifier)
                .unwrap_err(),
            Error::InvalidPacket
        );
        // Header claims more payload than the buffer carries
        assert_eq!(
            received
                .parse(&frame[..HEADER_SIZE + FOOTER_SIZE + 10], &crypto, &verifier)
                .unwrap_err(),
            Error::InvalidPacket
        );
    }

    #[test]
    fn test_oversized_declared_payload_is_buffer_overflow() {
        let (crypto, verifier, frame_len, mut frame) = built_frame();
        // payload_length field sits at header offset 17
        frame[17..19].copy_from_slice(&u16::try_from(MAX_PAYLOAD_SIZE + 1).unwrap().to_le_bytes());

        let mut received = SecurePacket::new();
        assert_eq!(
            received
                .parse(&frame[..frame_len], &crypto, &verifier)
                .unwrap_err(),
            Error::BufferOverflow
        );
    }
}

mod serialize_tests {
    use super::*;

    #[test]
    fn test_serialize_into_short_buffer_rejected() {
        let mut crypto = engine();
        let (device, _) = key_pairs(&mut crypto);
        let mut packet = SecurePacket::new();
        packet
            .build(
                PacketType::MeterData,
                METER_ID,
                Priority::Normal,
                0,
                &[0u8; 24],
                &crypto,
                &device,
            )
            .unwrap();

        let mut short = [0u8; HEADER_SIZE + 24 + FOOTER_SIZE - 1];
        assert_eq!(packet.serialize(&mut short), Err(Error::BufferOverflow));
    }
}

mod transport_tests {
    use super::*;

    #[test]
    fn test_send_and_receive_over_transport() {
        let mut crypto = engine();
        let (device, verifier) = key_pairs(&mut crypto);
        let mut packet = SecurePacket::new();
        packet
            .build(
                PacketType::TamperAlert,
                METER_ID,
                Priority::Emergency,
                99,
                &[7u8; 16],
                &crypto,
                &device,
            )
            .unwrap();

        let mut transport = MockTransport::new();
        PacketTransport::send_packet(&mut transport, &packet).unwrap();
        assert_eq!(transport.sent_count(), 1);

        // Loop the sent frame back and receive it
        let frame = transport.last_sent().unwrap().to_vec();
        transport.queue_rx(&frame);

        let received =
            PacketTransport::receive_packet(&mut transport, &crypto, &verifier, 100).unwrap();
        assert_eq!(received.header().packet_type, PacketType::TamperAlert);
        assert_eq!(received.payload(), &[7u8; 16]);
    }

    #[test]
    fn test_unbuilt_packet_cannot_be_sent() {
        let packet = SecurePacket::new();
        let mut transport = MockTransport::new();
        assert_eq!(
            PacketTransport::send_packet(&mut transport, &packet).unwrap_err(),
            Error::InvalidState
        );
        assert_eq!(transport.sent_count(), 0);
    }

    #[test]
    fn test_receive_timeout_propagates() {
        let crypto = engine();
        let verifier = EccKeyPair::new();
        let mut transport = MockTransport::new();

        assert_eq!(
            PacketTransport::receive_packet(&mut transport, &crypto, &verifier, 50).unwrap_err(),
            Error::NetworkTimeout
        );
    }
}
