// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Secure packet build, parse and serialize
//!
//! The header image is serialized field by field; the signature is
//! computed over the serialized header (checksum included) concatenated
//! with the payload, and verification runs over the received bytes
//! verbatim. A packet becomes valid only after every check passes, and
//! `serialize` refuses a packet that was never validly built or parsed.

use heapless::Vec;

use gs_common::constants::ECC_SIGNATURE_SIZE;
use gs_common::{Error, MeterId, Priority, Result, Sequence, TimestampMs};
use gs_crypto::{CryptoEngine, EccKeyPair};
use gs_hal::RawCryptoInterface;

// =============================================================================
// Protocol Constants
// =============================================================================

/// Protocol version carried in every header
pub const PROTOCOL_VERSION: u16 = 0x0100;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 512;

/// Header start-of-frame marker
pub const MAGIC_HEADER: u8 = 0xA5;

/// Footer end-of-frame marker
pub const MAGIC_FOOTER: u8 = 0x5A;

/// Serialized header size in bytes
pub const HEADER_SIZE: usize = 31;

/// Serialized footer size in bytes (signature + magic)
pub const FOOTER_SIZE: usize = ECC_SIGNATURE_SIZE + 1;

/// Largest possible serialized packet
pub const MAX_PACKET_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE + FOOTER_SIZE;

// =============================================================================
// Packet Type
// =============================================================================

/// Packet type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PacketType {
    /// Unset or unrecognized type
    #[default]
    Invalid = 0,
    /// Periodic meter reading
    MeterData = 1,
    /// Confirmed physical tamper alert
    TamperAlert = 2,
    /// Liveness heartbeat
    Heartbeat = 3,
    /// Head-end command
    Command = 4,
    /// Command acknowledgment
    Acknowledgment = 5,
    /// Key exchange material
    KeyExchange = 6,
}

impl PacketType {
    /// Create from a raw wire byte; unknown values map to `Invalid`
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::MeterData,
            2 => Self::TamperAlert,
            3 => Self::Heartbeat,
            4 => Self::Command,
            5 => Self::Acknowledgment,
            6 => Self::KeyExchange,
            _ => Self::Invalid,
        }
    }
}

// =============================================================================
// Packet Header
// =============================================================================

/// Fixed packet header
///
/// Wire layout (little-endian, 31 bytes):
///
/// ```text
/// [0]      magic (0xA5)
/// [1..3]   version
/// [3]      type
/// [4]      priority
/// [5..13]  meter_id
/// [13..17] sequence
/// [17..19] payload_length
/// [19..27] timestamp (ms)
/// [27..31] checksum (first 4 bytes of SHA-256 over the payload)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Start-of-frame marker
    pub magic: u8,
    /// Protocol version
    pub version: u16,
    /// Packet type
    pub packet_type: PacketType,
    /// Message priority
    pub priority: Priority,
    /// Originating meter
    pub meter_id: MeterId,
    /// Monotonic per-builder sequence number
    pub sequence: Sequence,
    /// Payload length in bytes
    pub payload_length: u16,
    /// Build timestamp in milliseconds
    pub timestamp: TimestampMs,
    /// Payload checksum
    pub checksum: u32,
}

impl PacketHeader {
    fn empty() -> Self {
        Self {
            magic: MAGIC_HEADER,
            version: PROTOCOL_VERSION,
            packet_type: PacketType::Invalid,
            priority: Priority::Normal,
            meter_id: 0,
            sequence: 0,
            payload_length: 0,
            timestamp: 0,
            checksum: 0,
        }
    }

    /// Serialize into a 31-byte buffer
    pub fn write_to(&self, out: &mut [u8; HEADER_SIZE]) {
        out[0] = self.magic;
        out[1..3].copy_from_slice(&self.version.to_le_bytes());
        out[3] = self.packet_type as u8;
        out[4] = self.priority as u8;
        out[5..13].copy_from_slice(&self.meter_id.to_le_bytes());
        out[13..17].copy_from_slice(&self.sequence.to_le_bytes());
        out[17..19].copy_from_slice(&self.payload_length.to_le_bytes());
        out[19..27].copy_from_slice(&self.timestamp.to_le_bytes());
        out[27..31].copy_from_slice(&self.checksum.to_le_bytes());
    }

    /// Deserialize from a buffer of at least 31 bytes
    ///
    /// Field decoding is lenient: unknown type and priority bytes map to
    /// their defaults. Authenticity is the signature's job, not the
    /// decoder's.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_SIZE {
            return None;
        }
        Some(Self {
            magic: bytes[0],
            version: u16::from_le_bytes(bytes[1..3].try_into().ok()?),
            packet_type: PacketType::from_u8(bytes[3]),
            priority: Priority::from_u8(bytes[4]).unwrap_or(Priority::Normal),
            meter_id: u64::from_le_bytes(bytes[5..13].try_into().ok()?),
            sequence: u32::from_le_bytes(bytes[13..17].try_into().ok()?),
            payload_length: u16::from_le_bytes(bytes[17..19].try_into().ok()?),
            timestamp: u64::from_le_bytes(bytes[19..27].try_into().ok()?),
            checksum: u32::from_le_bytes(bytes[27..31].try_into().ok()?),
        })
    }
}

// =============================================================================
// Secure Packet
// =============================================================================

/// An authenticated protocol frame
///
/// One instance serves as a reusable builder: the sequence counter lives
/// here and increments on every `build`, whether or not the packet is
/// later sent successfully.
#[derive(Debug)]
pub struct SecurePacket {
    header: PacketHeader,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
    signature: [u8; ECC_SIGNATURE_SIZE],
    is_valid: bool,
    next_sequence: Sequence,
}

impl SecurePacket {
    /// Create an empty, invalid packet with sequence counter at zero
    #[must_use]
    pub fn new() -> Self {
        Self {
            header: PacketHeader::empty(),
            payload: Vec::new(),
            signature: [0u8; ECC_SIGNATURE_SIZE],
            is_valid: false,
            next_sequence: 0,
        }
    }

    /// Build and sign an outbound packet
    ///
    /// Fills the header, computes the payload checksum (first 4 bytes of
    /// SHA-256), and signs serialized-header || payload with the device
    /// private key. The sequence counter advances even if the caller's
    /// subsequent send fails.
    ///
    /// # Errors
    ///
    /// - `Error::BufferOverflow` if `payload` exceeds 512 bytes
    /// - `Error::AuthenticationFailed` if `keypair` has no private key
    /// - `Error::CryptoFailure` if signing fails
    #[allow(clippy::too_many_arguments)]
    pub fn build<C: RawCryptoInterface>(
        &mut self,
        packet_type: PacketType,
        meter_id: MeterId,
        priority: Priority,
        timestamp: TimestampMs,
        payload: &[u8],
        crypto: &CryptoEngine<C>,
        keypair: &EccKeyPair,
    ) -> Result<()> {
        self.is_valid = false;

        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(Error::BufferOverflow);
        }
        if !keypair.has_private_key() {
            return Err(Error::AuthenticationFailed);
        }

        self.header = PacketHeader {
            magic: MAGIC_HEADER,
            version: PROTOCOL_VERSION,
            packet_type,
            priority,
            meter_id,
            sequence: self.next_sequence,
            payload_length: payload.len() as u16,
            timestamp,
            checksum: 0,
        };
        self.next_sequence = self.next_sequence.wrapping_add(1);

        self.payload.clear();
        self.payload
            .extend_from_slice(payload)
            .map_err(|()| Error::BufferOverflow)?;

        self.header.checksum = payload_checksum(crypto, &self.payload);

        // Sign serialized header (checksum included) followed by payload
        let mut sign_data = [0u8; HEADER_SIZE + MAX_PAYLOAD_SIZE];
        let sign_len = self.fill_signed_region(&mut sign_data);
        self.signature = crypto.sign(keypair, &sign_data[..sign_len])?;

        self.is_valid = true;
        Ok(())
    }

    /// Parse and verify a received frame
    ///
    /// Checks run cheapest-first: framing, declared length, checksum,
    /// then the ECDSA signature against the sender's public key. The
    /// packet is marked valid only after every check passes.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPacket` for a short buffer or bad magic markers
    /// - `Error::BufferOverflow` for a declared payload over 512 bytes
    /// - `Error::IntegrityViolation` on checksum mismatch
    /// - `Error::SignatureInvalid` on verification failure or a
    ///   signing-library error
    pub fn parse<C: RawCryptoInterface>(
        &mut self,
        buffer: &[u8],
        crypto: &CryptoEngine<C>,
        sender_key: &EccKeyPair,
    ) -> Result<()> {
        self.is_valid = false;

        if buffer.len() < HEADER_SIZE + FOOTER_SIZE {
            return Err(Error::InvalidPacket);
        }

        let header = PacketHeader::from_bytes(buffer).ok_or(Error::InvalidPacket)?;
        if header.magic != MAGIC_HEADER {
            return Err(Error::InvalidPacket);
        }

        let payload_len = header.payload_length as usize;
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(Error::BufferOverflow);
        }

        let total = HEADER_SIZE + payload_len + FOOTER_SIZE;
        if buffer.len() < total {
            return Err(Error::InvalidPacket);
        }

        let payload = &buffer[HEADER_SIZE..HEADER_SIZE + payload_len];
        let footer = &buffer[HEADER_SIZE + payload_len..total];
        if footer[ECC_SIGNATURE_SIZE] != MAGIC_FOOTER {
            return Err(Error::InvalidPacket);
        }

        if payload_checksum(crypto, payload) != header.checksum {
            return Err(Error::IntegrityViolation);
        }

        let mut signature = [0u8; ECC_SIGNATURE_SIZE];
        signature.copy_from_slice(&footer[..ECC_SIGNATURE_SIZE]);

        // Verify over the received bytes verbatim, not a re-serialization
        let signed_region = &buffer[..HEADER_SIZE + payload_len];
        match crypto.verify(sender_key, signed_region, &signature) {
            Ok(true) => {}
            Ok(false) | Err(_) => return Err(Error::SignatureInvalid),
        }

        self.header = header;
        self.payload.clear();
        self.payload
            .extend_from_slice(payload)
            .map_err(|()| Error::BufferOverflow)?;
        self.signature = signature;
        self.is_valid = true;
        Ok(())
    }

    /// Serialize header, payload and footer contiguously into `out`
    ///
    /// # Errors
    ///
    /// - `Error::InvalidState` if the packet was never built or parsed
    /// - `Error::BufferOverflow` if `out` is smaller than the frame
    pub fn serialize(&self, out: &mut [u8]) -> Result<usize> {
        if !self.is_valid {
            return Err(Error::InvalidState);
        }

        let payload_len = self.payload.len();
        let total = HEADER_SIZE + payload_len + FOOTER_SIZE;
        if out.len() < total {
            return Err(Error::BufferOverflow);
        }

        let mut header_bytes = [0u8; HEADER_SIZE];
        self.header.write_to(&mut header_bytes);
        out[..HEADER_SIZE].copy_from_slice(&header_bytes);
        out[HEADER_SIZE..HEADER_SIZE + payload_len].copy_from_slice(&self.payload);
        out[HEADER_SIZE + payload_len..HEADER_SIZE + payload_len + ECC_SIGNATURE_SIZE]
            .copy_from_slice(&self.signature);
        out[total - 1] = MAGIC_FOOTER;

        Ok(total)
    }

    /// The packet header
    #[must_use]
    pub const fn header(&self) -> &PacketHeader {
        &self.header
    }

    /// The payload bytes
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Declared payload length in bytes
    #[must_use]
    pub const fn payload_length(&self) -> u16 {
        self.header.payload_length
    }

    /// Whether the packet passed its last build or parse
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    fn fill_signed_region(&self, out: &mut [u8; HEADER_SIZE + MAX_PAYLOAD_SIZE]) -> usize {
        let mut header_bytes = [0u8; HEADER_SIZE];
        self.header.write_to(&mut header_bytes);
        out[..HEADER_SIZE].copy_from_slice(&header_bytes);
        out[HEADER_SIZE..HEADER_SIZE + self.payload.len()].copy_from_slice(&self.payload);
        HEADER_SIZE + self.payload.len()
    }
}

impl Default for SecurePacket {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload checksum: the first 4 bytes of SHA-256 over the payload,
/// interpreted little-endian
///
/// Redundant with the signature for authenticity; kept bit-exact for wire
/// compatibility as the cheap early-rejection path.
fn payload_checksum<C: RawCryptoInterface>(crypto: &CryptoEngine<C>, payload: &[u8]) -> u32 {
    let digest = crypto.hash_sha256(payload);
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_31_bytes_le() {
        let header = PacketHeader {
            magic: MAGIC_HEADER,
            version: PROTOCOL_VERSION,
            packet_type: PacketType::MeterData,
            priority: Priority::High,
            meter_id: 0x1122_3344_5566_7788,
            sequence: 9,
            payload_length: 24,
            timestamp: 1000,
            checksum: 0xDEAD_BEEF,
        };

        let mut bytes = [0u8; HEADER_SIZE];
        header.write_to(&mut bytes);

        assert_eq!(bytes[0], 0xA5);
        assert_eq!(u16::from_le_bytes([bytes[1], bytes[2]]), 0x0100);
        assert_eq!(bytes[3], PacketType::MeterData as u8);
        assert_eq!(bytes[4], Priority::High as u8);
        assert_eq!(bytes[5], 0x88); // meter_id low byte first
        assert_eq!(PacketHeader::from_bytes(&bytes), Some(header));
    }

    #[test]
    fn packet_type_from_u8() {
        assert_eq!(PacketType::from_u8(2), PacketType::TamperAlert);
        assert_eq!(PacketType::from_u8(6), PacketType::KeyExchange);
        assert_eq!(PacketType::from_u8(7), PacketType::Invalid);
    }

    #[test]
    fn fresh_packet_is_invalid() {
        let packet = SecurePacket::new();
        assert!(!packet.is_valid());

        let mut out = [0u8; MAX_PACKET_SIZE];
        assert_eq!(packet.serialize(&mut out), Err(Error::InvalidState));
    }
}
