// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Packet transport wrapper
//!
//! Frames a [`SecurePacket`] onto the platform transport and requires the
//! transport to accept the frame in full; a short write is a transmission
//! failure, never a silent truncation. Inbound frames are parsed and
//! verified before they reach the caller.

use gs_common::{Error, Result};
use gs_crypto::{CryptoEngine, EccKeyPair};
use gs_hal::{RawCryptoInterface, TransportInterface};

use crate::packet::{SecurePacket, FOOTER_SIZE, HEADER_SIZE, MAX_PACKET_SIZE};

/// Send and receive [`SecurePacket`] frames over a platform transport
pub struct PacketTransport;

impl PacketTransport {
    /// Serialize and send a built packet
    ///
    /// # Errors
    ///
    /// - `Error::InvalidState` for a packet that was never built/parsed
    /// - `Error::TransmissionFailed` if the transport accepts fewer bytes
    ///   than the frame contains
    /// - Any transport error from the send itself
    pub fn send_packet<N: TransportInterface>(
        transport: &mut N,
        packet: &SecurePacket,
    ) -> Result<()> {
        let mut frame = [0u8; MAX_PACKET_SIZE];
        let frame_len = packet.serialize(&mut frame)?;

        let sent = transport.send(&frame[..frame_len])?;
        if sent != frame_len {
            return Err(Error::TransmissionFailed);
        }

        Ok(())
    }

    /// Receive, parse and verify one packet
    ///
    /// # Errors
    ///
    /// - `Error::NetworkTimeout` if nothing arrives within `timeout_ms`
    /// - `Error::InvalidPacket` for a frame shorter than header + footer
    /// - Any parse error (`IntegrityViolation`, `SignatureInvalid`, ...)
    pub fn receive_packet<N, C>(
        transport: &mut N,
        crypto: &CryptoEngine<C>,
        sender_key: &EccKeyPair,
        timeout_ms: u32,
    ) -> Result<SecurePacket>
    where
        N: TransportInterface,
        C: RawCryptoInterface,
    {
        let mut frame = [0u8; MAX_PACKET_SIZE];
        let received = transport.receive(&mut frame, timeout_ms)?;

        if received < HEADER_SIZE + FOOTER_SIZE {
            return Err(Error::InvalidPacket);
        }

        let mut packet = SecurePacket::new();
        packet.parse(&frame[..received], crypto, sender_key)?;
        Ok(packet)
    }
}
