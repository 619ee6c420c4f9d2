// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! GridSentinel Secure Packet Protocol
//!
//! Fixed-header, variable-payload, fixed-footer binary frames with two
//! integrity layers: a cheap payload checksum for early rejection of
//! corrupted frames, and an ECDSA signature over header and payload for
//! authenticity. A receiver that fails the checksum never pays for the
//! signature check.
//!
//! Wire frame (all fields little-endian):
//!
//! ```text
//! [magic:1][version:2][type:1][priority:1][meter_id:8][sequence:4]
//! [payload_len:2][timestamp:8][checksum:4][payload...][signature:64][magic:1]
//! ```

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod packet;
pub mod transport;

pub use packet::{
    PacketHeader, PacketType, SecurePacket, FOOTER_SIZE, HEADER_SIZE, MAGIC_FOOTER, MAGIC_HEADER,
    MAX_PACKET_SIZE, MAX_PAYLOAD_SIZE, PROTOCOL_VERSION,
};
pub use transport::PacketTransport;
