// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Platform services bundle
//!
//! The capabilities a component needs are passed explicitly as one owned
//! bundle. There are no global singletons and no interior pointers; the
//! orchestrator owns the bundle and lends it down the stack per call.

use crate::traits::{
    GpioInterface, InterruptInterface, MeterInterface, StorageInterface, TimeInterface,
    TransportInterface,
};

/// Owned bundle of platform capabilities
///
/// The raw crypto capability is deliberately absent: the crypto engine
/// wraps it directly so that key material never travels through the
/// general-purpose service path.
pub struct PlatformServices<T, G, I, S, N, M> {
    /// Monotonic clock
    pub time: T,
    /// GPIO access
    pub gpio: G,
    /// Edge interrupt control
    pub interrupt: I,
    /// Persistent storage
    pub storage: S,
    /// Uplink transport
    pub transport: N,
    /// Metrology front-end
    pub meter: M,
}

impl<T, G, I, S, N, M> PlatformServices<T, G, I, S, N, M>
where
    T: TimeInterface,
    G: GpioInterface,
    I: InterruptInterface,
    S: StorageInterface,
    N: TransportInterface,
    M: MeterInterface,
{
    /// Compose a bundle from individual capabilities
    pub fn new(time: T, gpio: G, interrupt: I, storage: S, transport: N, meter: M) -> Self {
        Self {
            time,
            gpio,
            interrupt,
            storage,
            transport,
            meter,
        }
    }

    /// Current monotonic time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.time.now_ms()
    }
}
