// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! ISR trampoline slot table
//!
//! Hardware interrupt vectors are context-free functions; the tamper
//! monitor's interrupt entry takes `&self`. This module bridges the two
//! with a fixed table of (pin, handler, context) slots that a platform
//! adapter fills at `attach` time and consults from its vector stubs.
//!
//! Core logic never touches this table - it exists purely at the
//! hardware-integration boundary. Host-side tests invoke the monitor's
//! interrupt entry directly instead.
//!
//! # Concurrency
//!
//! `dispatch` may run in interrupt context while `register`/`clear` run on
//! the main loop. Each slot publishes its context before its handler with
//! release ordering, and `dispatch` reads the handler first with acquire
//! ordering, so a non-null handler always observes its matching context.

use core::mem;
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use gs_common::{Error, Result};

/// Handler signature stored in a slot
pub type IsrHandler = fn(*const ());

/// Number of interrupt slots available to platform adapters
pub const MAX_ISR_SLOTS: usize = 4;

/// Sentinel pin value marking an empty slot
const EMPTY_PIN: u8 = u8::MAX;

struct IsrSlot {
    pin: AtomicU8,
    handler: AtomicUsize,
    context: AtomicUsize,
}

impl IsrSlot {
    const fn new() -> Self {
        Self {
            pin: AtomicU8::new(EMPTY_PIN),
            handler: AtomicUsize::new(0),
            context: AtomicUsize::new(0),
        }
    }
}

static SLOTS: [IsrSlot; MAX_ISR_SLOTS] = [
    IsrSlot::new(),
    IsrSlot::new(),
    IsrSlot::new(),
    IsrSlot::new(),
];

/// Bind a handler and context to a pin
///
/// # Errors
///
/// Returns `Error::ResourceExhausted` when every slot is occupied.
///
/// # Safety
///
/// The caller must guarantee that `context` outlives the registration and
/// that the pointed-to value is safe to access from interrupt context for
/// as long as the slot is live.
pub unsafe fn register(pin: u8, handler: IsrHandler, context: *const ()) -> Result<()> {
    // Re-registering a pin updates its existing slot
    for slot in &SLOTS {
        if slot.pin.load(Ordering::Acquire) == pin {
            slot.context.store(context as usize, Ordering::Release);
            slot.handler.store(handler as usize, Ordering::Release);
            return Ok(());
        }
    }

    for slot in &SLOTS {
        if slot
            .pin
            .compare_exchange(EMPTY_PIN, pin, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            slot.context.store(context as usize, Ordering::Release);
            slot.handler.store(handler as usize, Ordering::Release);
            return Ok(());
        }
    }

    Err(Error::ResourceExhausted)
}

/// Remove the binding for a pin, if any
pub fn clear(pin: u8) {
    for slot in &SLOTS {
        if slot.pin.load(Ordering::Acquire) == pin {
            // Handler first: a concurrent dispatch that misses the clear
            // must not run with a stale context
            slot.handler.store(0, Ordering::Release);
            slot.context.store(0, Ordering::Release);
            slot.pin.store(EMPTY_PIN, Ordering::Release);
        }
    }
}

/// Invoke the handler bound to `pin`, if any
///
/// Called from platform vector stubs; a no-op for unbound pins.
pub fn dispatch(pin: u8) {
    for slot in &SLOTS {
        if slot.pin.load(Ordering::Acquire) == pin {
            let handler = slot.handler.load(Ordering::Acquire);
            if handler != 0 {
                let context = slot.context.load(Ordering::Acquire) as *const ();
                // SAFETY: handler was stored from a valid `IsrHandler` by
                // `register`, and the registrant guarantees the context
                // remains valid while the slot is live.
                let f: IsrHandler = unsafe { mem::transmute(handler) };
                f(context);
            }
            return;
        }
    }
}
