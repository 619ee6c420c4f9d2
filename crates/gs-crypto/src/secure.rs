// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Secure memory utilities
//!
//! Zeroization that survives optimization, and constant-time comparison.
//! Key buffers in this system are stack- or struct-embedded, so a plain
//! `fill(0)` before drop is a candidate for dead-store elimination; the
//! volatile path here is not.

use core::ptr;
use core::sync::atomic::{compiler_fence, Ordering};

/// Zero a buffer through an optimization barrier
///
/// Every byte is written volatilely and a compiler fence orders the writes
/// before any subsequent access, so the zeroization cannot be elided.
#[inline(never)]
pub fn secure_zero(data: &mut [u8]) {
    for byte in data.iter_mut() {
        // SAFETY: writing through a valid mutable reference
        unsafe {
            ptr::write_volatile(byte, 0);
        }
    }
    compiler_fence(Ordering::SeqCst);
}

/// Compare two byte slices in constant time
///
/// Length mismatch returns early; the content comparison itself takes the
/// same number of operations wherever the difference lies.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}
