// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Standard error enum for invoking operations.

/// Standard errors.
///
/// Configuration failures during bring-up map onto these variants:
/// `INVAL` for an out-of-range identifier or a non-power-of-two ring
/// capacity, `ALREADY` for a duplicate interrupt binding, `SIZE` for a
/// mis-sized memory region, and `OFF` for operating on a channel that was
/// never configured. `NODEVICE` reports an interrupt with no bound handler;
/// the board treats it as fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ErrorCode {
    /// Generic failure condition
    FAIL = 0,
    /// Underlying system is busy; retry
    BUSY = 1,
    /// The state requested is already set
    ALREADY = 2,
    /// The component is powered down or not configured
    OFF = 3,
    /// An invalid parameter was passed
    INVAL = 5,
    /// Parameter passed was too large
    SIZE = 6,
    /// Memory required not available
    NOMEM = 8,
    /// Operation or command is unsupported
    NOSUPPORT = 9,
    /// Device does not exist
    NODEVICE = 10,
}

impl From<ErrorCode> for usize {
    fn from(err: ErrorCode) -> usize {
        err as usize
    }
}
