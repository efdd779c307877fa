// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Support for diagnostic text output during bring-up.
//!
//! The board registers a writer (normally backed by the console UART) once
//! the console is alive; `debug!` formats through it. Output before the
//! writer is registered is dropped silently, which is the right behavior
//! for the very first instructions after reset.

use core::fmt;
use core::ptr::addr_of_mut;

/// A byte sink for debug output.
///
/// Implementations must be callable from any context, including interrupt
/// handlers, and must not block beyond the time needed to push the bytes
/// out (the console writer busy-waits on the UART, which is acceptable for
/// diagnostic output only).
pub trait IoWrite {
    fn write(&mut self, buf: &[u8]);
}

// Single-core access only; the writer is registered once during bring-up
// and never torn down.
static mut DEBUG_WRITER: Option<&'static mut dyn IoWrite> = None;

/// Register the sink that `debug!` output is written to.
pub unsafe fn set_debug_writer(writer: &'static mut dyn IoWrite) {
    *addr_of_mut!(DEBUG_WRITER) = Some(writer);
}

struct DebugFmt;

impl fmt::Write for DebugFmt {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        unsafe {
            if let Some(writer) = &mut *addr_of_mut!(DEBUG_WRITER) {
                writer.write(s.as_bytes());
            }
        }
        Ok(())
    }
}

/// Write formatted arguments to the registered debug sink.
///
/// Prefer the [`debug!`](crate::debug!) macro.
pub fn debug_print(args: fmt::Arguments) {
    use core::fmt::Write;
    let _ = DebugFmt.write_fmt(args);
}

/// In-kernel `println()` for diagnostic output.
#[macro_export]
macro_rules! debug {
    () => ({
        $crate::debug::debug_print(format_args!("\n"))
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_print(format_args!(concat!($msg, "\n")))
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_print(format_args!(concat!($fmt, "\n"), $($arg)+))
    });
}
