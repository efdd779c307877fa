// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Debug console plumbing for the network core.

use core::fmt;

use kernel::debug::IoWrite;
use kernel::hil::uart::{ReceiveClient, Transmit};
use nrf53::uarte::{Uarte, UARTE0_BASE};

/// Console byte sink over UARTE0.
///
/// Expands `\n` to `\r\n` so raw terminal output lines up.
pub struct Writer {
    uart: Uarte<'static>,
}

impl Writer {
    const fn new() -> Writer {
        Writer {
            uart: Uarte::new(UARTE0_BASE),
        }
    }
}

impl IoWrite for Writer {
    fn write(&mut self, buf: &[u8]) {
        for &byte in buf {
            if byte == b'\n' {
                self.uart.transmit_byte(b'\r');
            }
            self.uart.transmit_byte(byte);
        }
    }
}

impl fmt::Write for Writer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s.as_bytes());
        Ok(())
    }
}

static mut WRITER: Writer = Writer::new();

/// Register the console writer as the `debug!` sink.
///
/// ## Safety
///
/// Call once during bring-up, after UARTE0 is configured.
pub unsafe fn set_console() {
    let writer = &mut *core::ptr::addr_of_mut!(WRITER);
    kernel::debug::set_debug_writer(writer);
}

/// Console input sink.
///
/// Nothing consumes console input yet; bytes are received to keep the
/// RX path exercised and then dropped.
pub struct ConsoleInput;

impl ReceiveClient for ConsoleInput {
    fn received_byte(&self, _byte: u8) {}
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
#[panic_handler]
fn panic_fmt(info: &core::panic::PanicInfo) -> ! {
    use core::fmt::Write;
    // The panic writer bypasses the registered sink so output works even
    // if the panic hit before console registration.
    let writer = unsafe { &mut *core::ptr::addr_of_mut!(WRITER) };
    let _ = writer.write_fmt(format_args!("\npanic: {}\n", info));
    loop {
        unsafe {
            cortexm::support::wfi();
        }
    }
}
