// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interrupt dispatch table.
//!
//! [`InterruptTable`] is a fixed static mapping from interrupt number to a
//! handler object. The board installs every binding during bring-up and
//! never mutates the table afterwards; an interrupt that fires without a
//! binding is a hardware-configuration bug and is reported as
//! [`ErrorCode::NODEVICE`] rather than dropped.
//!
//! Masking at the interrupt controller goes through the
//! [`InterruptController`] trait, a thin adapter implemented over the NVIC
//! in the arch crate. Keeping the controller behind a trait means the
//! routing and dispatch logic here runs unmodified in host tests against a
//! recording stub.

use crate::utilities::cells::OptionalCell;
use crate::ErrorCode;

/// A handler for one or more interrupt lines.
///
/// `interrupt` runs in interrupt context: it must not block, sleep, or do
/// unbounded work. The implementing object takes the place of the
/// traditional `(function, opaque context)` pair.
pub trait InterruptClient {
    fn interrupt(&self, irq: u32);
}

/// Masking operations of the hardware interrupt controller.
///
/// All three operations are idempotent.
pub trait InterruptController {
    fn enable(&self, irq: u32);
    fn disable(&self, irq: u32);
    fn clear_pending(&self, irq: u32);
}

/// Static interrupt number to handler mapping with `N` entries.
pub struct InterruptTable<'a, const N: usize> {
    entries: [OptionalCell<&'a dyn InterruptClient>; N],
    controller: &'a dyn InterruptController,
}

impl<'a, const N: usize> InterruptTable<'a, N> {
    pub fn new(controller: &'a dyn InterruptController) -> InterruptTable<'a, N> {
        InterruptTable {
            entries: [(); N].map(|()| OptionalCell::empty()),
            controller,
        }
    }

    /// Install a binding for `irq`.
    ///
    /// Returns `INVAL` if the interrupt number is out of range and
    /// `ALREADY` if the line is already bound. Bindings are never
    /// replaced; a second `route` for the same line during bring-up is a
    /// wiring mistake.
    pub fn route(&self, irq: u32, client: &'a dyn InterruptClient) -> Result<(), ErrorCode> {
        let entry = self.entries.get(irq as usize).ok_or(ErrorCode::INVAL)?;
        if entry.is_some() {
            return Err(ErrorCode::ALREADY);
        }
        entry.set(client);
        Ok(())
    }

    /// Unmask `irq` at the interrupt controller.
    pub fn enable(&self, irq: u32) -> Result<(), ErrorCode> {
        if irq as usize >= N {
            return Err(ErrorCode::INVAL);
        }
        self.controller.enable(irq);
        Ok(())
    }

    /// Mask `irq` at the interrupt controller.
    pub fn disable(&self, irq: u32) -> Result<(), ErrorCode> {
        if irq as usize >= N {
            return Err(ErrorCode::INVAL);
        }
        self.controller.disable(irq);
        Ok(())
    }

    pub fn is_routed(&self, irq: u32) -> bool {
        self.entries
            .get(irq as usize)
            .map_or(false, |entry| entry.is_some())
    }

    /// Deliver `irq` to its bound handler.
    ///
    /// Called from the interrupt service entry. Returns `NODEVICE` if no
    /// handler is bound; the caller decides how fatal that is (the board
    /// panics, since silently dropping an interrupt would hide a
    /// configuration bug).
    pub fn service(&self, irq: u32) -> Result<(), ErrorCode> {
        let entry = self.entries.get(irq as usize).ok_or(ErrorCode::NODEVICE)?;
        match entry.get() {
            Some(client) => {
                client.interrupt(irq);
                Ok(())
            }
            None => Err(ErrorCode::NODEVICE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct StubController {
        enabled: Cell<u32>,
        disabled: Cell<u32>,
    }

    impl StubController {
        fn new() -> StubController {
            StubController {
                enabled: Cell::new(0),
                disabled: Cell::new(0),
            }
        }
    }

    impl InterruptController for StubController {
        fn enable(&self, irq: u32) {
            self.enabled.set(self.enabled.get() | (1 << irq));
        }
        fn disable(&self, irq: u32) {
            self.disabled.set(self.disabled.get() | (1 << irq));
        }
        fn clear_pending(&self, _irq: u32) {}
    }

    struct Recorder {
        served: Cell<usize>,
        last_irq: Cell<u32>,
    }

    impl Recorder {
        fn new() -> Recorder {
            Recorder {
                served: Cell::new(0),
                last_irq: Cell::new(u32::MAX),
            }
        }
    }

    impl InterruptClient for Recorder {
        fn interrupt(&self, irq: u32) {
            self.served.set(self.served.get() + 1);
            self.last_irq.set(irq);
        }
    }

    #[test]
    fn route_and_service_delivers_exactly_once() {
        let controller = StubController::new();
        let table: InterruptTable<8> = InterruptTable::new(&controller);
        let handler = Recorder::new();

        assert_eq!(table.route(3, &handler), Ok(()));
        assert!(table.is_routed(3));
        assert_eq!(table.service(3), Ok(()));
        assert_eq!(handler.served.get(), 1);
        assert_eq!(handler.last_irq.get(), 3);
    }

    #[test]
    fn duplicate_route_is_rejected() {
        let controller = StubController::new();
        let table: InterruptTable<8> = InterruptTable::new(&controller);
        let first = Recorder::new();
        let second = Recorder::new();

        assert_eq!(table.route(5, &first), Ok(()));
        assert_eq!(table.route(5, &second), Err(ErrorCode::ALREADY));

        // The original binding stays in place.
        assert_eq!(table.service(5), Ok(()));
        assert_eq!(first.served.get(), 1);
        assert_eq!(second.served.get(), 0);
    }

    #[test]
    fn out_of_range_route_is_rejected() {
        let controller = StubController::new();
        let table: InterruptTable<8> = InterruptTable::new(&controller);
        let handler = Recorder::new();

        assert_eq!(table.route(8, &handler), Err(ErrorCode::INVAL));
        assert_eq!(table.enable(8), Err(ErrorCode::INVAL));
        assert_eq!(table.disable(8), Err(ErrorCode::INVAL));
    }

    #[test]
    fn unrouted_interrupt_is_flagged() {
        let controller = StubController::new();
        let table: InterruptTable<8> = InterruptTable::new(&controller);

        assert!(!table.is_routed(2));
        assert_eq!(table.service(2), Err(ErrorCode::NODEVICE));
        assert_eq!(table.service(99), Err(ErrorCode::NODEVICE));
    }

    #[test]
    fn enable_disable_reach_the_controller() {
        let controller = StubController::new();
        let table: InterruptTable<8> = InterruptTable::new(&controller);

        assert_eq!(table.enable(4), Ok(()));
        assert_eq!(table.enable(4), Ok(()));
        assert_eq!(table.disable(6), Ok(()));
        assert_eq!(controller.enabled.get(), 1 << 4);
        assert_eq!(controller.disabled.get(), 1 << 6);
    }
}
