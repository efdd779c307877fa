// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Dispatch glue between interrupt sources and the BLE controller.
//!
//! The controller owns RADIO, RNG, TIMER0, RTC0 and the CLOCK/POWER
//! interrupt lines outright; this board never touches those peripherals.
//! The bridge is bound to those lines in the interrupt table and forwards
//! each one to the corresponding controller entry point. It is also the
//! EGU0 client: the controller triggers EGU0 channel 0 from its radio
//! handler to defer low priority work, and the (lower priority) EGU
//! interrupt lands back here.

use kernel::hil::ble::BleController;
use kernel::ivt::InterruptClient;
use nrf53::egu::EguClient;
use nrf53::peripheral_interrupts as irqs;

pub struct Bridge<'a> {
    controller: &'a dyn BleController,
}

impl<'a> Bridge<'a> {
    pub fn new(controller: &'a dyn BleController) -> Bridge<'a> {
        Bridge { controller }
    }
}

impl<'a> InterruptClient for Bridge<'a> {
    fn interrupt(&self, irq: u32) {
        match irq {
            irqs::RNG => self.controller.rng_interrupt(),
            irqs::TIMER0 => self.controller.timer0_interrupt(),
            irqs::RADIO => self.controller.radio_interrupt(),
            irqs::RTC0 => self.controller.rtc0_interrupt(),
            irqs::CLOCK_POWER => self.controller.power_clock_interrupt(),
            // Bound lines only; anything else here is a routing mistake
            // caught by the table, not the bridge.
            _ => {}
        }
    }
}

impl<'a> EguClient for Bridge<'a> {
    fn software_event(&self, _channel: usize) {
        self.controller.process_low_priority_tasks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[derive(Default)]
    struct MockController {
        rng: Cell<usize>,
        timer0: Cell<usize>,
        radio: Cell<usize>,
        rtc0: Cell<usize>,
        power_clock: Cell<usize>,
        low_prio: Cell<usize>,
    }

    impl BleController for MockController {
        fn rng_interrupt(&self) {
            self.rng.set(self.rng.get() + 1);
        }
        fn timer0_interrupt(&self) {
            self.timer0.set(self.timer0.get() + 1);
        }
        fn radio_interrupt(&self) {
            self.radio.set(self.radio.get() + 1);
        }
        fn rtc0_interrupt(&self) {
            self.rtc0.set(self.rtc0.get() + 1);
        }
        fn power_clock_interrupt(&self) {
            self.power_clock.set(self.power_clock.get() + 1);
        }
        fn process_low_priority_tasks(&self) {
            self.low_prio.set(self.low_prio.get() + 1);
        }
    }

    #[test]
    fn each_line_reaches_its_entry_point() {
        let controller = MockController::default();
        let bridge = Bridge::new(&controller);

        bridge.interrupt(irqs::RNG);
        bridge.interrupt(irqs::TIMER0);
        bridge.interrupt(irqs::RADIO);
        bridge.interrupt(irqs::RTC0);
        bridge.interrupt(irqs::CLOCK_POWER);

        assert_eq!(controller.rng.get(), 1);
        assert_eq!(controller.timer0.get(), 1);
        assert_eq!(controller.radio.get(), 1);
        assert_eq!(controller.rtc0.get(), 1);
        assert_eq!(controller.power_clock.get(), 1);
        assert_eq!(controller.low_prio.get(), 0);
    }

    #[test]
    fn software_event_runs_deferred_work() {
        let controller = MockController::default();
        let bridge = Bridge::new(&controller);

        bridge.software_event(0);
        bridge.software_event(0);

        assert_eq!(controller.low_prio.get(), 2);
        assert_eq!(controller.radio.get(), 0);
    }
}
