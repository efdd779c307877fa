// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Front-end for the linked-in BLE controller library.
//!
//! The controller ships as a prebuilt archive with C entry points; this
//! module wraps them behind [`BleController`] so the rest of the board is
//! testable on the host, where the archive is absent and the entry points
//! are inert.

use kernel::hil::ble::BleController;

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod vendor {
    extern "C" {
        pub fn ble_controller_RNG_IRQHandler();
        pub fn ble_controller_TIMER0_IRQHandler();
        pub fn ble_controller_RADIO_IRQHandler();
        pub fn ble_controller_RTC0_IRQHandler();
        pub fn ble_controller_POWER_CLOCK_IRQHandler();
        pub fn ble_controller_low_prio_tasks_process();
    }
}

pub struct VendorController;

impl VendorController {
    pub const fn new() -> VendorController {
        VendorController
    }
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
impl BleController for VendorController {
    fn rng_interrupt(&self) {
        unsafe { vendor::ble_controller_RNG_IRQHandler() }
    }
    fn timer0_interrupt(&self) {
        unsafe { vendor::ble_controller_TIMER0_IRQHandler() }
    }
    fn radio_interrupt(&self) {
        unsafe { vendor::ble_controller_RADIO_IRQHandler() }
    }
    fn rtc0_interrupt(&self) {
        unsafe { vendor::ble_controller_RTC0_IRQHandler() }
    }
    fn power_clock_interrupt(&self) {
        unsafe { vendor::ble_controller_POWER_CLOCK_IRQHandler() }
    }
    fn process_low_priority_tasks(&self) {
        unsafe { vendor::ble_controller_low_prio_tasks_process() }
    }
}

#[cfg(not(all(target_arch = "arm", target_os = "none")))]
impl BleController for VendorController {
    fn rng_interrupt(&self) {}
    fn timer0_interrupt(&self) {}
    fn radio_interrupt(&self) {}
    fn rtc0_interrupt(&self) {}
    fn power_clock_interrupt(&self) {}
    fn process_low_priority_tasks(&self) {}
}
