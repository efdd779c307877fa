// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Front-end interface of the external BLE protocol controller.
//!
//! The controller is a closed black box that owns the radio, RNG, TIMER0
//! and RTC0 peripherals outright. It exports one entry point per hardware
//! event plus a deferred task pump; the bridge forwards interrupts into
//! them with no business logic in between. Modeling the fixed-name entry
//! points as a trait lets tests substitute a recording double.

/// Entry points of the BLE protocol controller.
///
/// The interrupt methods are invoked from interrupt context, exactly once
/// per corresponding hardware event, with the shortest possible latency.
/// `process_low_priority_tasks` is the deferred half of the two-tier
/// split: it runs from the EGU0 software-event interrupt, at a priority
/// where the time-critical entry points can still preempt it.
pub trait BleController {
    fn rng_interrupt(&self);
    fn timer0_interrupt(&self);
    fn radio_interrupt(&self);
    fn rtc0_interrupt(&self);
    fn power_clock_interrupt(&self);
    fn process_low_priority_tasks(&self);
}
