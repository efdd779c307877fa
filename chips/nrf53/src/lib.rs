// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral drivers for the nRF5340 network core.
//!
//! Only the peripherals this core's firmware drives itself are here. The
//! radio, RNG, TIMER0 and RTC0 blocks are owned by the external BLE
//! controller and have no drivers; their interrupts are forwarded to the
//! controller untouched by the board's bridge.

#![no_std]

pub mod clock_power;
pub mod egu;
pub mod ipc;
pub mod peripheral_interrupts;
pub mod timer;
pub mod uarte;
