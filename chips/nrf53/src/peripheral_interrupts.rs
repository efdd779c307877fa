// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interrupt numbers of the nRF5340 network core.
//!
//! The network core maps each peripheral at `0x4100_0000 + id * 0x1000`
//! and the interrupt number equals the peripheral id.

pub const CLOCK_POWER: u32 = 5;
pub const RADIO: u32 = 8;
pub const RNG: u32 = 9;
pub const GPIOTE: u32 = 10;
pub const WDT: u32 = 11;
pub const TIMER0: u32 = 12;
pub const ECB: u32 = 13;
pub const AAR_CCM: u32 = 14;
pub const TEMP: u32 = 16;
pub const RTC0: u32 = 17;
pub const IPC: u32 = 18;
pub const SERIAL0: u32 = 19;
pub const EGU0: u32 = 20;
pub const RTC1: u32 = 22;
pub const TIMER1: u32 = 24;
pub const TIMER2: u32 = 25;
