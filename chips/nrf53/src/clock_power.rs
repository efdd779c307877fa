// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! CLOCK and POWER management, nRF5340 network core.
//!
//! Bring-up only needs two things from this block: constant latency mode
//! so peripheral clocks stay available, and the 32 kHz LFCLK running off
//! the internal RC oscillator.

use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadOnly, ReadWrite, WriteOnly};
use kernel::utilities::StaticRef;

pub const CLOCK_POWER_BASE: StaticRef<ClockPowerRegisters> =
    unsafe { StaticRef::new(0x41005000 as *const ClockPowerRegisters) };

register_structs! {
    pub ClockPowerRegisters {
        /// Start the high frequency crystal oscillator
        (0x000 => task_hfclkstart: WriteOnly<u32, Task::Register>),
        /// Stop the high frequency crystal oscillator
        (0x004 => task_hfclkstop: WriteOnly<u32, Task::Register>),
        /// Start the low frequency source
        (0x008 => task_lfclkstart: WriteOnly<u32, Task::Register>),
        /// Stop the low frequency source
        (0x00c => task_lfclkstop: WriteOnly<u32, Task::Register>),
        (0x010 => _reserved0),
        /// Enable constant latency mode
        (0x078 => task_constlat: WriteOnly<u32, Task::Register>),
        /// Enable low power mode (variable latency)
        (0x07c => task_lowpwr: WriteOnly<u32, Task::Register>),
        (0x080 => _reserved1),
        /// HFCLK oscillator started
        (0x100 => event_hfclkstarted: ReadWrite<u32, Event::Register>),
        /// LFCLK started
        (0x104 => event_lfclkstarted: ReadWrite<u32, Event::Register>),
        (0x108 => _reserved2),
        /// Enable interrupt
        (0x304 => intenset: ReadWrite<u32>),
        /// Disable interrupt
        (0x308 => intenclr: ReadWrite<u32>),
        (0x30c => _reserved3),
        /// LFCLK status
        (0x418 => lfclkstat: ReadOnly<u32, LfclkStat::Register>),
        (0x41c => _reserved4),
        /// LFCLK clock source
        (0x518 => lfclksrc: ReadWrite<u32, LfclkSrc::Register>),
        (0x51c => @END),
    }
}

register_bitfields! [u32,
    Task [
        ENABLE OFFSET(0) NUMBITS(1)
    ],
    Event [
        READY OFFSET(0) NUMBITS(1)
    ],
    LfclkStat [
        SRC OFFSET(0) NUMBITS(2),
        STATE OFFSET(16) NUMBITS(1)
    ],
    LfclkSrc [
        SRC OFFSET(0) NUMBITS(2) [
            LFRC = 1,
            LFXO = 2,
            LFSYNT = 3
        ]
    ]
];

pub struct ClockPower {
    registers: StaticRef<ClockPowerRegisters>,
}

impl ClockPower {
    pub const fn new(base: StaticRef<ClockPowerRegisters>) -> ClockPower {
        ClockPower { registers: base }
    }

    /// Select constant latency and bring up the LFCLK from the internal
    /// RC oscillator, waiting for it to start.
    pub fn init(&self) {
        let regs = self.registers;
        regs.task_constlat.write(Task::ENABLE::SET);
        regs.lfclksrc.write(LfclkSrc::SRC::LFRC);
        regs.event_lfclkstarted.write(Event::READY::CLEAR);
        regs.task_lfclkstart.write(Task::ENABLE::SET);
        while !regs.event_lfclkstarted.is_set(Event::READY) {}
        regs.event_lfclkstarted.write(Event::READY::CLEAR);
    }

    pub fn lfclk_running(&self) -> bool {
        self.registers.lfclkstat.is_set(LfclkStat::STATE)
    }
}
