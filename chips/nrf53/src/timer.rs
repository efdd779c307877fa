// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! TIMER peripheral, nRF5340 network core.
//!
//! TIMER1 is run as a free 32-bit timer at 1 MHz and used for blocking
//! microsecond delays. The compare interrupt only disables itself; the
//! delay loop observes the latched compare event directly, so a wakeup
//! from `wfi` by any interrupt is harmless.

use kernel::ivt::InterruptClient;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadWrite, WriteOnly};
use kernel::utilities::StaticRef;

pub const TIMER1_BASE: StaticRef<TimerRegisters> =
    unsafe { StaticRef::new(0x41018000 as *const TimerRegisters) };

register_structs! {
    pub TimerRegisters {
        /// Start timer
        (0x000 => task_start: WriteOnly<u32, Task::Register>),
        /// Stop timer
        (0x004 => task_stop: WriteOnly<u32, Task::Register>),
        /// Increment timer (counter mode only)
        (0x008 => task_count: WriteOnly<u32, Task::Register>),
        /// Clear timer
        (0x00c => task_clear: WriteOnly<u32, Task::Register>),
        /// Shut down timer
        (0x010 => task_shutdown: WriteOnly<u32, Task::Register>),
        (0x014 => _reserved0),
        /// Capture timer value to the CC register
        (0x040 => task_capture: [WriteOnly<u32, Task::Register>; 8]),
        (0x060 => _reserved1),
        /// Compare event on CC match
        (0x140 => event_compare: [ReadWrite<u32, Event::Register>; 8]),
        (0x160 => _reserved2),
        /// Shortcut register
        (0x200 => shorts: ReadWrite<u32>),
        (0x204 => _reserved3),
        /// Enable interrupt
        (0x304 => intenset: ReadWrite<u32, Interrupt::Register>),
        /// Disable interrupt
        (0x308 => intenclr: ReadWrite<u32, Interrupt::Register>),
        (0x30c => _reserved4),
        /// Timer mode selection
        (0x504 => mode: ReadWrite<u32, Mode::Register>),
        /// Configure the number of bits used by the timer
        (0x508 => bitmode: ReadWrite<u32, Bitmode::Register>),
        (0x50c => _reserved5),
        /// Timer prescaler
        (0x510 => prescaler: ReadWrite<u32, Prescaler::Register>),
        (0x514 => _reserved6),
        /// Capture/compare registers
        (0x540 => cc: [ReadWrite<u32>; 8]),
        (0x560 => @END),
    }
}

register_bitfields! [u32,
    Task [
        ENABLE OFFSET(0) NUMBITS(1)
    ],
    Event [
        READY OFFSET(0) NUMBITS(1)
    ],
    Interrupt [
        COMPARE0 OFFSET(16) NUMBITS(1),
        COMPARE1 OFFSET(17) NUMBITS(1),
        COMPARE2 OFFSET(18) NUMBITS(1),
        COMPARE3 OFFSET(19) NUMBITS(1),
        COMPARE4 OFFSET(20) NUMBITS(1),
        COMPARE5 OFFSET(21) NUMBITS(1),
        COMPARE6 OFFSET(22) NUMBITS(1),
        COMPARE7 OFFSET(23) NUMBITS(1)
    ],
    Mode [
        MODE OFFSET(0) NUMBITS(2) [
            Timer = 0,
            Counter = 1
        ]
    ],
    Bitmode [
        BITMODE OFFSET(0) NUMBITS(2) [
            Bits16 = 0,
            Bits8 = 1,
            Bits24 = 2,
            Bits32 = 3
        ]
    ],
    Prescaler [
        PRESCALER OFFSET(0) NUMBITS(4)
    ]
];

pub struct Timer {
    registers: StaticRef<TimerRegisters>,
}

impl Timer {
    pub const fn new(base: StaticRef<TimerRegisters>) -> Timer {
        Timer { registers: base }
    }

    /// Configure as a 32-bit timer ticking at 1 MHz (16 MHz / 2^4).
    pub fn init(&self) {
        let regs = self.registers;
        regs.task_stop.write(Task::ENABLE::SET);
        regs.mode.write(Mode::MODE::Timer);
        regs.bitmode.write(Bitmode::BITMODE::Bits32);
        regs.prescaler.write(Prescaler::PRESCALER.val(4));
    }

    /// Block for `us` microseconds, sleeping between interrupts.
    pub fn delay_us(&self, us: u32) {
        let regs = self.registers;
        regs.task_clear.write(Task::ENABLE::SET);
        regs.cc[0].set(us);
        regs.event_compare[0].write(Event::READY::CLEAR);
        regs.intenset.write(Interrupt::COMPARE0::SET);
        regs.task_start.write(Task::ENABLE::SET);
        while !regs.event_compare[0].is_set(Event::READY) {
            unsafe {
                cortexm::support::wfi();
            }
        }
        regs.task_stop.write(Task::ENABLE::SET);
        regs.event_compare[0].write(Event::READY::CLEAR);
    }

    pub fn handle_interrupt(&self) {
        let regs = self.registers;
        if regs.event_compare[0].is_set(Event::READY) {
            // Leave the event latched for the delay loop; just stop
            // the interrupt from re-firing.
            regs.intenclr.write(Interrupt::COMPARE0::SET);
        }
    }
}

impl InterruptClient for Timer {
    fn interrupt(&self, _irq: u32) {
        self.handle_interrupt();
    }
}
