// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Event generator unit (EGU), nRF5340 network core.
//!
//! EGU0 provides software-triggered events. The BLE controller uses
//! channel 0 as a low priority "work pending" kick: the radio interrupt
//! triggers it, and the EGU interrupt handler runs the deferred work at
//! a lower priority.

use kernel::ivt::InterruptClient;
use kernel::utilities::cells::OptionalCell;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadWrite, WriteOnly};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

pub const NUM_EVENTS: usize = 16;

pub const EGU0_BASE: StaticRef<EguRegisters> =
    unsafe { StaticRef::new(0x41014000 as *const EguRegisters) };

register_structs! {
    pub EguRegisters {
        /// Trigger the event
        (0x000 => tasks_trigger: [WriteOnly<u32, Task::Register>; 16]),
        (0x040 => _reserved0),
        /// The event was triggered
        (0x100 => events_triggered: [ReadWrite<u32, Event::Register>; 16]),
        (0x140 => _reserved1),
        /// Enable or disable interrupt
        (0x300 => inten: ReadWrite<u32>),
        /// Enable interrupt
        (0x304 => intenset: ReadWrite<u32>),
        /// Disable interrupt
        (0x308 => intenclr: ReadWrite<u32>),
        (0x30c => @END),
    }
}

register_bitfields! [u32,
    Task [
        TRIGGER OFFSET(0) NUMBITS(1)
    ],
    Event [
        TRIGGERED OFFSET(0) NUMBITS(1)
    ]
];

/// Implement to run work when a software event fires.
pub trait EguClient {
    /// The event on `channel` was triggered. Runs in interrupt context.
    fn software_event(&self, channel: usize);
}

pub struct Egu<'a> {
    registers: StaticRef<EguRegisters>,
    client: OptionalCell<&'a dyn EguClient>,
}

impl<'a> Egu<'a> {
    pub const fn new(base: StaticRef<EguRegisters>) -> Egu<'a> {
        Egu {
            registers: base,
            client: OptionalCell::empty(),
        }
    }

    pub fn set_client(&self, client: &'a dyn EguClient) {
        self.client.set(client);
    }

    pub fn enable_interrupt(&self, channel: usize) -> Result<(), ErrorCode> {
        if channel >= NUM_EVENTS {
            return Err(ErrorCode::INVAL);
        }
        self.registers.intenset.set(1 << channel);
        Ok(())
    }

    pub fn trigger(&self, channel: usize) -> Result<(), ErrorCode> {
        if channel >= NUM_EVENTS {
            return Err(ErrorCode::INVAL);
        }
        self.registers.tasks_trigger[channel].write(Task::TRIGGER::SET);
        Ok(())
    }

    pub fn handle_interrupt(&self) {
        let regs = self.registers;
        for channel in 0..NUM_EVENTS {
            if regs.events_triggered[channel].is_set(Event::TRIGGERED) {
                regs.events_triggered[channel].write(Event::TRIGGERED::CLEAR);
                self.client.map(|client| client.software_event(channel));
            }
        }
    }
}

impl<'a> InterruptClient for Egu<'a> {
    fn interrupt(&self, _irq: u32) {
        self.handle_interrupt();
    }
}
