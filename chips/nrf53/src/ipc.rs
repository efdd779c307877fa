// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! IPC peripheral, nRF5340 network core.
//!
//! The IPC block is a doorbell between the two cores: triggering a send
//! channel raises the event lines configured in `SEND_CNF` on the peer,
//! and events matching a channel's `RECEIVE_CNF` mask latch
//! `EVENTS_RECEIVE` locally and can raise the IPC interrupt. No data
//! moves through the block.

use kernel::hil::ipc::{IpcClient, IpcSignal};
use kernel::ivt::InterruptClient;
use kernel::utilities::cells::OptionalCell;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadOnly, ReadWrite, WriteOnly};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

use core::cell::Cell;

pub const NUM_CHANNELS: usize = 16;

pub const IPC_BASE: StaticRef<IpcRegisters> =
    unsafe { StaticRef::new(0x41012000 as *const IpcRegisters) };

register_structs! {
    pub IpcRegisters {
        /// Trigger events on the channel
        (0x000 => tasks_send: [WriteOnly<u32, Task::Register>; 16]),
        (0x040 => _reserved0),
        /// Event received on the channel
        (0x100 => events_receive: [ReadWrite<u32, Event::Register>; 16]),
        (0x140 => _reserved1),
        /// Enable or disable interrupt
        (0x300 => inten: ReadWrite<u32>),
        /// Enable interrupt
        (0x304 => intenset: ReadWrite<u32>),
        /// Disable interrupt
        (0x308 => intenclr: ReadWrite<u32>),
        /// Pending interrupts
        (0x30c => intpend: ReadOnly<u32>),
        (0x310 => _reserved2),
        /// Send event configuration for the channel
        (0x510 => send_cnf: [ReadWrite<u32>; 16]),
        (0x550 => _reserved3),
        /// Receive event configuration for the channel
        (0x590 => receive_cnf: [ReadWrite<u32>; 16]),
        (0x5d0 => _reserved4),
        /// General purpose memory, retained across the peer's resets
        (0x610 => gpmem: [ReadWrite<u32>; 2]),
        (0x618 => @END),
    }
}

register_bitfields! [u32,
    Task [
        TRIGGER OFFSET(0) NUMBITS(1)
    ],
    Event [
        RECEIVED OFFSET(0) NUMBITS(1)
    ]
];

pub struct Ipc<'a> {
    registers: StaticRef<IpcRegisters>,
    receive_clients: [OptionalCell<&'a dyn IpcClient>; NUM_CHANNELS],
    send_configured: Cell<u32>,
}

impl<'a> Ipc<'a> {
    pub fn new(base: StaticRef<IpcRegisters>) -> Ipc<'a> {
        Ipc {
            registers: base,
            receive_clients: [(); NUM_CHANNELS].map(|()| OptionalCell::empty()),
            send_configured: Cell::new(0),
        }
    }

    /// Service the IPC interrupt: acknowledge every pending receive event
    /// and deliver it to the channel's client, once per event.
    pub fn handle_interrupt(&self) {
        let regs = self.registers;
        let pending = regs.intpend.get();
        for channel in 0..NUM_CHANNELS {
            if pending & (1 << channel) == 0 {
                continue;
            }
            if regs.events_receive[channel].get() != 0 {
                // Acknowledge before the callback so an event arriving
                // during the callback is not lost.
                regs.events_receive[channel].set(0);
                self.receive_clients[channel].map(|client| client.ipc_received(channel));
            }
        }
    }
}

impl<'a> IpcSignal<'a> for Ipc<'a> {
    fn configure_send(&self, channel: usize, remote_event_mask: u32) -> Result<(), ErrorCode> {
        if channel >= NUM_CHANNELS {
            return Err(ErrorCode::INVAL);
        }
        self.registers.send_cnf[channel].set(remote_event_mask);
        self.send_configured
            .set(self.send_configured.get() | (1 << channel));
        Ok(())
    }

    fn configure_receive(
        &self,
        channel: usize,
        local_event_mask: u32,
        client: &'a dyn IpcClient,
    ) -> Result<(), ErrorCode> {
        if channel >= NUM_CHANNELS {
            return Err(ErrorCode::INVAL);
        }
        self.registers.receive_cnf[channel].set(local_event_mask);
        self.receive_clients[channel].set(client);
        Ok(())
    }

    fn set_interrupt_enable(&self, channel: usize, enabled: bool) -> Result<(), ErrorCode> {
        if channel >= NUM_CHANNELS {
            return Err(ErrorCode::INVAL);
        }
        if enabled {
            self.registers.intenset.set(1 << channel);
        } else {
            self.registers.intenclr.set(1 << channel);
        }
        Ok(())
    }

    fn trigger(&self, channel: usize) -> Result<(), ErrorCode> {
        if channel >= NUM_CHANNELS {
            return Err(ErrorCode::INVAL);
        }
        if self.send_configured.get() & (1 << channel) == 0 {
            return Err(ErrorCode::OFF);
        }
        self.registers.tasks_send[channel].write(Task::TRIGGER::SET);
        Ok(())
    }
}

impl<'a> InterruptClient for Ipc<'a> {
    fn interrupt(&self, _irq: u32) {
        self.handle_interrupt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These exercise only the guard paths, which return before any
    // register access.

    #[test]
    fn trigger_out_of_range_is_rejected() {
        let ipc: Ipc = Ipc::new(IPC_BASE);
        assert_eq!(ipc.trigger(NUM_CHANNELS), Err(ErrorCode::INVAL));
    }

    #[test]
    fn trigger_unconfigured_channel_is_off() {
        let ipc: Ipc = Ipc::new(IPC_BASE);
        assert_eq!(ipc.trigger(1), Err(ErrorCode::OFF));
    }
}
