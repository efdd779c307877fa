// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Universal asynchronous receiver transmitter with EasyDMA (UARTE),
//! nRF5340 network core.
//!
//! Transmit is blocking and byte-at-a-time, used for the debug console.
//! Receive runs interrupt-driven with a one-byte DMA buffer that is
//! rearmed from the interrupt handler.

use kernel::hil::uart;
use kernel::ivt::InterruptClient;
use kernel::utilities::cells::{OptionalCell, VolatileCell};
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadOnly, ReadWrite, WriteOnly};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

pub const UARTE0_BASE: StaticRef<UarteRegisters> =
    unsafe { StaticRef::new(0x41013000 as *const UarteRegisters) };

register_structs! {
    pub UarteRegisters {
        /// Start UART receiver
        (0x000 => task_startrx: WriteOnly<u32, Task::Register>),
        /// Stop UART receiver
        (0x004 => task_stoprx: WriteOnly<u32, Task::Register>),
        /// Start UART transmitter
        (0x008 => task_starttx: WriteOnly<u32, Task::Register>),
        /// Stop UART transmitter
        (0x00c => task_stoptx: WriteOnly<u32, Task::Register>),
        (0x010 => _reserved0),
        /// Flush RX FIFO into RX buffer
        (0x02c => task_flush_rx: WriteOnly<u32, Task::Register>),
        (0x030 => _reserved1),
        /// CTS is activated
        (0x100 => event_cts: ReadWrite<u32, Event::Register>),
        /// CTS is deactivated
        (0x104 => event_ncts: ReadWrite<u32, Event::Register>),
        /// Data received in RXD
        (0x108 => event_rxdrdy: ReadWrite<u32, Event::Register>),
        (0x10c => _reserved2),
        /// Receive buffer is filled up
        (0x110 => event_endrx: ReadWrite<u32, Event::Register>),
        (0x114 => _reserved3),
        /// Data sent from TXD
        (0x11c => event_txdrdy: ReadWrite<u32, Event::Register>),
        /// Last TX byte transmitted
        (0x120 => event_endtx: ReadWrite<u32, Event::Register>),
        /// Error detected
        (0x124 => event_error: ReadWrite<u32, Event::Register>),
        (0x128 => _reserved4),
        /// Receiver timeout
        (0x144 => event_rxto: ReadWrite<u32, Event::Register>),
        (0x148 => _reserved5),
        /// UART receiver has started
        (0x14c => event_rxstarted: ReadWrite<u32, Event::Register>),
        /// UART transmitter has started
        (0x150 => event_txstarted: ReadWrite<u32, Event::Register>),
        (0x154 => _reserved6),
        /// UART transmitter has stopped
        (0x158 => event_txstopped: ReadWrite<u32, Event::Register>),
        (0x15c => _reserved7),
        /// Shortcut register
        (0x200 => shorts: ReadWrite<u32, Shorts::Register>),
        (0x204 => _reserved8),
        /// Enable or disable interrupt
        (0x300 => inten: ReadWrite<u32, Interrupt::Register>),
        /// Enable interrupt
        (0x304 => intenset: ReadWrite<u32, Interrupt::Register>),
        /// Disable interrupt
        (0x308 => intenclr: ReadWrite<u32, Interrupt::Register>),
        (0x30c => _reserved9),
        /// Error source
        (0x480 => errorsrc: ReadWrite<u32>),
        (0x484 => _reserved10),
        /// Enable UART
        (0x500 => enable: ReadWrite<u32, Enable::Register>),
        (0x504 => _reserved11),
        /// Pin select for RTS signal
        (0x508 => pselrts: ReadWrite<u32, Psel::Register>),
        /// Pin select for TXD signal
        (0x50c => pseltxd: ReadWrite<u32, Psel::Register>),
        /// Pin select for CTS signal
        (0x510 => pselcts: ReadWrite<u32, Psel::Register>),
        /// Pin select for RXD signal
        (0x514 => pselrxd: ReadWrite<u32, Psel::Register>),
        (0x518 => _reserved12),
        /// Baud rate
        (0x524 => baudrate: ReadWrite<u32, Baudrate::Register>),
        (0x528 => _reserved13),
        /// RX data pointer
        (0x534 => rxd_ptr: ReadWrite<u32>),
        /// Maximum number of bytes in RX buffer
        (0x538 => rxd_maxcnt: ReadWrite<u32>),
        /// Number of bytes transferred in the last RX transaction
        (0x53c => rxd_amount: ReadOnly<u32>),
        (0x540 => _reserved14),
        /// TX data pointer
        (0x544 => txd_ptr: ReadWrite<u32>),
        /// Maximum number of bytes in TX buffer
        (0x548 => txd_maxcnt: ReadWrite<u32>),
        /// Number of bytes transferred in the last TX transaction
        (0x54c => txd_amount: ReadOnly<u32>),
        (0x550 => _reserved15),
        /// Configuration of parity and flow control
        (0x56c => config: ReadWrite<u32, Config::Register>),
        (0x570 => @END),
    }
}

register_bitfields! [u32,
    Task [
        ENABLE OFFSET(0) NUMBITS(1)
    ],
    Event [
        READY OFFSET(0) NUMBITS(1)
    ],
    Shorts [
        ENDRX_STARTRX OFFSET(5) NUMBITS(1),
        ENDRX_STOPRX OFFSET(6) NUMBITS(1)
    ],
    Interrupt [
        CTS OFFSET(0) NUMBITS(1),
        NCTS OFFSET(1) NUMBITS(1),
        RXDRDY OFFSET(2) NUMBITS(1),
        ENDRX OFFSET(4) NUMBITS(1),
        TXDRDY OFFSET(7) NUMBITS(1),
        ENDTX OFFSET(8) NUMBITS(1),
        ERROR OFFSET(9) NUMBITS(1),
        RXTO OFFSET(17) NUMBITS(1),
        RXSTARTED OFFSET(19) NUMBITS(1),
        TXSTARTED OFFSET(20) NUMBITS(1),
        TXSTOPPED OFFSET(22) NUMBITS(1)
    ],
    Enable [
        ENABLE OFFSET(0) NUMBITS(4) [
            ON = 8,
            OFF = 0
        ]
    ],
    Psel [
        PIN OFFSET(0) NUMBITS(5) [],
        PORT OFFSET(5) NUMBITS(1) [],
        CONNECT OFFSET(31) NUMBITS(1) [
            Connected = 0,
            Disconnected = 1
        ]
    ],
    Baudrate [
        BAUDRATE OFFSET(0) NUMBITS(32) [
            Baud9600 = 0x00275000,
            Baud38400 = 0x009D5000,
            Baud115200 = 0x01D60000,
            Baud230400 = 0x03B00000,
            Baud1M = 0x10000000
        ]
    ],
    Config [
        HWFC OFFSET(0) NUMBITS(1),
        PARITY OFFSET(1) NUMBITS(3),
        STOP OFFSET(4) NUMBITS(1)
    ]
];

pub struct Uarte<'a> {
    registers: StaticRef<UarteRegisters>,
    rx_client: OptionalCell<&'a dyn uart::ReceiveClient>,
    tx_byte: VolatileCell<u8>,
    rx_byte: VolatileCell<u8>,
}

impl<'a> Uarte<'a> {
    pub const fn new(base: StaticRef<UarteRegisters>) -> Uarte<'a> {
        Uarte {
            registers: base,
            rx_client: OptionalCell::empty(),
            tx_byte: VolatileCell::new(0),
            rx_byte: VolatileCell::new(0),
        }
    }

    fn set_baud_rate(&self, baud_rate: u32) -> Result<(), ErrorCode> {
        let regs = self.registers;
        match baud_rate {
            9600 => regs.baudrate.write(Baudrate::BAUDRATE::Baud9600),
            38400 => regs.baudrate.write(Baudrate::BAUDRATE::Baud38400),
            115200 => regs.baudrate.write(Baudrate::BAUDRATE::Baud115200),
            230400 => regs.baudrate.write(Baudrate::BAUDRATE::Baud230400),
            1000000 => regs.baudrate.write(Baudrate::BAUDRATE::Baud1M),
            _ => return Err(ErrorCode::INVAL),
        }
        Ok(())
    }

    fn start_rx(&self) {
        let regs = self.registers;
        regs.rxd_ptr.set(self.rx_byte.as_ptr() as usize as u32);
        regs.rxd_maxcnt.set(1);
        regs.event_endrx.write(Event::READY::CLEAR);
        regs.task_startrx.write(Task::ENABLE::SET);
    }

    pub fn handle_interrupt(&self) {
        let regs = self.registers;
        if regs.event_endrx.is_set(Event::READY) {
            regs.event_endrx.write(Event::READY::CLEAR);
            let byte = self.rx_byte.get();
            // Rearm before the callback so no line time is lost.
            regs.rxd_ptr.set(self.rx_byte.as_ptr() as usize as u32);
            regs.rxd_maxcnt.set(1);
            regs.task_startrx.write(Task::ENABLE::SET);
            self.rx_client.map(|client| client.received_byte(byte));
        }
        if regs.event_error.is_set(Event::READY) {
            regs.event_error.write(Event::READY::CLEAR);
            regs.errorsrc.set(regs.errorsrc.get());
        }
    }
}

impl<'a> uart::Configure for Uarte<'a> {
    fn configure(&self, params: uart::Parameters) -> Result<(), ErrorCode> {
        let regs = self.registers;
        regs.enable.write(Enable::ENABLE::OFF);
        regs.pseltxd
            .write(Psel::PIN.val(params.tx_pin) + Psel::CONNECT::Connected);
        regs.pselrxd
            .write(Psel::PIN.val(params.rx_pin) + Psel::CONNECT::Connected);
        regs.pselrts.write(Psel::CONNECT::Disconnected);
        regs.pselcts.write(Psel::CONNECT::Disconnected);
        self.set_baud_rate(params.baud_rate)?;
        regs.config
            .write(Config::HWFC::CLEAR + Config::PARITY.val(0) + Config::STOP::CLEAR);
        regs.enable.write(Enable::ENABLE::ON);
        Ok(())
    }
}

impl<'a> uart::Transmit for Uarte<'a> {
    fn transmit_byte(&self, byte: u8) {
        // Interrupt handlers also transmit (debug output). A handler
        // preempting the ENDTX poll would clear the event and stop the
        // transmitter, stranding this wait, so the whole transaction runs
        // with interrupts masked.
        unsafe {
            cortexm::support::atomic(|| {
                let regs = self.registers;
                self.tx_byte.set(byte);
                regs.txd_ptr.set(self.tx_byte.as_ptr() as usize as u32);
                regs.txd_maxcnt.set(1);
                regs.event_endtx.write(Event::READY::CLEAR);
                regs.task_starttx.write(Task::ENABLE::SET);
                while !regs.event_endtx.is_set(Event::READY) {}
                regs.event_endtx.write(Event::READY::CLEAR);
                regs.task_stoptx.write(Task::ENABLE::SET);
            });
        }
    }
}

impl<'a> uart::Receive<'a> for Uarte<'a> {
    fn set_receive_client(&self, client: &'a dyn uart::ReceiveClient) {
        self.rx_client.set(client);
    }

    fn enable_receive(&self) {
        self.registers.intenset.write(Interrupt::ENDRX::SET + Interrupt::ERROR::SET);
        self.start_rx();
    }
}

impl<'a> InterruptClient for Uarte<'a> {
    fn interrupt(&self, _irq: u32) {
        self.handle_interrupt();
    }
}
