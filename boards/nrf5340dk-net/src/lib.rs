// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Bring-up for the network core of the nRF5340 development kit.
//!
//! The network core boots second and runs the BLE protocol controller.
//! This crate owns the bring-up sequence: console first, then clocks and
//! peripherals, then the interrupt table, then the cross-core HCI
//! channels, and finally the idle loop. Any configuration failure along
//! the way panics; a half-configured radio core is worse than a dead one.

#![no_std]

use kernel::debug;
use kernel::hil::ipc::{IpcClient, IpcSignal};
use kernel::hil::uart::{Configure, Receive};
use kernel::ivt::InterruptTable;
use kernel::ringbuf::RingChannel;
use kernel::static_init;
use kernel::ErrorCode;

use cortexm::nvic::NvicController;
use nrf53::clock_power::{ClockPower, CLOCK_POWER_BASE};
use nrf53::egu::{Egu, EGU0_BASE};
use nrf53::ipc::{Ipc, IPC_BASE};
use nrf53::peripheral_interrupts as irqs;
use nrf53::timer::{Timer, TIMER1_BASE};
use nrf53::uarte::{Uarte, UARTE0_BASE};

pub mod bridge;
pub mod controller;
pub mod demo;
pub mod io;

use bridge::Bridge;
use controller::VendorController;

/// Console pinout and rate, matching the DK's interface MCU wiring.
pub const UART_PIN_TX: u32 = 25;
pub const UART_PIN_RX: u32 = 26;
pub const UART_BAUDRATE: u32 = 115200;

/// Shared-SRAM layout of the HCI channels. Both images hardcode these
/// addresses; the application core owns the TX header (it runs `init`
/// there) and this core owns the RX header.
pub const HCI_RX_HEADER_ADDR: usize = 0x2007_0000;
pub const HCI_RX_HEADER_SIZE: usize = 0x20;
pub const HCI_RX_DATA_ADDR: usize = 0x2007_0100;
pub const HCI_RX_DATA_SIZE: usize = 0x400;
pub const HCI_TX_HEADER_ADDR: usize = 0x2007_0800;

/// Doorbell channel assignments, shared with the application core image.
pub const IPC_TX_CHANNEL: usize = 1;
pub const IPC_RX_CHANNEL: usize = 0;

/// EGU0 channel used by the controller for deferred low priority work.
pub const LOW_PRIO_EGU_CHANNEL: usize = 0;

/// Interrupt lines 0..32 cover every network-core peripheral.
pub const IVT_ENTRIES: usize = 32;

/// Idle loop sleep quantum in microseconds.
pub const IDLE_QUANTUM_US: u32 = 2_000_000;

/// The stages of the bring-up sequence, in order. Each stage only starts
/// after the previous one completed; a failure inside a stage is fatal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BringUpStage {
    ConsoleUp,
    PeripheralsUp,
    InterruptsRouted,
    InterruptsEnabled,
    ChannelsConfigured,
}

static mut INTERRUPT_TABLE: Option<&'static InterruptTable<'static, IVT_ENTRIES>> = None;

/// Entry point for all peripheral interrupts.
///
/// The vector stubs funnel here with the interrupt number. An interrupt
/// with no binding means the table and the interrupt controller disagree,
/// so treat it as fatal instead of dropping it.
///
/// ## Safety
///
/// Must only be called from interrupt context after `start` has installed
/// the table.
pub unsafe fn service_interrupt(irq: u32) {
    let table = (*core::ptr::addr_of!(INTERRUPT_TABLE))
        .unwrap_or_else(|| panic!("interrupt {} before table install", irq));
    if let Err(err) = table.service(irq) {
        fatal("interrupt dispatch", irq as usize, err);
    }
}

fn fatal(what: &str, which: usize, err: ErrorCode) -> ! {
    panic!("bring-up: {} {} failed: {:?}", what, which, err);
}

/// Consumer side of the controller-to-host HCI channel.
///
/// The doorbell interrupt lands here; the pump drains whatever the
/// controller produced since the last ring. Until a host transport is
/// attached the bytes go to the console.
struct HciRxPump {
    rx: RingChannel,
}

impl IpcClient for HciRxPump {
    fn ipc_received(&self, _channel: usize) {
        let mut chunk = [0u8; 16];
        loop {
            let count = self.rx.read(&mut chunk);
            if count == 0 {
                break;
            }
            debug!("hci rx: {:02x?}", &chunk[..count]);
        }
    }
}

/// Bring the network core up and fall into the idle loop.
///
/// ## Safety
///
/// Call exactly once, from the reset path, before interrupts are enabled.
pub unsafe fn start() -> ! {
    // Stage 1: console. Everything after this can report failures.
    let uarte: &'static Uarte = static_init!(Uarte<'static>, Uarte::new(UARTE0_BASE));
    if let Err(err) = uarte.configure(kernel::hil::uart::Parameters {
        baud_rate: UART_BAUDRATE,
        tx_pin: UART_PIN_TX,
        rx_pin: UART_PIN_RX,
    }) {
        fatal("uart configure", 0, err);
    }
    io::set_console();
    let console_input: &'static io::ConsoleInput = static_init!(io::ConsoleInput, io::ConsoleInput);
    uarte.set_receive_client(console_input);
    debug!("nrf5340 net core");
    debug!("stage {:?}", BringUpStage::ConsoleUp);

    // Stage 2: clocks, the delay timer, the doorbell block and the EGU.
    let clock_power: &'static ClockPower = static_init!(ClockPower, ClockPower::new(CLOCK_POWER_BASE));
    clock_power.init();
    let timer1: &'static Timer = static_init!(Timer, Timer::new(TIMER1_BASE));
    timer1.init();
    let ipc: &'static Ipc = static_init!(Ipc<'static>, Ipc::new(IPC_BASE));
    let egu0: &'static Egu = static_init!(Egu<'static>, Egu::new(EGU0_BASE));
    debug!("stage {:?}", BringUpStage::PeripheralsUp);

    // Stage 3: the interrupt table. The RADIO, RNG, TIMER0, RTC0 and
    // CLOCK/POWER lines belong to the BLE controller and go through the
    // bridge; the rest are driven by this crate.
    let ble: &'static VendorController = static_init!(VendorController, VendorController::new());
    let bridge: &'static Bridge = static_init!(Bridge<'static>, Bridge::new(ble));
    egu0.set_client(bridge);

    let nvic: &'static NvicController = static_init!(NvicController, NvicController);
    let table: &'static InterruptTable<'static, IVT_ENTRIES> = static_init!(
        InterruptTable<'static, IVT_ENTRIES>,
        InterruptTable::new(nvic)
    );
    *core::ptr::addr_of_mut!(INTERRUPT_TABLE) = Some(table);

    for (irq, client) in [
        (irqs::SERIAL0, uarte as &dyn kernel::ivt::InterruptClient),
        (irqs::EGU0, egu0),
        (irqs::RNG, bridge),
        (irqs::TIMER0, bridge),
        (irqs::TIMER1, timer1),
        (irqs::RADIO, bridge),
        (irqs::RTC0, bridge),
        (irqs::CLOCK_POWER, bridge),
        (irqs::IPC, ipc),
    ] {
        if let Err(err) = table.route(irq, client) {
            fatal("interrupt route", irq as usize, err);
        }
    }
    debug!("stage {:?}", BringUpStage::InterruptsRouted);

    // Stage 4: unmask only the lines this crate services now. The
    // controller-owned lines stay masked until its start entry point
    // claims them.
    for irq in [irqs::TIMER1, irqs::SERIAL0, irqs::EGU0, irqs::IPC] {
        if let Err(err) = table.enable(irq) {
            fatal("interrupt enable", irq as usize, err);
        }
    }
    if let Err(err) = egu0.enable_interrupt(LOW_PRIO_EGU_CHANNEL) {
        fatal("egu enable", LOW_PRIO_EGU_CHANNEL, err);
    }
    uarte.enable_receive();
    debug!("stage {:?}", BringUpStage::InterruptsEnabled);

    // Stage 5: cross-core channels. This core initializes the RX header
    // and consumes what the application core produces there; it joins the
    // TX header the application core initialized before releasing this
    // core from reset, and produces into it.
    let hci_rx = match RingChannel::init(
        HCI_RX_HEADER_ADDR,
        HCI_RX_HEADER_SIZE,
        HCI_RX_DATA_ADDR,
        HCI_RX_DATA_SIZE,
    ) {
        Ok(channel) => channel,
        Err(err) => fatal("hci rx channel", 0, err),
    };
    let hci_tx: &'static RingChannel = match RingChannel::join(HCI_TX_HEADER_ADDR) {
        Ok(channel) => static_init!(RingChannel, channel),
        Err(err) => fatal("hci tx channel", 0, err),
    };

    if let Err(err) = ipc.configure_send(IPC_TX_CHANNEL, 1 << 1) {
        fatal("ipc send config", IPC_TX_CHANNEL, err);
    }
    let pump: &'static HciRxPump = static_init!(HciRxPump, HciRxPump { rx: hci_rx });
    if let Err(err) = ipc.configure_receive(IPC_RX_CHANNEL, 1 << 0, pump) {
        fatal("ipc receive config", IPC_RX_CHANNEL, err);
    }
    if let Err(err) = ipc.set_interrupt_enable(IPC_RX_CHANNEL, true) {
        fatal("ipc interrupt enable", IPC_RX_CHANNEL, err);
    }
    debug!("stage {:?}", BringUpStage::ChannelsConfigured);

    debug!("Hello world!");
    demo::run(hci_tx, ipc, egu0);

    loop {
        timer1.delay_us(IDLE_QUANTUM_US);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use kernel::utilities::cells::OptionalCell;

    // Doorbell double that delivers a trigger on a configured send
    // channel straight to the registered receive client, the way the
    // hardware doorbell reaches the peer core.
    struct LoopbackDoorbell<'a> {
        client: OptionalCell<&'a dyn IpcClient>,
        receive_channel: Cell<usize>,
        send_configured: Cell<u32>,
        rings: Cell<usize>,
    }

    impl<'a> LoopbackDoorbell<'a> {
        fn new() -> LoopbackDoorbell<'a> {
            LoopbackDoorbell {
                client: OptionalCell::empty(),
                receive_channel: Cell::new(0),
                send_configured: Cell::new(0),
                rings: Cell::new(0),
            }
        }
    }

    impl<'a> IpcSignal<'a> for LoopbackDoorbell<'a> {
        fn configure_send(&self, channel: usize, _remote_event_mask: u32) -> Result<(), ErrorCode> {
            self.send_configured
                .set(self.send_configured.get() | (1 << channel));
            Ok(())
        }

        fn configure_receive(
            &self,
            channel: usize,
            _local_event_mask: u32,
            client: &'a dyn IpcClient,
        ) -> Result<(), ErrorCode> {
            self.receive_channel.set(channel);
            self.client.set(client);
            Ok(())
        }

        fn set_interrupt_enable(&self, _channel: usize, _enabled: bool) -> Result<(), ErrorCode> {
            Ok(())
        }

        fn trigger(&self, channel: usize) -> Result<(), ErrorCode> {
            if self.send_configured.get() & (1 << channel) == 0 {
                return Err(ErrorCode::OFF);
            }
            self.rings.set(self.rings.get() + 1);
            self.client
                .map(|client| client.ipc_received(self.receive_channel.get()));
            Ok(())
        }
    }

    #[repr(C, align(8))]
    struct HeaderMem([u8; 32]);

    #[test]
    fn doorbell_ring_drains_the_channel() {
        let mut header = HeaderMem([0; 32]);
        let mut data = [0u8; 64];
        let header_addr = header.0.as_mut_ptr() as usize;

        let producer = unsafe {
            RingChannel::init(
                header_addr,
                header.0.len(),
                data.as_mut_ptr() as usize,
                data.len(),
            )
            .unwrap()
        };
        let consumer = unsafe { RingChannel::join(header_addr).unwrap() };
        let pump = HciRxPump { rx: consumer };

        let doorbell = LoopbackDoorbell::new();
        assert_eq!(doorbell.configure_send(IPC_TX_CHANNEL, 1 << 1), Ok(()));
        assert_eq!(
            doorbell.configure_receive(IPC_RX_CHANNEL, 1 << 0, &pump),
            Ok(())
        );

        // More than one pump chunk, so the drain loop has to go around.
        let event = [0xau8; 40];
        assert_eq!(producer.write(&event), event.len());
        assert_eq!(producer.len(), event.len());

        assert_eq!(doorbell.trigger(IPC_TX_CHANNEL), Ok(()));
        assert_eq!(doorbell.rings.get(), 1);
        assert_eq!(producer.len(), 0);
    }

    #[test]
    fn trigger_without_configuration_is_off() {
        let doorbell: LoopbackDoorbell = LoopbackDoorbell::new();
        assert_eq!(doorbell.trigger(IPC_TX_CHANNEL), Err(ErrorCode::OFF));
        assert_eq!(doorbell.rings.get(), 0);
    }

    #[test]
    fn bring_up_stages_are_ordered() {
        assert!(BringUpStage::ConsoleUp < BringUpStage::PeripheralsUp);
        assert!(BringUpStage::PeripheralsUp < BringUpStage::InterruptsRouted);
        assert!(BringUpStage::InterruptsRouted < BringUpStage::InterruptsEnabled);
        assert!(BringUpStage::InterruptsEnabled < BringUpStage::ChannelsConfigured);
    }
}
