// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! End-of-bring-up smoke test.
//!
//! Pushes an HCI Reset command through the TX channel and rings the
//! doorbell, then kicks the controller's deferred work queue once. The
//! reply arrives asynchronously through the RX channel pump and shows up
//! on the console.

use kernel::debug;
use kernel::hil::ipc::IpcSignal;
use kernel::ringbuf::RingChannel;
use nrf53::egu::Egu;

use crate::{IPC_TX_CHANNEL, LOW_PRIO_EGU_CHANNEL};

/// HCI Reset: packet type 0x01 (command), opcode 0x0c03, no parameters.
const HCI_RESET: [u8; 4] = [0x01, 0x03, 0x0c, 0x00];

pub fn run<'a>(hci_tx: &RingChannel, ipc: &dyn IpcSignal<'a>, egu: &Egu<'a>) {
    let written = hci_tx.write(&HCI_RESET);
    if written != HCI_RESET.len() {
        debug!("hci: reset truncated, wrote {} of {}", written, HCI_RESET.len());
        return;
    }
    if let Err(err) = ipc.trigger(IPC_TX_CHANNEL) {
        debug!("hci: doorbell failed: {:?}", err);
        return;
    }
    if let Err(err) = egu.trigger(LOW_PRIO_EGU_CHANNEL) {
        debug!("hci: task kick failed: {:?}", err);
        return;
    }
    debug!("hci: reset sent");
}
