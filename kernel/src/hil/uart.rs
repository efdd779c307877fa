// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interfaces for UART communications.
//!
//! The console on this core is deliberately small: byte-at-a-time blocking
//! transmit for diagnostic output and an interrupt-driven receive callback.

use crate::ErrorCode;

#[derive(Copy, Clone, Debug)]
pub struct Parameters {
    /// Baud rate in bit/s.
    pub baud_rate: u32,
    pub tx_pin: u32,
    pub rx_pin: u32,
}

pub trait Configure {
    /// Apply pin and baud configuration and enable the peripheral.
    fn configure(&self, params: Parameters) -> Result<(), ErrorCode>;
}

pub trait Transmit {
    /// Transmit a single byte, busy-waiting until the hardware has
    /// accepted it. Only suitable for diagnostic output.
    fn transmit_byte(&self, byte: u8);
}

/// Implement to receive incoming console bytes.
pub trait ReceiveClient {
    /// A byte arrived. Runs in interrupt context.
    fn received_byte(&self, byte: u8);
}

pub trait Receive<'a> {
    fn set_receive_client(&self, client: &'a dyn ReceiveClient);

    /// Start interrupt-driven reception. Bytes are delivered to the
    /// registered client.
    fn enable_receive(&self);
}
