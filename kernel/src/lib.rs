// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Core abstractions for the nRF5340 network-core firmware.
//!
//! This crate contains the hardware-independent pieces of the bring-up:
//! the interrupt dispatch table, the cross-core ring buffer channel used to
//! exchange BLE controller traffic with the application core, the debug
//! output machinery, and the hardware interface layer (HIL) traits that the
//! chip crate implements and that the board wires together.
//!
//! Nothing in this crate touches memory-mapped hardware directly; peripheral
//! access lives in the `chips` and `arch` crates. That split keeps the
//! dispatch and ring buffer logic testable on the host.

#![no_std]

pub mod debug;
pub mod hil;
pub mod ivt;
pub mod ringbuf;
pub mod utilities;

mod errorcode;
pub use errorcode::ErrorCode;
