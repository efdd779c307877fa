// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Cortex-M NVIC
//!
//! Most NVIC configuration is in the NVIC registers:
//! <https://developer.arm.com/docs/100165/0201/nested-vectored-interrupt-controller/nvic-programmers-model/table-of-nvic-registers>

use kernel::ivt::InterruptController;
use kernel::utilities::registers::interfaces::Writeable;
use kernel::utilities::registers::{register_bitfields, register_structs, ReadWrite};
use kernel::utilities::StaticRef;

register_structs! {
    /// NVIC Registers.
    ///
    /// Note this generic interface exposes all possible interrupt banks.
    /// Most cores implement far fewer than 32 banks of 32 lines.
    NvicRegisters {
        (0x000 => _reserved0),

        /// Interrupt Set-Enable Registers
        (0x100 => iser: [ReadWrite<u32, NvicSetClear::Register>; 32]),

        /// Interrupt Clear-Enable Registers
        (0x180 => icer: [ReadWrite<u32, NvicSetClear::Register>; 32]),

        (0x200 => _reserved1),

        /// Interrupt Clear-Pending Registers
        (0x280 => icpr: [ReadWrite<u32, NvicSetClear::Register>; 32]),

        (0x300 => @END),
    }
}

register_bitfields![u32,
    NvicSetClear [
        /// For register NVIC_XXXXn, access interrupt (m+(32*n)).
        BITS            OFFSET(0)   NUMBITS(32)
    ]
];

/// The NVIC peripheral in MMIO space.
const NVIC: StaticRef<NvicRegisters> =
    unsafe { StaticRef::new(0xe000e000 as *const NvicRegisters) };

/// An opaque wrapper for a single NVIC interrupt.
///
/// Hand these out to low-level drivers to let them control their own
/// interrupts but not others.
pub struct Nvic(u32);

impl Nvic {
    /// Creates a new `Nvic`
    ///
    /// Marked unsafe because only chip/platform configuration code should
    /// be able to create these.
    pub const unsafe fn new(idx: u32) -> Nvic {
        Nvic(idx)
    }

    /// Enable the interrupt
    pub fn enable(&self) {
        let idx = self.0 as usize;

        NVIC.iser[idx / 32].set(1 << (self.0 & 31));
    }

    /// Disable the interrupt
    pub fn disable(&self) {
        let idx = self.0 as usize;

        NVIC.icer[idx / 32].set(1 << (self.0 & 31));
    }

    /// Clear pending state
    pub fn clear_pending(&self) {
        let idx = self.0 as usize;

        NVIC.icpr[idx / 32].set(1 << (self.0 & 31));
    }
}

/// Adapter presenting the NVIC as the kernel's interrupt controller.
///
/// The interrupt table in the kernel crate talks to this trait so its
/// routing logic stays independent of real interrupt hardware.
pub struct NvicController;

impl InterruptController for NvicController {
    fn enable(&self, irq: u32) {
        unsafe { Nvic::new(irq) }.enable();
    }

    fn disable(&self, irq: u32) {
        unsafe { Nvic::new(irq) }.disable();
    }

    fn clear_pending(&self, irq: u32) {
        unsafe { Nvic::new(irq) }.clear_pending();
    }
}
