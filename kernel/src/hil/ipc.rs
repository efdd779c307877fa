// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interface for the inter-processor doorbell peripheral.
//!
//! The IPC block carries no data, only events: a send channel maps a local
//! software trigger to a set of event lines on the peer core, and a
//! receive channel maps incoming event lines to a local interrupt. Data
//! itself travels through the ring buffer channels in shared SRAM; the
//! doorbell just tells the peer when to look.

use crate::ErrorCode;

/// Callback for a receive channel.
pub trait IpcClient {
    /// An event arrived on `channel`. Runs in interrupt context.
    fn ipc_received(&self, channel: usize);
}

/// Configuration and triggering of doorbell channels.
///
/// Misconfiguration is surfaced as a `Result` on every operation so it is
/// caught during bring-up, where each configured channel gets exercised;
/// there is no recovery path once interrupts are live.
pub trait IpcSignal<'a> {
    /// Bind local send `channel` to the given mask of event lines on the
    /// remote core.
    fn configure_send(&self, channel: usize, remote_event_mask: u32) -> Result<(), ErrorCode>;

    /// Bind incoming events matching `local_event_mask` to `channel`,
    /// delivering them to `client` once the channel interrupt is enabled.
    fn configure_receive(
        &self,
        channel: usize,
        local_event_mask: u32,
        client: &'a dyn IpcClient,
    ) -> Result<(), ErrorCode>;

    /// Toggle interrupt delivery for a receive channel. Idempotent.
    fn set_interrupt_enable(&self, channel: usize, enabled: bool) -> Result<(), ErrorCode>;

    /// Ring the doorbell on a send channel. Fails with `OFF` if the
    /// channel was never configured.
    fn trigger(&self, channel: usize) -> Result<(), ErrorCode>;
}
