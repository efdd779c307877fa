// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Lock-free cross-core ring buffer channel.
//!
//! A [`RingChannel`] is a fixed-capacity, single-producer/single-consumer
//! byte ring whose header and backing storage live at addresses in shared
//! SRAM that both cores agree on at build time. One core calls
//! [`RingChannel::init`] to claim and zero the regions; the peer calls
//! [`RingChannel::join`] to attach to the already-initialized header.
//!
//! There are no locks. For a given channel instance exactly one core ever
//! stores `write_index` (the producer) and exactly one core ever stores
//! `read_index` (the consumer); each core only loads the other's index.
//! Indices are free-running `u32`s and the capacity is a power of two, so
//! `write_index - read_index` (wrapping) is the number of unread bytes and
//! full/empty need no extra flag.
//!
//! Ordering across the cores is an acquire/release pair on the index
//! fields: the producer release-stores `write_index` after committing the
//! data bytes, and the consumer acquire-loads it before reading them. The
//! channel never signals by itself; after a `write` the producer rings the
//! IPC doorbell so the consumer knows to look.

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::utilities::StaticRef;
use crate::ErrorCode;

/// Channel header shared between the two cores.
///
/// The layout is part of the cross-core contract: both images must be
/// built with the same definition at the same address.
#[repr(C)]
pub struct RingHeader {
    write_index: AtomicU32,
    read_index: AtomicU32,
    capacity: AtomicU32,
    data_addr: AtomicUsize,
}

/// One direction of the cross-core byte pipe.
///
/// A `RingChannel` does not encode its role in the type: per instance, the
/// board uses exactly one side as producer (`write`/`free`) and the other
/// as consumer (`read`/`len`). That single-writer discipline is the sole
/// safety mechanism; one core must never perform both roles on the same
/// instance.
pub struct RingChannel {
    header: StaticRef<RingHeader>,
    data: *mut u8,
    capacity: u32,
}

impl RingChannel {
    /// Claim and zero-initialize a header and its backing storage.
    ///
    /// The data region size is the channel capacity and must be a nonzero
    /// power of two (`INVAL` otherwise); the header region must hold a
    /// [`RingHeader`] (`SIZE` otherwise).
    ///
    /// ## Safety
    ///
    /// `header_addr` and `data_addr` must be valid, exclusively claimed
    /// regions of at least the given sizes, and must remain valid for the
    /// life of the channel. The peer core must only `join` after `init`
    /// has completed.
    pub unsafe fn init(
        header_addr: usize,
        header_size: usize,
        data_addr: usize,
        data_size: usize,
    ) -> Result<RingChannel, ErrorCode> {
        if header_size < core::mem::size_of::<RingHeader>() {
            return Err(ErrorCode::SIZE);
        }
        let capacity = data_size as u32;
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(ErrorCode::INVAL);
        }

        let header = StaticRef::new(header_addr as *const RingHeader);
        header.write_index.store(0, Ordering::Relaxed);
        header.read_index.store(0, Ordering::Relaxed);
        header.data_addr.store(data_addr, Ordering::Relaxed);
        // Publishing the capacity last lets a joining peer acquire the
        // whole header with one load.
        header.capacity.store(capacity, Ordering::Release);

        Ok(RingChannel {
            header,
            data: data_addr as *mut u8,
            capacity,
        })
    }

    /// Attach to a header previously initialized by the peer core.
    ///
    /// Performs no zeroing: producer and consumer state are taken as
    /// already established. Returns `INVAL` if the published capacity is
    /// not a nonzero power of two, which catches a peer that has not run
    /// `init` yet as well as header corruption.
    ///
    /// ## Safety
    ///
    /// `header_addr` must be the address the peer passed to `init`.
    pub unsafe fn join(header_addr: usize) -> Result<RingChannel, ErrorCode> {
        let header = StaticRef::new(header_addr as *const RingHeader);
        let capacity = header.capacity.load(Ordering::Acquire);
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(ErrorCode::INVAL);
        }
        let data = header.data_addr.load(Ordering::Relaxed) as *mut u8;
        Ok(RingChannel {
            header,
            data,
            capacity,
        })
    }

    /// Channel capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Bytes available to read. Consumer-side query.
    pub fn len(&self) -> usize {
        let write = self.header.write_index.load(Ordering::Acquire);
        let read = self.header.read_index.load(Ordering::Relaxed);
        write.wrapping_sub(read) as usize
    }

    /// True when there is nothing to read. Consumer-side query.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes of free space. Producer-side query.
    pub fn free(&self) -> usize {
        let write = self.header.write_index.load(Ordering::Relaxed);
        let read = self.header.read_index.load(Ordering::Acquire);
        let used = write.wrapping_sub(read);
        self.capacity.saturating_sub(used) as usize
    }

    /// Copy bytes into the channel, producer side only.
    ///
    /// Returns the number of bytes actually written, which is fewer than
    /// `buf.len()` when the channel fills up; unread data is never
    /// overwritten. Never blocks. The caller is responsible for ringing
    /// the IPC doorbell afterwards.
    pub fn write(&self, buf: &[u8]) -> usize {
        let write = self.header.write_index.load(Ordering::Relaxed);
        let read = self.header.read_index.load(Ordering::Acquire);
        let used = write.wrapping_sub(read);
        let free = self.capacity.saturating_sub(used) as usize;

        let count = core::cmp::min(free, buf.len());
        if count == 0 {
            return 0;
        }

        let mask = (self.capacity - 1) as usize;
        for (i, &byte) in buf[..count].iter().enumerate() {
            let index = (write as usize).wrapping_add(i) & mask;
            unsafe {
                core::ptr::write_volatile(self.data.add(index), byte);
            }
        }

        // The release store publishes the data bytes along with the index.
        self.header
            .write_index
            .store(write.wrapping_add(count as u32), Ordering::Release);
        count
    }

    /// Copy bytes out of the channel, consumer side only.
    ///
    /// Returns the number of bytes read, zero when the channel is empty.
    /// Never blocks.
    pub fn read(&self, buf: &mut [u8]) -> usize {
        let write = self.header.write_index.load(Ordering::Acquire);
        let read = self.header.read_index.load(Ordering::Relaxed);
        let available = write.wrapping_sub(read) as usize;

        let count = core::cmp::min(available, buf.len());
        if count == 0 {
            return 0;
        }

        let mask = (self.capacity - 1) as usize;
        for (i, slot) in buf[..count].iter_mut().enumerate() {
            let index = (read as usize).wrapping_add(i) & mask;
            *slot = unsafe { core::ptr::read_volatile(self.data.add(index)) };
        }

        self.header
            .read_index
            .store(read.wrapping_add(count as u32), Ordering::Release);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER_SIZE: usize = core::mem::size_of::<RingHeader>();

    #[repr(C, align(8))]
    struct HeaderMem([u8; HEADER_SIZE]);

    impl HeaderMem {
        fn new() -> HeaderMem {
            HeaderMem([0; HEADER_SIZE])
        }
        fn addr(&mut self) -> usize {
            self.0.as_mut_ptr() as usize
        }
    }

    #[test]
    fn fresh_channel_is_empty() {
        let mut header = HeaderMem::new();
        let mut data = [0u8; 64];
        let ring = unsafe {
            RingChannel::init(header.addr(), HEADER_SIZE, data.as_mut_ptr() as usize, 64)
        }
        .unwrap();

        assert_eq!(ring.capacity(), 64);
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.free(), 64);
        let mut out = [0u8; 8];
        assert_eq!(ring.read(&mut out), 0);
    }

    #[test]
    fn init_rejects_bad_regions() {
        let mut header = HeaderMem::new();
        let mut data = [0u8; 64];
        let data_addr = data.as_mut_ptr() as usize;

        assert_eq!(
            unsafe { RingChannel::init(header.addr(), HEADER_SIZE - 1, data_addr, 64) }.err(),
            Some(ErrorCode::SIZE)
        );
        assert_eq!(
            unsafe { RingChannel::init(header.addr(), HEADER_SIZE, data_addr, 48) }.err(),
            Some(ErrorCode::INVAL)
        );
        assert_eq!(
            unsafe { RingChannel::init(header.addr(), HEADER_SIZE, data_addr, 0) }.err(),
            Some(ErrorCode::INVAL)
        );
    }

    #[test]
    fn join_rejects_uninitialized_header() {
        let mut header = HeaderMem::new();
        let addr = header.addr();
        assert_eq!(
            unsafe { RingChannel::join(addr) }.err(),
            Some(ErrorCode::INVAL)
        );
    }

    #[test]
    fn join_preserves_capacity_and_state() {
        let mut header = HeaderMem::new();
        let mut data = [0u8; 128];
        let producer = unsafe {
            RingChannel::init(header.addr(), HEADER_SIZE, data.as_mut_ptr() as usize, 128)
        }
        .unwrap();

        assert_eq!(producer.write(b"hello"), 5);

        let consumer = unsafe { RingChannel::join(header.addr()) }.unwrap();
        assert_eq!(consumer.capacity(), 128);
        assert_eq!(consumer.len(), 5);

        let mut out = [0u8; 16];
        assert_eq!(consumer.read(&mut out), 5);
        assert_eq!(&out[..5], b"hello");
    }

    // Producer writes 16 bytes to an empty 64-byte channel; the consumer
    // reads them back byte-for-byte and a second read returns nothing.
    #[test]
    fn round_trip_in_order() {
        let mut header = HeaderMem::new();
        let mut data = [0u8; 64];
        let ring = unsafe {
            RingChannel::init(header.addr(), HEADER_SIZE, data.as_mut_ptr() as usize, 64)
        }
        .unwrap();

        let message: [u8; 16] = core::array::from_fn(|i| i as u8 ^ 0xa5);
        assert_eq!(ring.write(&message), 16);
        assert_eq!(ring.len(), 16);

        let mut out = [0u8; 32];
        assert_eq!(ring.read(&mut out), 16);
        assert_eq!(out[..16], message);
        assert_eq!(ring.read(&mut out), 0);
    }

    // A write larger than the free space is truncated to exactly the free
    // space, and the accepted prefix shows up in order at the head.
    #[test]
    fn write_is_bounded_by_free_space() {
        let mut header = HeaderMem::new();
        let mut data = [0u8; 64];
        let ring = unsafe {
            RingChannel::init(header.addr(), HEADER_SIZE, data.as_mut_ptr() as usize, 64)
        }
        .unwrap();

        let filler = [0xffu8; 24];
        assert_eq!(ring.write(&filler), 24);
        assert_eq!(ring.free(), 40);

        let big: [u8; 100] = core::array::from_fn(|i| i as u8);
        assert_eq!(ring.write(&big), 40);
        assert_eq!(ring.free(), 0);

        let mut out = [0u8; 24];
        assert_eq!(ring.read(&mut out), 24);
        assert_eq!(out, filler);

        let mut rest = [0u8; 100];
        assert_eq!(ring.read(&mut rest), 40);
        assert_eq!(rest[..40], big[..40]);
    }

    #[test]
    fn wrap_around_preserves_order() {
        let mut header = HeaderMem::new();
        let mut data = [0u8; 16];
        let ring = unsafe {
            RingChannel::init(header.addr(), HEADER_SIZE, data.as_mut_ptr() as usize, 16)
        }
        .unwrap();

        // Walk the indices around the ring several times.
        for round in 0u32..10 {
            let message: [u8; 12] = core::array::from_fn(|i| (round as u8).wrapping_add(i as u8));
            assert_eq!(ring.write(&message), 12);

            let mut out = [0u8; 12];
            assert_eq!(ring.read(&mut out), 12);
            assert_eq!(out, message);
        }
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.free(), 16);
    }

    #[test]
    fn full_channel_rejects_further_writes() {
        let mut header = HeaderMem::new();
        let mut data = [0u8; 32];
        let ring = unsafe {
            RingChannel::init(header.addr(), HEADER_SIZE, data.as_mut_ptr() as usize, 32)
        }
        .unwrap();

        let fill = [0x5au8; 32];
        assert_eq!(ring.write(&fill), 32);
        assert_eq!(ring.write(&[1, 2, 3]), 0);
        assert_eq!(ring.len(), 32);

        // Draining two bytes frees exactly two slots.
        let mut out = [0u8; 2];
        assert_eq!(ring.read(&mut out), 2);
        assert_eq!(ring.write(&[1, 2, 3]), 2);
    }
}
