// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Cell types for single-threaded interior mutability.

use core::cell::{Cell, UnsafeCell};
use core::ptr;

/// An [`OptionalCell`] is a [`Cell`] that wraps an [`Option`].
///
/// This is a helper type for keeping client references and other values
/// that can be absent a little cleaner.
pub struct OptionalCell<T: Copy> {
    value: Cell<Option<T>>,
}

impl<T: Copy> OptionalCell<T> {
    /// Create a new `OptionalCell`.
    pub const fn new(val: T) -> OptionalCell<T> {
        OptionalCell {
            value: Cell::new(Some(val)),
        }
    }

    /// Create an empty `OptionalCell` (contains just `None`).
    pub const fn empty() -> OptionalCell<T> {
        OptionalCell {
            value: Cell::new(None),
        }
    }

    /// Update the stored value.
    pub fn set(&self, val: T) {
        self.value.set(Some(val));
    }

    /// Reset the stored value to `None`.
    pub fn clear(&self) {
        self.value.set(None);
    }

    /// Check if the cell contains something.
    pub fn is_some(&self) -> bool {
        self.value.get().is_some()
    }

    /// Check if the cell is `None`.
    pub fn is_none(&self) -> bool {
        self.value.get().is_none()
    }

    /// Return a copy of the contained `Option`.
    pub fn get(&self) -> Option<T> {
        self.value.get()
    }

    /// If the cell contains a value, call a closure supplied with the
    /// value of the cell.
    pub fn map<F, R>(&self, closure: F) -> Option<R>
    where
        F: FnOnce(T) -> R,
    {
        self.value.get().map(closure)
    }
}

/// A memory location with volatile read and write operations.
///
/// `VolatileCell` is just like [`Cell`] but accesses go through
/// [`ptr::read_volatile`] and [`ptr::write_volatile`]. This is how driver
/// structs hold single-byte EasyDMA staging buffers whose contents the
/// hardware reads behind the compiler's back.
#[derive(Default)]
#[repr(transparent)]
pub struct VolatileCell<T> {
    value: UnsafeCell<T>,
}

impl<T> VolatileCell<T> {
    /// Creates a new `VolatileCell` containing the given value.
    pub const fn new(value: T) -> Self {
        VolatileCell {
            value: UnsafeCell::new(value),
        }
    }

    /// Performs a volatile read of the contained value.
    pub fn get(&self) -> T
    where
        T: Copy,
    {
        unsafe { ptr::read_volatile(self.value.get()) }
    }

    /// Performs a volatile write of `value`.
    pub fn set(&self, value: T)
    where
        T: Copy,
    {
        unsafe { ptr::write_volatile(self.value.get(), value) }
    }

    /// Returns the address of the contained value, for handing to DMA.
    pub fn as_ptr(&self) -> *const T {
        self.value.get()
    }
}
