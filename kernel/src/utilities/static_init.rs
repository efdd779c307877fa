// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Support for statically initializing objects in memory.

/// Allocates a statically-sized global region of memory and initializes the
/// memory for a particular data structure.
///
/// This macro creates the static buffer, ensures it is initialized to the
/// proper type, and then returns a `&'static mut` reference to it.
///
/// # Safety
///
/// As this macro will write directly to a global area without acquiring a
/// lock or similar, calling this macro is inherently unsafe. The caller
/// should take care to never call the code that initializes this buffer
/// twice, as doing so will overwrite the value from the first allocation.
#[macro_export]
macro_rules! static_init {
    ($T:ty, $e:expr $(,)?) => {{
        let buf = $crate::static_buf!($T);
        buf.write($e)
    }};
}

/// Allocates a statically-sized global region of memory for data structures
/// but does not initialize the memory.
///
/// Before the returned buffer can be used it must be written, for example
/// through [`static_init!`].
#[macro_export]
macro_rules! static_buf {
    ($T:ty $(,)?) => {{
        static mut BUF: core::mem::MaybeUninit<$T> = core::mem::MaybeUninit::uninit();
        &mut *core::ptr::addr_of_mut!(BUF)
    }};
}
