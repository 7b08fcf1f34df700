// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The native transport capability consumed by this crate.

use std::{
    ffi::{c_int, c_void, CStr},
    fmt,
    ptr::NonNull,
    sync::Arc,
};

use crate::frame::Word;

/// Opaque token of a context allocated by a [`Transport`].
///
/// A handle is never dereferenced on the Rust side. Ownership is tracked by
/// [`Context`](crate::Context), a bare `Handle` neither frees nor closes
/// anything.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(NonNull<c_void>);

// SAFETY: A native context is plain heap state without thread affinity.
unsafe impl Send for Handle {}

// SAFETY: A shared `Handle` only exposes its address. Every native call on
// an owned context goes through `&mut Context` or `&mut Connection`.
unsafe impl Sync for Handle {}

impl Handle {
    /// Wraps a raw pointer, `None` if it is null.
    #[must_use]
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    /// Creates a token from a plain address.
    ///
    /// Meant for [`Transport`] implementations that are not backed by
    /// native memory, e.g. test doubles.
    #[must_use]
    pub fn from_addr(addr: usize) -> Option<Self> {
        Self::new(addr as *mut c_void)
    }

    #[must_use]
    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }

    #[must_use]
    pub fn addr(self) -> usize {
        self.0.as_ptr() as usize
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:#x})", self.addr())
    }
}

/// Errno-style native Modbus API.
///
/// Every fallible primitive reports failure through its return value only.
/// The error code itself lives in a side channel that is read with
/// [`Transport::last_error`].
///
/// # Sequencing
///
/// The side channel is overwritten by the next transport call. Callers must
/// invoke `last_error()` immediately after the failing call returns, before
/// *any* other method of the same transport, [`Transport::strerror`]
/// included. [`Error::last`](crate::Error::last) does exactly that.
pub trait Transport {
    /// Allocates a TCP context, `None` on failure.
    ///
    /// An `address` of `None` listens on any address in server mode.
    fn new_tcp(&self, address: Option<&CStr>, port: c_int) -> Option<Handle>;

    /// The error code of the most recent failing call on this thread.
    fn last_error(&self) -> c_int;

    /// Human readable description of `code`.
    fn strerror(&self, code: c_int) -> String;

    /// Releases a context. Must not fail.
    fn free(&self, handle: Handle);

    /// `0` on success, `-1` on failure.
    fn connect(&self, handle: Handle) -> c_int;

    /// Closes the connection. Must not fail and is safe to call redundantly.
    fn close(&self, handle: Handle);

    /// Read holding registers (0x03) into `dest[..nb]`.
    ///
    /// Callers guarantee `dest.len() >= nb`. Returns the number of
    /// registers read or `-1`.
    fn read_registers(&self, handle: Handle, addr: c_int, nb: c_int, dest: &mut [Word]) -> c_int;

    /// Read input registers (0x04) into `dest[..nb]`, same contract as
    /// [`Transport::read_registers`].
    fn read_input_registers(
        &self,
        handle: Handle,
        addr: c_int,
        nb: c_int,
        dest: &mut [Word],
    ) -> c_int;

    /// Write a single holding register (0x06). Returns `1` on success.
    fn write_register(&self, handle: Handle, addr: c_int, value: Word) -> c_int;

    /// Write multiple holding registers (0x10). Returns the number of
    /// registers written or `-1`.
    fn write_registers(&self, handle: Handle, addr: c_int, values: &[Word]) -> c_int;

    /// `0` on success, `-1` on failure.
    fn set_debug(&self, handle: Handle, flag: bool) -> c_int;

    /// `0` on success, `-1` on failure.
    fn set_slave(&self, handle: Handle, slave: c_int) -> c_int;

    /// `0` on success, `-1` on failure.
    fn set_response_timeout(&self, handle: Handle, sec: u32, usec: u32) -> c_int;
}

macro_rules! forward_transport {
    () => {
        fn new_tcp(&self, address: Option<&CStr>, port: c_int) -> Option<Handle> {
            (**self).new_tcp(address, port)
        }

        fn last_error(&self) -> c_int {
            (**self).last_error()
        }

        fn strerror(&self, code: c_int) -> String {
            (**self).strerror(code)
        }

        fn free(&self, handle: Handle) {
            (**self).free(handle);
        }

        fn connect(&self, handle: Handle) -> c_int {
            (**self).connect(handle)
        }

        fn close(&self, handle: Handle) {
            (**self).close(handle);
        }

        fn read_registers(
            &self,
            handle: Handle,
            addr: c_int,
            nb: c_int,
            dest: &mut [Word],
        ) -> c_int {
            (**self).read_registers(handle, addr, nb, dest)
        }

        fn read_input_registers(
            &self,
            handle: Handle,
            addr: c_int,
            nb: c_int,
            dest: &mut [Word],
        ) -> c_int {
            (**self).read_input_registers(handle, addr, nb, dest)
        }

        fn write_register(&self, handle: Handle, addr: c_int, value: Word) -> c_int {
            (**self).write_register(handle, addr, value)
        }

        fn write_registers(&self, handle: Handle, addr: c_int, values: &[Word]) -> c_int {
            (**self).write_registers(handle, addr, values)
        }

        fn set_debug(&self, handle: Handle, flag: bool) -> c_int {
            (**self).set_debug(handle, flag)
        }

        fn set_slave(&self, handle: Handle, slave: c_int) -> c_int {
            (**self).set_slave(handle, slave)
        }

        fn set_response_timeout(&self, handle: Handle, sec: u32, usec: u32) -> c_int {
            (**self).set_response_timeout(handle, sec, usec)
        }
    };
}

impl<T: Transport + ?Sized> Transport for &T {
    forward_transport!();
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    forward_transport!();
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    forward_transport!();
}
