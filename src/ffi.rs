// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bindings to the libmodbus shared library
//!
//! Only the subset of the C API that is wrapped by this crate is declared.
//! See <https://libmodbus.org/reference/> for the documentation of each
//! function.

use std::{
    ffi::{c_char, c_int, c_void, CStr},
    io,
    ptr,
};

use crate::{
    context::{Context, TCP_DEFAULT_PORT},
    error::Result,
    frame::Word,
    transport::{Handle, Transport},
};

#[allow(non_camel_case_types)]
type modbus_t = c_void;

#[link(name = "modbus")]
extern "C" {
    fn modbus_new_tcp(ip_address: *const c_char, port: c_int) -> *mut modbus_t;
    fn modbus_strerror(errnum: c_int) -> *const c_char;
    fn modbus_free(ctx: *mut modbus_t);
    fn modbus_connect(ctx: *mut modbus_t) -> c_int;
    fn modbus_close(ctx: *mut modbus_t);
    fn modbus_read_registers(ctx: *mut modbus_t, addr: c_int, nb: c_int, dest: *mut u16) -> c_int;
    fn modbus_read_input_registers(
        ctx: *mut modbus_t,
        addr: c_int,
        nb: c_int,
        dest: *mut u16,
    ) -> c_int;
    fn modbus_write_register(ctx: *mut modbus_t, addr: c_int, value: u16) -> c_int;
    fn modbus_write_registers(ctx: *mut modbus_t, addr: c_int, nb: c_int, src: *const u16)
        -> c_int;
    fn modbus_set_debug(ctx: *mut modbus_t, flag: c_int) -> c_int;
    fn modbus_set_slave(ctx: *mut modbus_t, slave: c_int) -> c_int;
    fn modbus_set_response_timeout(ctx: *mut modbus_t, to_sec: u32, to_usec: u32) -> c_int;
}

/// The system libmodbus library.
///
/// Every handle passed to this transport must have been allocated by it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Libmodbus;

impl Transport for Libmodbus {
    fn new_tcp(&self, address: Option<&CStr>, port: c_int) -> Option<Handle> {
        let ip_address = address.map_or(ptr::null(), CStr::as_ptr);
        // SAFETY: `ip_address` is null or a valid NUL-terminated string
        // that outlives the call.
        Handle::new(unsafe { modbus_new_tcp(ip_address, port) })
    }

    fn last_error(&self) -> c_int {
        io::Error::last_os_error().raw_os_error().unwrap_or(0)
    }

    fn strerror(&self, code: c_int) -> String {
        // SAFETY: libmodbus returns a pointer to a static string for every code.
        unsafe { CStr::from_ptr(modbus_strerror(code)) }
            .to_string_lossy()
            .into_owned()
    }

    fn free(&self, handle: Handle) {
        // SAFETY: The handle was allocated by `modbus_new_tcp` and is
        // released only once by its owning `Context`.
        unsafe { modbus_free(handle.as_ptr()) }
    }

    fn connect(&self, handle: Handle) -> c_int {
        // SAFETY: The handle is a live context.
        unsafe { modbus_connect(handle.as_ptr()) }
    }

    fn close(&self, handle: Handle) {
        // SAFETY: The handle is a live context, closing a closed context is a no-op.
        unsafe { modbus_close(handle.as_ptr()) }
    }

    fn read_registers(&self, handle: Handle, addr: c_int, nb: c_int, dest: &mut [Word]) -> c_int {
        debug_assert!(usize::try_from(nb).map_or(true, |nb| nb <= dest.len()));
        // SAFETY: The caller guarantees room for `nb` registers in `dest`.
        unsafe { modbus_read_registers(handle.as_ptr(), addr, nb, dest.as_mut_ptr()) }
    }

    fn read_input_registers(
        &self,
        handle: Handle,
        addr: c_int,
        nb: c_int,
        dest: &mut [Word],
    ) -> c_int {
        debug_assert!(usize::try_from(nb).map_or(true, |nb| nb <= dest.len()));
        // SAFETY: The caller guarantees room for `nb` registers in `dest`.
        unsafe { modbus_read_input_registers(handle.as_ptr(), addr, nb, dest.as_mut_ptr()) }
    }

    fn write_register(&self, handle: Handle, addr: c_int, value: Word) -> c_int {
        // SAFETY: The handle is a live context.
        unsafe { modbus_write_register(handle.as_ptr(), addr, value) }
    }

    fn write_registers(&self, handle: Handle, addr: c_int, values: &[Word]) -> c_int {
        let Ok(nb) = c_int::try_from(values.len()) else {
            return -1;
        };
        // SAFETY: `values` holds exactly `nb` registers.
        unsafe { modbus_write_registers(handle.as_ptr(), addr, nb, values.as_ptr()) }
    }

    fn set_debug(&self, handle: Handle, flag: bool) -> c_int {
        // SAFETY: The handle is a live context.
        unsafe { modbus_set_debug(handle.as_ptr(), c_int::from(flag)) }
    }

    fn set_slave(&self, handle: Handle, slave: c_int) -> c_int {
        // SAFETY: The handle is a live context.
        unsafe { modbus_set_slave(handle.as_ptr(), slave) }
    }

    fn set_response_timeout(&self, handle: Handle, sec: u32, usec: u32) -> c_int {
        // SAFETY: The handle is a live context.
        unsafe { modbus_set_response_timeout(handle.as_ptr(), sec, usec) }
    }
}

/// Allocates a libmodbus context for a Modbus TCP IPv4 server.
///
/// `None` listens on any address in server mode. Most servers listen on
/// [`TCP_DEFAULT_PORT`].
pub fn new_tcp(address: Option<&str>, port: u16) -> Result<Context<Libmodbus>> {
    Context::new_tcp(Libmodbus, address, port)
}

/// [`new_tcp`] on [`TCP_DEFAULT_PORT`].
pub fn new_tcp_default(address: Option<&str>) -> Result<Context<Libmodbus>> {
    new_tcp(address, TCP_DEFAULT_PORT)
}
