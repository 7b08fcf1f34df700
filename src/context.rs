// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owned native contexts

use std::{
    ffi::{c_int, CString},
    fmt,
    time::Duration,
};

use crate::{
    error::{Error, Result},
    slave::Slave,
    transport::{Handle, Transport},
};

/// The default TCP port of a Modbus server.
pub const TCP_DEFAULT_PORT: u16 = 502;

/// Exclusively owned native Modbus context.
///
/// The handle is released through [`Transport::free`] exactly once, when
/// the owning `Context` is dropped. An empty context (see
/// [`Context::is_empty`]) releases nothing.
pub struct Context<T: Transport> {
    transport: T,
    handle: Option<Handle>,
}

impl<T: Transport> Context<T> {
    /// Allocates a context for a Modbus TCP IPv4 server.
    ///
    /// With `address` set to `None` the context listens on any address
    /// in server mode.
    pub fn new_tcp(transport: T, address: Option<&str>, port: u16) -> Result<Self> {
        let address = match address.map(CString::new).transpose() {
            Ok(address) => address,
            Err(_) => return Err(Error::invalid_argument(&transport)),
        };
        let Some(handle) = transport.new_tcp(address.as_deref(), c_int::from(port)) else {
            return Err(Error::last(&transport));
        };
        log::debug!("Allocated TCP context {handle:?} for port {port}");
        Ok(Self {
            transport,
            handle: Some(handle),
        })
    }

    /// Takes ownership of a handle that has been allocated by `transport`.
    ///
    /// # Safety
    ///
    /// `handle` must be a live context of `transport` that no one else
    /// owns. It will be released when the returned context is dropped.
    pub unsafe fn from_raw(transport: T, handle: Handle) -> Self {
        Self {
            transport,
            handle: Some(handle),
        }
    }

    pub(crate) fn empty(transport: T) -> Self {
        Self {
            transport,
            handle: None,
        }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The owned handle without giving up ownership.
    #[must_use]
    pub fn as_raw(&self) -> Option<Handle> {
        self.handle
    }

    /// Gives up ownership of the handle. The caller becomes responsible
    /// for releasing it.
    #[must_use]
    pub fn into_raw(mut self) -> Option<Handle> {
        self.handle.take()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
    }

    /// Enables or disables verbose tracing of the native library.
    ///
    /// When enabled, the transport prints the bytes of every Modbus
    /// message on stdout and stderr.
    pub fn set_debug(&mut self, flag: bool) -> Result<()> {
        let handle = self.valid_handle()?;
        if self.transport.set_debug(handle, flag) != 0 {
            return Err(Error::last(&self.transport));
        }
        Ok(())
    }

    /// Selects the slave device for all subsequent requests.
    pub fn set_slave(&mut self, slave: Slave) -> Result<()> {
        let handle = self.valid_handle()?;
        if self.transport.set_slave(handle, c_int::from(slave.0)) != 0 {
            return Err(Error::last(&self.transport));
        }
        log::debug!("Selected slave {slave}");
        Ok(())
    }

    /// Sets how long to wait for a response before failing with a timeout.
    ///
    /// The native library rejects a zero timeout.
    pub fn set_response_timeout(&mut self, timeout: Duration) -> Result<()> {
        let handle = self.valid_handle()?;
        let Ok(sec) = u32::try_from(timeout.as_secs()) else {
            return Err(Error::invalid_argument(&self.transport));
        };
        let usec = timeout.subsec_micros();
        if self.transport.set_response_timeout(handle, sec, usec) != 0 {
            return Err(Error::last(&self.transport));
        }
        Ok(())
    }

    pub(crate) fn valid_handle(&self) -> Result<Handle> {
        self.handle
            .ok_or_else(|| Error::invalid_argument(&self.transport))
    }
}

impl<T: Transport> Drop for Context<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.transport.free(handle);
        }
    }
}

impl<T: Transport> fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// Enables or disables verbose tracing of `context`.
pub fn set_debug<T: Transport>(context: &mut Context<T>, flag: bool) -> Result<()> {
    context.set_debug(flag)
}
