// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connected contexts

use std::{ffi::c_int, fmt, mem};

use crate::{
    client::{Reader, Writer},
    context::Context,
    error::{ConnectError, Error, Result},
    frame::{Address, FunctionCode, Quantity, Word},
    transport::{Handle, Transport},
};

/// A [`Context`] that has completed the connect handshake.
///
/// Dropping a connection closes it and then releases the context.
/// [`Connection::close`] closes it but hands the context back instead.
/// Register I/O is available through the [`Reader`] and [`Writer`] traits.
pub struct Connection<T: Transport> {
    context: Context<T>,
}

impl<T: Transport> Connection<T> {
    /// Establishes a connection to a Modbus server using the context
    /// information of `context`.
    ///
    /// On success the connection takes ownership of `context`. On failure
    /// ownership stays with the caller and the context is returned
    /// untouched inside the [`ConnectError`].
    pub fn connect(context: Context<T>) -> std::result::Result<Self, ConnectError<T>> {
        let handle = match context.valid_handle() {
            Ok(handle) => handle,
            Err(err) => return Err(ConnectError::new(err, context)),
        };
        if context.transport().connect(handle) != 0 {
            let err = Error::last(context.transport());
            return Err(ConnectError::new(err, context));
        }
        log::debug!("Connected {handle:?}");
        Ok(Self { context })
    }

    /// Whether the connection has been closed and holds no context.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.context.is_empty()
    }

    fn handle(&self) -> Result<Handle> {
        self.context.valid_handle()
    }

    fn transport(&self) -> &T {
        self.context.transport()
    }

    fn read_with(
        &mut self,
        function: FunctionCode,
        addr: Address,
        cnt: Quantity,
        dest: &mut [Word],
    ) -> Result<usize> {
        let handle = self.handle()?;
        let transport = self.transport();
        if dest.len() < usize::from(cnt) {
            return Err(Error::invalid_argument(transport));
        }
        log::trace!("Call {function} addr={addr} cnt={cnt}");
        let (addr, nb) = (c_int::from(addr), c_int::from(cnt));
        let read = match function {
            FunctionCode::ReadInputRegisters => {
                transport.read_input_registers(handle, addr, nb, dest)
            }
            _ => transport.read_registers(handle, addr, nb, dest),
        };
        usize::try_from(read).map_err(|_| Error::last(transport))
    }
}

impl<T: Transport + Clone> Connection<T> {
    /// Closes the connection and returns the previously owned context.
    ///
    /// Closing an already closed connection returns an empty context
    /// without calling into the transport again.
    pub fn close(&mut self) -> Context<T> {
        let empty = Context::empty(self.context.transport().clone());
        let context = mem::replace(&mut self.context, empty);
        if let Some(handle) = context.as_raw() {
            context.transport().close(handle);
            log::debug!("Closed {handle:?}");
        }
        context
    }
}

impl<T: Transport> Reader for Connection<T> {
    fn read_registers(&mut self, addr: Address, cnt: Quantity, dest: &mut [Word]) -> Result<usize> {
        self.read_with(FunctionCode::ReadHoldingRegisters, addr, cnt, dest)
    }

    fn read_input_registers(
        &mut self,
        addr: Address,
        cnt: Quantity,
        dest: &mut [Word],
    ) -> Result<usize> {
        self.read_with(FunctionCode::ReadInputRegisters, addr, cnt, dest)
    }
}

impl<T: Transport> Writer for Connection<T> {
    fn write_register(&mut self, addr: Address, word: Word) -> Result<()> {
        let handle = self.handle()?;
        let transport = self.transport();
        log::trace!("Call {} addr={addr}", FunctionCode::WriteSingleRegister);
        if transport.write_register(handle, c_int::from(addr), word) != 1 {
            return Err(Error::last(transport));
        }
        Ok(())
    }

    fn write_registers(&mut self, addr: Address, words: &[Word]) -> Result<()> {
        let handle = self.handle()?;
        let transport = self.transport();
        let Ok(cnt) = c_int::try_from(words.len()) else {
            return Err(Error::invalid_argument(transport));
        };
        log::trace!(
            "Call {} addr={addr} cnt={cnt}",
            FunctionCode::WriteMultipleRegisters
        );
        if transport.write_registers(handle, c_int::from(addr), words) != cnt {
            return Err(Error::last(transport));
        }
        Ok(())
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.context.as_raw() {
            self.context.transport().close(handle);
            log::debug!("Closed {handle:?} on drop");
        }
    }
}

impl<T: Transport> fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("context", &self.context)
            .finish()
    }
}
