// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types.

use std::{ffi::c_int, fmt, io, ptr};

use thiserror::Error;

use crate::{context::Context, transport::Transport};

/// The error domain of native Modbus error codes.
///
/// There is exactly one instance per process, see [`modbus_category()`].
/// Two categories compare equal only if they are the same object.
pub struct ErrorCategory {
    name: &'static str,
}

static MODBUS_CATEGORY: ErrorCategory = ErrorCategory { name: "modbus" };

/// The Modbus error category singleton.
#[must_use]
pub fn modbus_category() -> &'static ErrorCategory {
    &MODBUS_CATEGORY
}

impl ErrorCategory {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Textual description of `code` as provided by `transport`.
    ///
    /// Unknown codes yield whatever fallback text the transport uses.
    pub fn message<T>(&self, transport: &T, code: c_int) -> String
    where
        T: Transport + ?Sized,
    {
        transport.strerror(code)
    }
}

impl PartialEq for ErrorCategory {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for ErrorCategory {}

impl fmt::Debug for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorCategory").field(&self.name).finish()
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A failed native Modbus call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{category}: {message}")]
pub struct Error {
    category: &'static ErrorCategory,
    code: c_int,
    message: String,
}

impl Error {
    /// Builds an error for `code`, resolving the message through `transport`.
    pub fn from_code<T>(transport: &T, code: c_int) -> Self
    where
        T: Transport + ?Sized,
    {
        let category = modbus_category();
        let message = category.message(transport, code);
        Self {
            category,
            code,
            message,
        }
    }

    /// Captures the last error code of `transport`.
    ///
    /// Must be invoked right after the failing call. The code is read
    /// before the message is looked up, so the lookup cannot clobber it.
    pub fn last<T>(transport: &T) -> Self
    where
        T: Transport + ?Sized,
    {
        let code = transport.last_error();
        Self::from_code(transport, code)
    }

    /// Contract violation detected before reaching the transport.
    pub(crate) fn invalid_argument<T>(transport: &T) -> Self
    where
        T: Transport + ?Sized,
    {
        Self::from_code(transport, libc::EINVAL)
    }

    #[must_use]
    pub fn category(&self) -> &'static ErrorCategory {
        self.category
    }

    /// The native error code.
    #[must_use]
    pub fn code(&self) -> c_int {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The closest [`io::ErrorKind`] of the native code.
    ///
    /// Codes outside the errno range (libmodbus protocol errors) map
    /// to [`io::ErrorKind::Other`].
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self.code {
            libc::EINVAL => io::ErrorKind::InvalidInput,
            libc::ETIMEDOUT => io::ErrorKind::TimedOut,
            libc::ECONNREFUSED => io::ErrorKind::ConnectionRefused,
            libc::ECONNRESET => io::ErrorKind::ConnectionReset,
            libc::EPIPE => io::ErrorKind::BrokenPipe,
            libc::ENOMEM => io::ErrorKind::OutOfMemory,
            _ => io::ErrorKind::Other,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        io::Error::new(err.kind(), err)
    }
}

/// Specialized [`std::result::Result`] type for native Modbus calls.
pub type Result<T> = std::result::Result<T, Error>;

/// A failed [`Connection::connect`](crate::Connection::connect).
///
/// The connection never took ownership of the context, so it is handed
/// back unchanged. Dropping this error releases the context.
#[derive(Error)]
#[error("{error}")]
pub struct ConnectError<T: Transport> {
    #[source]
    error: Error,
    context: Context<T>,
}

impl<T: Transport> ConnectError<T> {
    pub(crate) fn new(error: Error, context: Context<T>) -> Self {
        Self { error, context }
    }

    #[must_use]
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// The context that was passed to `connect`.
    #[must_use]
    pub fn context(&self) -> &Context<T> {
        &self.context
    }

    /// Gives back the context for a retry or a different use.
    #[must_use]
    pub fn into_context(self) -> Context<T> {
        self.context
    }

    #[must_use]
    pub fn into_parts(self) -> (Error, Context<T>) {
        (self.error, self.context)
    }
}

impl<T: Transport> fmt::Debug for ConnectError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectError")
            .field("error", &self.error)
            .field("context", &self.context)
            .finish()
    }
}

impl<T: Transport> From<ConnectError<T>> for Error {
    fn from(err: ConnectError<T>) -> Self {
        err.error
    }
}
