// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ownership-safe access to the [libmodbus](https://libmodbus.org) client API.
//!
//! The native library hands out raw context pointers and reports failures
//! through `errno`. This crate wraps both:
//!
//! - a [`Context`] exclusively owns a native context and releases it exactly
//!   once when dropped,
//! - a [`Connection`] owns a connected context, closes it when dropped and
//!   offers register I/O through the [`Reader`](client::Reader) and
//!   [`Writer`](client::Writer) traits,
//! - every failure is reported as one [`Error`] type carrying the native
//!   error code and its message.
//!
//! The native library is abstracted by the [`Transport`] trait. Enable the
//! `libmodbus` feature to link against the system library.
//!
//! ## Installation
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libmodbus-safe = { version = "*", features = ["libmodbus"] }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "libmodbus")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use libmodbus_safe::prelude::*;
//!
//! let context = libmodbus_safe::new_tcp(Some("192.168.0.222"), 502)?;
//! let mut connection = Connection::connect(context)?;
//! let word = read_register(&mut connection, 0x1000)?;
//! println!("high = {}, low = {}", get_high_byte(word), get_low_byte(word));
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "libmodbus"))]
//! # fn main() {}
//! ```

#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(unreachable_pub)]
#![warn(unsafe_op_in_unsafe_fn)]

pub mod prelude;

pub mod client;
pub mod codec;

mod connection;
pub use self::connection::Connection;

mod context;
pub use self::context::{set_debug, Context, TCP_DEFAULT_PORT};

mod error;
pub use self::error::{modbus_category, ConnectError, Error, ErrorCategory, Result};

mod frame;
pub use self::frame::{Address, FunctionCode, Quantity, Word};

mod slave;
pub use self::slave::{Slave, SlaveId};

mod transport;
pub use self::transport::{Handle, Transport};

#[cfg(feature = "libmodbus")]
mod ffi;
#[cfg(feature = "libmodbus")]
pub use self::ffi::{new_tcp, new_tcp_default, Libmodbus};
