// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types and traits

///////////////////////////////////////////////////////////////////
/// Types
///////////////////////////////////////////////////////////////////
pub use crate::{Connection, Context, Error, Result};
pub use crate::{Slave, SlaveId};
pub use crate::{Address, Quantity, Word};

#[cfg(feature = "libmodbus")]
pub use crate::Libmodbus;

///////////////////////////////////////////////////////////////////
/// Traits
///////////////////////////////////////////////////////////////////
pub use crate::client::{Reader, Writer};
pub use crate::Transport;

///////////////////////////////////////////////////////////////////
/// Functions
///////////////////////////////////////////////////////////////////
pub use crate::client::read_register;
pub use crate::codec::{get_high_byte, get_int16_from_int8, get_low_byte};
