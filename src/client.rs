// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronous register access

use crate::{
    error::Result,
    frame::{Address, Quantity, Word},
};

/// A transport independent synchronous reader trait.
pub trait Reader {
    /// Read `cnt` holding registers (0x03) starting at `addr` into `dest`.
    ///
    /// Returns the number of registers actually read. Fails with `EINVAL`
    /// if `dest` is shorter than `cnt`.
    fn read_registers(&mut self, addr: Address, cnt: Quantity, dest: &mut [Word]) -> Result<usize>;

    /// Read `cnt` input registers (0x04), same contract as
    /// [`Reader::read_registers`].
    fn read_input_registers(
        &mut self,
        addr: Address,
        cnt: Quantity,
        dest: &mut [Word],
    ) -> Result<usize>;

    /// Read multiple holding registers (0x03) into a new buffer.
    fn read_holding_registers(&mut self, addr: Address, cnt: Quantity) -> Result<Vec<Word>> {
        let mut words = vec![0; usize::from(cnt)];
        let read = self.read_registers(addr, cnt, &mut words)?;
        words.truncate(read);
        Ok(words)
    }
}

/// A transport independent synchronous writer trait.
pub trait Writer {
    /// Write a single holding register (0x06).
    fn write_register(&mut self, addr: Address, word: Word) -> Result<()>;

    /// Write multiple holding registers (0x10).
    fn write_registers(&mut self, addr: Address, words: &[Word]) -> Result<()>;
}

/// Read the content of a single holding register.
pub fn read_register<R>(reader: &mut R, addr: Address) -> Result<Word>
where
    R: Reader + ?Sized,
{
    let mut word = [0; 1];
    reader.read_registers(addr, 1, &mut word)?;
    Ok(word[0])
}
