// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    collections::{HashMap, VecDeque},
    ffi::{c_int, CStr},
    sync::Mutex,
};

use libmodbus_safe::{Handle, Transport, Word};

/// Address of the first handle handed out by [`MockTransport`].
pub const HANDLE_ADDR: usize = 0x10;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn handle(addr: usize) -> Handle {
    Handle::from_addr(addr).unwrap()
}

/// Scripted outcome of the next fallible transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Set errno and report failure (`-1` or a null handle).
    Fail(c_int),
    /// Return this value (a handle address for `new_tcp`) without touching errno.
    Return(c_int),
}

/// A transport call as seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    NewTcp {
        address: Option<String>,
        port: c_int,
    },
    LastError,
    Strerror(c_int),
    Free(Handle),
    Connect(Handle),
    Close(Handle),
    ReadRegisters {
        handle: Handle,
        addr: c_int,
        nb: c_int,
    },
    ReadInputRegisters {
        handle: Handle,
        addr: c_int,
        nb: c_int,
    },
    WriteRegister {
        handle: Handle,
        addr: c_int,
        value: Word,
    },
    WriteRegisters {
        handle: Handle,
        addr: c_int,
        values: Vec<Word>,
    },
    SetDebug(Handle, bool),
    SetSlave(Handle, c_int),
    SetResponseTimeout(Handle, u32, u32),
}

#[derive(Debug, Default)]
struct State {
    errno: c_int,
    next_handle: usize,
    replies: VecDeque<Reply>,
    registers: HashMap<c_int, Word>,
    calls: Vec<Call>,
}

/// In-memory stand-in for libmodbus.
///
/// Without scripted replies every call succeeds: `new_tcp` hands out
/// handles starting at [`HANDLE_ADDR`], reads and writes go to an
/// in-memory register map.
#[derive(Debug)]
pub struct MockTransport {
    state: Mutex<State>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            state: Mutex::new(State {
                next_handle: HANDLE_ADDR,
                ..Default::default()
            }),
        }
    }
}

#[allow(dead_code)]
impl MockTransport {
    pub fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().replies.extend(replies);
        mock
    }

    pub fn push_reply(&self, reply: Reply) {
        self.state.lock().unwrap().replies.push_back(reply);
    }

    pub fn set_register(&self, addr: c_int, word: Word) {
        self.state.lock().unwrap().registers.insert(addr, word);
    }

    pub fn register(&self, addr: c_int) -> Option<Word> {
        self.state.lock().unwrap().registers.get(&addr).copied()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| pred(call))
            .count()
    }

    pub fn frees(&self, handle: Handle) -> usize {
        self.count(|call| *call == Call::Free(handle))
    }

    pub fn closes(&self, handle: Handle) -> usize {
        self.count(|call| *call == Call::Close(handle))
    }

    /// Records `call` and returns the scripted reply, if any.
    fn enter(&self, call: Call) -> Option<Reply> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        let reply = state.replies.pop_front();
        if let Some(Reply::Fail(errno)) = reply {
            state.errno = errno;
        }
        reply
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn status(&self, call: Call) -> c_int {
        match self.enter(call) {
            Some(Reply::Fail(_)) => -1,
            Some(Reply::Return(ret)) => ret,
            None => 0,
        }
    }

    fn read(&self, call: Call, addr: c_int, nb: c_int, dest: &mut [Word]) -> c_int {
        let reply = self.enter(call);
        let nb = match reply {
            Some(Reply::Fail(_)) => return -1,
            Some(Reply::Return(ret)) => ret,
            None => nb,
        };
        let state = self.state.lock().unwrap();
        for (offset, word) in (0..nb).zip(dest.iter_mut()) {
            *word = state.registers.get(&(addr + offset)).copied().unwrap_or(0);
        }
        nb
    }
}

impl Transport for MockTransport {
    fn new_tcp(&self, address: Option<&CStr>, port: c_int) -> Option<Handle> {
        let call = Call::NewTcp {
            address: address.map(|address| address.to_string_lossy().into_owned()),
            port,
        };
        match self.enter(call) {
            Some(Reply::Fail(_)) => None,
            Some(Reply::Return(addr)) => Handle::from_addr(usize::try_from(addr).ok()?),
            None => {
                let mut state = self.state.lock().unwrap();
                let addr = state.next_handle;
                state.next_handle += 0x10;
                Handle::from_addr(addr)
            }
        }
    }

    fn last_error(&self) -> c_int {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::LastError);
        state.errno
    }

    fn strerror(&self, code: c_int) -> String {
        self.record(Call::Strerror(code));
        match code {
            libc::EINVAL => "EINVAL".to_owned(),
            libc::ECONNREFUSED => "ECONNREFUSED".to_owned(),
            libc::ETIMEDOUT => "ETIMEDOUT".to_owned(),
            _ => "Unknown error".to_owned(),
        }
    }

    fn free(&self, handle: Handle) {
        self.record(Call::Free(handle));
    }

    fn connect(&self, handle: Handle) -> c_int {
        self.status(Call::Connect(handle))
    }

    fn close(&self, handle: Handle) {
        self.record(Call::Close(handle));
    }

    fn read_registers(&self, handle: Handle, addr: c_int, nb: c_int, dest: &mut [Word]) -> c_int {
        self.read(Call::ReadRegisters { handle, addr, nb }, addr, nb, dest)
    }

    fn read_input_registers(
        &self,
        handle: Handle,
        addr: c_int,
        nb: c_int,
        dest: &mut [Word],
    ) -> c_int {
        self.read(Call::ReadInputRegisters { handle, addr, nb }, addr, nb, dest)
    }

    fn write_register(&self, handle: Handle, addr: c_int, value: Word) -> c_int {
        match self.enter(Call::WriteRegister {
            handle,
            addr,
            value,
        }) {
            Some(Reply::Fail(_)) => -1,
            Some(Reply::Return(ret)) => ret,
            None => {
                self.set_register(addr, value);
                1
            }
        }
    }

    fn write_registers(&self, handle: Handle, addr: c_int, values: &[Word]) -> c_int {
        match self.enter(Call::WriteRegisters {
            handle,
            addr,
            values: values.to_vec(),
        }) {
            Some(Reply::Fail(_)) => -1,
            Some(Reply::Return(ret)) => ret,
            None => {
                for (offset, value) in (0..).zip(values) {
                    self.set_register(addr + offset, *value);
                }
                c_int::try_from(values.len()).unwrap()
            }
        }
    }

    fn set_debug(&self, handle: Handle, flag: bool) -> c_int {
        self.status(Call::SetDebug(handle, flag))
    }

    fn set_slave(&self, handle: Handle, slave: c_int) -> c_int {
        self.status(Call::SetSlave(handle, slave))
    }

    fn set_response_timeout(&self, handle: Handle, sec: u32, usec: u32) -> c_int {
        self.status(Call::SetResponseTimeout(handle, sec, usec))
    }
}
