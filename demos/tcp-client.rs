// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronous TCP client example

use std::time::Duration;

use libmodbus_safe::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut context = libmodbus_safe::new_tcp_default(Some("192.168.0.222"))?;
    context.set_response_timeout(Duration::from_secs(1))?;
    context.set_slave(Slave::tcp_device())?;

    println!("Connecting");
    let mut connection = Connection::connect(context)?;

    println!("Reading a holding register");
    let word = read_register(&mut connection, 0x1000)?;
    println!(
        "The register value is {word:#06X} (high byte {:#04X}, low byte {:#04X})",
        get_high_byte(word),
        get_low_byte(word)
    );

    println!("Writing the register");
    connection.write_register(0x1000, get_int16_from_int8(0x12, 0x34))?;

    let buff = connection.read_holding_registers(0x1000, 7)?;
    println!("Response is '{buff:?}'");

    println!("Disconnecting");
    let context = connection.close();
    drop(context);

    Ok(())
}
