// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walks through the native boundary: a host function, a user-data record, and script writes
//! landing directly in host memory.

use strand_runtime::access::{field_get, field_set, index_get, index_set};
use strand_runtime::context::{CallFrame, Config, Context};
use strand_runtime::format::ImageBuilder;
use strand_runtime::native::{HostBuffer, HostValue, NativeCall, Natives, UserData};
use strand_runtime::{ScriptError, Value};

fn main() -> Result<(), ScriptError> {
    // Host-owned storage.
    let samples = HostBuffer::new(vec![0_u16; 4]);
    let status = HostValue::new(Value::from("idle"));

    let device = UserData::new();
    device
        .add_value("name", Value::from("probe-1"))
        .add_array("samples", &samples)
        .add_host_value("status", &status);
    let handle = device.to_value();

    let mut natives = Natives::new();
    natives.register(
        "device",
        move |call: &mut NativeCall<'_>| -> Result<(), ScriptError> {
            *call.ret = handle.clone();
            Ok(())
        },
    );
    natives.register(
        "log",
        |call: &mut NativeCall<'_>| -> Result<(), ScriptError> {
            let parts: Vec<String> = call.args.iter().map(ToString::to_string).collect();
            println!("  script log: {}", parts.join(" "));
            Ok(())
        },
    );

    let mut image = ImageBuilder::new(0);
    image.unit("sample", 2, &[0x00]);
    let bytes = image.finish();
    let mut ctx = Context::load(&bytes, &Config::default())?;

    // A hand-written executor standing in for a compiled `sample(index, reading)` body:
    //   let d = device(); d.samples[index] = reading; d.status = "busy"; log(d.name, reading)
    let mut exec = |mut frame: CallFrame<'_>| -> Result<Value, ScriptError> {
        let mut d = frame.call_native("device", &[])?;
        let mut view = field_get(&d, "samples")?;
        index_set(&mut view, &frame.args[0], frame.args[1].clone())?;
        field_set(&mut d, "status", Value::from("busy"))?;
        let name = field_get(&d, "name")?;
        frame.call_native("log", &[name, frame.args[1].clone()])?;
        index_get(&view, &frame.args[0])
    };

    println!("host before: samples={:?} status={}", samples.to_vec(), status.get());
    for (i, reading) in [(0, 17), (2, 70_000)] {
        let stored = ctx.call(
            &mut natives,
            &mut exec,
            "sample",
            &[Value::Int(i), Value::Int(reading)],
        )?;
        println!("  stored {reading} at [{i}] -> reads back {stored}");
    }
    println!("host after:  samples={:?} status={}", samples.to_vec(), status.get());

    drop(samples);
    let dangling = field_get(&device.to_value(), "samples")?;
    match index_get(&dangling, &Value::Int(0)) {
        Err(err) => println!("after the host drops the buffer: {err}"),
        Ok(v) => println!("unexpected read: {v}"),
    }
    Ok(())
}
