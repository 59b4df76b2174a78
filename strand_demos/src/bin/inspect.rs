// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Prints the unit table of a compiled image.
//!
//! ```text
//! inspect [--w32] [IMAGE]
//! ```
//!
//! With no image path, a small built-in image is inspected instead.

use std::process::ExitCode;

use strand_runtime::IntWidth;
use strand_runtime::context::Config;
use strand_runtime::disasm::disassemble;
use strand_runtime::format::ImageBuilder;

fn builtin() -> Vec<u8> {
    let mut image = ImageBuilder::new(3);
    image
        .unit("main", 0, &[0x00])
        .unit("on_tick", 1, &[0x02, 0x00, 0x00])
        .unit("on_event", 2, &[0x01, 0x00]);
    image.finish()
}

fn main() -> ExitCode {
    let mut config = Config::default();
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--w32" => config.int_width = IntWidth::W32,
            "-h" | "--help" => {
                println!("usage: inspect [--w32] [IMAGE]");
                return ExitCode::SUCCESS;
            }
            _ => path = Some(arg),
        }
    }

    let bytes = match path {
        Some(path) => match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("inspect: cannot read {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => builtin(),
    };
    print!("{}", disassemble(&bytes, &config));
    ExitCode::SUCCESS
}
