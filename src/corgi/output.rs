/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::io::{self, Error, Write};

use crate::corgi::error::BenchResult;

enum Destination<'a> {
    Console,
    Buffer(&'a mut Vec<u8>),
}

/// Line-oriented output sink: stdout for the binary, an in-memory buffer
/// for tests and library callers.
pub struct Output<'a> {
    destination: Destination<'a>,
}

impl<'a> Output<'a> {
    pub fn console() -> Output<'a> {
        Output {
            destination: Destination::Console,
        }
    }

    pub fn string(text: &'a mut Vec<u8>) -> Output<'a> {
        Output {
            destination: Destination::Buffer(text),
        }
    }

    pub fn print(&mut self, text: &str) -> BenchResult<()> {
        if let Destination::Console = self.destination {
            println!("{}", text);
            return Ok(());
        }
        self.write_all(text.as_bytes())?;
        self.write_all(b"\n")?;
        self.flush()?;
        Ok(())
    }
}

impl<'a> Write for Output<'a> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        match &mut self.destination {
            Destination::Console => io::stdout().write(buf),
            Destination::Buffer(buffer) => buffer.write(buf),
        }
    }

    fn flush(&mut self) -> Result<(), Error> {
        match &mut self.destination {
            Destination::Console => io::stdout().flush(),
            Destination::Buffer(buffer) => buffer.flush(),
        }
    }
}
