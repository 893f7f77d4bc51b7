//! Match reporting on stdout.

use std::io::{self, Write};

use serde::Serialize;

#[derive(Serialize)]
struct MatchRecord {
    offset: u64,
}

/// Writes each match as soon as it is found.
pub struct MatchWriter<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> MatchWriter<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    /// Write one match. An error here should end the scan.
    pub fn emit(&mut self, offset: u64) -> io::Result<()> {
        if self.json {
            serde_json::to_writer(&mut self.out, &MatchRecord { offset })?;
            writeln!(self.out)
        } else {
            writeln!(self.out, "byte address {}: found signature", offset)
        }
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
