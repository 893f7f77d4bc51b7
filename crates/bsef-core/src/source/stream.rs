use std::io::{self, Read};

use super::{RefillSource, UNKNOWN_SIZE, read_full};
use crate::error::{Error, Result};

/// Forward-only source for stdin, pipes and other unseekable input.
///
/// Jumps forward are served by discarding bytes. Up to `retain` trailing
/// bytes of the last fill are kept, so a refill may step back that far;
/// anything earlier fails with [`Error::Unseekable`].
#[derive(Debug)]
pub struct StreamSource<R> {
    inner: R,
    retain: usize,
    retained: Vec<u8>,
    retained_start: u64,
}

impl<R: Read> StreamSource<R> {
    /// Forward-only source that keeps nothing of previous fills.
    pub fn new(inner: R) -> Self {
        Self::with_retain(inner, 0)
    }

    /// Keep the last `retain` bytes of every fill for refills that step back.
    pub fn with_retain(inner: R, retain: usize) -> Self {
        Self {
            inner,
            retain,
            retained: Vec::with_capacity(retain),
            retained_start: 0,
        }
    }

    /// Number of bytes pulled from the underlying reader so far.
    pub fn consumed(&self) -> u64 {
        self.retained_start + self.retained.len() as u64
    }

    fn read_failure(offset: u64) -> impl FnOnce(io::Error) -> Error {
        move |source| Error::ReadFailure {
            address: offset,
            source,
        }
    }
}

impl<R: Read> RefillSource for StreamSource<R> {
    fn size(&self) -> u64 {
        UNKNOWN_SIZE
    }

    fn refill(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if offset < self.retained_start {
            return Err(Error::Unseekable {
                requested: offset,
                earliest: self.retained_start,
            });
        }

        let consumed = self.consumed();
        let mut filled = 0;

        if offset < consumed {
            let skip = (offset - self.retained_start) as usize;
            let tail = &self.retained[skip..];
            filled = tail.len().min(buf.len());
            buf[..filled].copy_from_slice(&tail[..filled]);
            if filled == buf.len() {
                // Served entirely from the retained bytes.
                return Ok(filled);
            }
        } else if offset > consumed {
            let gap = offset - consumed;
            let skipped = io::copy(&mut self.inner.by_ref().take(gap), &mut io::sink())
                .map_err(Self::read_failure(consumed))?;
            if skipped < gap {
                self.retained.clear();
                self.retained_start = consumed + skipped;
                return Ok(0);
            }
        }

        filled += read_full(&mut self.inner, &mut buf[filled..])
            .map_err(Self::read_failure(offset + filled as u64))?;

        let keep = self.retain.min(filled);
        self.retained.clear();
        self.retained.extend_from_slice(&buf[filled - keep..filled]);
        self.retained_start = offset + (filled - keep) as u64;

        Ok(filled)
    }
}
