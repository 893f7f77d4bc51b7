use memchr::memmem::Finder;
use tracing::{debug, trace};

use super::buffer::ReadBuffer;
use crate::config::{BoundaryMode, ScanWindow};
use crate::error::Result;
use crate::signature::Signature;
use crate::source::RefillSource;

/// Lazy sequence of match offsets.
///
/// Each call to `next` refills the buffer as needed and yields the absolute
/// offset of the next match, in increasing order. A read error is yielded
/// once and ends the sequence; offsets yielded before it stay valid.
pub struct Matches<'a, S> {
    source: S,
    signature: &'a Signature,
    finder: Finder<'a>,
    window: ScanWindow,
    mode: BoundaryMode,
    buffer: ReadBuffer,
    /// Next refill address.
    address: u64,
    /// Distance between successive refill addresses.
    advance: u64,
    stride: usize,
    cursor: usize,
    limit: usize,
    loaded: bool,
    /// Candidates below this absolute address lie inside an already reported match.
    resume_at: u64,
    done: bool,
    refills: u64,
    bytes_read: u64,
}

impl<'a, S: RefillSource> Matches<'a, S> {
    pub(super) fn new(
        source: S,
        signature: &'a Signature,
        window: ScanWindow,
        mode: BoundaryMode,
        buffer_size: usize,
        first_address: u64,
    ) -> Self {
        let stride = window.stride();
        let advance = refill_advance(buffer_size, signature.len(), stride, mode);
        debug!(
            "Scanning 0x{:X}..0x{:X} from 0x{:X} (stride {}, advance {}, {:?})",
            window.start, window.end, first_address, stride, advance, mode
        );

        Self {
            source,
            signature,
            finder: signature.finder(),
            window,
            mode,
            buffer: ReadBuffer::new(buffer_size),
            address: first_address,
            advance,
            stride: usize::try_from(stride).unwrap_or(usize::MAX),
            cursor: 0,
            limit: 0,
            loaded: false,
            resume_at: 0,
            done: false,
            refills: 0,
            bytes_read: 0,
        }
    }

    /// Number of buffer refills performed so far.
    pub fn refills(&self) -> u64 {
        self.refills
    }

    /// Total bytes read from the source so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Give back the source, e.g. to inspect it after a scan.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Refill at the current address. Returns false when the scan is over.
    fn load(&mut self) -> Result<bool> {
        if self.address >= self.window.end {
            return Ok(false);
        }

        let n = self.buffer.refill(&mut self.source, self.address)?;
        self.refills += 1;
        self.bytes_read += n as u64;
        debug!("Refilled 0x{:X}: {} bytes", self.address, n);
        if n == 0 {
            return Ok(false);
        }

        self.cursor = 0;
        self.limit = self.candidate_limit();
        self.loaded = true;
        Ok(true)
    }

    /// Exclusive upper bound of candidate positions in the current buffer.
    ///
    /// A candidate must fit entirely inside both the valid bytes and the
    /// window end.
    fn candidate_limit(&self) -> usize {
        let len = self.signature.len() as u64;
        let base = self.buffer.base_address();
        let span = (self.buffer.valid_len() as u64).min(self.window.end.saturating_sub(base));
        if span < len {
            return 0;
        }

        let mut limit = span - len + 1;
        if self.mode == BoundaryMode::Overlap && self.buffer.is_full() {
            // Later candidates are covered by the next, overlapping refill.
            limit = limit.min(self.advance);
        }
        limit as usize
    }

    /// Move the cursor through the current buffer to the next match.
    ///
    /// Occurrences off the stride grid or inside an already reported match
    /// are stepped over.
    fn next_in_buffer(&mut self) -> Option<u64> {
        let base = self.buffer.base_address();
        let len = self.signature.len();
        if self.resume_at > base {
            let skip = usize::try_from(self.resume_at - base).unwrap_or(usize::MAX);
            self.cursor = self.cursor.max(align_up(skip, self.stride));
        }

        while self.cursor < self.limit {
            // Last candidate is `limit - 1`, so the haystack ends `len - 1` bytes after it.
            let haystack = &self.buffer.bytes()[self.cursor..self.limit - 1 + len];
            let Some(found) = self.finder.find(haystack) else {
                self.cursor = self.limit;
                break;
            };

            let pos = self.cursor + found;
            if pos % self.stride != 0 {
                self.cursor = align_up(pos, self.stride);
                continue;
            }

            let absolute = base + pos as u64;
            self.cursor = align_up(pos + len, self.stride);
            self.resume_at = absolute + len as u64;
            trace!("Match at 0x{:X}", absolute);
            return Some(absolute);
        }
        None
    }
}

impl<S: RefillSource> Iterator for Matches<'_, S> {
    type Item = Result<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if !self.loaded {
                match self.load() {
                    Ok(true) => {}
                    Ok(false) => {
                        self.done = true;
                        return None;
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }

            if let Some(offset) = self.next_in_buffer() {
                return Some(Ok(offset));
            }

            self.loaded = false;
            if self.mode == BoundaryMode::Overlap && !self.buffer.is_full() {
                // Short read: the input ended inside this buffer.
                self.done = true;
            }
            self.address = self.address.saturating_add(self.advance);
        }
    }
}

/// Smallest multiple of `stride` that is not below `pos`.
fn align_up(pos: usize, stride: usize) -> usize {
    pos.div_ceil(stride).saturating_mul(stride)
}

/// Distance between successive refill addresses.
///
/// Strict mode advances by the whole capacity. Overlap mode keeps the last
/// `signature_len - 1` bytes in view and stays on the stride grid.
pub(crate) fn refill_advance(
    capacity: usize,
    signature_len: usize,
    stride: u64,
    mode: BoundaryMode,
) -> u64 {
    let capacity = capacity as u64;
    match mode {
        BoundaryMode::Strict => capacity,
        BoundaryMode::Overlap => {
            let step = capacity.saturating_sub(signature_len.saturating_sub(1) as u64);
            (step - step % stride).max(stride)
        }
    }
}
