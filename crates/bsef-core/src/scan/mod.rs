//! Windowed signature scanning.
//!
//! The input is streamed through a fixed-size [`ReadBuffer`]. Within each
//! refill a cursor walks the candidate positions at the configured stride and
//! compares the signature at each one. Matches are produced lazily, in file
//! order, as absolute byte offsets.

mod buffer;
mod matches;

pub use buffer::ReadBuffer;
pub use matches::Matches;

use matches::refill_advance;

use std::io;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BoundaryMode, ScanConfig, ScanWindow, StartPolicy, limits};
use crate::error::{Error, Result};
use crate::signature::Signature;
use crate::source::{RefillSource, open_source};

/// Builder for a single pass over a source.
///
/// # Example
///
/// ```
/// use bsef_core::config::ScanWindow;
/// use bsef_core::scan::Scanner;
/// use bsef_core::signature::Signature;
/// use bsef_core::source::MockSourceBuilder;
///
/// let source = MockSourceBuilder::new()
///     .with_size(64)
///     .write_bytes(10, &[0xDE, 0xAD])
///     .build();
/// let signature = Signature::from_bytes(vec![0xDE, 0xAD]).unwrap();
///
/// let offsets: Vec<u64> = Scanner::new(source, &signature, ScanWindow::whole(64))
///     .matches()
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(offsets, vec![10]);
/// ```
pub struct Scanner<'a, S> {
    source: S,
    signature: &'a Signature,
    window: ScanWindow,
    buffer_size: usize,
    boundary_mode: BoundaryMode,
    start_policy: StartPolicy,
}

impl<'a, S: RefillSource> Scanner<'a, S> {
    pub fn new(source: S, signature: &'a Signature, window: ScanWindow) -> Self {
        Self {
            source,
            signature,
            window,
            buffer_size: limits::DEFAULT_BUFFER_SIZE,
            boundary_mode: BoundaryMode::default(),
            start_policy: StartPolicy::default(),
        }
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn boundary_mode(mut self, mode: BoundaryMode) -> Self {
        self.boundary_mode = mode;
        self
    }

    pub fn start_policy(mut self, policy: StartPolicy) -> Self {
        self.start_policy = policy;
        self
    }

    /// Start the scan and return the lazy match sequence.
    pub fn matches(self) -> Result<Matches<'a, S>> {
        if self.buffer_size == 0 {
            return Err(Error::InvalidBufferSize(self.buffer_size));
        }
        if self.signature.len() > self.buffer_size {
            return Err(Error::SignatureExceedsBuffer {
                len: self.signature.len(),
                capacity: self.buffer_size,
            });
        }

        let first = self
            .start_policy
            .first_address(self.window.start, self.window.alignment);
        Ok(Matches::new(
            self.source,
            self.signature,
            self.window,
            self.boundary_mode,
            self.buffer_size,
            first,
        ))
    }

    /// Drain the scan, calling `on_match` for every offset as it is found.
    ///
    /// Returns the number of matches `on_match` accepted. On a read error,
    /// offsets already passed to `on_match` remain valid. The scan stops at
    /// the first error `on_match` returns, reported as
    /// [`Error::ReportFailed`].
    pub fn run<F: FnMut(u64) -> io::Result<()>>(self, on_match: F) -> Result<u64> {
        drain(&mut self.matches()?, on_match)
    }
}

/// Scan `source` for `signature` inside `window` with default settings.
pub fn scan<S, F>(source: S, signature: &Signature, window: ScanWindow, on_match: F) -> Result<u64>
where
    S: RefillSource,
    F: FnMut(u64) -> io::Result<()>,
{
    Scanner::new(source, signature, window).run(on_match)
}

/// Outcome of a completed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub matches: u64,
    pub window: ScanWindow,
    pub signature_len: usize,
    pub refills: u64,
    pub bytes_read: u64,
}

/// Run a whole scan from configuration: decode, open, validate, scan.
///
/// Configuration errors are reported before the input is read.
pub fn scan_input<F>(config: &ScanConfig, on_match: F) -> Result<ScanSummary>
where
    F: FnMut(u64) -> io::Result<()>,
{
    let signature = config.signature()?;
    debug!(
        "Signature: {} bytes ({}, {})",
        signature.len(),
        config.encoding,
        config.endianness
    );

    let source = open_source(&config.input, rewind_len(config, signature.len()))?;
    let window = config.resolve_window(source.size())?;
    scan_with(source, &signature, window, config, on_match)
}

/// Scan an already opened source using the settings of `config`.
pub fn scan_with<S, F>(
    source: S,
    signature: &Signature,
    window: ScanWindow,
    config: &ScanConfig,
    on_match: F,
) -> Result<ScanSummary>
where
    S: RefillSource,
    F: FnMut(u64) -> io::Result<()>,
{
    let mut matches = Scanner::new(source, signature, window)
        .buffer_size(config.buffer_size)
        .boundary_mode(config.boundary_mode)
        .start_policy(config.start_policy)
        .matches()?;

    let count = drain(&mut matches, on_match)?;
    debug!(
        "Scan finished: {} matches, {} bytes in {} refills",
        count,
        matches.bytes_read(),
        matches.refills()
    );

    Ok(ScanSummary {
        matches: count,
        window,
        signature_len: signature.len(),
        refills: matches.refills(),
        bytes_read: matches.bytes_read(),
    })
}

/// How far an overlapping refill steps back behind the previous fill.
fn rewind_len(config: &ScanConfig, signature_len: usize) -> usize {
    match config.boundary_mode {
        BoundaryMode::Strict => 0,
        BoundaryMode::Overlap => {
            let advance = refill_advance(
                config.buffer_size,
                signature_len,
                config.alignment.max(1),
                config.boundary_mode,
            );
            config
                .buffer_size
                .saturating_sub(usize::try_from(advance).unwrap_or(usize::MAX))
        }
    }
}

fn drain<S, F>(matches: &mut Matches<'_, S>, mut on_match: F) -> Result<u64>
where
    S: RefillSource,
    F: FnMut(u64) -> io::Result<()>,
{
    let mut count = 0;
    for offset in matches {
        let offset = offset?;
        on_match(offset).map_err(|source| Error::ReportFailed {
            address: offset,
            source,
        })?;
        count += 1;
    }
    Ok(count)
}
