//! File sources the scanner refills its buffer from.
//!
//! A source only has to fill a caller-provided buffer starting at an absolute
//! byte offset. Seekable files jump directly to the offset; pipes and stdin
//! are read forward and keep the bytes of their last fill so the scanner can
//! step back a little when scanning with overlapping windows.

mod file;
mod stream;

// Mock source for testing (always available for unit and integration tests)
#[doc(hidden)]
pub mod mock;

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub use file::SeekableSource;
pub use stream::StreamSource;

#[doc(hidden)]
pub use mock::{MockSource, MockSourceBuilder};

/// Size reported by sources that cannot tell how long they are.
///
/// An end address equal to this value means "scan until end of input".
pub const UNKNOWN_SIZE: u64 = u64::MAX;

/// Trait for anything the scanner can pull bytes from.
pub trait RefillSource {
    /// Total size in bytes, or [`UNKNOWN_SIZE`] for streams.
    fn size(&self) -> u64;

    /// Fill `buf` with bytes starting at the absolute `offset`.
    ///
    /// Returns the number of bytes written; 0 means end of input. Fewer than
    /// `buf.len()` bytes are only returned when input ends first. I/O errors
    /// surface as [`Error::ReadFailure`] carrying `offset`.
    fn refill(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize>;
}

impl<S: RefillSource + ?Sized> RefillSource for Box<S> {
    fn size(&self) -> u64 {
        (**self).size()
    }

    fn refill(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        (**self).refill(offset, buf)
    }
}

impl<S: RefillSource + ?Sized> RefillSource for &mut S {
    fn size(&self) -> u64 {
        (**self).size()
    }

    fn refill(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        (**self).refill(offset, buf)
    }
}

/// Where the bytes to scan come from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    /// Standard input, designated by `-` on the command line.
    #[default]
    Stdin,
    Path(PathBuf),
}

impl Input {
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "-"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Open the designated input for scanning.
///
/// Files that refuse to seek (FIFOs, character devices) are read as streams.
/// Streams keep `rewind` trailing bytes of each fill so refills may step back
/// that far.
pub fn open_source(input: &Input, rewind: usize) -> Result<Box<dyn RefillSource>> {
    let path = match input {
        Input::Stdin => {
            debug!("Reading from standard input");
            return Ok(Box::new(StreamSource::with_retain(io::stdin().lock(), rewind)));
        }
        Input::Path(path) => path,
    };

    let mut file = File::open(path).map_err(|source| Error::OpenFailed {
        path: path.display().to_string(),
        source,
    })?;

    match file.seek(SeekFrom::End(0)) {
        Ok(size) => {
            debug!("Opened {} ({} bytes)", path.display(), size);
            Ok(Box::new(SeekableSource::new(file, size)))
        }
        Err(e) => {
            debug!("{} is not seekable ({}), reading as a stream", path.display(), e);
            Ok(Box::new(StreamSource::with_retain(file, rewind)))
        }
    }
}

/// Read into `buf` until it is full or the reader reports end of input.
pub(crate) fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
