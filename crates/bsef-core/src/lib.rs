//! Binary signature finder core.
//!
//! Decodes a textual search parameter into a byte signature and streams a
//! file (or standard input) through a fixed-size buffer, reporting the
//! absolute offset of every occurrence inside an optional address range.

pub mod config;
pub mod error;
pub mod scan;
pub mod signature;
pub mod source;

pub use config::{BoundaryMode, ScanConfig, ScanWindow, StartPolicy};
pub use error::{Error, Result};
pub use scan::{Matches, ReadBuffer, ScanSummary, Scanner, scan, scan_input, scan_with};
pub use signature::{Encoding, Endianness, Signature};
pub use source::{Input, RefillSource, SeekableSource, StreamSource, UNKNOWN_SIZE, open_source};
