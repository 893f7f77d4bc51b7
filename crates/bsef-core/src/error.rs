use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid encoding: {0} (expected raw-hex or ascii)")]
    InvalidEncoding(String),

    #[error("Invalid endianness: {0} (expected little, big or middle)")]
    InvalidEndianness(String),

    #[error("Signature is empty")]
    EmptySignature,

    #[error("Invalid raw hex signature length: {len} characters (must be even)")]
    InvalidSignatureLength { len: usize },

    #[error(
        "Invalid raw hex signature length when using middle endian mode: {len} characters (must be a multiple of 4)"
    )]
    InvalidMiddleEndianLength { len: usize },

    #[error("Invalid raw hex character {ch:?} at position {position}")]
    InvalidHexCharacter { ch: char, position: usize },

    #[error("Signature is {len} bytes, maximum is {max}")]
    SignatureTooLong { len: usize, max: usize },

    #[error("Signature is {len} bytes but the scan buffer only holds {capacity}")]
    SignatureExceedsBuffer { len: usize, capacity: usize },

    #[error("Invalid alignment: {0} (must be 0, 1 or even)")]
    InvalidAlignment(u64),

    #[error("End byte address {end:#x} is before start byte address {start:#x}")]
    InvalidAddressRange { start: u64, end: u64 },

    #[error("Alignment {alignment} is larger than the scanned range of {range} bytes")]
    RangeSmallerThanAlignment { alignment: u64, range: u64 },

    #[error("Invalid buffer size: {0}")]
    InvalidBufferSize(usize),

    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read at byte address {address:#x}: {source}")]
    ReadFailure {
        address: u64,
        #[source]
        source: io::Error,
    },

    #[error("Cannot rewind stream to byte address {requested:#x} (earliest retained is {earliest:#x})")]
    Unseekable { requested: u64, earliest: u64 },

    #[error("Failed to report match at byte address {address:#x}: {source}")]
    ReportFailed {
        address: u64,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Whether the error was caused by the scan configuration rather than by I/O.
    pub fn is_config_error(&self) -> bool {
        !matches!(
            self,
            Self::OpenFailed { .. }
                | Self::ReadFailure { .. }
                | Self::Unseekable { .. }
                | Self::ReportFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
