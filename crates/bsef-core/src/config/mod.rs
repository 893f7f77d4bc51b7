//! Scan configuration.
//!
//! This module contains the resolved configuration handed over by the command
//! line layer, plus the validation that turns it into a signature and a
//! [`ScanWindow`]:
//! - `ScanConfig` - everything a scan needs, immutable once built
//! - `ScanWindow` / `StartPolicy` - validated address range and stride
//! - Buffer and signature size limits

mod window;

pub use window::*;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::signature::{Encoding, Endianness, Signature};
use crate::source::Input;

/// Size limits. The two values are independent of each other.
pub mod limits {
    /// Default capacity of the scan buffer (32 KiB).
    pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

    /// Largest accepted signature in bytes (32 KiB).
    pub const MAX_SIGNATURE_LEN: usize = 32 * 1024;
}

/// What happens to matches that straddle two buffer refills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryMode {
    /// Refills advance by the full buffer capacity; straddling matches are not found.
    #[default]
    Strict,
    /// Refills overlap by `signature_len - 1` bytes so straddling matches are found once.
    Overlap,
}

/// Fully resolved scan configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub encoding: Encoding,
    pub endianness: Endianness,
    /// Search parameter text, decoded according to `encoding`.
    pub pattern: String,
    pub start: u64,
    /// Exclusive end address; `None` scans to the end of the input.
    pub end: Option<u64>,
    pub alignment: u64,
    pub input: Input,
    pub buffer_size: usize,
    pub max_signature_len: usize,
    pub start_policy: StartPolicy,
    pub boundary_mode: BoundaryMode,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::default(),
            endianness: Endianness::default(),
            pattern: String::new(),
            start: 0,
            end: None,
            alignment: 0,
            input: Input::default(),
            buffer_size: limits::DEFAULT_BUFFER_SIZE,
            max_signature_len: limits::MAX_SIGNATURE_LEN,
            start_policy: StartPolicy::default(),
            boundary_mode: BoundaryMode::default(),
        }
    }
}

impl ScanConfig {
    pub fn new(pattern: impl Into<String>, input: Input) -> Self {
        Self {
            pattern: pattern.into(),
            input,
            ..Self::default()
        }
    }

    /// Decode the search parameter and check it against the size limits.
    pub fn signature(&self) -> Result<Signature> {
        if self.buffer_size == 0 {
            return Err(Error::InvalidBufferSize(self.buffer_size));
        }

        let signature = Signature::decode(self.encoding, self.endianness, &self.pattern)?;
        signature.check_max_len(self.max_signature_len)?;
        if signature.len() > self.buffer_size {
            return Err(Error::SignatureExceedsBuffer {
                len: signature.len(),
                capacity: self.buffer_size,
            });
        }
        Ok(signature)
    }

    /// Validate the address range against the input size.
    ///
    /// A missing end address resolves to `file_size`, which for streams is
    /// [`crate::source::UNKNOWN_SIZE`].
    pub fn resolve_window(&self, file_size: u64) -> Result<ScanWindow> {
        ScanWindow::new(self.start, self.end.unwrap_or(file_size), self.alignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::UNKNOWN_SIZE;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.encoding, Encoding::RawHex);
        assert_eq!(config.endianness, Endianness::Little);
        assert_eq!(config.input, Input::Stdin);
        assert_eq!(config.buffer_size, 32768);
        assert_eq!(config.max_signature_len, 32768);
        assert_eq!(config.boundary_mode, BoundaryMode::Strict);
        assert_eq!(config.start_policy, StartPolicy::Legacy);
    }

    #[test]
    fn test_signature_limits() {
        let mut config = ScanConfig::new("AABBCCDD", Input::Stdin);
        assert_eq!(config.signature().unwrap().len(), 4);

        config.max_signature_len = 2;
        assert!(matches!(
            config.signature(),
            Err(Error::SignatureTooLong { len: 4, max: 2 })
        ));

        config.max_signature_len = limits::MAX_SIGNATURE_LEN;
        config.buffer_size = 3;
        assert!(matches!(
            config.signature(),
            Err(Error::SignatureExceedsBuffer {
                len: 4,
                capacity: 3
            })
        ));

        config.buffer_size = 0;
        assert!(matches!(
            config.signature(),
            Err(Error::InvalidBufferSize(0))
        ));
    }

    #[test]
    fn test_resolve_window_defaults_to_file_size() {
        let config = ScanConfig::new("00", Input::Stdin);
        let window = config.resolve_window(4096).unwrap();
        assert_eq!(window.start, 0);
        assert_eq!(window.end, 4096);

        let window = config.resolve_window(UNKNOWN_SIZE).unwrap();
        assert_eq!(window.end, UNKNOWN_SIZE);
    }

    #[test]
    fn test_resolve_window_explicit_end() {
        let config = ScanConfig {
            start: 16,
            end: Some(8),
            ..ScanConfig::new("00", Input::Stdin)
        };
        assert!(matches!(
            config.resolve_window(4096),
            Err(Error::InvalidAddressRange { start: 16, end: 8 })
        ));
    }
}
