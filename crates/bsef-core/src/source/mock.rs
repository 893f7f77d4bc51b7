//! Mock source for testing
//!
//! Provides a configurable in-memory implementation of the RefillSource trait
//! so scanner logic can be exercised without touching the filesystem.

use std::io;

use crate::error::{Error, Result};
use crate::source::{RefillSource, UNKNOWN_SIZE};

/// Mock source for testing
///
/// Serves refills from an in-memory buffer and records every requested
/// offset, so tests can assert on the scanner's refill pattern.
#[derive(Debug, Clone)]
pub struct MockSource {
    data: Vec<u8>,
    fail_from: Option<u64>,
    size_known: bool,
    refills: Vec<u64>,
}

impl MockSource {
    /// Create a new mock source over the given bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            fail_from: None,
            size_known: true,
            refills: Vec::new(),
        }
    }

    /// Offsets of every refill requested so far, in order
    pub fn refills(&self) -> &[u64] {
        &self.refills
    }

    /// Get the size of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl RefillSource for MockSource {
    fn size(&self) -> u64 {
        if self.size_known {
            self.data.len() as u64
        } else {
            UNKNOWN_SIZE
        }
    }

    fn refill(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        self.refills.push(offset);

        if let Some(fail_from) = self.fail_from {
            if offset >= fail_from {
                return Err(Error::ReadFailure {
                    address: offset,
                    source: io::Error::other(format!(
                        "Injected failure (fail_from=0x{:X})",
                        fail_from
                    )),
                });
            }
        }

        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        if start >= self.data.len() {
            return Ok(0);
        }
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }
}

/// Builder for creating test sources
///
/// Provides a fluent API for laying out file contents for testing.
#[derive(Debug, Clone)]
pub struct MockSourceBuilder {
    data: Vec<u8>,
    fail_from: Option<u64>,
    size_known: bool,
}

impl Default for MockSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSourceBuilder {
    /// Create a new empty builder
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            fail_from: None,
            size_known: true,
        }
    }

    /// Pre-allocate the file with zeros up to the specified size
    pub fn with_size(mut self, size: usize) -> Self {
        self.data.resize(size, 0);
        self
    }

    /// Fill the whole file (as sized so far) with one byte value
    pub fn fill(mut self, value: u8) -> Self {
        self.data.fill(value);
        self
    }

    /// Write raw bytes at the specified offset
    pub fn write_bytes(mut self, offset: usize, bytes: &[u8]) -> Self {
        self.ensure_size(offset + bytes.len());
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    /// Write ASCII text at the specified offset (no terminator)
    pub fn write_ascii(self, offset: usize, text: &str) -> Self {
        self.write_bytes(offset, text.as_bytes())
    }

    /// Make every refill at or beyond `offset` fail
    pub fn fail_reads_from(mut self, offset: u64) -> Self {
        self.fail_from = Some(offset);
        self
    }

    /// Report the size as unknown, like a pipe
    pub fn unknown_size(mut self) -> Self {
        self.size_known = false;
        self
    }

    /// Build the MockSource
    pub fn build(self) -> MockSource {
        MockSource {
            data: self.data,
            fail_from: self.fail_from,
            size_known: self.size_known,
            refills: Vec::new(),
        }
    }

    fn ensure_size(&mut self, required: usize) {
        if self.data.len() < required {
            self.data.resize(required, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_basic() {
        let mut source = MockSource::new(vec![1, 2, 3, 4, 5]);
        let mut buf = [0u8; 3];

        assert_eq!(source.refill(1, &mut buf).unwrap(), 3);
        assert_eq!(buf, [2, 3, 4]);
        assert_eq!(source.refill(4, &mut buf).unwrap(), 1);
        assert_eq!(source.refill(5, &mut buf).unwrap(), 0);
        assert_eq!(source.refills(), &[1, 4, 5]);
    }

    #[test]
    fn test_builder_layout() {
        let source = MockSourceBuilder::new()
            .with_size(8)
            .fill(0xFF)
            .write_bytes(2, &[0xDE, 0xAD])
            .write_ascii(10, "hi")
            .build();

        assert_eq!(source.len(), 12);
        assert_eq!(
            source.data,
            vec![0xFF, 0xFF, 0xDE, 0xAD, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, b'h', b'i']
        );
    }

    #[test]
    fn test_injected_failure() {
        let mut source = MockSourceBuilder::new()
            .with_size(16)
            .fail_reads_from(8)
            .build();
        let mut buf = [0u8; 4];

        assert!(source.refill(4, &mut buf).is_ok());
        assert!(matches!(
            source.refill(8, &mut buf),
            Err(Error::ReadFailure { address: 8, .. })
        ));
    }

    #[test]
    fn test_unknown_size() {
        let source = MockSourceBuilder::new().with_size(4).unknown_size().build();
        assert_eq!(source.size(), UNKNOWN_SIZE);
        assert!(!source.is_empty());
    }
}
