use std::io::{Read, Seek, SeekFrom};

use super::{RefillSource, read_full};
use crate::error::{Error, Result};

/// Source backed by anything that can seek, usually a regular file.
#[derive(Debug)]
pub struct SeekableSource<R> {
    inner: R,
    size: u64,
}

impl<R: Read + Seek> SeekableSource<R> {
    pub fn new(inner: R, size: u64) -> Self {
        Self { inner, size }
    }
}

impl<R: Read + Seek> RefillSource for SeekableSource<R> {
    fn size(&self) -> u64 {
        self.size
    }

    fn refill(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        self.inner
            .seek(SeekFrom::Start(offset))
            .and_then(|_| read_full(&mut self.inner, buf))
            .map_err(|source| Error::ReadFailure {
                address: offset,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_reports_given_size() {
        let source = SeekableSource::new(Cursor::new(vec![0u8; 100]), 100);
        assert_eq!(source.size(), 100);
    }

    #[test]
    fn test_refill_at_offset() {
        let data: Vec<u8> = (0..32).collect();
        let mut source = SeekableSource::new(Cursor::new(data), 32);

        let mut buf = [0u8; 8];
        assert_eq!(source.refill(4, &mut buf).unwrap(), 8);
        assert_eq!(buf, [4, 5, 6, 7, 8, 9, 10, 11]);

        // Going backwards is fine on a seekable source.
        assert_eq!(source.refill(0, &mut buf).unwrap(), 8);
        assert_eq!(buf[0], 0);
    }

    #[test]
    fn test_refill_past_end() {
        let mut source = SeekableSource::new(Cursor::new(vec![1u8; 10]), 10);
        let mut buf = [0u8; 8];
        assert_eq!(source.refill(6, &mut buf).unwrap(), 4);
        assert_eq!(source.refill(10, &mut buf).unwrap(), 0);
        assert_eq!(source.refill(500, &mut buf).unwrap(), 0);
    }
}
