use crate::error::Result;
use crate::source::RefillSource;

/// Fixed-capacity staging area for one window of the input.
#[derive(Debug)]
pub struct ReadBuffer {
    data: Box<[u8]>,
    valid: usize,
    base: u64,
}

impl ReadBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            valid: 0,
            base: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of bytes the last refill produced.
    pub fn valid_len(&self) -> usize {
        self.valid
    }

    /// Absolute offset of the first byte in the buffer.
    pub fn base_address(&self) -> u64 {
        self.base
    }

    /// Whether the last refill filled the whole capacity.
    pub fn is_full(&self) -> bool {
        self.valid == self.data.len()
    }

    /// The valid bytes of the last refill.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.valid]
    }

    /// Zero the buffer and repopulate it from `offset`.
    ///
    /// On error the buffer is left empty.
    pub fn refill<S: RefillSource + ?Sized>(&mut self, source: &mut S, offset: u64) -> Result<usize> {
        self.data.fill(0);
        self.valid = 0;
        self.base = offset;

        let n = source.refill(offset, &mut self.data)?;
        self.valid = n.min(self.data.len());
        Ok(self.valid)
    }
}
