//! Byte-order transforms applied to decoded raw hex signatures.
//!
//! Each transform takes the bytes in the order their hex pairs were written
//! and returns them in the order they are expected to appear in the file.

/// Keep the written order.
pub fn big(bytes: Vec<u8>) -> Vec<u8> {
    bytes
}

/// Reverse the written order: the last hex pair becomes the first byte.
pub fn little(mut bytes: Vec<u8>) -> Vec<u8> {
    bytes.reverse();
    bytes
}

/// Swap each adjacent pair of bytes: `{0,1}` becomes `{1,0}`, `{2,3}` becomes `{3,2}`.
///
/// Half-words are not reordered relative to each other. A trailing odd byte
/// is left in place; the codec never produces one because middle endian text
/// must be a whole number of 32-bit words.
pub fn middle(mut bytes: Vec<u8>) -> Vec<u8> {
    for pair in bytes.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
    bytes
}
