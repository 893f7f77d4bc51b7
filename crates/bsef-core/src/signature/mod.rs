//! Signature construction.
//!
//! Converts the user's search parameter into the exact byte sequence that is
//! compared against file contents. Raw hex text is decoded pair by pair and
//! then reordered according to the selected [`Endianness`]; ASCII text is
//! taken verbatim and endianness is not applied to it.

pub mod endian;
pub mod hex;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use memchr::memmem;
use strum::{Display, EnumString};

use crate::error::{Error, Result};

/// How the search parameter text is interpreted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// Two hex digits per byte.
    #[default]
    #[strum(serialize = "raw-hex")]
    RawHex,
    /// The characters of the text themselves.
    #[strum(serialize = "ascii")]
    Ascii,
}

impl Encoding {
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| Error::InvalidEncoding(name.to_string()))
    }
}

/// Byte-order rule applied to raw hex signatures.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
pub enum Endianness {
    #[default]
    #[strum(serialize = "little")]
    Little,
    #[strum(serialize = "big")]
    Big,
    /// Big endian within each 16-bit half-word, see [`endian::middle`].
    #[strum(serialize = "middle")]
    Middle,
}

impl Endianness {
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| Error::InvalidEndianness(name.to_string()))
    }

    /// Reorder bytes decoded in written order.
    pub fn apply(self, bytes: Vec<u8>) -> Vec<u8> {
        match self {
            Self::Little => endian::little(bytes),
            Self::Big => endian::big(bytes),
            Self::Middle => endian::middle(bytes),
        }
    }
}

/// The canonical byte sequence searched for. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    bytes: Box<[u8]>,
}

impl Signature {
    /// Decode a search parameter into a signature.
    ///
    /// # Example
    ///
    /// ```
    /// use bsef_core::signature::{Encoding, Endianness, Signature};
    ///
    /// let sig = Signature::decode(Encoding::RawHex, Endianness::Little, "DEADBEEF").unwrap();
    /// assert_eq!(sig.as_bytes(), &[0xEF, 0xBE, 0xAD, 0xDE]);
    /// ```
    pub fn decode(encoding: Encoding, endianness: Endianness, text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::EmptySignature);
        }

        let bytes = match encoding {
            Encoding::RawHex => {
                let len = text.len();
                if len % 2 != 0 {
                    return Err(Error::InvalidSignatureLength { len });
                }
                if endianness == Endianness::Middle && len % 4 != 0 {
                    return Err(Error::InvalidMiddleEndianLength { len });
                }
                endianness.apply(hex::decode_pairs(text)?)
            }
            Encoding::Ascii => text.as_bytes().to_vec(),
        };

        Self::from_bytes(bytes)
    }

    /// Wrap already-ordered bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::EmptySignature);
        }
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: construction rejects empty signatures.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Substring searcher for the signature bytes.
    pub fn finder(&self) -> memmem::Finder<'_> {
        memmem::Finder::new(&self.bytes)
    }

    /// Enforce the global signature size cap.
    pub fn check_max_len(&self, max: usize) -> Result<()> {
        if self.len() > max {
            return Err(Error::SignatureTooLong {
                len: self.len(),
                max,
            });
        }
        Ok(())
    }
}
