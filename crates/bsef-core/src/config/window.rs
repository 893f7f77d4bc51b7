use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the first inspected address is derived from the start address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartPolicy {
    /// `start + (alignment % start)` when `start != 0`.
    ///
    /// This does not generally land on a multiple of the alignment. Existing
    /// result sets were produced with it, so it stays the default.
    #[default]
    Legacy,
    /// Round `start` up to the next multiple of the alignment.
    RoundUp,
}

impl StartPolicy {
    pub fn first_address(self, start: u64, alignment: u64) -> u64 {
        match self {
            Self::Legacy => {
                if start == 0 {
                    start
                } else {
                    start.saturating_add(alignment % start)
                }
            }
            Self::RoundUp => {
                if alignment <= 1 {
                    start
                } else {
                    start.saturating_add((alignment - start % alignment) % alignment)
                }
            }
        }
    }
}

/// Validated address range and stride of a scan.
///
/// `end` is exclusive and already resolved; [`crate::source::UNKNOWN_SIZE`]
/// means "until end of input".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWindow {
    pub start: u64,
    pub end: u64,
    pub alignment: u64,
}

impl ScanWindow {
    /// Validate a window.
    ///
    /// Alignment must be 0, 1 or even, the range must not be inverted and it
    /// must be at least one alignment stride long.
    pub fn new(start: u64, end: u64, alignment: u64) -> Result<Self> {
        if alignment > 1 && alignment % 2 != 0 {
            return Err(Error::InvalidAlignment(alignment));
        }
        if start > end {
            return Err(Error::InvalidAddressRange { start, end });
        }
        let range = end - start;
        if range < alignment {
            return Err(Error::RangeSmallerThanAlignment { alignment, range });
        }
        Ok(Self {
            start,
            end,
            alignment,
        })
    }

    /// Whole-file window with every byte as a candidate.
    pub fn whole(size: u64) -> Self {
        Self {
            start: 0,
            end: size,
            alignment: 0,
        }
    }

    /// Cursor advance between candidates; 0 and 1 both mean every byte.
    pub fn stride(&self) -> u64 {
        self.alignment.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_first_address() {
        assert_eq!(StartPolicy::Legacy.first_address(0, 4), 0);
        assert_eq!(StartPolicy::Legacy.first_address(10, 4), 14);
        assert_eq!(StartPolicy::Legacy.first_address(3, 8), 5);
        assert_eq!(StartPolicy::Legacy.first_address(8, 0), 8);
    }

    #[test]
    fn test_round_up_first_address() {
        assert_eq!(StartPolicy::RoundUp.first_address(0, 4), 0);
        assert_eq!(StartPolicy::RoundUp.first_address(10, 4), 12);
        assert_eq!(StartPolicy::RoundUp.first_address(12, 4), 12);
        assert_eq!(StartPolicy::RoundUp.first_address(3, 8), 8);
        assert_eq!(StartPolicy::RoundUp.first_address(7, 0), 7);
        assert_eq!(StartPolicy::RoundUp.first_address(7, 1), 7);
    }

    #[test]
    fn test_first_address_saturates() {
        assert_eq!(StartPolicy::RoundUp.first_address(u64::MAX - 1, 4), u64::MAX);
        assert_eq!(StartPolicy::Legacy.first_address(u64::MAX, 2), u64::MAX);
    }

    #[test]
    fn test_window_validation() {
        assert!(ScanWindow::new(0, 100, 0).is_ok());
        assert!(ScanWindow::new(0, 100, 1).is_ok());
        assert!(ScanWindow::new(0, 100, 4).is_ok());
        assert!(ScanWindow::new(0, 0, 0).is_ok());

        assert!(matches!(
            ScanWindow::new(0, 100, 3),
            Err(Error::InvalidAlignment(3))
        ));
        assert!(matches!(
            ScanWindow::new(50, 10, 0),
            Err(Error::InvalidAddressRange { start: 50, end: 10 })
        ));
        assert!(matches!(
            ScanWindow::new(10, 12, 4),
            Err(Error::RangeSmallerThanAlignment {
                alignment: 4,
                range: 2
            })
        ));
    }

    #[test]
    fn test_stride() {
        assert_eq!(ScanWindow::whole(10).stride(), 1);
        assert_eq!(ScanWindow::new(0, 10, 1).unwrap().stride(), 1);
        assert_eq!(ScanWindow::new(0, 10, 4).unwrap().stride(), 4);
    }
}
