use crate::error::{HuffmanError, Result};

/// Occurrence count for each of the 256 byte values.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable { counts: [0; 256] }
    }

    /// Count every byte of `bytes` in a single pass.
    pub fn build(bytes: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in bytes {
            counts[byte as usize] += 1;
        }
        FrequencyTable { counts }
    }

    /// Build a table from `(symbol, count)` pairs read out of a container
    /// header. Duplicate symbols and zero counts are rejected, and counts are
    /// limited to the header's 32-bit field so tree weights and payload
    /// lengths cannot overflow.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut counts = [0u64; 256];
        for (symbol, count) in pairs {
            if count == 0 {
                return Err(HuffmanError::corrupt_header(format!(
                    "symbol {symbol} has a zero frequency"
                )));
            }
            if count > u32::MAX as u64 {
                return Err(HuffmanError::InputTooLarge { len: count });
            }
            if counts[symbol as usize] != 0 {
                return Err(HuffmanError::corrupt_header(format!(
                    "symbol {symbol} listed more than once"
                )));
            }
            counts[symbol as usize] = count;
        }
        Ok(FrequencyTable { counts })
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of symbols with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c != 0).count()
    }

    /// Sum of all counts, equal to the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Non-zero entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0..=u8::MAX)
            .zip(self.counts.iter().copied())
            .filter(|&(_, count)| count != 0)
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
