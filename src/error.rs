//! Error types for compression and decompression.

use thiserror::Error;

use crate::min_heap::HeapErr;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Debug, Error)]
pub enum HuffmanError {
    /// No symbols to build a tree from. Compression handles this case
    /// itself and emits an empty container instead.
    #[error("cannot build a Huffman tree from empty input")]
    EmptyInput,

    /// Container metadata is malformed or inconsistent.
    #[error("corrupt header: {reason}")]
    CorruptHeader { reason: String },

    /// The payload holds fewer bits than the header declares.
    #[error(
        "truncated payload: header declares {expected_bits} bits, only {available_bits} present"
    )]
    TruncatedPayload {
        expected_bits: u64,
        available_bits: u64,
    },

    /// A bit was requested past the end of a `BitReader`.
    #[error("bit stream exhausted at bit {position}")]
    EndOfStream { position: u64 },

    /// A bit sequence that no symbol's code starts with.
    #[error("invalid code at bit offset {bit_offset}")]
    InvalidCode { bit_offset: u64 },

    #[error("decoded {actual} bytes, header declares {expected}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("invalid code table: {reason}")]
    InvalidCodeTable { reason: String },

    /// Input or payload does not fit in the container's 32-bit fields.
    #[error("input of {len} bytes is too large for the container format")]
    InputTooLarge { len: u64 },

    #[error("priority queue error: {0}")]
    Heap(#[from] HeapErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    pub fn corrupt_header(reason: impl Into<String>) -> Self {
        HuffmanError::CorruptHeader {
            reason: reason.into(),
        }
    }

    pub fn invalid_code_table(reason: impl Into<String>) -> Self {
        HuffmanError::InvalidCodeTable {
            reason: reason.into(),
        }
    }

    /// True for errors caused by a malformed container rather than by the
    /// caller or the environment.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            HuffmanError::CorruptHeader { .. }
                | HuffmanError::TruncatedPayload { .. }
                | HuffmanError::InvalidCode { .. }
                | HuffmanError::LengthMismatch { .. }
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_messages() {
        let err = HuffmanError::TruncatedPayload {
            expected_bits: 14,
            available_bits: 8,
        };
        assert_eq!(
            err.to_string(),
            "truncated payload: header declares 14 bits, only 8 present"
        );
        assert_eq!(
            HuffmanError::corrupt_header("bad version 7").to_string(),
            "corrupt header: bad version 7"
        );
    }

    #[test]
    fn test_corrupt_input_classification() {
        assert!(HuffmanError::corrupt_header("x").is_corrupt_input());
        assert!(HuffmanError::InvalidCode { bit_offset: 3 }.is_corrupt_input());
        assert!(!HuffmanError::EmptyInput.is_corrupt_input());
        assert!(!HuffmanError::InputTooLarge { len: 1 }.is_corrupt_input());
    }
}
