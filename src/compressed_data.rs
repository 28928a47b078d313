use std::fmt;
use std::io::Cursor;

use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;
use crate::metadata::{self, FLAG_EMPTY_INPUT, FORMAT_VERSION};

/// A self-contained compressed buffer: header metadata plus packed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressedData {
    /// The input had no bytes. Serializes to the version and flag bytes only.
    Empty,
    Packed {
        frequencies: FrequencyTable,
        /// Valid bits in `payload`; the rest of the last byte is padding.
        bit_count: u32,
        payload: Vec<u8>,
    },
}

impl CompressedData {
    pub fn serialize(&self) -> Result<Vec<u8>> {
        match self {
            CompressedData::Empty => {
                let mut bytes = Vec::with_capacity(metadata::PREAMBLE_LEN);
                metadata::write_preamble(&mut bytes, FLAG_EMPTY_INPUT)?;
                Ok(bytes)
            }
            CompressedData::Packed {
                frequencies,
                bit_count,
                payload,
            } => {
                let capacity = metadata::header_len(frequencies.distinct()) + payload.len();
                let mut bytes = Vec::with_capacity(capacity);
                metadata::write_preamble(&mut bytes, 0)?;
                metadata::write_frequency_table(&mut bytes, frequencies)?;
                metadata::write_bit_count(&mut bytes, *bit_count)?;
                bytes.extend_from_slice(payload);
                Ok(bytes)
            }
        }
    }

    /// Parse and validate everything that can be checked without decoding
    /// the payload.
    pub fn deserialize(bytes: &[u8]) -> Result<CompressedData> {
        let mut cursor = Cursor::new(bytes);

        let flags = metadata::read_preamble(&mut cursor)?;
        if flags & FLAG_EMPTY_INPUT != 0 {
            let trailing = bytes.len() - cursor.position() as usize;
            if trailing != 0 {
                return Err(HuffmanError::corrupt_header(format!(
                    "{trailing} bytes follow the empty-input marker"
                )));
            }
            return Ok(CompressedData::Empty);
        }

        let frequencies = metadata::read_frequency_table(&mut cursor)?;
        let bit_count = metadata::read_u32_le(&mut cursor, "payload bit count")?;

        // every symbol costs at least one bit
        let symbols = frequencies.total();
        if symbols > bit_count as u64 {
            return Err(HuffmanError::corrupt_header(format!(
                "{symbols} symbols cannot fit in {bit_count} payload bits"
            )));
        }

        let table = CodeTable::generate(&HuffmanTree::build(&frequencies)?);
        metadata::check_bit_count(&table, &frequencies, bit_count as u64)?;

        let payload = &bytes[cursor.position() as usize..];
        let expected_len = (bit_count as u64).div_ceil(8);
        let actual_len = payload.len() as u64;
        if actual_len < expected_len {
            return Err(HuffmanError::TruncatedPayload {
                expected_bits: bit_count as u64,
                available_bits: actual_len * 8,
            });
        }
        if actual_len > expected_len {
            return Err(HuffmanError::corrupt_header(format!(
                "{} bytes follow the {bit_count}-bit payload",
                actual_len - expected_len
            )));
        }

        Ok(CompressedData::Packed {
            frequencies,
            bit_count,
            payload: payload.to_vec(),
        })
    }

    /// Length of the input this container was produced from.
    pub fn original_length(&self) -> u64 {
        match self {
            CompressedData::Empty => 0,
            CompressedData::Packed { frequencies, .. } => frequencies.total(),
        }
    }

    pub fn summary(&self) -> ContainerSummary {
        match self {
            CompressedData::Empty => ContainerSummary {
                version: FORMAT_VERSION,
                empty_input: true,
                distinct_symbols: 0,
                original_length: 0,
                payload_bits: 0,
                payload_bytes: 0,
                container_bytes: metadata::PREAMBLE_LEN,
            },
            CompressedData::Packed {
                frequencies,
                bit_count,
                payload,
            } => ContainerSummary {
                version: FORMAT_VERSION,
                empty_input: false,
                distinct_symbols: frequencies.distinct(),
                original_length: frequencies.total(),
                payload_bits: *bit_count as u64,
                payload_bytes: payload.len(),
                container_bytes: metadata::header_len(frequencies.distinct()) + payload.len(),
            },
        }
    }
}

/// Size and shape figures for a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSummary {
    pub version: u8,
    pub empty_input: bool,
    pub distinct_symbols: usize,
    pub original_length: u64,
    pub payload_bits: u64,
    pub payload_bytes: usize,
    pub container_bytes: usize,
}

impl ContainerSummary {
    /// Container size over original size; 0.0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.original_length == 0 {
            0.0
        } else {
            self.container_bytes as f64 / self.original_length as f64
        }
    }
}

impl fmt::Display for ContainerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "format version:   {}", self.version)?;
        if self.empty_input {
            return writeln!(f, "empty input:      yes");
        }
        writeln!(f, "distinct symbols: {}", self.distinct_symbols)?;
        writeln!(f, "original length:  {} bytes", self.original_length)?;
        writeln!(
            f,
            "payload:          {} bits in {} bytes",
            self.payload_bits, self.payload_bytes
        )?;
        writeln!(
            f,
            "container size:   {} bytes ({:.1}% of original)",
            self.container_bytes,
            self.ratio() * 100.0
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn abacabad() -> CompressedData {
        CompressedData::Packed {
            frequencies: FrequencyTable::build(b"abacabad"),
            bit_count: 14,
            payload: vec![0x4C, 0x9C],
        }
    }

    #[test]
    fn test_empty_layout() {
        assert_eq!(CompressedData::Empty.serialize().unwrap(), vec![0x01, 0x01]);
        assert_eq!(
            CompressedData::deserialize(&[0x01, 0x01]).unwrap(),
            CompressedData::Empty
        );
    }

    #[test]
    fn test_packed_layout() {
        let bytes = abacabad().serialize().unwrap();
        assert_eq!(
            bytes,
            vec![
                1, 0, // version, flags
                4, 0, 0, 0, // symbol count
                b'a', 4, 0, 0, 0, //
                b'b', 2, 0, 0, 0, //
                b'c', 1, 0, 0, 0, //
                b'd', 1, 0, 0, 0, //
                14, 0, 0, 0, // payload bits
                0x4C, 0x9C,
            ]
        );
        assert_eq!(CompressedData::deserialize(&bytes).unwrap(), abacabad());
    }

    #[test]
    fn test_empty_marker_with_trailing_bytes() {
        assert!(matches!(
            CompressedData::deserialize(&[0x01, 0x01, 0x00]),
            Err(HuffmanError::CorruptHeader { .. })
        ));
    }

    #[test]
    fn test_missing_bit_count() {
        let bytes = [1, 0, 1, 0, 0, 0, b'A', 10, 0, 0, 0];
        let err = CompressedData::deserialize(&bytes).unwrap_err();
        assert_eq!(err.to_string(), "corrupt header: missing payload bit count");
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = abacabad().serialize().unwrap();
        bytes.pop();
        assert!(matches!(
            CompressedData::deserialize(&bytes),
            Err(HuffmanError::TruncatedPayload {
                expected_bits: 14,
                available_bits: 8
            })
        ));
    }

    #[test]
    fn test_trailing_payload_bytes() {
        let mut bytes = abacabad().serialize().unwrap();
        bytes.push(0);
        assert!(matches!(
            CompressedData::deserialize(&bytes),
            Err(HuffmanError::CorruptHeader { .. })
        ));
    }

    #[test]
    fn test_bit_count_disagreeing_with_codes() {
        let mut bytes = abacabad().serialize().unwrap();
        bytes[26] = 15;
        let err = CompressedData::deserialize(&bytes).unwrap_err();
        assert_eq!(
            err.to_string(),
            "corrupt header: frequencies require 14 payload bits, header declares 15"
        );
    }

    #[test]
    fn test_symbol_count_declared_too_low() {
        // three entries are read, then 'd' and its count are taken as the bit count
        let mut bytes = abacabad().serialize().unwrap();
        bytes[2] = 3;
        assert!(matches!(
            CompressedData::deserialize(&bytes),
            Err(HuffmanError::CorruptHeader { .. })
        ));
    }

    #[test]
    fn test_bit_count_below_symbol_count() {
        let bytes = [1, 0, 1, 0, 0, 0, b'A', 10, 0, 0, 0, 9, 0, 0, 0, 0, 0];
        assert!(matches!(
            CompressedData::deserialize(&bytes),
            Err(HuffmanError::CorruptHeader { .. })
        ));
    }

    #[test]
    fn test_summary() {
        let summary = abacabad().summary();
        assert_eq!(summary.distinct_symbols, 4);
        assert_eq!(summary.original_length, 8);
        assert_eq!(summary.payload_bits, 14);
        assert_eq!(summary.container_bytes, 32);
        assert_eq!(summary.container_bytes, abacabad().serialize().unwrap().len());
        assert_eq!(CompressedData::Empty.summary().container_bytes, 2);
        assert!(CompressedData::Empty.summary().to_string().contains("empty input"));
    }
}
