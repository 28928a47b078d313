use std::io::{Read, Write};

use tracing::debug;

use crate::bit_io::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::compressed_data::CompressedData;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;
use crate::metadata;

/// Stateless Huffman compressor. Each call builds and drops its own tree
/// and code table; everything the decoder needs travels in the container.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec;

impl HuffmanCodec {
    pub fn compress(data: &[u8]) -> Result<CompressedData> {
        let frequencies = FrequencyTable::build(data);
        if frequencies.is_empty() {
            debug!("empty input, emitting empty-input container");
            return Ok(CompressedData::Empty);
        }

        let too_large = || HuffmanError::InputTooLarge {
            len: data.len() as u64,
        };
        u32::try_from(data.len()).map_err(|_| too_large())?;

        let tree = HuffmanTree::build(&frequencies)?;
        let table = CodeTable::generate(&tree);
        let bit_count =
            u32::try_from(table.encoded_bit_len(&frequencies)).map_err(|_| too_large())?;

        let mut writer = BitWriter::new();
        for &byte in data {
            let code = table.get(byte).ok_or_else(|| {
                HuffmanError::invalid_code_table(format!("byte {byte} not in encode table"))
            })?;
            writer.write_bits(code);
        }
        debug_assert_eq!(writer.bit_count(), bit_count as u64);
        let (payload, _) = writer.finish();

        debug!(
            input_bytes = data.len(),
            symbols = table.len(),
            tree_depth = tree.depth(),
            payload_bits = bit_count,
            payload_bytes = payload.len(),
            "compressed"
        );

        Ok(CompressedData::Packed {
            frequencies,
            bit_count,
            payload,
        })
    }

    pub fn decompress(compressed: &CompressedData) -> Result<Vec<u8>> {
        let (frequencies, bit_count, payload) = match compressed {
            CompressedData::Empty => return Ok(Vec::new()),
            CompressedData::Packed {
                frequencies,
                bit_count,
                payload,
            } => (frequencies, *bit_count as u64, payload.as_slice()),
        };

        let tree = HuffmanTree::build(frequencies)?;
        let table = CodeTable::generate(&tree);

        // containers built in memory skip deserialize, so check again
        metadata::check_bit_count(&table, frequencies, bit_count)?;
        let available_bits = payload.len() as u64 * 8;
        if available_bits < bit_count {
            return Err(HuffmanError::TruncatedPayload {
                expected_bits: bit_count,
                available_bits,
            });
        }

        let expected_len = frequencies.total();
        let mut result = Vec::with_capacity(expected_len as usize);
        let mut reader = BitReader::new(payload, bit_count);
        while reader.remaining() > 0 {
            let byte = tree.decode_symbol(&mut reader).map_err(|e| match e {
                HuffmanError::EndOfStream { position } => HuffmanError::TruncatedPayload {
                    expected_bits: bit_count,
                    available_bits: position,
                },
                other => other,
            })?;
            result.push(byte);
        }

        if result.len() as u64 != expected_len {
            return Err(HuffmanError::LengthMismatch {
                expected: expected_len,
                actual: result.len() as u64,
            });
        }

        debug!(
            output_bytes = result.len(),
            symbols = table.len(),
            payload_bits = bit_count,
            "decompressed"
        );
        Ok(result)
    }

    /// Compress and serialize in one step.
    pub fn compress_to_vec(data: &[u8]) -> Result<Vec<u8>> {
        Self::compress(data)?.serialize()
    }

    /// Parse a serialized container and decompress it.
    pub fn decompress_from_slice(bytes: &[u8]) -> Result<Vec<u8>> {
        Self::decompress(&CompressedData::deserialize(bytes)?)
    }

    /// Read all of `input`, compress it and write the container to `output`.
    pub fn encode_from_file<R: Read, W: Write>(mut input: R, mut output: W) -> Result<()> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        output.write_all(&Self::compress_to_vec(&data)?)?;
        output.flush()?;
        Ok(())
    }

    /// Read a whole container from `input` and write the original bytes to
    /// `output`.
    pub fn decode_from_file<R: Read, W: Write>(mut input: R, mut output: W) -> Result<()> {
        let mut encoded = Vec::new();
        input.read_to_end(&mut encoded)?;
        output.write_all(&Self::decompress_from_slice(&encoded)?)?;
        output.flush()?;
        Ok(())
    }
}
