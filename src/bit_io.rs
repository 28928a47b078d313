use crate::code_table::Code;
use crate::error::{HuffmanError, Result};

/// Packs bits MSB-first into a growing byte buffer.
#[derive(Default, Debug)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bit_count: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter {
            bytes: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    pub fn write_bit(&mut self, bit: bool) {
        let bit_offset = (self.bit_count % 8) as u32; // position within the current byte

        // start a new byte on every 8-bit boundary
        if bit_offset == 0 {
            self.bytes.push(0);
        }

        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << (7 - bit_offset);
            }
        }

        self.bit_count += 1;
    }

    pub fn write_bits(&mut self, code: &Code) {
        for bit in code.bits() {
            self.write_bit(bit);
        }
    }

    /// Returns the packed bytes and the number of valid bits in the last
    /// byte (1..=8, or 0 if nothing was written). Unused low bits of the
    /// last byte are zero.
    pub fn finish(self) -> (Vec<u8>, u8) {
        let valid_in_last = match self.bit_count % 8 {
            0 if self.bit_count == 0 => 0,
            0 => 8,
            n => n as u8,
        };
        (self.bytes, valid_in_last)
    }
}

/// Reads bits MSB-first, refusing to go past the declared valid bit count.
#[derive(Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    total_bits: u64,
    position: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8], total_bits: u64) -> Self {
        BitReader {
            bytes,
            total_bits,
            position: 0,
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn remaining(&self) -> u64 {
        self.total_bits - self.position
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        if self.position >= self.total_bits {
            return Err(HuffmanError::EndOfStream {
                position: self.position,
            });
        }
        let byte = usize::try_from(self.position / 8)
            .ok()
            .and_then(|index| self.bytes.get(index))
            .ok_or(HuffmanError::EndOfStream {
                position: self.position,
            })?;
        let bit_offset = self.position % 8;
        self.position += 1;
        Ok((byte >> (7 - bit_offset)) & 1 == 1)
    }
}
