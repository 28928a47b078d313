//! Container header layout.
//!
//! ```text
//! byte 0      format version (1)
//! byte 1      flags, bit 0 = empty input
//! -- only when the input was not empty --
//! u32 LE      distinct symbol count S (1..=256)
//! S x         symbol (1 byte), frequency (u32 LE)
//! u32 LE      number of valid payload bits
//! ```

use std::io::{self, Read, Write};

use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

pub const FORMAT_VERSION: u8 = 1;
pub const FLAG_EMPTY_INPUT: u8 = 0b0000_0001;
pub const KNOWN_FLAGS: u8 = FLAG_EMPTY_INPUT;

/// Size of the version and flag bytes.
pub const PREAMBLE_LEN: usize = 2;
/// Size of one (symbol, frequency) entry.
pub const SYMBOL_ENTRY_LEN: usize = 5;

pub fn write_preamble<W: Write>(writer: &mut W, flags: u8) -> Result<()> {
    writer.write_all(&[FORMAT_VERSION, flags])?;
    Ok(())
}

pub fn read_preamble<R: Read>(reader: &mut R) -> Result<u8> {
    let mut preamble = [0u8; PREAMBLE_LEN];
    read_field(reader, &mut preamble, "version and flag bytes")?;
    let [version, flags] = preamble;

    if version != FORMAT_VERSION {
        return Err(HuffmanError::corrupt_header(format!(
            "unsupported format version {version}"
        )));
    }
    if flags & !KNOWN_FLAGS != 0 {
        return Err(HuffmanError::corrupt_header(format!(
            "unknown flag bits {:#010b}",
            flags & !KNOWN_FLAGS
        )));
    }
    Ok(flags)
}

/// Write the symbol count followed by each (symbol, frequency) pair in
/// ascending symbol order.
pub fn write_frequency_table<W: Write>(writer: &mut W, frequencies: &FrequencyTable) -> Result<()> {
    let distinct = frequencies.distinct() as u32;
    writer.write_all(&distinct.to_le_bytes())?;

    for (byte, count) in frequencies.iter() {
        let count = u32::try_from(count).map_err(|_| HuffmanError::InputTooLarge {
            len: frequencies.total(),
        })?;
        writer.write_all(&[byte])?;
        writer.write_all(&count.to_le_bytes())?;
    }
    Ok(())
}

pub fn read_frequency_table<R: Read>(reader: &mut R) -> Result<FrequencyTable> {
    let declared = read_u32_le(reader, "symbol count")?;
    if declared == 0 || declared > 256 {
        return Err(HuffmanError::corrupt_header(format!(
            "symbol count {declared} outside 1..=256"
        )));
    }

    let mut pairs = Vec::with_capacity(declared as usize);
    for index in 0..declared {
        let mut entry = [0u8; SYMBOL_ENTRY_LEN];
        read_field(reader, &mut entry, "symbol table entry").map_err(|_| {
            HuffmanError::corrupt_header(format!(
                "header declares {declared} symbols but only {index} entries are present"
            ))
        })?;
        let [byte, c0, c1, c2, c3] = entry;
        pairs.push((byte, u32::from_le_bytes([c0, c1, c2, c3]) as u64));
    }

    FrequencyTable::from_pairs(pairs)
}

pub fn write_bit_count<W: Write>(writer: &mut W, bit_count: u32) -> Result<()> {
    writer.write_all(&bit_count.to_le_bytes())?;
    Ok(())
}

pub fn read_u32_le<R: Read>(reader: &mut R, field: &str) -> Result<u32> {
    let mut bytes = [0u8; 4];
    read_field(reader, &mut bytes, field)?;
    Ok(u32::from_le_bytes(bytes))
}

/// `read_exact` with a short read reported as a corrupt header.
fn read_field<R: Read>(reader: &mut R, buf: &mut [u8], field: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => HuffmanError::corrupt_header(format!("missing {field}")),
        _ => HuffmanError::Io(e),
    })
}

/// The declared payload length must be exactly what the codes derived from
/// `frequencies` need.
pub fn check_bit_count(
    table: &CodeTable,
    frequencies: &FrequencyTable,
    bit_count: u64,
) -> Result<()> {
    let expected_bits = table.encoded_bit_len(frequencies);
    if expected_bits != bit_count {
        return Err(HuffmanError::corrupt_header(format!(
            "frequencies require {expected_bits} payload bits, header declares {bit_count}"
        )));
    }
    Ok(())
}

/// Encoded header size for `distinct` symbols, excluding payload.
pub fn header_len(distinct: usize) -> usize {
    PREAMBLE_LEN + 4 + distinct * SYMBOL_ENTRY_LEN + 4
}
