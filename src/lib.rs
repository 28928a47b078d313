//! # huffpack
//!
//! Static Huffman compression for byte buffers, with a self-describing
//! container: the symbol frequencies travel in the header, so decompression
//! needs nothing but the compressed bytes.
//!
//! ## Quick Start
//!
//! ```rust
//! let input = b"abracadabra, abracadabra";
//!
//! let container = huffpack::compress(input)?;
//! let bytes = container.serialize()?;
//!
//! let parsed = huffpack::CompressedData::deserialize(&bytes)?;
//! assert_eq!(huffpack::decompress(&parsed)?, input);
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```
//!
//! Files or other streams go through [`HuffmanCodec::encode_from_file`] and
//! [`HuffmanCodec::decode_from_file`], which buffer the whole input.

pub mod code_table;
pub mod compressed_data;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;

// Internal modules - not part of public API
mod bit_io;
mod min_heap;

// Re-export main types for convenience
pub use code_table::{Code, CodeTable};
pub use compressed_data::{CompressedData, ContainerSummary};
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::HuffmanCodec;
pub use hufftree::HuffmanTree;
pub use min_heap::HeapErr;

/// Compress `data` into a container. See [`HuffmanCodec::compress`].
pub fn compress(data: &[u8]) -> Result<CompressedData> {
    HuffmanCodec::compress(data)
}

/// Recover the original bytes from a container. See
/// [`HuffmanCodec::decompress`].
pub fn decompress(compressed: &CompressedData) -> Result<Vec<u8>> {
    HuffmanCodec::decompress(compressed)
}
