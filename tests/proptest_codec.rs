//! Property-based tests for the Huffman codec.
//!
//! Properties:
//! - decompress(compress(x)) == x for arbitrary byte strings
//! - generated code tables are prefix-free
//! - the payload never exceeds 8 bits per input byte
//! - compression is deterministic

use proptest::prelude::*;

use huffpack::{CodeTable, CompressedData, FrequencyTable, HuffmanCodec, HuffmanTree};

/// Arbitrary bytes, uniformly distributed.
fn any_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..2048)
}

/// Bytes drawn from a small alphabet, giving skewed frequencies and deep trees.
fn skewed_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            8 => Just(b'e'),
            4 => Just(b't'),
            2 => Just(b'a'),
            1 => any::<u8>(),
        ],
        1..4096,
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_roundtrip(data in any_bytes()) {
        let bytes = HuffmanCodec::compress_to_vec(&data).unwrap();
        prop_assert_eq!(HuffmanCodec::decompress_from_slice(&bytes).unwrap(), data);
    }

    #[test]
    fn prop_roundtrip_skewed(data in skewed_bytes()) {
        let bytes = HuffmanCodec::compress_to_vec(&data).unwrap();
        prop_assert_eq!(HuffmanCodec::decompress_from_slice(&bytes).unwrap(), data);
    }

    #[test]
    fn prop_codes_prefix_free(data in skewed_bytes()) {
        let tree = HuffmanTree::from_bytes(&data).unwrap();
        let table = CodeTable::generate(&tree);
        prop_assert!(table.is_prefix_free());
        prop_assert_eq!(table.len(), FrequencyTable::build(&data).distinct());

        let codes: Vec<_> = table.iter().map(|(_, c)| c.clone()).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                prop_assert!(i == j || !a.is_prefix_of(b), "{} is a prefix of {}", a, b);
            }
        }
    }

    #[test]
    fn prop_payload_at_most_eight_bits_per_byte(data in any_bytes()) {
        match HuffmanCodec::compress(&data).unwrap() {
            CompressedData::Empty => prop_assert!(data.is_empty()),
            CompressedData::Packed { bit_count, payload, .. } => {
                prop_assert!(bit_count as usize <= 8 * data.len());
                prop_assert_eq!(payload.len(), (bit_count as usize).div_ceil(8));
            }
        }
    }

    #[test]
    fn prop_deterministic(data in skewed_bytes()) {
        prop_assert_eq!(
            HuffmanCodec::compress_to_vec(&data).unwrap(),
            HuffmanCodec::compress_to_vec(&data).unwrap()
        );
    }

    #[test]
    fn prop_code_table_tree_inverse(data in skewed_bytes()) {
        let table = CodeTable::generate(&HuffmanTree::from_bytes(&data).unwrap());
        let rebuilt = table.to_tree().unwrap();
        prop_assert_eq!(CodeTable::generate(&rebuilt), table);
    }

    #[test]
    fn prop_truncation_never_silent(data in skewed_bytes()) {
        let mut bytes = HuffmanCodec::compress_to_vec(&data).unwrap();
        bytes.pop();
        prop_assert!(HuffmanCodec::decompress_from_slice(&bytes).is_err());
    }
}
