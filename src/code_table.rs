use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};

/// A single prefix code: the left(0)/right(1) path from root to leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        Code {
            bits: bits.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bit(&self, index: usize) -> bool {
        self.bits[index]
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }

    fn with_bit(&self, bit: bool) -> Code {
        let mut bits = Vec::with_capacity(self.bits.len() + 1);
        bits.extend_from_slice(&self.bits);
        bits.push(bit);
        Code { bits }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping derived from a `HuffmanTree`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Depth-first walk over the tree with an explicit stack. Every leaf gets
    /// its path as a code; a lone leaf gets the code `0`.
    pub fn generate(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();

        if let HuffNode::Leaf { byte, .. } = *tree.node(tree.root()) {
            codes.insert(byte, Code::from_bits([false]));
            return CodeTable { codes };
        }

        let mut stack = vec![(tree.root(), Code::default())];
        while let Some((id, code)) = stack.pop() {
            match *tree.node(id) {
                HuffNode::Leaf { byte, .. } => {
                    codes.insert(byte, code);
                }
                HuffNode::Internal { left, right, .. } => {
                    stack.push((right, code.with_bit(true)));
                    stack.push((left, code.with_bit(false)));
                }
            }
        }

        CodeTable { codes }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&byte, code)| (byte, code))
    }

    /// No code is a prefix of another. After sorting, any prefix is
    /// immediately followed by one of its extensions, so checking adjacent
    /// pairs suffices.
    pub fn is_prefix_free(&self) -> bool {
        let mut sorted: Vec<&Code> = self.codes.values().collect();
        sorted.sort();
        sorted.windows(2).all(|pair| !pair[0].is_prefix_of(pair[1]))
    }

    /// Number of payload bits needed to encode input with these counts.
    /// Symbols without a code contribute nothing.
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .filter_map(|(byte, count)| self.get(byte).map(|code| count * code.len() as u64))
            .sum()
    }

    pub fn to_tree(&self) -> Result<HuffmanTree> {
        HuffmanTree::from_code_table(self)
    }
}

impl FromIterator<(u8, Code)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (u8, Code)>>(iter: I) -> Self {
        CodeTable {
            codes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::HuffmanError;

    fn code(s: &str) -> Code {
        Code::from_bits(s.chars().map(|c| c == '1'))
    }

    fn rendered(table: &CodeTable) -> Vec<(u8, String)> {
        table.iter().map(|(b, c)| (b, c.to_string())).collect()
    }

    #[test]
    fn test_abacabad_codes() {
        let tree = HuffmanTree::from_bytes(b"abacabad").unwrap();
        let table = CodeTable::generate(&tree);
        assert_eq!(
            rendered(&table),
            vec![
                (b'a', "0".to_string()),
                (b'b', "10".to_string()),
                (b'c', "110".to_string()),
                (b'd', "111".to_string()),
            ]
        );
        assert_eq!(table.encoded_bit_len(&FrequencyTable::build(b"abacabad")), 14);
    }

    #[test]
    fn test_single_symbol_gets_zero() {
        let tree = HuffmanTree::from_bytes(b"AAAAAAAAAA").unwrap();
        let table = CodeTable::generate(&tree);
        assert_eq!(rendered(&table), vec![(b'A', "0".to_string())]);
        assert_eq!(table.encoded_bit_len(&FrequencyTable::build(b"AAAAAAAAAA")), 10);
    }

    #[test]
    fn test_all_bytes_uniform_is_eight_bits() {
        let data: Vec<u8> = (0..=255).collect();
        let table = CodeTable::generate(&HuffmanTree::from_bytes(&data).unwrap());
        assert_eq!(table.len(), 256);
        assert!(table.iter().all(|(_, c)| c.len() == 8));
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_skewed_codes_are_prefix_free() {
        let mut data = Vec::new();
        for (i, byte) in (b'a'..=b'p').enumerate() {
            data.extend(std::iter::repeat(byte).take(1 << i.min(12)));
        }
        let table = CodeTable::generate(&HuffmanTree::from_bytes(&data).unwrap());
        assert_eq!(table.len(), 16);
        assert!(table.is_prefix_free());
        assert!(table.get(b'p').unwrap().len() < table.get(b'a').unwrap().len());
    }

    #[test]
    fn test_prefix_check_detects_violation() {
        let table: CodeTable = [(1, code("0")), (2, code("01")), (3, code("1"))]
            .into_iter()
            .collect();
        assert!(!table.is_prefix_free());
        assert!(matches!(
            table.to_tree(),
            Err(HuffmanError::InvalidCodeTable { .. })
        ));
    }

    #[test]
    fn test_incomplete_table_rejected() {
        let table: CodeTable = [(1, code("0")), (2, code("10"))].into_iter().collect();
        assert!(table.is_prefix_free());
        assert!(matches!(
            table.to_tree(),
            Err(HuffmanError::InvalidCodeTable { .. })
        ));
    }

    #[test]
    fn test_to_tree_round_trip() {
        let table: CodeTable = [(7, code("00")), (8, code("01")), (9, code("1"))]
            .into_iter()
            .collect();
        let tree = table.to_tree().unwrap();
        assert_eq!(CodeTable::generate(&tree), table);
    }
}
