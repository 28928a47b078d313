use std::fmt;

use tracing::trace;

use crate::bit_io::BitReader;
use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

/// Index of a node in a `HuffmanTree` arena.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        byte: u8,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }
}

/// Priority queue entry. Node ids are handed out in insertion order (leaves
/// by ascending symbol, then internal nodes as they are merged), so ordering
/// by `(weight, node)` breaks weight ties deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    weight: u64,
    node: NodeId,
}

/// A Huffman tree stored as an arena of nodes addressed by `NodeId`.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<HuffNode>,
    root: NodeId,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::build(&FrequencyTable::build(bytes))
    }

    /// Greedy bottom-up construction: repeatedly merge the two lightest
    /// nodes until one remains. The first node extracted becomes the left
    /// (0) child.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }

        let symbols = frequencies.distinct();
        let mut nodes = Vec::with_capacity(2 * symbols - 1);
        let mut leaves = Vec::with_capacity(symbols);
        for (byte, weight) in frequencies.iter() {
            leaves.push(HeapEntry {
                weight,
                node: nodes.len(),
            });
            nodes.push(HuffNode::Leaf { weight, byte });
        }

        let mut heap = MinHeap::build(leaves)?;
        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;

            let merged = HeapEntry {
                weight: x.weight + y.weight,
                node: nodes.len(),
            };
            nodes.push(HuffNode::Internal {
                weight: merged.weight,
                left: x.node,
                right: y.node,
            });
            heap.insert(merged);
        }
        let root = heap.extract_min()?.node;

        trace!(symbols, nodes = nodes.len(), "built huffman tree");
        Ok(HuffmanTree { nodes, root })
    }

    /// Rebuild a decoding tree from code paths alone. Leaf weights are not
    /// recoverable from a code table and are left at zero.
    pub fn from_code_table(table: &CodeTable) -> Result<Self> {
        if table.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }

        if table.len() == 1 {
            let (byte, code) = table.iter().next().ok_or(HuffmanError::EmptyInput)?;
            if code.len() != 1 || code.bit(0) {
                return Err(HuffmanError::invalid_code_table(format!(
                    "lone symbol {byte} must have code 0, found {code}"
                )));
            }
            return Ok(HuffmanTree {
                nodes: vec![HuffNode::Leaf { weight: 0, byte }],
                root: 0,
            });
        }

        enum Slot {
            Leaf(u8),
            Branch([Option<NodeId>; 2]),
        }

        let mut slots = vec![Slot::Branch([None, None])];
        for (byte, code) in table.iter() {
            if code.is_empty() {
                return Err(HuffmanError::invalid_code_table(format!(
                    "symbol {byte} has an empty code"
                )));
            }
            let mut current = 0;
            let last = code.len() - 1;
            for (depth, bit) in code.bits().enumerate() {
                let side = bit as usize;
                let children = match &slots[current] {
                    Slot::Branch(children) => *children,
                    Slot::Leaf(other) => {
                        return Err(HuffmanError::invalid_code_table(format!(
                            "code of symbol {other} is a prefix of the code of symbol {byte}"
                        )));
                    }
                };
                let next = match children[side] {
                    Some(_) if depth == last => {
                        return Err(HuffmanError::invalid_code_table(format!(
                            "code {code} of symbol {byte} collides with another code"
                        )));
                    }
                    Some(next) => next,
                    None => {
                        let id = slots.len();
                        slots.push(if depth == last {
                            Slot::Leaf(byte)
                        } else {
                            Slot::Branch([None, None])
                        });
                        if let Slot::Branch(children) = &mut slots[current] {
                            children[side] = Some(id);
                        }
                        id
                    }
                };
                current = next;
            }
        }

        let nodes = slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Leaf(byte) => Ok(HuffNode::Leaf { weight: 0, byte }),
                Slot::Branch([Some(left), Some(right)]) => Ok(HuffNode::Internal {
                    weight: 0,
                    left,
                    right,
                }),
                Slot::Branch(_) => Err(HuffmanError::invalid_code_table(
                    "codes leave a branch with a missing child",
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(HuffmanTree { nodes, root: 0 })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffNode {
        &self.nodes[id]
    }

    /// Child reached from `id` by following `bit`, or `None` at a leaf.
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.nodes[id] {
            HuffNode::Leaf { .. } => None,
            HuffNode::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }

    pub fn is_single_leaf(&self) -> bool {
        matches!(self.nodes[self.root], HuffNode::Leaf { .. })
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, HuffNode::Leaf { .. }))
            .count()
    }

    /// Total weight, i.e. the number of symbols the tree was built from.
    pub fn weight(&self) -> u64 {
        self.nodes[self.root].weight()
    }

    /// Length of the longest root-to-leaf path. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                HuffNode::Leaf { .. } => max = max.max(depth),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max
    }

    /// Leaf weights collected back into a frequency table. Trees rebuilt
    /// from a code table carry no weights and are rejected.
    pub fn frequencies(&self) -> Result<FrequencyTable> {
        if self.weight() == 0 {
            return Err(HuffmanError::invalid_code_table(
                "tree was rebuilt from codes and carries no symbol weights",
            ));
        }
        let pairs = self.nodes.iter().filter_map(|node| match node {
            HuffNode::Leaf { byte, weight } => Some((*byte, *weight)),
            HuffNode::Internal { .. } => None,
        });
        FrequencyTable::from_pairs(pairs)
    }

    /// Walk from the root to a leaf, consuming one bit per edge. A lone
    /// leaf consumes exactly one `0` bit per symbol.
    pub(crate) fn decode_symbol(&self, reader: &mut BitReader<'_>) -> Result<u8> {
        if let HuffNode::Leaf { byte, .. } = self.nodes[self.root] {
            let bit_offset = reader.position();
            if reader.read_bit()? {
                return Err(HuffmanError::InvalidCode { bit_offset });
            }
            return Ok(byte);
        }

        let mut current = self.root;
        loop {
            match self.nodes[current] {
                HuffNode::Leaf { byte, .. } => return Ok(byte),
                HuffNode::Internal { left, right, .. } => {
                    current = if reader.read_bit()? { right } else { left };
                }
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Huffman Tree Structure:")?;
        let mut stack = vec![(self.root, 0usize, "root")];
        while let Some((id, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match self.nodes[id] {
                HuffNode::Leaf { byte, weight } => {
                    writeln!(
                        f,
                        "{}{}-> Leaf: '{}' ({}) [weight: {}]",
                        indent,
                        label,
                        (byte as char).escape_default(),
                        byte,
                        weight
                    )?;
                }
                HuffNode::Internal {
                    weight,
                    left,
                    right,
                } => {
                    writeln!(f, "{}{}-> Internal [weight: {}]", indent, label, weight)?;
                    stack.push((right, depth + 1, "R"));
                    stack.push((left, depth + 1, "L"));
                }
            }
        }
        Ok(())
    }
}
