//! # Itemset-Tree Wire Format
//!
//! All integers are big-endian `u32`.
//!
//! ```text
//! header:   inner_count, leaf_count, total_count        (root excluded)
//! records:  per inner node in level order, root first:
//!           child_count, child_count x (item [, support])
//! trailer:  bitset_len, bitset bytes
//! ```
//!
//! The bitset marks inner nodes by level-order position, root at 0 and the
//! root's first child at 1. Bit `i` lives in byte `i / 8` at bit `i % 8`;
//! trailing zero bytes are dropped.

/**
 * File: /src/fpo/codec.rs
 * Created Date: Monday, October 12th 2026
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 17th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Validate counts against the bitset
 * 2026-10-12		Zihan	Created codec
 */

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use super::tree::{FpoNode, FpoTree, TreeCounts};
use crate::types::{CodecError, Support};

fn write_u32<W: Write>(w: &mut W, value: u32) -> io::Result<()> {
    w.write_all(&value.to_be_bytes())
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32, CodecError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).map_err(truncated)?;
    Ok(u32::from_be_bytes(buf))
}

fn truncated(e: io::Error) -> CodecError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        CodecError::Malformed("stream ended early".to_string())
    } else {
        CodecError::Io(e)
    }
}

fn to_u32(value: usize, what: &str) -> Result<u32, CodecError> {
    u32::try_from(value).map_err(|_| CodecError::Malformed(format!("{} {} exceeds u32", what, value)))
}

fn set_bit(bits: &mut Vec<u8>, pos: usize) {
    let byte = pos / 8;
    if bits.len() <= byte {
        bits.resize(byte + 1, 0);
    }
    bits[byte] |= 1 << (pos % 8);
}

fn set_positions(bits: &[u8]) -> Vec<usize> {
    let mut out = Vec::new();
    for (i, byte) in bits.iter().enumerate() {
        for b in 0..8 {
            if byte & (1 << b) != 0 {
                out.push(i * 8 + b);
            }
        }
    }
    out
}

impl FpoTree {
    /// Write the tree, with or without supports.
    pub fn serialize<W: Write>(&self, w: &mut W, with_supports: bool) -> Result<(), CodecError> {
        if self.is_empty() {
            return Err(CodecError::EmptyTree);
        }

        // one pass: records into a buffer, counts and bitset alongside
        let mut records: Vec<u8> = Vec::new();
        let mut bits: Vec<u8> = Vec::new();
        let mut inner = 0usize;
        let mut total = 0usize;

        set_bit(&mut bits, 0);
        let mut queue: VecDeque<&FpoNode> = VecDeque::from([&self.root]);
        while let Some(parent) = queue.pop_front() {
            write_u32(&mut records, to_u32(parent.children.len(), "child count")?)?;
            for child in &parent.children {
                total += 1;
                write_u32(&mut records, child.item)?;
                if with_supports {
                    write_u32(&mut records, child.support)?;
                }
                if !child.is_leaf() {
                    inner += 1;
                    set_bit(&mut bits, total);
                    queue.push_back(child);
                }
            }
        }

        write_u32(w, to_u32(inner, "inner count")?)?;
        write_u32(w, to_u32(total - inner, "leaf count")?)?;
        write_u32(w, to_u32(total, "node count")?)?;
        w.write_all(&records)?;
        write_u32(w, to_u32(bits.len(), "bitset length")?)?;
        w.write_all(&bits)?;
        w.flush()?;
        Ok(())
    }

    /// Read a tree written by [`serialize`](Self::serialize) with the same
    /// `with_supports` flag. Supports are 0 when absent.
    pub fn deserialize<R: Read>(r: &mut R, with_supports: bool) -> Result<FpoTree, CodecError> {
        let inner = read_u32(r)? as usize;
        let leaves = read_u32(r)? as usize;
        let total = read_u32(r)? as usize;
        if inner.checked_add(leaves) != Some(total) {
            return Err(CodecError::Malformed(format!(
                "{} inner + {} leaves != {} nodes",
                inner, leaves, total
            )));
        }

        // slot 0 is the root
        let mut slots: Vec<Option<FpoNode>> = Vec::with_capacity((total + 1).min(1 << 20));
        slots.push(Some(FpoNode::default()));
        let mut groups: Vec<(usize, usize)> = Vec::with_capacity((inner + 1).min(1 << 20));
        for _ in 0..=inner {
            let count = read_u32(r)? as usize;
            let start = slots.len();
            if start - 1 + count > total {
                return Err(CodecError::Malformed(format!(
                    "more than {} node records",
                    total
                )));
            }
            for _ in 0..count {
                let item = read_u32(r)?;
                let support: Support = if with_supports { read_u32(r)? } else { 0 };
                slots.push(Some(FpoNode::new(item, support)));
            }
            groups.push((start, count));
        }
        if slots.len() != total + 1 {
            return Err(CodecError::Malformed(format!(
                "{} node records, header says {}",
                slots.len() - 1,
                total
            )));
        }

        let len = read_u32(r)? as usize;
        let mut bits = vec![0u8; len];
        r.read_exact(&mut bits).map_err(truncated)?;
        let parents = set_positions(&bits);
        if parents.len() != inner + 1 || parents.first() != Some(&0) {
            return Err(CodecError::Malformed(format!(
                "bitset marks {} inner nodes, header says {}",
                parents.len(),
                inner + 1
            )));
        }

        // children sit after their parent, so attach deepest groups first
        for (&parent, &(start, count)) in parents.iter().zip(groups.iter()).rev() {
            if parent >= start {
                return Err(CodecError::Malformed(format!(
                    "inner node {} precedes its own children at {}",
                    parent, start
                )));
            }
            let children: Vec<FpoNode> = slots[start..start + count]
                .iter_mut()
                .filter_map(Option::take)
                .collect();
            match slots[parent].as_mut() {
                Some(node) => node.children = children,
                None => {
                    return Err(CodecError::Malformed(format!(
                        "node {} attached twice",
                        parent
                    )))
                }
            }
        }

        let root = slots[0].take().unwrap_or_default();
        Ok(FpoTree::from_root(root, TreeCounts { total, inner, leaves }))
    }

    pub fn to_bytes(&self, with_supports: bool) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        self.serialize(&mut buf, with_supports)?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8], with_supports: bool) -> Result<FpoTree, CodecError> {
        let mut cursor = bytes;
        Self::deserialize(&mut cursor, with_supports)
    }

    /// Supports of all nodes below the root, in level order.
    pub fn support_array(&self) -> Vec<Support> {
        self.level_order().iter().map(|n| n.support).collect()
    }

    /// Length-prefixed [`support_array`](Self::support_array).
    pub fn write_support_array<W: Write>(&self, w: &mut W) -> Result<(), CodecError> {
        let supports = self.support_array();
        write_u32(w, to_u32(supports.len(), "support count")?)?;
        for s in supports {
            write_u32(w, s)?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn read_support_array<R: Read>(r: &mut R) -> Result<Vec<Support>, CodecError> {
        let count = read_u32(r)? as usize;
        let mut supports = Vec::with_capacity(count.min(1 << 20));
        for _ in 0..count {
            supports.push(read_u32(r)?);
        }
        Ok(supports)
    }

    /// Add `supports` (level order) into the tree's nodes.
    pub fn accumulate_supports(&mut self, supports: &[Support]) -> Result<(), CodecError> {
        let mut targets = self.supports_level_order_mut();
        if targets.len() != supports.len() {
            return Err(CodecError::SupportLengthMismatch {
                expected: targets.len(),
                actual: supports.len(),
            });
        }
        for (target, add) in targets.iter_mut().zip(supports) {
            **target += *add;
        }
        Ok(())
    }
}
