//! # Shared Types
//!
//! Error kinds, per-run statistics and small record types used across the
//! mining, tree and codec modules.

/**
 * File: /src/types.rs
 * Created Date: Monday, October 5th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Split codec errors from mining errors
 * 2026-10-05		Zihan	Created error and statistics types
 */

use std::error::Error;
use std::fmt;
use std::io;

/// Item code, dense in `0..N` for a mining pass.
pub type ItemCode = u32;

/// Absolute support count.
pub type Support = u32;

/// An itemset together with its support. Codes are always ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrequentItemset {
    pub items: Vec<ItemCode>,
    pub support: Support,
}

impl FrequentItemset {
    pub fn new(items: Vec<ItemCode>, support: Support) -> Self {
        Self { items, support }
    }

    /// `"<c1> <c2> ...:<support>"`
    pub fn to_line(&self) -> String {
        format!("{}:{}", join_codes(&self.items), self.support)
    }
}

/// Space separated rendering of an itemset key.
pub fn join_codes(items: &[ItemCode]) -> String {
    items
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Timing information for each local mining phase
#[derive(Debug, Clone, Default)]
pub struct PhaseTimings {
    pub counting_ms: u64,
    pub tree_building_ms: u64,
    pub item_lists_ms: u64,
    pub matrix_ms: u64,
    pub pair_lists_ms: u64,
    pub expansion_ms: u64,
    pub total_ms: u64,
}

/// Statistics from one local mining run. Owned by the run that produced it.
#[derive(Debug, Clone, Default)]
pub struct MiningStats {
    pub transaction_count: usize,
    pub absolute_threshold: Support,
    pub frequent_items: usize,
    /// Prefix tree nodes, root excluded
    pub tree_nodes: usize,
    /// Entries across all per-item occurrence lists
    pub item_list_entries: usize,
    pub frequent_2itemsets: usize,
    /// Frequent itemsets of every size, 1-itemsets included
    pub frequent_itemsets: usize,
    pub phase_times: PhaseTimings,
}

// ============================================================================
// Error Types
// ============================================================================

/// Failure of a parallel phase
#[derive(Debug)]
pub enum WorkError {
    /// A work unit panicked; its worker stopped claiming units
    UnitPanicked { unit: usize, message: String },
    PoolBuild(String),
}

impl fmt::Display for WorkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WorkError::UnitPanicked { unit, message } => {
                write!(f, "Work unit {} panicked: {}", unit, message)
            }
            WorkError::PoolBuild(msg) => write!(f, "Thread pool error: {}", msg),
        }
    }
}

impl Error for WorkError {}

/// Errors while reading or writing itemset-tree streams
#[derive(Debug)]
pub enum CodecError {
    Io(io::Error),
    /// Stream content contradicts itself (counts vs. records vs. bit-vector)
    Malformed(String),
    /// Tree has no nodes below the root; there is nothing to send
    EmptyTree,
    SupportLengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CodecError::Io(e) => write!(f, "I/O error: {}", e),
            CodecError::Malformed(msg) => write!(f, "Malformed tree stream: {}", msg),
            CodecError::EmptyTree => write!(f, "Tree is empty"),
            CodecError::SupportLengthMismatch { expected, actual } => write!(
                f,
                "Support array length mismatch: expected {}, got {}",
                expected, actual
            ),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CodecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        CodecError::Io(e)
    }
}

/// Top-level error for a mining run
#[derive(Debug)]
pub enum MiningError {
    InvalidThreshold(f64),
    InvalidConfiguration(String),
    Io(io::Error),
    Work(WorkError),
    Codec(CodecError),
    UnknownItem(String),
}

impl fmt::Display for MiningError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MiningError::InvalidThreshold(t) => {
                write!(f, "Relative threshold {} is outside (0, 1]", t)
            }
            MiningError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            MiningError::Io(e) => write!(f, "I/O error: {}", e),
            MiningError::Work(e) => write!(f, "Parallel phase failed: {}", e),
            MiningError::Codec(e) => write!(f, "Codec error: {}", e),
            MiningError::UnknownItem(name) => write!(f, "Item '{}' is not in the index", name),
        }
    }
}

impl Error for MiningError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MiningError::Io(e) => Some(e),
            MiningError::Work(e) => Some(e),
            MiningError::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MiningError {
    fn from(e: io::Error) -> Self {
        MiningError::Io(e)
    }
}

impl From<WorkError> for MiningError {
    fn from(e: WorkError) -> Self {
        MiningError::Work(e)
    }
}

impl From<CodecError> for MiningError {
    fn from(e: CodecError) -> Self {
        MiningError::Codec(e)
    }
}
