//! # Local Frequent Itemset Mining
//!
//! Prefix-tree occurrence lists combined with equivalence-class expansion.

/**
 * File: /src/mining/mod.rs
 * Created Date: Thursday, October 8th 2026
 * Author: Zihan
 * -----
 * Last Modified: Friday, 9th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 */

pub mod expander;
pub mod miner;
pub mod subsets;

pub use expander::{EquivalenceExpander, PairList};
pub use miner::LocalMiner;
pub use subsets::{cartesian, power_set, sorted_union, FrequentSubset};
