//! # Prefix-Count Tree
//!
//! Transactions are folded into a prefix-count tree, every node receives
//! pre/post traversal codes, and per-item occurrence lists are read off in
//! one pass. Itemset supports are then computed by merge-joining lists
//! instead of re-scanning the tree.

/**
 * File: /src/ppc/mod.rs
 * Created Date: Tuesday, October 6th 2026
 * Author: Zihan
 * -----
 * Last Modified: Tuesday, 6th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 */

pub mod nodelist;
pub mod tree;

pub use nodelist::{build_item_lists, itemset_support, ListJoin, MergeJoin, NodeCode, Nodelist};
pub use tree::{NodeId, PpcNode, PpcTree};
