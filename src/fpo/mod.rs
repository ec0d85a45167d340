//! # Compressed Itemset Tree
//!
//! Holds arbitrary collections of itemsets as a prefix tree over ascending
//! item codes, one node per itemset. Trees from different sources are merged
//! node-aligned, pruned by support, exchanged as byte streams and written
//! out as filtered itemset files.

/**
 * File: /src/fpo/mod.rs
 * Created Date: Saturday, October 10th 2026
 * Author: Zihan
 * -----
 * Last Modified: Thursday, 15th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 */

pub mod codec;
pub mod merge;
pub mod output;
pub mod support;
pub mod tree;

pub use output::output_file;
pub use tree::{FpoNode, FpoTree, TreeCounts};
