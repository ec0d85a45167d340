//! # fast_fism
//!
//! Frequent itemset mining over transaction files with prefix-count trees,
//! occurrence-list joins and equivalence-class expansion, plus a compressed
//! itemset tree for merging, pruning and exchanging results of many sources.
//!
//! ```no_run
//! use fast_fism::pipeline::MiningPipeline;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = MiningPipeline::builder()
//!     .relative_threshold(0.01)
//!     .build()?;
//! let result = pipeline.run_path(std::path::Path::new("data/retail.dat"))?;
//! println!("{}", result.summary());
//! # Ok(())
//! # }
//! ```

/**
 * File: /src/lib.rs
 * Created Date: Monday, January 22nd 2024
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026 10:21:05 am
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Frequent itemset mining crate layout
 */

pub mod config;
pub mod fpo;
pub mod item_index;
pub mod matrix;
pub mod merger;
pub mod mining;
pub mod partitioner;
pub mod pipeline;
pub mod ppc;
pub mod types;
pub mod union_dc;

use chrono::Local;
use log::LevelFilter;

pub use config::{Config, MiningConfig};
pub use fpo::{FpoNode, FpoTree, TreeCounts};
pub use item_index::{ItemFrequencies, ItemIndex};
pub use mining::{FrequentSubset, LocalMiner};
pub use partitioner::WorkPartitioner;
pub use pipeline::{MiningPipeline, MiningResult, PartitionedResult};
pub use types::{
    CodecError, FrequentItemset, ItemCode, MiningError, MiningStats, PhaseTimings, Support, WorkError,
};

/// Install the `simple_logger` backend at `level`.
pub fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    simple_logger::SimpleLogger::new().with_level(level).init()
}

/// Wall-clock time for log lines.
pub fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
