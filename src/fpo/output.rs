/**
 * File: /src/fpo/output.rs
 * Created Date: Thursday, October 15th 2026
 * Author: Zihan
 * -----
 * Last Modified: Thursday, 15th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 */

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::tree::{FpoNode, FpoTree};
use crate::config::MiningConfig;
use crate::item_index::ItemIndex;
use crate::partitioner::WorkPartitioner;
use crate::types::{MiningError, Support};

/// File written by output worker `worker`: `<path>_t<worker>`.
pub fn output_file(path: &Path, worker: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!("_t{}", worker));
    PathBuf::from(name)
}

struct WorkerOutput {
    writer: Result<BufWriter<File>, MiningError>,
    written: usize,
}

impl FpoTree {
    /// Write every itemset with support at least `threshold` as
    /// `"<item names>:<support>"`, one file per output worker (see
    /// [`output_file`]). Descent stops at the first infrequent node.
    ///
    /// With `omit_level1` the single items are skipped and the work units
    /// are the level-2 nodes. Returns the number of itemsets written.
    pub fn write_frequent_itemsets(
        &self,
        index: &ItemIndex,
        path: &Path,
        threshold: Support,
        omit_level1: bool,
        config: &MiningConfig,
    ) -> Result<usize, MiningError> {
        let start = Instant::now();
        let units: Vec<(Option<&FpoNode>, &FpoNode)> = if omit_level1 {
            self.root
                .children
                .iter()
                .flat_map(|l1| l1.children.iter().map(move |l2| (Some(l1), l2)))
                .collect()
        } else {
            self.root.children.iter().map(|l1| (None, l1)).collect()
        };

        let writers = WorkPartitioner::new(config.worker_count().min(config.max_writer_threads));
        let outputs = writers.fold(
            "write frequent itemsets",
            units,
            |worker| WorkerOutput {
                writer: File::create(output_file(path, worker))
                    .map(BufWriter::new)
                    .map_err(MiningError::from),
                written: 0,
            },
            |out, _, (parent, node)| {
                if let Ok(writer) = out.writer.as_mut() {
                    let result = parent
                        .map(|p| item_name(index, p).map(str::to_string))
                        .transpose()
                        .and_then(|prefix| write_subtree(writer, index, prefix, node, threshold));
                    match result {
                        Ok(n) => out.written += n,
                        Err(e) => out.writer = Err(e),
                    }
                }
            },
        )?;

        let mut total = 0;
        for out in outputs {
            out.writer?.flush()?;
            total += out.written;
        }
        log::info!(
            "wrote {} frequent itemsets to {}_t* in {}ms",
            total,
            path.display(),
            start.elapsed().as_millis()
        );
        Ok(total)
    }
}

fn item_name<'a>(index: &'a ItemIndex, node: &FpoNode) -> Result<&'a str, MiningError> {
    index
        .name_of(node.item)
        .ok_or_else(|| MiningError::UnknownItem(node.item.to_string()))
}

/// Pre-order write of `top`'s subtree below an optional name prefix.
fn write_subtree<W: Write>(
    w: &mut W,
    index: &ItemIndex,
    prefix: Option<String>,
    top: &FpoNode,
    threshold: Support,
) -> Result<usize, MiningError> {
    let mut written = 0;
    let mut stack: Vec<(&FpoNode, Option<String>)> = vec![(top, prefix)];
    while let Some((node, prefix)) = stack.pop() {
        if node.support < threshold {
            continue;
        }
        let name = item_name(index, node)?;
        let itemset = match prefix {
            Some(p) => format!("{} {}", p, name),
            None => name.to_string(),
        };
        writeln!(w, "{}:{}", itemset, node.support)?;
        written += 1;
        for child in node.children.iter().rev() {
            stack.push((child, Some(itemset.clone())));
        }
    }
    Ok(written)
}
