//! # Item Index
//!
//! Item frequency counting over a transaction source and the global
//! name ↔ code bijection used by one mining pass.
//!
//! Transactions are plain text, one per line, items separated by whitespace.

/**
 * File: /src/item_index.rs
 * Created Date: Wednesday, October 7th 2026
 * Author: Zihan
 * -----
 * Last Modified: Friday, 16th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-16		Zihan	Local support lookup for candidate item lists
 * 2026-10-07		Zihan	Created item index
 */

use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead};

use crate::types::{ItemCode, MiningError, Support};

/// Item frequencies of one transaction source.
#[derive(Debug, Clone, Default)]
pub struct ItemFrequencies {
    /// Every line counts, empty ones included
    pub transaction_count: usize,
    pub counts: HashMap<String, Support>,
}

impl ItemFrequencies {
    pub fn support_of(&self, name: &str) -> Support {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Frequent item names, ascending by name.
    pub fn frequent_items_by_name(&self, threshold: Support) -> Vec<String> {
        let mut names: Vec<String> = self
            .counts
            .iter()
            .filter(|(_, &count)| count >= threshold)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Local support of each candidate item, 0 when it never occurs.
    pub fn support_counts_of<S: AsRef<str>>(&self, names: &[S]) -> Vec<Support> {
        names.iter().map(|n| self.support_of(n.as_ref())).collect()
    }
}

/// Count item occurrences, one per transaction, in a single pass.
pub fn count_item_frequencies<R: BufRead>(reader: R) -> io::Result<ItemFrequencies> {
    let mut freqs = ItemFrequencies::default();
    for line in reader.lines() {
        let line = line?;
        freqs.transaction_count += 1;
        let mut seen: HashSet<&str> = HashSet::new();
        for token in line.split_whitespace() {
            if seen.insert(token) {
                *freqs.counts.entry(token.to_string()).or_insert(0) += 1;
            }
        }
    }
    Ok(freqs)
}

/// `floor(relative * transactions)`, at least 1.
pub fn absolute_threshold(relative: f64, transactions: usize) -> Result<Support, MiningError> {
    if !(relative > 0.0 && relative <= 1.0) {
        return Err(MiningError::InvalidThreshold(relative));
    }
    let absolute = (relative * transactions as f64).floor() as Support;
    Ok(absolute.max(1))
}

/// Global item index: rank in the ordering is the item code.
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    names: Vec<String>,
    codes: HashMap<String, ItemCode>,
    /// Local frequency per code, 0 for items absent from this source
    frequencies: Vec<Support>,
}

impl ItemIndex {
    /// Build from a provided ordering. Duplicate names keep their first rank.
    pub fn from_ordering<S: AsRef<str>>(ordering: &[S], local: &ItemFrequencies) -> Self {
        let mut index = ItemIndex::default();
        for name in ordering {
            let name = name.as_ref();
            if index.codes.contains_key(name) {
                continue;
            }
            let code = index.names.len() as ItemCode;
            index.codes.insert(name.to_string(), code);
            index.names.push(name.to_string());
            index.frequencies.push(local.support_of(name));
        }
        index
    }

    /// Ordering derived from the local source alone.
    pub fn from_local_frequencies(local: &ItemFrequencies, threshold: Support) -> Self {
        Self::from_ordering(&local.frequent_items_by_name(threshold), local)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn code_of(&self, name: &str) -> Option<ItemCode> {
        self.codes.get(name).copied()
    }

    pub fn name_of(&self, code: ItemCode) -> Option<&str> {
        self.names.get(code as usize).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn frequency(&self, code: ItemCode) -> Support {
        self.frequencies.get(code as usize).copied().unwrap_or(0)
    }

    pub fn frequencies(&self) -> &[Support] {
        &self.frequencies
    }

    /// Codes of every item with local frequency at least `threshold`.
    pub fn frequent_codes(&self, threshold: Support) -> Vec<ItemCode> {
        (0..self.len() as ItemCode)
            .filter(|&c| self.frequency(c) >= threshold)
            .collect()
    }

    /// Tokens to ascending, distinct codes. Unknown tokens are dropped.
    pub fn encode(&self, line: &str) -> Vec<ItemCode> {
        let mut codes: Vec<ItemCode> = line
            .split_whitespace()
            .filter_map(|token| self.code_of(token))
            .collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }

    /// Item names of `codes`, space separated.
    pub fn render(&self, codes: &[ItemCode]) -> Result<String, MiningError> {
        let names = codes
            .iter()
            .map(|&c| {
                self.name_of(c)
                    .ok_or_else(|| MiningError::UnknownItem(c.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names.join(" "))
    }
}
