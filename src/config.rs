use std::error::Error;
use std::path::PathBuf;

/**
 * File: /src/config.rs
 * Created Date: Friday, January 26th 2024
 * Author: Zihan
 * -----
 * Last Modified: Friday, 9th October 2026 10:00:00 pm
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-09		Zihan	Mining configuration
 */
use serde::{Deserialize, Serialize};

use crate::partitioner::{default_worker_count, WorkPartitioner};
use crate::types::MiningError;

/// Parameters of one mining run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Minimum support as a fraction of the transaction count, in (0, 1]
    pub relative_threshold: f64,
    /// Worker threads per parallel phase (None = half the available cores)
    pub num_threads: Option<usize>,
    /// Upper bound on concurrent output files
    pub max_writer_threads: usize,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            relative_threshold: 0.01,
            num_threads: None,
            max_writer_threads: 4,
        }
    }
}

impl MiningConfig {
    pub fn with_threshold(relative_threshold: f64) -> Self {
        Self {
            relative_threshold,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), MiningError> {
        if !(self.relative_threshold > 0.0 && self.relative_threshold <= 1.0) {
            return Err(MiningError::InvalidThreshold(self.relative_threshold));
        }
        if self.num_threads == Some(0) {
            return Err(MiningError::InvalidConfiguration(
                "num_threads must be at least 1".to_string(),
            ));
        }
        if self.max_writer_threads == 0 {
            return Err(MiningError::InvalidConfiguration(
                "max_writer_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        self.num_threads.unwrap_or_else(default_worker_count)
    }

    pub fn partitioner(&self) -> WorkPartitioner {
        WorkPartitioner::new(self.worker_count())
    }
}

/// Command line arguments of the `fast_fism` binary
pub struct Config {
    input:    PathBuf,
    output:   Option<PathBuf>,
    mining:   MiningConfig,
}

impl Config {
    /// constructor
    ///
    /// # Examples
    /// ```bash
    /// $ cargo run -- "data/retail.dat" 0.01 "out/retail.fis"
    /// ```
    pub fn new(
        mut args: impl Iterator<Item = String>,
    ) -> Result<Config, Box<dyn Error>> {
        // args:
        // 0: program name
        // 1: transaction file
        // 2: relative threshold
        // 3: output file (optional, stdout otherwise)
        args.next();
        let input = PathBuf::from(args.next().ok_or("missing transaction file")?);
        let threshold = args
            .next()
            .ok_or("missing relative threshold")?
            .parse::<f64>()?;
        let output = args.next().map(PathBuf::from);

        let mining = MiningConfig::with_threshold(threshold);
        mining.validate()?;

        Ok(Config {
            input,
            output,
            mining,
        })
    }

    pub fn get_input(&self) -> &PathBuf {
        &self.input
    }

    pub fn get_output(&self) -> Option<&PathBuf> {
        self.output.as_ref()
    }

    pub fn get_mining(&self) -> &MiningConfig {
        &self.mining
    }
}
