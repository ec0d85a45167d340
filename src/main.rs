/*
 * File: /main.rs
 * Created Date: Tuesday November 21st 2023
 * Author: Zihan
 * -----
 * Last Modified: Monday, 19th October 2026 10:40:12 am
 * Modified By: the developer formerly known as Zihan at <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-19		Zihan	Local frequent itemset mining binary
 */

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process;

use log::{error, info, LevelFilter};

use fast_fism::pipeline::MiningPipeline;
use fast_fism::{init_logger, timestamp, Config};

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let pipeline = MiningPipeline::builder()
        .with_config(config.get_mining().clone())
        .build()?;

    info!("[{}] Mining {}", timestamp(), config.get_input().display());
    let result = pipeline.run_path(config.get_input())?;

    let written = match config.get_output() {
        Some(path) => result.write_lines(&mut BufWriter::new(File::create(path)?))?,
        None => result.write_lines(&mut io::stdout().lock())?,
    };
    info!("[{}] {} itemsets written", timestamp(), written);
    info!("{}", result.summary());
    Ok(())
}

fn main() {
    if let Err(e) = init_logger(LevelFilter::Info) {
        eprintln!("logger: {}", e);
    }

    let config = Config::new(env::args()).unwrap_or_else(|err| {
        eprintln!("Problem parsing arguments: {}", err);
        eprintln!("usage: fast_fism <transactions> <relative_threshold> [output]");
        process::exit(1);
    });

    if let Err(e) = run(&config) {
        error!("[{}] mining failed: {}", timestamp(), e);
        process::exit(1);
    }
}
