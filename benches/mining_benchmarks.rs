//! Benchmarks for local mining phases and itemset-tree operations
//!
//! Run with: cargo bench --bench mining_benchmarks
//! HTML reports: target/criterion/report/index.html

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fast_fism::config::MiningConfig;
use fast_fism::fpo::FpoTree;
use fast_fism::mining::LocalMiner;
use fast_fism::partitioner::WorkPartitioner;
use fast_fism::pipeline::{local_tree, MiningPipeline};
use fast_fism::ppc::{build_item_lists, Nodelist, PpcTree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic basket data: item `k` of `items` occurs with probability
/// falling from 0.6 towards 0.02, plus a planted block of co-occurring items.
fn create_benchmark_db(transactions: usize, items: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut text = String::new();
    for _ in 0..transactions {
        let mut line: Vec<String> = (0..items)
            .filter(|&k| rng.random_bool(0.02 + 0.58 / (1.0 + k as f64)))
            .map(|k| format!("item{}", k))
            .collect();
        if rng.random_bool(0.3) {
            line.extend((0..6).map(|k| format!("block{}", k)));
        }
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    text
}

fn config(threshold: f64, threads: usize) -> MiningConfig {
    MiningConfig {
        relative_threshold: threshold,
        num_threads: Some(threads),
        ..Default::default()
    }
}

/// Benchmark a full local pass with growing databases
fn bench_local_mining(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_mining");
    group.sample_size(20);

    for transactions in [500, 2000, 5000] {
        let db = create_benchmark_db(transactions, 60, 1);
        group.bench_with_input(BenchmarkId::new("mine", transactions), &db, |b, db| {
            b.iter(|| {
                let mut miner = LocalMiner::from_text(config(0.02, 4), black_box(db), None).unwrap();
                miner.expand().unwrap();
                miner.stats().frequent_itemsets
            });
        });
    }

    group.finish();
}

/// Benchmark worker scaling of the parallel phases
fn bench_worker_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("worker_scaling");
    group.sample_size(20);
    let db = create_benchmark_db(3000, 60, 2);

    for threads in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, &threads| {
            b.iter(|| {
                let mut miner = LocalMiner::from_text(config(0.02, threads), &db, None).unwrap();
                miner.expand().unwrap();
                miner.stats().frequent_itemsets
            });
        });
    }

    group.finish();
}

/// Benchmark occurrence-list merging against the item lists of a real tree
fn bench_nodelist_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("nodelist_merge");
    let db = create_benchmark_db(5000, 40, 3);

    let mut names: Vec<&str> = db.split_whitespace().collect();
    names.sort_unstable();
    names.dedup();
    let mut tree = PpcTree::new();
    for line in db.lines() {
        let mut codes: Vec<u32> = line
            .split_whitespace()
            .filter_map(|t| names.binary_search(&t).ok().map(|c| c as u32))
            .collect();
        codes.sort_unstable();
        tree.insert(&codes);
    }
    tree.assign_traversal_codes();
    let lists = build_item_lists(&tree, names.len());

    group.bench_function("all_pairs", |b| {
        b.iter(|| {
            let mut total = 0u64;
            for i in 0..lists.len() {
                for j in (i + 1)..lists.len() {
                    total += Nodelist::merge(black_box(&lists[i]), black_box(&lists[j])).total_support() as u64;
                }
            }
            total
        });
    });

    group.finish();
}

/// Benchmark itemset-tree merge and byte exchange
fn bench_fpo_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("fpo_tree");
    group.sample_size(30);

    let trees: Vec<FpoTree> = (0..4)
        .map(|seed| {
            let db = create_benchmark_db(2000, 60, 10 + seed);
            let mut miner = LocalMiner::from_text(config(0.02, 4), &db, None).unwrap();
            miner.expand().unwrap();
            local_tree(&miner).unwrap()
        })
        .collect();
    let partitioner = WorkPartitioner::new(4);

    group.bench_function("merge_all", |b| {
        b.iter(|| FpoTree::merge_all(black_box(trees.clone()), &partitioner).unwrap())
    });

    let bytes = trees[0].to_bytes(true).unwrap();
    group.bench_function("serialize", |b| b.iter(|| black_box(&trees[0]).to_bytes(true).unwrap()));
    group.bench_function("deserialize", |b| {
        b.iter(|| FpoTree::from_bytes(black_box(&bytes), true).unwrap())
    });

    group.finish();
}

/// Benchmark the multi-source run against the number of sources
fn bench_partitioned(c: &mut Criterion) {
    let mut group = c.benchmark_group("partitioned_mining");
    group.sample_size(10);
    let db = create_benchmark_db(4000, 60, 4);
    let lines: Vec<&str> = db.lines().collect();
    let pipeline = MiningPipeline::builder()
        .relative_threshold(0.02)
        .num_threads(4)
        .build()
        .unwrap();

    for sources in [1, 2, 4, 8] {
        let parts: Vec<String> = lines
            .chunks(lines.len().div_ceil(sources))
            .map(|chunk| chunk.join("\n") + "\n")
            .collect();
        group.bench_with_input(BenchmarkId::new("sources", sources), &parts, |b, parts| {
            b.iter(|| pipeline.run_partitioned(black_box(parts)).unwrap().itemsets.len())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_local_mining,
    bench_worker_scaling,
    bench_nodelist_merge,
    bench_fpo_tree,
    bench_partitioned,
);

criterion_main!(benches);
