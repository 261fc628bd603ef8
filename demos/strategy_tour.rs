// demos/strategy_tour.rs
//! Runs every pool strategy through the same serialization workload and
//! prints the per-strategy statistics.
//!
//! Run with: cargo run --example strategy_tour

use recyclepool::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::thread;

#[derive(Serialize)]
struct MediaItem {
    title: String,
    duration: u32,
    tags: Vec<String>,
}

fn workload(pool: &Arc<dyn Pool>, threads: usize, iterations: usize) {
    let handles: Vec<_> = (0..threads)
        .map(|worker| {
            let pool = Arc::clone(pool);
            thread::spawn(move || {
                let item = MediaItem {
                    title: format!("clip-{worker}"),
                    duration: 1262,
                    tags: vec!["fun".into(), "small".into()],
                };
                for _ in 0..iterations {
                    let mut buf = pool.acquire();
                    buf.clear();
                    serde_json::to_writer(&mut *buf, &item).unwrap();
                    pool.release(buf);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

fn main() -> recyclepool::Result<()> {
    let threads = 8;
    let iterations = 10_000;

    println!(
        "{threads} threads x {iterations} acquire/serialize/release cycles per strategy\n"
    );
    println!(
        "{:<18} {:>10} {:>10} {:>8} {:>10} {:>8}",
        "strategy", "acquired", "released", "created", "available", "reuse%"
    );

    for &strategy in Strategy::all() {
        let pool = strategy.build(PoolConfig::default().stripes(8))?;
        workload(&pool, threads, iterations);

        let stats = pool.stats();
        println!(
            "{:<18} {:>10} {:>10} {:>8} {:>10} {:>7.1}%",
            strategy.name(),
            stats.acquired,
            stats.released,
            stats.created,
            stats.available,
            stats.reuse_rate()
        );
    }

    Ok(())
}
