//! Demonstrates filling histograms on separate shards, then merging them
//! without replaying the original stream.

use win_statistics::WinHistogram;

fn main() {
    // Shard A ingests even event IDs, shard B odd ones.
    let mut shard_a = WinHistogram::new();
    let mut shard_b = WinHistogram::new();

    for id in 0..10_000u32 {
        let amount = f64::from(id % 40) / 10.0;
        if id % 2 == 0 {
            shard_a.log(amount, 1);
        } else {
            shard_b.log(amount, 1);
        }
    }

    let mut aggregate = WinHistogram::new();
    aggregate.merge_from(&shard_a);
    aggregate.merge_from(&shard_b);

    println!("Hits of 1.5 across shards: {}", aggregate.hit_count(1.5));
    println!("Total hits: {}", aggregate.total_hits());

    // Merging is a plain sum: folding a shard in twice counts it twice.
    let mut doubled = aggregate.clone();
    doubled.merge_from(&shard_a);
    println!(
        "Hits of 0.2 after merging shard A again: {} (was {})",
        doubled.hit_count(0.2),
        aggregate.hit_count(0.2)
    );
}
