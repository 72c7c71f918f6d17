use win_statistics::WinHistogram;

fn main() {
    let mut hist = WinHistogram::new();

    let wins = [(0.0, 10), (1.0, 3), (2.5, 7), (2.54, 1), (-1.0, 5), (3.0, 0)];
    for (amount, hits) in wins {
        hist.log(amount, hits);
    }

    // 2.54 lands in the 2.5 bucket; the negative amount and zero hits are ignored.
    println!("Hits of 2.5: {}", hist.hit_count(2.5));
    println!("Distinct buckets: {}", hist.len());

    let report = hist.report();
    match report.average_win() {
        Some(avg) => println!("Average win: {avg:.3}"),
        None => println!("Average win: no data"),
    }
    print!("{report}");
}
