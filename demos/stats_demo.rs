use bin_map::BinMap;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Percentage of mappings to remove after filling.
    #[arg(short = 'r', long = "remove_percent", default_value_t = 80)]
    remove_percent: usize,
}

fn print_histogram(histogram: &[usize]) {
    let widest = histogram.iter().copied().max().unwrap_or(0).max(1);
    for (distance, &count) in histogram.iter().enumerate() {
        let bar = "#".repeat(count * 50 / widest);
        println!("{distance:>4} | {count:>8} {bar}");
    }
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating BinMap with target capacity: {}",
        args.target_capacity
    );

    let mut map: BinMap<u64, u64> = BinMap::with_capacity(args.target_capacity);

    println!("Bins: {}", map.bin_count());
    println!("Mappings before growth: {}", map.capacity());
    println!("Filling map with u64 keys...");

    let num_values = map.capacity() as u64;
    for value in 0..num_values {
        if map.insert(value, value * 2).is_some() {
            panic!("Value already exists in map: {}", value);
        }
    }

    println!("Inserted {} mappings", map.len());
    print_histogram(&map.probe_histogram());
    map.debug_stats().print();

    let to_remove = num_values * args.remove_percent.min(100) as u64 / 100;
    println!("Removing {} mappings...", to_remove);
    for value in 0..to_remove {
        if map.remove(&value) != Some(value * 2) {
            panic!("Mapping for {} was lost", value);
        }
    }

    println!("After removal:");
    print_histogram(&map.probe_histogram());
    map.debug_stats().print();
}
