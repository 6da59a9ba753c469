use clap::Parser;
use taskbot_lib::bench::{self, alloc::TrackingAllocator, BenchConfig};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static ALLOCATOR: TrackingAllocator = TrackingAllocator;

#[derive(Parser)]
#[command(name = "taskbot-bench")]
#[command(about = "Time and memory measurements for the bot exercises")]
struct Args {
    /// Length of the generated arrays
    #[arg(long, default_value_t = 1000)]
    size: usize,

    /// Timed calls for exercises 1 and 5
    #[arg(long, default_value_t = 100)]
    iterations: u32,

    /// Timed calls for exercise 4, with and without the cache
    #[arg(long, default_value_t = 1000)]
    cache_iterations: u32,

    /// RNG seed for reproducible inputs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = BenchConfig {
        size: args.size,
        iterations: args.iterations,
        cache_iterations: args.cache_iterations,
        seed: args.seed,
    };

    let report = bench::run(&config)?;
    println!("{}", report);
    Ok(())
}
