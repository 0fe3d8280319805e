use clap::{Args, Parser, Subcommand};

use mmk_sim::experiments::report::{format_sweep_table, to_json};
use mmk_sim::experiments::{
    self, run_sweep, ConcurrencyMode, SweepConfig, SweepPlan, DEFAULT_TARGET_SERVED,
    SWEEP_SEED, SWEEP_SERVICE_RATE,
};
use mmk_sim::{simulate, MmkAnalytics, QueueParams};

#[derive(Parser)]
#[command(
    name = "mmk",
    version,
    about = "Discrete-event simulation of a single-queue, k-server M/M/k system"
)]
struct Cli {
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one configuration (defaults to the reference run)
    Run {
        /// Arrival rate
        #[arg(long, default_value_t = 5.0 / 60.0)]
        lambda: f64,
        /// Service rate per server
        #[arg(long, default_value_t = 8.0 / 60.0)]
        mu: f64,
        /// Number of servers
        #[arg(short, long, default_value_t = 1)]
        k: u32,
        /// Customers to serve before stopping
        #[arg(short, long, default_value_t = DEFAULT_TARGET_SERVED)]
        target: u64,
        #[arg(short, long, default_value_t = experiments::SINGLE_RUN_SEED)]
        seed: u64,
    },
    /// Sweep the arrival/service ratio 0.1..=1.0 on one server
    Sweep(SweepArgs),
    /// Sweep the ratio for one through four servers
    Servers(SweepArgs),
}

#[derive(Args)]
struct SweepArgs {
    /// Service rate per server
    #[arg(long, default_value_t = SWEEP_SERVICE_RATE)]
    mu: f64,
    #[arg(short, long, default_value_t = DEFAULT_TARGET_SERVED)]
    target: u64,
    #[arg(short, long, default_value_t = SWEEP_SEED)]
    seed: u64,
    /// Run sweep points on a rayon thread pool
    #[arg(long)]
    parallel: bool,
    /// Thread pool size for --parallel
    #[arg(long)]
    threads: Option<usize>,
}

impl SweepArgs {
    fn plan(&self, base: SweepPlan) -> SweepPlan {
        SweepPlan {
            service_rate: self.mu,
            target_served: self.target,
            seed: self.seed,
            ..base
        }
    }

    fn config(&self) -> SweepConfig {
        let mut config = SweepConfig::new();
        if self.parallel {
            config = config.with_concurrency(ConcurrencyMode::Rayon);
        }
        if let Some(threads) = self.threads {
            config = config.with_thread_pool_size(threads);
        }
        config
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            lambda,
            mu,
            k,
            target,
            seed,
        } => {
            let params = QueueParams::new(lambda, mu, k)?;
            let report = simulate(params, target, seed)?;
            if cli.json {
                println!("{}", to_json(&report)?);
            } else {
                println!("{report}");
                if let Ok(analytics) = MmkAnalytics::compute(&params) {
                    println!(
                        "Analytical: Lq = {:.6}, W = {:.6}, U = {:.6}",
                        analytics.lq, analytics.w, analytics.utilization
                    );
                }
            }
        }
        Commands::Sweep(args) => {
            let points = run_sweep(&args.plan(SweepPlan::utilization()), &args.config())?;
            print_sweep(&points, cli.json)?;
        }
        Commands::Servers(args) => {
            let points = run_sweep(&args.plan(SweepPlan::servers()), &args.config())?;
            print_sweep(&points, cli.json)?;
        }
    }

    Ok(())
}

fn print_sweep(
    points: &[experiments::SweepPoint],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", to_json(points)?);
    } else {
        print!("{}", format_sweep_table(points));
    }
    Ok(())
}
