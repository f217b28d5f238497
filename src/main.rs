use anyhow::Result;
use clap::Parser;
use habitat_lib::headless::{self, HeadlessOptions};
use habitat_lib::{init_logging, AppConfig, SimulationClock};
use std::io::Write;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "habitat.toml")]
    config: String,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Seed override; takes precedence over the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print a population summary every N ticks (0 disables)
    #[arg(short, long, default_value_t = 100)]
    report_every: u64,

    /// Emit summaries as JSON lines
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = AppConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    config.validate()?;

    if args.dump_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut clock = SimulationClock::new(config)?;
    let options = HeadlessOptions {
        ticks: args.ticks,
        report_every: args.report_every,
        json: args.json,
        ..Default::default()
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let totals = headless::run(&mut clock, &options, &mut out)?;
    tracing::info!(
        seed = totals.seed,
        ticks = totals.ticks_run,
        births = totals.births,
        deaths = totals.deaths,
        kills = totals.kills,
        population = totals.final_population,
        "Run finished"
    );
    if args.json {
        serde_json::to_writer(&mut out, &totals)?;
        writeln!(out)?;
    }
    Ok(())
}
