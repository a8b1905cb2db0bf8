//! Split L1 cache simulator CLI.
//!
//! This binary replays a trace file against the split L1. It performs:
//! 1. **Configuration:** Built-in defaults, an optional JSON file, then command-line overrides.
//! 2. **Replay:** Each trace event is executed in order; messages to L2 are printed in mode 1.
//! 3. **Reporting:** Contents and statistics on each report request (and at the end with
//!    `--final-report`).

mod console;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use l1sim_core::config::{CoherenceModel, Config, DisplayMode, InclusionPolicy};
use l1sim_core::Simulator;

use crate::console::{Console, ConsoleSink};

#[derive(Parser, Debug)]
#[command(
    name = "l1sim",
    author,
    version,
    about = "Trace-driven split L1 cache simulator",
    long_about = "Replay a memory trace against a 4-way data cache and a 2-way \
        instruction cache.\n\n\
        Trace lines are `<op> <hex-address>` with op 0 = read, 1 = write, 2 = fetch,\n\
        3 = eviction from L2, 8 = reset, 9 = print contents and statistics.\n\n\
        Examples:\n  \
        l1sim traces/cc.trace\n  \
        l1sim traces/cc.trace --mode 1 --hit-show\n  \
        l1sim traces/cc.trace --config l1.json --json --final-report"
)]
struct Cli {
    /// Trace file to replay.
    trace: PathBuf,

    /// Display mode: 0 = contents and statistics, 1 = also messages between L1 and L2.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=1))]
    mode: Option<u8>,

    /// In mode 1, also print hits.
    #[arg(long)]
    hit_show: bool,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat an L2 eviction of a block absent from L1 as an error.
    #[arg(long)]
    strict_inclusion: bool,

    /// Report line state as MESI letters instead of valid/dirty bits.
    #[arg(long)]
    mesi: bool,

    /// Print reports as JSON.
    #[arg(long)]
    json: bool,

    /// Print one more report after the last trace event.
    #[arg(long)]
    final_report: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli);
    debug!(?config, "effective configuration");
    cmd_run(&cli.trace, &config, cli.json);
}

/// Builds the effective configuration: file (or defaults), then flag overrides.
///
/// Exits the process with code 1 if the file cannot be loaded or the result is invalid.
fn load_config(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            eprintln!("[!] FATAL: {}: {}", path.display(), e);
            process::exit(1);
        }),
        None => Config::default(),
    };

    if let Some(mode) = cli.mode.and_then(DisplayMode::from_level) {
        config.general.mode = mode;
    }
    if cli.hit_show {
        config.general.hit_show = true;
    }
    if cli.strict_inclusion {
        config.inclusion = InclusionPolicy::Strict;
    }
    if cli.mesi {
        config.coherence = CoherenceModel::Mesi;
    }
    if cli.final_report {
        config.general.final_report = true;
    }

    if let Err(e) = config.validate() {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    }
    config
}

/// Replays the trace, printing per-event output and reports as configured.
///
/// Inclusion violations are printed and skipped. A corrupted LRU stack or
/// an I/O error ends the run with exit code 1.
fn cmd_run(trace: &Path, config: &Config, json: bool) {
    let file = File::open(trace).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: Could not open trace '{}': {}", trace.display(), e);
        process::exit(1);
    });

    let mut sim = Simulator::new(config);
    let mut console = Console::new(config.general.mode, config.general.hit_show);
    let mut sink = ConsoleSink::new(json);

    if !json {
        println!("[*] Trace: {}", trace.display());
        println!(
            "    L1-D {} ways, L1-I {} ways, {:?} inclusion, {:?} line state",
            config.data.ways, config.instruction.ways, config.inclusion, config.coherence
        );
    }

    let summary = sim
        .run_observed(BufReader::new(file), &mut console, &mut sink)
        .unwrap_or_else(|e| {
            eprintln!("\n[!] FATAL: {e}");
            process::exit(1);
        });

    if config.general.final_report {
        sim.report(&mut sink);
    }

    if !json {
        println!(
            "[*] Trace finished: {} events, {} inclusion violations",
            summary.events, summary.inclusion_violations
        );
    }
}
