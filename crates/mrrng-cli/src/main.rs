//! CLI for mrrng, a PRNG stirred by live operating-system counters.

mod commands;

use clap::{Parser, Subcommand};
use mrrng_core::{DEFAULT_OUTPUT, DEFAULT_WORDS};

#[derive(Parser)]
#[command(name = "mrrng")]
#[command(about = "mrrng: 64-bit PRNG fed by live OS counters, with a Shannon entropy meter")]
#[command(version = mrrng_core::VERSION)]
struct Cli {
    // No subcommand: reference run, 1 GiB to RNG.dat then the entropy report.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write generator output to a file and report its byte entropy
    Generate {
        /// Output file (created or truncated)
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output: String,

        /// Number of 64-bit words to write
        #[arg(long, default_value_t = DEFAULT_WORDS)]
        words: u64,

        /// Initial state (decimal or 0x-prefixed hex), bootstrapped before use
        #[arg(long, value_parser = commands::parse_seed)]
        seed: Option<u64>,

        /// Skip the entropy report after writing
        #[arg(long)]
        no_entropy: bool,
    },

    /// Report the Shannon entropy (bits/byte) of an existing file
    Entropy {
        /// File to measure
        path: String,
    },

    /// Write generator output to stdout (for piping into test batteries)
    Stream {
        /// Output format
        #[arg(long, default_value = "raw", value_parser = ["raw", "hex"])]
        format: String,

        /// Number of 64-bit words (0 = until the pipe closes)
        #[arg(long, default_value = "0")]
        words: u64,
    },

    /// Show which OS counters the native probe can read on this machine
    Probe,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        None => commands::generate::run(commands::generate::GenerateConfig::default()),
        Some(Commands::Generate {
            output,
            words,
            seed,
            no_entropy,
        }) => commands::generate::run(commands::generate::GenerateConfig {
            output: &output,
            words,
            seed,
            report_entropy: !no_entropy,
        }),
        Some(Commands::Entropy { path }) => commands::entropy::run(&path),
        Some(Commands::Stream { format, words }) => commands::stream::run(&format, words),
        Some(Commands::Probe) => commands::probe::run(),
    }
}
