//! `ipcount`: count the distinct lines of a newline-delimited IP list.
//!
//! ```text
//! ipcount [INPUT] [ENGINE] [OPTIONS]
//! ```
//!
//! `ENGINE` is `1` for the Bloom filter (default) or `2` for the exact set.

use clap::{Parser, ValueEnum};
use ipcount::config::{RunConfig, DEFAULT_INPUT};
use ipcount::core::EngineKind;
use ipcount::filters::{BloomConfig, BloomLayout};
use ipcount::hash::IndexScheme;
use ipcount::{driver, CounterError};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Count distinct IP addresses in a text file", long_about = None)]
struct Cli {
    /// Input file, one address per line
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Engine: 1 = Bloom filter, 2 = exact set
    #[arg(value_name = "ENGINE", default_value = "1")]
    engine: String,

    /// Reader and pool thread count (default: number of CPUs)
    #[arg(short = 'w', long, value_name = "N")]
    workers: Option<usize>,

    /// Capacity of the reader → pool queue
    #[arg(long, value_name = "N")]
    queue_capacity: Option<usize>,

    /// Bloom filter size in bits
    #[arg(long, value_name = "BITS")]
    bloom_bits: Option<usize>,

    /// Number of Bloom hash functions
    #[arg(long, value_name = "K")]
    bloom_hashes: Option<usize>,

    /// How the Bloom index hashes are derived
    #[arg(long, value_enum, default_value_t = CliHashScheme::Xxh3)]
    hash_scheme: CliHashScheme,

    /// Placement of a key's bits in the Bloom filter
    #[arg(long, value_enum, default_value_t = CliLayout::Classic)]
    layout: CliLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliHashScheme {
    Xxh3,
    Fnv1a,
    #[value(name = "fnv32-reference")]
    Fnv32Reference,
}

impl From<CliHashScheme> for IndexScheme {
    fn from(scheme: CliHashScheme) -> Self {
        match scheme {
            CliHashScheme::Xxh3 => IndexScheme::Xxh3,
            CliHashScheme::Fnv1a => IndexScheme::Fnv1a,
            CliHashScheme::Fnv32Reference => IndexScheme::Fnv32Reference,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliLayout {
    Classic,
    #[value(name = "word-blocked")]
    WordBlocked,
}

impl From<CliLayout> for BloomLayout {
    fn from(layout: CliLayout) -> Self {
        match layout {
            CliLayout::Classic => BloomLayout::Classic,
            CliLayout::WordBlocked => BloomLayout::WordBlocked,
        }
    }
}

impl Cli {
    fn into_config(self) -> Result<RunConfig, CounterError> {
        let engine = EngineKind::from_selector(&self.engine)?;

        let mut bloom = BloomConfig::default()
            .with_scheme(self.hash_scheme.into())
            .with_layout(self.layout.into());
        if let Some(bits) = self.bloom_bits {
            bloom.bits = bits;
        }
        match self.bloom_hashes {
            Some(hashes) => bloom.hashes = hashes,
            None if bloom.scheme == IndexScheme::Fnv32Reference => {
                bloom.hashes = IndexScheme::REFERENCE_HASH_COUNT;
            }
            None => {}
        }

        let mut builder = RunConfig::builder()
            .input(self.input)
            .engine(engine)
            .bloom(bloom);
        if let Some(workers) = self.workers {
            builder = builder.workers(workers);
        }
        if let Some(capacity) = self.queue_capacity {
            builder = builder.queue_capacity(capacity);
        }
        builder.build()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            process::exit(1);
        }
    };

    let report = cli.into_config().and_then(driver::run);
    match report {
        Ok(report) => println!("{}", report),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
