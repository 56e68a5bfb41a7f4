//! `ipgen`: write a file of random IPv4 addresses, one per line.
//!
//! ```text
//! ipgen [FILE] [SIZE_MB]
//! ```
//!
//! An invalid or non-positive size falls back to 10 MB.

use clap::Parser;
use ipcount::generator::{self, BYTES_PER_MB, DEFAULT_SIZE_MB};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a file of random IP addresses", long_about = None)]
struct Cli {
    /// Output file
    #[arg(value_name = "FILE", default_value = "result.txt")]
    file: PathBuf,

    /// Target size in megabytes
    #[arg(value_name = "SIZE_MB", allow_hyphen_values = true)]
    size_mb: Option<String>,
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

    let start = Instant::now();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            process::exit(1);
        }
    };

    let size_mb = match cli.size_mb.as_deref() {
        None => DEFAULT_SIZE_MB,
        Some(raw) => generator::parse_size_mb(raw).unwrap_or_else(|| {
            println!(
                "Incorrect file size value, default value is used: {} MB",
                DEFAULT_SIZE_MB
            );
            DEFAULT_SIZE_MB
        }),
    };

    let file = match File::create(&cli.file) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Error when creating '{}': {}", cli.file.display(), err);
            process::exit(1);
        }
    };

    let target_bytes = size_mb.saturating_mul(BYTES_PER_MB);
    let mut writer = BufWriter::new(file);
    let mut rng = rand::thread_rng();
    if let Err(err) = generator::write_random_ips(&mut writer, &mut rng, target_bytes) {
        eprintln!("Error when writing to '{}': {}", cli.file.display(), err);
        process::exit(1);
    }

    println!(
        "File `{}` was successfully created with size {} MB",
        cli.file.display(),
        size_mb
    );
    println!("Execution time: {:?}", start.elapsed());
}
