#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{
    fmt::Display,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use swatchbook::{
    kmeans::DEFAULT_MAX_ITERATIONS, loader, Backend, ClusterCount, ColorRecord, DominantColors,
    Error, KmeansOptions,
};

#[derive(Copy, Clone, ValueEnum)]
enum CliBackend {
    Auto,
    Standard,
    Accelerated,
}

impl CliBackend {
    fn resolve(self) -> Backend {
        match self {
            CliBackend::Auto => Backend::probe(),
            CliBackend::Standard => Backend::Standard,
            CliBackend::Accelerated => Backend::Accelerated,
        }
    }
}

impl Display for CliBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CliBackend::Auto => "auto",
                CliBackend::Standard => "standard",
                CliBackend::Accelerated => "accelerated",
            }
        )
    }
}

/// Print the dominant colors of an image, most common first.
#[derive(Parser)]
#[command(version)]
struct Options {
    /// Number of colors to extract
    #[arg(short = 'k', long = "colors", default_value_t = ClusterCount::DEFAULT, value_parser = parse_cluster_count)]
    k: ClusterCount,

    /// Seed for centroid initialization; random if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of refinement iterations
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: u32,

    /// Clustering backend; `auto` probes for the best one at startup
    #[arg(long, default_value_t = CliBackend::Auto)]
    backend: CliBackend,

    /// Worker threads for the accelerated backend (0 = one per core)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Print the records as a JSON array
    #[arg(long)]
    json: bool,

    /// Log progress and timings to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Path to the image
    input: PathBuf,
}

fn parse_cluster_count(s: &str) -> Result<ClusterCount, String> {
    let value: u16 = s.parse().map_err(|e| format!("{e}"))?;
    value.try_into().map_err(|e: Error| format!("{e}"))
}

fn print_records(records: &[ColorRecord], json: bool) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, records)?;
        writeln!(stdout)?;
    } else {
        for record in records {
            writeln!(stdout, "{record}")?;
        }
    }
    Ok(())
}

fn run(options: Options) -> Result<Vec<ColorRecord>, Box<dyn std::error::Error>> {
    let Options {
        k,
        seed,
        max_iterations,
        backend,
        threads,
        input,
        ..
    } = options;

    macro_rules! timed {
        ($name: literal, $val: expr) => {{
            let time = std::time::Instant::now();
            let value = $val;
            log::debug!("{} took {}ms", $name, time.elapsed().as_millis());
            value
        }};
    }

    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    // probed once, after the thread pool is configured
    let backend = backend.resolve();
    log::info!("using the {backend} backend");

    let pixels = timed!("loading image", loader::load_pixels(&input)?);

    let mut kmeans = KmeansOptions::new().max_iterations(max_iterations);
    if let Some(seed) = seed {
        kmeans = kmeans.seed(seed);
    }

    let records = timed!(
        "clustering",
        DominantColors::new(&pixels, backend)
            .num_colors(k)
            .options(kmeans)
            .records()?
    );

    Ok(records)
}

fn main() -> ExitCode {
    let options = Options::parse();

    env_logger::Builder::new()
        .filter_level(if options.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let json = options.json;
    match run(options).and_then(|records| Ok(print_records(&records, json)?)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
