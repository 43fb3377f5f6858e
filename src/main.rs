//! Command-line interface for the ADCP parser.
//!
//! Converts raw `.adcp` dumps and `.json` interchange files to Parquet or
//! JSON, or lists their collections.

use adcp_parser::display::{collection_label, describe_metadata};
use adcp_parser::{AdcpReaderBuilder, Collection, JsonWriter, ParquetWriter};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn, LevelFilter};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    Parquet,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert ADCP profiler logs to Parquet or JSON",
    long_about = "Decodes raw ADCP instrument dumps (.adcp) and structured JSON logs into \
                  profiling collections.\n\n\
                  Malformed lines are reported and skipped; a file that cannot be read is \
                  reported and the remaining files are still processed."
)]
struct Args {
    /// A log file, or a directory containing .adcp/.txt/.log/.json files
    #[arg(value_name = "IN_PATH")]
    in_path: PathBuf,

    /// Root output directory for converted files
    #[arg(short, long, value_name = "OUT_ROOT", required_unless_present = "list")]
    out_root: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputKind::Parquet)]
    format: OutputKind,

    /// Number of rows per Parquet file chunk
    #[arg(long, default_value = "50000")]
    chunk_size: usize,

    /// Print collections and their metadata instead of writing output
    #[arg(long)]
    list: bool,

    /// Do not log each malformed line, only the per-file count
    #[arg(long)]
    quiet_warnings: bool,
}

fn is_log_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref(),
        Some("adcp") | Some("txt") | Some("log") | Some("json")
    )
}

fn collect_inputs(in_path: &Path) -> Result<Vec<PathBuf>> {
    if in_path.is_file() {
        return Ok(vec![in_path.to_path_buf()]);
    }
    if !in_path.is_dir() {
        anyhow::bail!("'{}' is not a file or directory", in_path.display());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(in_path)
        .with_context(|| format!("reading directory {}", in_path.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_log_file(path))
        .collect();
    files.sort();
    Ok(files)
}

fn load_one_file(input_file: &Path, quiet_warnings: bool) -> Result<Vec<Collection>> {
    let reader = AdcpReaderBuilder::new()
        .log_warnings(!quiet_warnings)
        .from_file(input_file)?;
    info!("   ├─ Format: {:?}", reader.format());

    let t0 = Instant::now();
    let log = reader.read_all_with_warnings()?;
    info!(
        "   ├─ Read {} collection(s) in {:.2?}",
        log.collections.len(),
        t0.elapsed()
    );
    if log.has_warnings() {
        warn!("   ├─ Skipped {} malformed line(s)", log.warnings.len());
    }

    Ok(log.collections)
}

fn list_collections(file_name: &str, collections: &[Collection]) {
    for (idx, collection) in collections.iter().enumerate() {
        let timestamp = collection
            .timestamp()
            .map(|ts| ts.to_string())
            .unwrap_or_else(|| "unknown time".to_string());
        info!(
            "   ├─ {}: {} point(s), {}",
            collection_label(file_name, idx),
            collection.len(),
            timestamp
        );
        for line in describe_metadata(file_name, idx, collection) {
            info!("   │    {}", line);
        }
    }
}

fn write_one_file(
    collections: &[Collection],
    stem: &str,
    out_root: &Path,
    args: &Args,
) -> Result<()> {
    let t1 = Instant::now();
    match args.format {
        OutputKind::Parquet => {
            let output_dir = out_root.join(format!("filename={}", stem));
            fs::create_dir_all(&output_dir)?;
            let stats = ParquetWriter::new(&output_dir)
                .chunk_size(args.chunk_size)
                .write_with_stats(collections)?;
            info!("   ├─ Wrote Parquet in {:.2?}", t1.elapsed());
            info!("   ├─ {}", stats.summary());
        }
        OutputKind::Json => {
            let output_file = out_root.join(format!("{}.json", stem));
            JsonWriter::new(&output_file).write(collections)?;
            info!(
                "   ├─ Wrote {} in {:.2?}",
                output_file.display(),
                t1.elapsed()
            );
        }
    }
    Ok(())
}

fn process_one_file(input_file: &Path, args: &Args) -> Result<()> {
    let start_time = Instant::now();
    let file_name = input_file
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    let stem = input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    info!("📄 Processing: {}", input_file.display());

    let collections = load_one_file(input_file, args.quiet_warnings)?;

    if args.list {
        list_collections(file_name, &collections);
    } else if collections.is_empty() {
        info!("   ├─ No collections with data, nothing to write");
    } else if let Some(out_root) = &args.out_root {
        write_one_file(&collections, stem, out_root, args)?;
    }

    info!("   └─ ✓ Total time: {:.2?}\n", start_time.elapsed());
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let inputs = collect_inputs(&args.in_path)?;
    if inputs.is_empty() {
        info!("No log files found in {}", args.in_path.display());
        return Ok(());
    }

    info!("");
    info!("╔════════════════════════════════════════════╗");
    info!("║        ADCP Log → Collection Parser        ║");
    info!("╚════════════════════════════════════════════╝");
    info!("");
    info!(
        "📂 Found {} log file(s) in {}",
        inputs.len(),
        args.in_path.display()
    );
    if let Some(out_root) = &args.out_root {
        info!("📁 Output directory: {}", out_root.display());
    }
    info!("");

    let total_start = Instant::now();
    let mut failed = 0;

    for (idx, input_file) in inputs.iter().enumerate() {
        info!("[{}/{}]", idx + 1, inputs.len());

        // One bad file does not stop the run
        if let Err(e) = process_one_file(input_file, &args) {
            log::error!("   └─ ✗ Error: {:#}", e);
            log::error!("");
            failed += 1;
            continue;
        }
    }

    info!("═══════════════════════════════════════════");
    info!(
        "🏁 {} file(s) processed, {} failed, in {:.2?}",
        inputs.len() - failed,
        failed,
        total_start.elapsed()
    );
    info!("");

    Ok(())
}
