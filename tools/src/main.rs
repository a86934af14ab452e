use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codec::Limits;
use glob::Pattern;
use sflow_tools::{decode_dump, format_decode_pretty, inspect_dump, verify_dump, InspectReport};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sflow-tools",
    version,
    about = "sFlow v5 dump inspection and decoding tools"
)]
struct Cli {
    /// Largest datagram accepted, in bytes.
    #[arg(long, global = true)]
    max_datagram_bytes: Option<usize>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect datagram headers and sample summaries.
    Inspect {
        /// Path to a dump file or a directory of dumps.
        dump_path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected dumps.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected dumps (after sorting).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Decode datagrams into structured output.
    Decode {
        /// Path to the dump file.
        dump_file: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DecodeFormat::Json)]
        format: DecodeFormat,
    },
    /// Re-encode each datagram and compare it with the captured bytes.
    Verify {
        /// Path to the dump file.
        dump_file: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecodeFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut limits = Limits::default();
    if let Some(max) = cli.max_datagram_bytes {
        limits.max_datagram_bytes = max;
    }

    match cli.command {
        Command::Inspect {
            dump_path,
            glob,
            sort,
            limit,
        } => {
            if dump_path.is_dir() {
                let entries = collect_dump_entries(&dump_path, glob.as_deref())?;
                let mut entries = maybe_sort_entries(entries, sort);
                let limit = limit.or(sort.map(|InspectSort::Size| 10));
                if let Some(limit) = limit {
                    entries.truncate(limit);
                }
                for entry in entries {
                    let bytes = read_dump(&entry.path)?;
                    let reports = inspect_dump(&bytes, &limits)?;
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    print_inspect_reports(&reports);
                }
            } else {
                let bytes = read_dump(&dump_path)?;
                let reports = inspect_dump(&bytes, &limits)?;
                print_inspect_reports(&reports);
            }
        }
        Command::Decode { dump_file, format } => {
            let bytes = read_dump(&dump_file)?;
            let datagrams = decode_dump(&bytes, &limits)?;
            match format {
                DecodeFormat::Json => {
                    let json =
                        serde_json::to_string_pretty(&datagrams).context("serialize json")?;
                    println!("{json}");
                }
                DecodeFormat::Pretty => {
                    print!("{}", format_decode_pretty(&datagrams));
                }
            }
        }
        Command::Verify { dump_file } => {
            let bytes = read_dump(&dump_file)?;
            let outcomes = verify_dump(&bytes, &limits)?;
            let mut mismatches = 0;
            for outcome in &outcomes {
                let status = if outcome.identical { "ok" } else { "DIFF" };
                println!(
                    "offset {}: {} bytes, re-encoded {} bytes: {status}",
                    outcome.offset, outcome.length, outcome.reencoded_length
                );
                if !outcome.identical {
                    warn!(offset = outcome.offset, "re-encoded datagram differs");
                    mismatches += 1;
                }
            }
            if mismatches > 0 {
                bail!("{mismatches} of {} datagrams differ", outcomes.len());
            }
            info!(datagrams = outcomes.len(), "all datagrams re-encode identically");
        }
    }
    Ok(())
}

fn read_dump(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read dump {}", path.display()))
}

struct DumpEntry {
    path: PathBuf,
    size: u64,
}

fn collect_dump_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<DumpEntry>> {
    let mut entries = Vec::new();
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(DumpEntry { path, size });
    }
    Ok(entries)
}

fn maybe_sort_entries(mut entries: Vec<DumpEntry>, sort: Option<InspectSort>) -> Vec<DumpEntry> {
    match sort {
        Some(InspectSort::Size) => {
            entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        }
        None => {}
    }
    entries
}

fn print_inspect_reports(reports: &[InspectReport]) {
    for report in reports {
        let header = &report.header;
        println!(
            "offset {} ({} bytes): version {} agent {} sub_agent {}",
            report.offset,
            report.length,
            header.version,
            header.agent_address,
            header.sub_agent_id
        );
        println!(
            "  seq: {} uptime: {}ms samples: {}",
            header.sequence_number, header.uptime, header.sample_count
        );
        for sample in &report.samples {
            let source = sample
                .source_id
                .map(|id| format!("{}:{}", id.source_type, id.index))
                .unwrap_or_else(|| "-".to_string());
            let seq = sample
                .sequence_number
                .map_or_else(|| "-".to_string(), |seq| seq.to_string());
            println!(
                "  {} (tag {}): seq {seq} source {source} records {:?}",
                sample.kind, sample.tag, sample.record_tags
            );
        }
    }
}
