/*
 * Copyright 2025 Vijaykumar Singh
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! vector-audit - batch validation of stored receipt embeddings

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use receiptvec::{
    audit_lines, chunk_lines, AuditMode, Config, EmbeddingNormalizer, LineOutcome,
    ProcessingStats, TracingObserver, VectorEvent, VectorObserver,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Reject malformed or mis-sized vectors
    Parse,
    /// Repair dimensions and L2-normalize
    Convert,
}

impl From<Mode> for AuditMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Parse => AuditMode::Parse,
            Mode::Convert => AuditMode::Convert,
        }
    }
}

#[derive(Parser)]
#[command(name = "vector-audit")]
#[command(about = "Validate, repair and normalize embedding vectors from a JSON Lines file")]
struct Args {
    #[arg(short, long, default_value = "receiptvec.toml")]
    config: PathBuf,

    /// JSON Lines input, one raw vector per line
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Mode::Parse)]
    mode: Mode,

    /// Override the configured target dimensionality
    #[arg(short, long)]
    dimensions: Option<usize>,

    #[arg(short, long)]
    workers: Option<usize>,

    /// Write per-line results as JSON Lines
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = if args.config.exists() {
        Config::load(&args.config)
            .with_context(|| format!("Failed to load {}", args.config.display()))?
    } else {
        Config::default()
    };
    if let Some(dimensions) = args.dimensions {
        config.embedding.dimensions = dimensions;
        config.validate().context("Invalid --dimensions override")?;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();

    if !args.config.exists() {
        info!("Configuration file not found, using defaults");
    }

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let lines: Vec<(usize, String)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.to_string()))
        .collect();

    let workers = args.workers.unwrap_or_else(num_cpus::get).max(1);
    let mode = AuditMode::from(args.mode);
    let normalizer = EmbeddingNormalizer::new(config.embedding.normalizer_config());
    let observer: Arc<dyn VectorObserver> = Arc::new(TracingObserver);

    info!(
        "🚀 Auditing {} lines from {} ({:?} mode, {} dimensions, {} workers)",
        lines.len(),
        args.input.display(),
        mode,
        config.embedding.dimensions,
        workers
    );

    let mut handles = Vec::with_capacity(workers);
    for (index, chunk) in chunk_lines(lines, workers).into_iter().enumerate() {
        let normalizer = normalizer.clone();
        let observer = observer.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            audit_lines(&format!("worker-{}", index), chunk, mode, &normalizer, observer)
        }));
    }

    let mut outcomes: Vec<LineOutcome> = Vec::new();
    let mut stats = ProcessingStats::new();
    for handle in handles {
        let (chunk_outcomes, chunk_stats) = handle.await.context("Audit worker panicked")?;
        outcomes.extend(chunk_outcomes);
        stats.merge(&chunk_stats);
    }

    observer.on_event(&VectorEvent::BatchSummary {
        label: "all".to_string(),
        summary: stats.summary(),
    });

    if let Some(path) = &args.output {
        if let Err(e) = write_outcomes(path, &outcomes) {
            error!("Failed to write results: {:#}", e);
            return Err(e);
        }
        info!("Wrote {} results to {}", outcomes.len(), path.display());
    }

    Ok(())
}

fn write_outcomes(path: &Path, outcomes: &[LineOutcome]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for outcome in outcomes {
        serde_json::to_writer(&mut writer, outcome)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
