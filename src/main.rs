use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use seequell::{
    capture, AnalyzerConfig, CanonicalizerKind, JsonRenderer, QueryAnalyzer, Renderer,
    SqlDialect, TextRenderer,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Parser)]
#[clap(
    name = "seequell",
    version,
    about = "Per-request SQL query report: duplicates, slow queries and timing"
)]
struct Arguments {
    /// Capture files to analyze, one request per file
    #[clap(value_name = "CAPTURE_FILES", required = true)]
    captures: Vec<PathBuf>,

    /// JSON file with analyzer settings
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Slow query threshold in seconds (default 1.0)
    #[clap(short = 't', long, value_name = "SECONDS")]
    threshold: Option<f64>,

    /// How SQL text is canonicalized for duplicate detection
    #[clap(long, value_enum)]
    canonicalizer: Option<CanonicalizerKind>,

    /// SQL dialect used to parse statements
    #[clap(long, value_enum)]
    dialect: Option<SqlDialect>,

    /// Request duration in seconds, required for captures that are bare query lists
    #[clap(long, value_name = "SECONDS")]
    request_duration: Option<f64>,

    /// Output format for reports
    #[clap(long, value_enum, default_value = "text")]
    output_format: OutputFormat,

    /// Show only the metrics table
    #[clap(long)]
    summary: bool,

    /// Write reports to this file instead of stdout; `-` means stdout
    #[clap(short = 'o', long, value_name = "FILE")]
    outfile: Option<String>,

    /// Don't print anything besides the reports, not even a progress bar
    #[clap(short = 'q', long)]
    quiet: bool,
}

#[derive(Debug, ValueEnum, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Arguments::parse();
    let start_time = Instant::now();

    validate_arguments(&args)?;
    let config = resolve_config(&args)?;
    debug!("Analyzer configuration: {:?}", config);

    let analyzer = QueryAnalyzer::with_config(&config);
    let mut renderer = create_renderer(&args)?;

    let progress_bar = if !args.quiet && args.captures.len() > 1 {
        Some(create_progress_bar(args.captures.len() as u64))
    } else {
        None
    };

    let mut processed = 0usize;
    let mut last_error = None;
    for (index, path) in args.captures.iter().enumerate() {
        if let Some(pb) = &progress_bar {
            pb.set_message(format!("Analyzing {}", path.display()));
            pb.set_position(index as u64);
        }

        match process_capture(path, &analyzer, renderer.as_mut(), &args) {
            Ok(()) => processed += 1,
            Err(e) => {
                warn!("Failed to analyze {}: {:#}", path.display(), e);
                last_error = Some(e.context(format!("failed to analyze {}", path.display())));
                continue;
            }
        }
    }

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("Analysis complete");
    }

    if processed == 0 {
        return Err(match last_error {
            Some(e) => e.context("no capture could be analyzed"),
            None => anyhow::anyhow!("no capture could be analyzed"),
        });
    }

    info!("Analyzed {} of {} captures", processed, args.captures.len());
    if !args.quiet {
        eprintln!(
            "Analyzed {} capture(s) in {:.2}s",
            processed,
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn validate_arguments(args: &Arguments) -> anyhow::Result<()> {
    for path in &args.captures {
        if !path.is_file() {
            bail!("capture file does not exist: {}", path.display());
        }
    }

    if let Some(duration) = args.request_duration {
        if !duration.is_finite() || duration < 0.0 {
            bail!(
                "request duration must be a non-negative number of seconds, got {}",
                duration
            );
        }
    }

    Ok(())
}

fn resolve_config(args: &Arguments) -> anyhow::Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => AnalyzerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config = config.with_threshold(threshold);
    }
    if let Some(kind) = args.canonicalizer {
        config = config.with_canonicalizer(kind);
    }
    if let Some(dialect) = args.dialect {
        config = config.with_dialect(dialect);
    }

    config.validate()?;
    Ok(config)
}

fn create_renderer(args: &Arguments) -> anyhow::Result<Box<dyn Renderer>> {
    let sink: Box<dyn Write> = match args.outfile.as_deref() {
        Some(outfile) if outfile != "-" => {
            let file = File::create(outfile)
                .with_context(|| format!("failed to create {}", outfile))?;
            info!("Writing reports to {}", outfile);
            Box::new(BufWriter::new(file))
        }
        _ => Box::new(io::stdout().lock()),
    };

    let renderer: Box<dyn Renderer> = match args.output_format {
        OutputFormat::Text => {
            Box::new(TextRenderer::new(sink).with_summary_only(args.summary))
        }
        OutputFormat::Json => Box::new(JsonRenderer::new(sink)),
    };
    Ok(renderer)
}

fn process_capture(
    path: &Path,
    analyzer: &QueryAnalyzer,
    renderer: &mut dyn Renderer,
    args: &Arguments,
) -> anyhow::Result<()> {
    let capture = capture::load(path, args.request_duration)?;
    if capture.queries.is_empty() {
        info!("No queries recorded in {}", path.display());
    }

    let report = analyzer.analyze(&capture.queries, capture.duration)?;
    debug!(
        "{}: {} queries, {} duplicate groups, {} slow",
        path.display(),
        report.metrics().query_count,
        report.metrics().duplicate_group_count,
        report.metrics().slow_query_count
    );

    renderer.render(&report, capture.request.as_ref())?;
    Ok(())
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
