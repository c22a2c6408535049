use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use symscan::{
    AnnotateConfig, CancelToken, ColorSource, MatchConfig, Pipeline, PipelineConfig,
    SymScanError,
};
use tracing_subscriber::EnvFilter;

mod wire;

use wire::{WireError, WireRequest, WireResponse};

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/request.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Find symbols in engineering drawings (JSON driven)")]
struct Cli {
    /// Request JSON file; reads stdin when omitted.
    #[arg(short, long, value_name = "FILE")]
    request: Option<PathBuf>,
    /// Write the response JSON here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Also write the annotated PNG to this file.
    #[arg(long, value_name = "FILE")]
    annotated_image: Option<PathBuf>,
    /// Abort the request after this many milliseconds.
    #[arg(long, value_name = "N")]
    timeout_ms: Option<u64>,
    /// Outline thickness in pixels.
    #[arg(long, value_name = "N", default_value_t = 2)]
    stroke_width: u32,
    /// Ignore template colors and use the palette only.
    #[arg(long)]
    palette_only: bool,
    /// Scan templates in parallel.
    #[arg(long)]
    parallel: bool,
    /// Print an example request and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive("symscan=info".parse()?)
                    .add_directive("symscan_cli=info".parse()?),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let text = read_request(cli.request.as_deref())?;
    match detect(&cli, &text) {
        Ok((response, png)) => {
            if let Some(path) = &cli.annotated_image {
                fs::write(path, png)?;
            }
            write_json(cli.output.as_deref(), &response)?;
            Ok(())
        }
        Err(err) => {
            tracing::warn!(kind = err.kind(), "request failed: {err}");
            write_json(cli.output.as_deref(), &WireError::from(&err))?;
            std::process::exit(1);
        }
    }
}

/// Runs one request, returning the response body and the annotated PNG.
fn detect(cli: &Cli, text: &str) -> Result<(WireResponse, Vec<u8>), SymScanError> {
    let wire: WireRequest = serde_json::from_str(text).map_err(|err| SymScanError::Validation {
        reason: format!("malformed request JSON: {err}"),
    })?;
    let request = wire.into_request()?;

    let pipeline = Pipeline::new(PipelineConfig {
        matching: MatchConfig {
            parallel: cli.parallel,
            ..MatchConfig::default()
        },
        annotate: AnnotateConfig {
            stroke_width: cli.stroke_width,
        },
        color_source: if cli.palette_only {
            ColorSource::Palette
        } else {
            ColorSource::TemplateColor
        },
        ..PipelineConfig::default()
    })?;
    let cancel = match cli.timeout_ms {
        Some(ms) => CancelToken::with_timeout(Duration::from_millis(ms)),
        None => CancelToken::new(),
    };

    let report = pipeline.run(&request, &cancel)?;
    tracing::info!(
        symbols = report.symbol_count(),
        skipped = report.skipped.len(),
        "request complete"
    );
    let response = WireResponse::from_report(&report, &request);
    Ok((response, report.annotated_png))
}

fn read_request(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn write_json<T: Serialize>(
    path: Option<&Path>,
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
