//! Analysis commands.

use std::path::PathBuf;

use anyhow::Result;
use busybee_core::{AnalysisKind, AnalysisResult, AppContext, Completion, RequestState};
use busybee_export::ExportFormat;
use clap::{Args, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::output;

#[derive(Subcommand)]
pub enum AnalyzeCommands {
    /// Analyze competing listings for a product idea
    Product(AnalyzeArgs),

    /// Analyze competing shops for a shop concept
    Shop(AnalyzeArgs),

    /// Analyze a keyword and related keywords
    Keyword(AnalyzeArgs),
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// What to analyze
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Rendering and export options shared by `analyze` and `history rerun`.
#[derive(Args, Clone, Default)]
pub struct OutputArgs {
    /// Export formats to write (csv, json, doc)
    #[arg(short, long, value_delimiter = ',')]
    pub export: Vec<ExportFormat>,

    /// Directory for exported files (defaults to the configured export dir)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Also export the related-keyword list (keyword analyses only)
    #[arg(long)]
    pub related_keywords: bool,

    /// Print the raw records as JSON instead of the formatted report
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(cmd: AnalyzeCommands, ctx: &AppContext) -> Result<()> {
    let (kind, args) = match cmd {
        AnalyzeCommands::Product(args) => (AnalysisKind::Product, args),
        AnalyzeCommands::Shop(args) => (AnalysisKind::Shop, args),
        AnalyzeCommands::Keyword(args) => (AnalysisKind::Keyword, args),
    };

    run_analysis(ctx, &args.query.join(" "), kind, &args.output).await
}

/// Submit one analysis, show progress until it settles, then render and
/// export the outcome. Ctrl-C cancels the request.
pub async fn run_analysis(
    ctx: &AppContext,
    query: &str,
    kind: AnalysisKind,
    opts: &OutputArgs,
) -> Result<()> {
    let controller = ctx.controller();

    let spinner = spinner();
    let progress = track_progress(controller.subscribe(), spinner.clone());

    let outcome = tokio::select! {
        completion = controller.submit(query, kind) => Some(completion),
        _ = tokio::signal::ctrl_c() => {
            controller.cancel();
            None
        }
    };

    progress.abort();
    spinner.finish_and_clear();

    if let Some(completion) = outcome {
        if completion? == Completion::Discarded {
            debug!("Result superseded before it could be shown");
        }
    }

    match controller.state() {
        RequestState::Success { result, .. } => {
            show(&result, opts)?;
            export(ctx, &result, opts);
            Ok(())
        }
        RequestState::Failed { category, message } => {
            debug!(category = %category, "Analysis failed");
            anyhow::bail!(message)
        }
        RequestState::Idle | RequestState::Loading { .. } => {
            eprintln!("{} Analysis cancelled.", "⚠".yellow().bold());
            Ok(())
        }
    }
}

fn spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    bar.enable_steady_tick(std::time::Duration::from_millis(100));
    bar
}

/// Mirror controller state changes onto the spinner until the request
/// settles.
fn track_progress(mut states: broadcast::Receiver<RequestState>, bar: ProgressBar) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match states.recv().await {
                Ok(RequestState::Loading { query, kind }) => {
                    bar.set_message(format!("Analyzing {} \"{}\"...", kind.slug(), query));
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Ok(_) | Err(broadcast::error::RecvError::Closed) => {
                    bar.finish_and_clear();
                    break;
                }
            }
        }
    })
}

fn show(result: &AnalysisResult, opts: &OutputArgs) -> Result<()> {
    if opts.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        output::print_result(result);
    }
    Ok(())
}

/// Write every requested export. A failed export is reported and the rest
/// still run.
fn export(ctx: &AppContext, result: &AnalysisResult, opts: &OutputArgs) {
    let dir = opts.out.clone().unwrap_or_else(|| ctx.config().export_dir());

    for format in &opts.export {
        match busybee_export::export(result, *format, &dir) {
            Ok(path) => output::print_exported(*format, &path),
            Err(e) => output::print_export_error(*format, &e),
        }
    }

    if !opts.related_keywords {
        return;
    }

    for format in related_formats(&opts.export) {
        match busybee_export::export_related_keywords(result, format, &dir) {
            Ok(path) => output::print_exported(format, &path),
            Err(e) => output::print_export_error(format, &e),
        }
    }
}

/// Formats for the related-keyword projection: the requested CSV/JSON
/// formats, or both when none were requested.
fn related_formats(requested: &[ExportFormat]) -> Vec<ExportFormat> {
    let formats: Vec<ExportFormat> = requested
        .iter()
        .copied()
        .filter(|f| *f != ExportFormat::Document)
        .collect();

    if formats.is_empty() {
        vec![ExportFormat::Csv, ExportFormat::Json]
    } else {
        formats
    }
}
