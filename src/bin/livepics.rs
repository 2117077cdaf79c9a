use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "livepics", version)]
struct Cli {
    /// Log more (repeat for trace output).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an edit script and export the book as an animated GIF.
    Export(ExportArgs),
    /// Replay an edit script and print the resulting book as JSON.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Edit script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Playback rate in frames per second.
    #[arg(long, default_value_t = 10.0)]
    rate: f64,

    /// Maximum output width in pixels.
    #[arg(long, default_value_t = 100)]
    max_width: u32,

    /// Rasterization threads (defaults to the number of cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames rasterized between cancellation checks.
    #[arg(long, default_value_t = 20)]
    chunk_size: usize,

    /// Background colour transparent pixels are flattened over.
    #[arg(long, default_value = "#ffffff")]
    background: String,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Edit script JSON.
    #[arg(long)]
    script: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_editor(path: &Path) -> anyhow::Result<livepics::Editor> {
    let script = livepics::EditScript::from_path(path)
        .with_context(|| format!("read edit script '{}'", path.display()))?;
    let editor = script
        .apply()
        .with_context(|| format!("replay edit script '{}'", path.display()))?;
    Ok(editor)
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut editor = load_editor(&args.script)?;
    let background = livepics::Rgba8::from_hex(&args.background)
        .with_context(|| format!("parse background colour '{}'", args.background))?;

    let opts = livepics::ExportOpts {
        rate: args.rate,
        max_width: args.max_width,
        threads: args.threads,
        chunk_size: args.chunk_size,
        background_rgba: [background.r, background.g, background.b, 255],
        ..livepics::ExportOpts::default()
    };

    opts.validate(editor.book().count())
        .context("check export options")?;
    let pictures = editor.book_mut().snapshot();
    let mut sink = livepics::GifSink::new(&args.out);
    let outcome = livepics::export_frames(
        &pictures,
        &opts,
        &mut sink,
        &livepics::CancelToken::new(),
        |p| tracing::info!(done = p.done, total = p.total, "export progress"),
    )
    .with_context(|| format!("export gif '{}'", args.out.display()))?;

    match outcome {
        livepics::ExportOutcome::Completed { frames } => {
            eprintln!("wrote {} ({frames} frames)", args.out.display());
            Ok(())
        }
        livepics::ExportOutcome::Cancelled { frames_done } => {
            anyhow::bail!("export cancelled after {frames_done} frames")
        }
    }
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let editor = load_editor(&args.script)?;
    let report = serde_json::json!({
        "count": editor.book().count(),
        "current": editor.current_index(),
        "history": {
            "len": editor.history().len(),
            "redo_position": editor.history().redo_position(),
        },
        "layout": editor.book().layout(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize inspect report")?
    );
    Ok(())
}
