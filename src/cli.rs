use crate::{
    config::{Config, DocumentConfig},
    engine::{python::PythonEngine, Engine},
    processor::{DocumentProcessor, PdfProcessor},
    result::ProcessingResult,
    util::{ensure_dir, now_rfc3339},
};
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "docling-bridge")]
#[command(about = "Convert PDFs to Markdown and JSON via Docling")]
pub struct Args {
    /// Directory containing PDF files to process.
    #[arg(long, default_value = "tests/assets")]
    pub input_dir: PathBuf,

    /// Directory for output files.
    #[arg(long, default_value = "tests/output")]
    pub output_dir: PathBuf,

    /// Path to config TOML. If omitted, uses ./docling-bridge.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print engine diagnostics and exit.
    #[arg(long)]
    pub doctor: bool,
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref())?;
    let cfg = Config::load(&cfg_path)?;

    let log_path = resolve_log_path(&cfg, &args.output_dir);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    if args.doctor {
        let engine = PythonEngine::new(&cfg)?;
        let diag = engine.doctor()?;
        println!("{}", serde_json::to_string_pretty(&diag)?);
        return Ok(());
    }

    run(&cfg, &args.input_dir, &args.output_dir)
}

fn resolve_config_path(user: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = user {
        return Ok(p.to_path_buf());
    }
    let default = PathBuf::from("docling-bridge.toml");
    if default.exists() {
        Ok(default)
    } else {
        Ok(PathBuf::from("docling-bridge.example.toml"))
    }
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config, output_dir: &Path) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(output_dir.join("docling-bridge.log"))
}

/// Batch driver: first PDF with the configured settings, the same PDF with
/// a lightweight config, then the whole directory. Per-document failures
/// are reported inline and do not affect the exit status; an empty input
/// directory does.
fn run(cfg: &Config, input_dir: &Path, output_dir: &Path) -> Result<()> {
    let started = now_rfc3339();

    let pdf_files = list_pdfs(input_dir)?;
    if pdf_files.is_empty() {
        bail!("no PDF files found in {}", input_dir.display());
    }

    info!(
        "input={} output={} files={}",
        input_dir.display(),
        output_dir.display(),
        pdf_files.len()
    );

    let first = &pdf_files[0];
    let processor = PdfProcessor::new(cfg)?;

    let result = processor.process(first);
    report(&result);
    write_outputs(&output_dir.join("single"), &result, "")?;

    let mut custom_cfg = cfg.clone();
    custom_cfg.processing = DocumentConfig::lightweight();
    let custom = PdfProcessor::new(&custom_cfg)?;
    let result = custom.process(first);
    report(&result);
    write_outputs(&output_dir.join("custom"), &result, "_custom")?;

    let results = processor.process_directory(input_dir)?;
    let batch_dir = output_dir.join("batch");
    let mut succeeded = 0usize;
    for r in &results {
        report(r);
        if r.success {
            succeeded += 1;
        }
        write_outputs(&batch_dir, r, "")?;
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "input_dir": input_dir,
            "output_dir": output_dir,
            "batch_total": results.len(),
            "batch_succeeded": succeeded,
            "batch_failed": results.len() - succeeded,
            "started": started,
            "finished": now_rfc3339(),
        }))?
    );

    Ok(())
}

fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!(
            "input directory {} does not exist or is not a directory",
            dir.display()
        );
    }
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if path.is_file() && is_pdf {
            out.push(path);
        }
    }
    Ok(out)
}

fn report(r: &ProcessingResult) {
    if r.success {
        info!("{r}");
    } else {
        warn!(
            "{r}: {}",
            r.error_message.as_deref().unwrap_or("unknown error")
        );
    }
}

/// Writes the markdown/JSON/metadata triple for a successful result.
fn write_outputs(dir: &Path, r: &ProcessingResult, suffix: &str) -> Result<()> {
    if !r.success {
        return Ok(());
    }

    let stem = Path::new(&r.file_path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    ensure_dir(dir)?;
    std::fs::write(dir.join(format!("{stem}{suffix}.md")), &r.content)?;
    std::fs::write(dir.join(format!("{stem}{suffix}.json")), &r.json_content)?;
    std::fs::write(
        dir.join(format!("{stem}{suffix}_metadata.json")),
        serde_json::to_string_pretty(&r.metadata)?,
    )?;

    info!(
        "wrote {stem}{suffix}.md, {stem}{suffix}.json, {stem}{suffix}_metadata.json to {}",
        dir.display()
    );
    Ok(())
}
