use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docshot::{
    CommandRenderer, FsAssetCache, HttpTransport, PipelineConfig, SystemDecompressor,
    pipeline::Capabilities,
};

#[derive(Parser, Debug)]
#[command(name = "docshot", version)]
struct Cli {
    /// JSON configuration file. Defaults apply to every missing field.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base directory for relative paths in the configuration.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decompress recorded sessions (requires `xz` / `gzip` on PATH).
    Extract,
    /// Download the pinned web player assets that are not cached yet.
    Fetch,
    /// Render missing screenshots.
    Screenshots(ScreenshotArgs),
    /// Run every stage in order.
    Run(RunArgs),
    /// List screenshot units and whether they would be rendered.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct ScreenshotArgs {
    /// Only process units with this title (repeatable).
    #[arg(long = "only", value_name = "TITLE")]
    only: Vec<String>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Only process screenshot units with this title (repeatable).
    #[arg(long = "only", value_name = "TITLE")]
    only: Vec<String>,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Print the plan as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = load_config(cli.config.as_deref(), &cli.root)?;
    match cli.cmd {
        Command::Extract => cmd_extract(&cfg),
        Command::Fetch => cmd_fetch(&cfg),
        Command::Screenshots(args) => cmd_screenshots(&cfg, args),
        Command::Run(args) => cmd_run(&cfg, args),
        Command::Plan(args) => cmd_plan(&cfg, args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, root: &Path) -> anyhow::Result<PipelineConfig> {
    let cfg = match path {
        Some(p) => PipelineConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => PipelineConfig::default(),
    };
    Ok(cfg.resolve(root))
}

fn http_transport(cfg: &PipelineConfig) -> HttpTransport {
    HttpTransport::new(Duration::from_secs(cfg.assets.timeout_secs))
}

fn cmd_extract(cfg: &PipelineConfig) -> anyhow::Result<()> {
    let written = docshot::extract::extract(
        &cfg.recordings.source_root,
        &cfg.recordings.output_root,
        &cfg.recordings.recording_suffix,
        &mut SystemDecompressor,
    )?;
    eprintln!(
        "extracted {} recording(s) into {}",
        written.len(),
        cfg.recordings.output_root.display()
    );
    Ok(())
}

fn cmd_fetch(cfg: &PipelineConfig) -> anyhow::Result<()> {
    let mut cache = FsAssetCache::new(&cfg.assets.cache_dir);
    let outcomes = docshot::pipeline::fetch_assets(cfg, &mut cache, &mut http_transport(cfg))?;
    for a in outcomes {
        eprintln!("{:?}: {}", a.outcome, a.name);
    }
    Ok(())
}

fn cmd_screenshots(cfg: &PipelineConfig, args: ScreenshotArgs) -> anyhow::Result<()> {
    let only: BTreeSet<String> = args.only.into_iter().collect();
    let mut renderer = CommandRenderer::new(cfg.screenshots.renderer.clone());
    let report = docshot::screenshot::drive(&cfg.screenshots, &mut renderer, &only)?;
    eprintln!(
        "screenshots: {} rendered, {} present, {} without output",
        report.count(docshot::UnitStatus::Rendered),
        report.count(docshot::UnitStatus::Present),
        report.count(docshot::UnitStatus::NoOutput)
    );
    Ok(())
}

fn cmd_run(cfg: &PipelineConfig, args: RunArgs) -> anyhow::Result<()> {
    let only: BTreeSet<String> = args.only.into_iter().collect();
    let mut cache = FsAssetCache::new(&cfg.assets.cache_dir);
    let mut transport = http_transport(cfg);
    let mut renderer = CommandRenderer::new(cfg.screenshots.renderer.clone());

    let caps = Capabilities {
        decompressor: &mut SystemDecompressor,
        cache: &mut cache,
        transport: &mut transport,
        renderer: &mut renderer,
    };
    let report = docshot::pipeline::run(cfg, caps, &only)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize run report")?
        );
    }
    Ok(())
}

fn cmd_plan(cfg: &PipelineConfig, args: PlanArgs) -> anyhow::Result<()> {
    let plan = docshot::screenshot::plan(&cfg.screenshots)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&plan).context("serialize plan")?
        );
        return Ok(());
    }

    for p in &plan.units {
        let state = if p.present { "present" } else { "pending" };
        println!(
            "{state:8} {:>4}x{:<4} {}  ({})",
            p.unit.spec.columns,
            p.unit.spec.lines,
            p.unit.spec.title,
            p.unit.dir.display()
        );
    }
    for dir in &plan.rejected {
        println!("rejected {}", dir.display());
    }
    for title in &plan.collisions {
        println!("collision {title}");
    }
    Ok(())
}
