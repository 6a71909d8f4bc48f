use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use bandtree::{Graph, Layout, LayoutConfig, LayoutMode};
use clap::{Parser, Subcommand};
use rayon::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "bandtree", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile one membership graph into a layout JSON.
    Compile(CompileArgs),
    /// Print the lineups each band is partitioned into.
    Lineups(LineupsArgs),
    /// Compile many graphs in parallel.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct LayoutOpts {
    /// Layout configuration JSON; defaults apply to missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the placement mode (`lanes` or `canvas`).
    #[arg(long)]
    mode: Option<LayoutMode>,
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Input graph JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output layout JSON path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    layout: LayoutOpts,
}

#[derive(Parser, Debug)]
struct LineupsArgs {
    /// Input graph JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Layout configuration JSON; its year fallbacks decide undated tenures.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Input graph JSON files.
    #[arg(long = "in", required = true, num_args = 1..)]
    in_paths: Vec<PathBuf>,

    /// Directory receiving `<stem>.layout.json` per input.
    #[arg(long)]
    out_dir: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    layout: LayoutOpts,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compile(args) => cmd_compile(args),
        Command::Lineups(args) => cmd_lineups(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    match path {
        Some(path) => LayoutConfig::from_path(path)
            .with_context(|| format!("load layout config '{}'", path.display())),
        None => Ok(LayoutConfig::default()),
    }
}

fn load_config(opts: &LayoutOpts) -> anyhow::Result<LayoutConfig> {
    let mut config = read_config(opts.config.as_deref())?;
    if let Some(mode) = opts.mode {
        config.mode = mode;
    }
    Ok(config)
}

fn compile_file(in_path: &Path, out: &Path, config: &LayoutConfig) -> anyhow::Result<Layout> {
    let graph = Graph::from_path(in_path)?;
    let layout = bandtree::compile_layout(&graph, config)
        .with_context(|| format!("compile '{}'", in_path.display()))?;

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, layout.to_json_pretty()?)
        .with_context(|| format!("write layout '{}'", out.display()))?;
    Ok(layout)
}

fn report(out: &Path, layout: &Layout) {
    eprintln!(
        "wrote {} ({} versions, {} edges, {} warnings, fingerprint {})",
        out.display(),
        layout.versions.len(),
        layout.edges.len(),
        layout.warnings.len(),
        bandtree::fingerprint_layout(layout)
    );
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let config = load_config(&args.layout)?;
    let layout = compile_file(&args.in_path, &args.out, &config)?;
    report(&args.out, &layout);
    Ok(())
}

fn cmd_lineups(args: LineupsArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let graph = Graph::from_path(&args.in_path)?;
    let (bands, warnings) = bandtree::partition_graph(&graph, config.year_defaults())?;
    for pb in &bands {
        println!("{} ({})", pb.band.name, pb.band.id);
        if pb.lineups.is_empty() {
            println!("  (no dated lineups)");
        }
        for lineup in &pb.lineups {
            let names: Vec<&str> = lineup
                .members
                .iter()
                .map(|m| m.artist_name.as_str())
                .collect();
            println!("  {}: {}", lineup.sublabel(), names.join(", "));
        }
    }
    if !warnings.is_empty() {
        eprintln!("{} warnings", warnings.len());
    }
    Ok(())
}

/// `<out_dir>/<stem>.layout.json` per input. Two inputs mapping to one output are rejected
/// before anything is written.
fn batch_outputs(in_paths: &[PathBuf], out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut seen = BTreeMap::<PathBuf, &Path>::new();
    let mut outputs = Vec::with_capacity(in_paths.len());
    for in_path in in_paths {
        let stem = in_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "graph".to_string());
        let out = out_dir.join(format!("{stem}.layout.json"));
        if let Some(first) = seen.insert(out.clone(), in_path) {
            anyhow::bail!(
                "'{}' and '{}' would both write '{}'",
                first.display(),
                in_path.display(),
                out.display()
            );
        }
        outputs.push(out);
    }
    Ok(outputs)
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    if args.threads == Some(0) {
        anyhow::bail!("--threads must be >= 1 when set");
    }
    let config = load_config(&args.layout)?;
    let outputs = batch_outputs(&args.in_paths, &args.out_dir)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = args.threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build().context("build rayon thread pool")?;

    let results: Vec<(PathBuf, anyhow::Result<Layout>)> = pool.install(|| {
        args.in_paths
            .par_iter()
            .zip(outputs.par_iter())
            .map(|(in_path, out)| (out.clone(), compile_file(in_path, out, &config)))
            .collect()
    });

    let mut failed = 0usize;
    for (out, result) in &results {
        match result {
            Ok(layout) => report(out, layout),
            Err(e) => {
                failed += 1;
                eprintln!("failed {}: {e:#}", out.display());
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} graphs failed to compile", results.len());
    }
    Ok(())
}
