use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rava", version, about = "Turn raw lyrics into projected slide images")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bring every song of a project up to date (raw -> text -> deck -> PNG).
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Project folder, e.g. "revue_2024".
    #[arg(long)]
    project: PathBuf,

    /// Regenerate every deck and image set. Preprocessed text is kept.
    #[arg(long, default_value_t = false)]
    force: bool,

    /// Print what each song would do without writing anything (honours --force).
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Also write the run report as JSON to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log debug details.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    init_logging(args.verbose);

    let project = rava::Project::open(&args.project)?;
    let pipeline = rava::Pipeline::for_project(&project)?;

    let opts = rava::RunOpts { force: args.force };
    if args.dry_run {
        for plan in pipeline.plan(opts)? {
            let r = plan.resolution;
            println!(
                "{}: 00 -> 01 {:?}, 01 -> 02 {:?}, 02 -> 03 {:?}",
                plan.song, r.preprocess, r.deck, r.images
            );
        }
        return Ok(());
    }

    let report = pipeline.run_with(opts, |_| println!())?;

    if let Some(path) = &args.report {
        report
            .write_json(path)
            .with_context(|| format!("write run report '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
