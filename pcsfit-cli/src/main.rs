//! pcsfit command-line driver.
//!
//! ```sh
//! pcsfit pack dumps/187076 --shot 187076 -o shot187076.bin.zst
//! pcsfit fit job.toml
//! pcsfit grid --policy step
//! ```

mod config;
mod parsers;
mod runner;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, ensure};
use clap::{Parser, Subcommand, ValueEnum};

use pcsfit::EvaluationGrid;

#[derive(Parser)]
#[command(name = "pcsfit")]
#[command(about = "Offline reconstruction of real-time profile spline fits")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a directory of `*.dat` channel dumps into a compressed shot archive.
    Pack {
        /// Directory holding one `<signal>.dat` file per channel.
        dir: PathBuf,
        /// Shot number recorded in the archive.
        #[arg(long)]
        shot: u32,
        /// Output file (defaults to `shot<N>.bin.zst` in the current directory).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a fit described by a TOML job file.
    Fit {
        /// Path to the job file.
        config: PathBuf,
        /// Output CSV (overrides the job file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also print the fitted knots.
        #[arg(long)]
        knots: bool,
    },
    /// Check a job file without running it.
    Validate {
        config: PathBuf,
    },
    /// Print the evaluation grid.
    Grid {
        #[arg(long, value_enum, default_value_t = GridArg::Linear)]
        policy: GridArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GridArg {
    /// Linear span over [0, 1.2], as the offline tools use.
    Linear,
    /// Fixed single-precision 0.01 step, as the control system uses.
    Step,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack { dir, shot, output } => {
            let out_path = output.unwrap_or_else(|| PathBuf::from(format!("shot{shot}.bin.zst")));
            pack(&dir, shot, &out_path)
        }
        Commands::Fit {
            config,
            output,
            knots,
        } => {
            let job = config::load_config(&config)?;
            log::info!("Job: {}", config.display());

            let result = runner::run_fit(&job)?;
            if let Some(cmp) = &result.comparison {
                log::info!(
                    "Offline vs online: max |diff| {:.3e} at psin {:.2}, rms {:.3e}",
                    cmp.max_abs_diff,
                    result.grid.points()[cmp.worst_index],
                    cmp.rms_diff
                );
            }
            if knots {
                runner::write_knots(&result.fit.knots, &mut std::io::stdout().lock())?;
            }

            let csv = output.unwrap_or_else(|| job.output.csv.clone());
            runner::write_profile_csv(&result, &csv)
        }
        Commands::Validate { config } => {
            let _job = config::load_config(&config)?;
            println!("Job file is valid: {}", config.display());
            Ok(())
        }
        Commands::Grid { policy } => {
            let grid = match policy {
                GridArg::Linear => EvaluationGrid::profile(),
                GridArg::Step => EvaluationGrid::control_system(),
            };
            let mut out = std::io::stdout().lock();
            for (i, g) in grid.points().iter().enumerate() {
                writeln!(out, "{i}\t{g:?}")?;
            }
            Ok(())
        }
    }
}

fn pack(dir: &Path, shot: u32, out_path: &Path) -> anyhow::Result<()> {
    log::info!("Parsing channel dumps from {}...", dir.display());
    let archive = parsers::parse_shot_dir(dir, shot)?;
    ensure!(
        !archive.signals.is_empty(),
        "no .dat files found in {}",
        dir.display()
    );
    log::info!("  Signals: {}", archive.signals.len());

    let serialized = postcard::to_allocvec(&archive)
        .map_err(|e| anyhow::anyhow!("postcard serialization failed: {e}"))?;
    log::info!("  Serialized size: {} bytes", serialized.len());

    let compressed = zstd::encode_all(&serialized[..], 19).context("zstd compression failed")?;
    log::info!(
        "  Compressed size: {} bytes ({:.1}x)",
        compressed.len(),
        serialized.len() as f64 / compressed.len() as f64
    );

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out_path, &compressed)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    log::info!("Wrote {}", out_path.display());

    // Verify round-trip through the same decoder the library uses
    let snap = runner::read_snapshot(out_path)?;
    ensure!(
        snap.archive() == &archive,
        "round-trip mismatch for {}",
        out_path.display()
    );
    log::info!("  Round-trip OK!");
    Ok(())
}
