mod config;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result};
use bilap_core::report::{
    decomposition_report, eigenstate_report, invariance_report, prime_set_report, scaling_report,
    spectrum_report, weight_scan_report,
};
use bilap_core::{
    BiLaplacian, DEFAULT_POINTS, HamiltonianParams, export_json, grid_scaling, invariance_table, is_prime,
    mode_table, prime_sets, weight_scan,
};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::ModelArgs;

#[derive(Parser)]
#[command(name = "bilap", about = "Bi-Laplacian spectral model: spectra, energy splits, sweeps")]
struct Cli {
    #[command(flatten)]
    model: ModelArgs,

    /// Write the JSON report here instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lowest eigenvalues of the assembled operator
    Spectrum {
        /// How many eigenvalues to report (default: all)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Analytic / per-prime energy split for the lowest modes
    Decompose {
        #[arg(long, default_value_t = 10)]
        modes: usize,
    },

    /// ‖S_p ψ − ψ‖ / ‖ψ‖ for the lowest modes and every configured prime
    Invariance {
        #[arg(long, default_value_t = 10)]
        modes: usize,
    },

    /// Sample one eigenstate on the grid
    Eigenstate {
        /// Mode index (0 = ground state)
        mode: usize,
    },

    /// Grow the grid with T = ln N and track λ₀, λ₁ and the mode-1 split
    Scaling {
        #[arg(long, value_delimiter = ',', default_values_t = [50usize, 100, 200, 400])]
        sizes: Vec<usize>,
    },

    /// Mode-1 channel balance for several prime sets at unit weight
    Primes {
        /// A comma-separated prime set; repeat for more sets
        #[arg(long = "set", value_parser = parse_prime_set)]
        sets: Vec<PrimeSet>,
    },

    /// Uniform weight scan over the configured primes
    Weights {
        #[arg(long, value_delimiter = ',', default_values_t = [0.5f64, 1.0, 2.0])]
        values: Vec<f64>,

        /// Eigenvalues kept per run
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
}

#[derive(Clone, Debug)]
struct PrimeSet(Vec<u64>);

fn parse_prime_set(s: &str) -> std::result::Result<PrimeSet, String> {
    s.split(',')
        .map(|p| u64::from_str(p.trim()).map_err(|e| format!("bad prime '{p}': {e}")))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(PrimeSet)
}

fn default_prime_sets() -> Vec<Vec<u64>> {
    vec![vec![2, 3], vec![2, 3, 5], vec![2, 3, 5, 7]]
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let params = config::resolve(&cli.model)?;
    warn_composite(&params.primes);

    let json = match &cli.command {
        Commands::Spectrum { count } => cmd_spectrum(&params, *count),
        Commands::Decompose { modes } => cmd_decompose(&params, *modes),
        Commands::Invariance { modes } => cmd_invariance(&params, *modes),
        Commands::Eigenstate { mode } => cmd_eigenstate(&params, *mode),
        Commands::Scaling { sizes } => cmd_scaling(&params, sizes),
        Commands::Primes { sets } => cmd_primes(&params, sets),
        Commands::Weights { values, count } => cmd_weights(&params, values, *count),
    }?;

    emit(&json, cli.output.as_deref())
}

fn warn_composite(primes: &[u64]) {
    for &p in primes {
        if p >= 2 && !is_prime(p) {
            tracing::warn!("shift {p} is not prime; building its penalty anyway");
        }
    }
}

/// Sweeps build their own models; say so when resolved inputs go unused.
fn warn_unused(command: &str, params: &HamiltonianParams, unused: &[&str]) {
    for &field in unused {
        let set = match field {
            "half_period" => params.half_period.is_some(),
            "weights" => params.weights.is_some(),
            "points" => params.points != DEFAULT_POINTS,
            _ => false,
        };
        if set {
            tracing::warn!("{command} ignores the configured {field}");
        }
    }
}

fn build_model(params: &HamiltonianParams) -> Result<BiLaplacian> {
    let start = Instant::now();
    let model = BiLaplacian::new(params).context("failed to assemble operator")?;
    tracing::debug!(
        points = model.dim(),
        half_period = model.grid().half_period(),
        channels = model.channels().len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "assembled operator"
    );
    Ok(model)
}

/// Force the eigensolve up front so its cost shows up in the logs.
fn diagonalize(model: &BiLaplacian) {
    let start = Instant::now();
    let spectrum = model.spectrum();
    tracing::debug!(
        dim = spectrum.len(),
        ground = spectrum.eigenvalues().first().copied().unwrap_or_default(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "diagonalized"
    );
}

fn to_json<T: Serialize>(report: &T) -> Result<String> {
    export_json(report).context("failed to serialize report")
}

fn emit(json: &str, output: Option<&std::path::Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("wrote report to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_spectrum(params: &HamiltonianParams, count: Option<usize>) -> Result<String> {
    let model = build_model(params)?;
    diagonalize(&model);
    to_json(&spectrum_report(&model, count))
}

fn cmd_decompose(params: &HamiltonianParams, modes: usize) -> Result<String> {
    let model = build_model(params)?;
    diagonalize(&model);
    let rows = mode_table(&model, modes).context("failed to decompose energies")?;
    for row in rows.iter().filter(|r| r.residual().abs() > 1e-8) {
        tracing::warn!(mode = row.mode, residual = row.residual(), "energy split does not close");
    }
    to_json(&decomposition_report(&model, &rows))
}

fn cmd_invariance(params: &HamiltonianParams, modes: usize) -> Result<String> {
    let model = build_model(params)?;
    diagonalize(&model);
    let rows = invariance_table(&model, modes).context("failed to measure invariance")?;
    to_json(&invariance_report(&model, rows))
}

fn cmd_eigenstate(params: &HamiltonianParams, mode: usize) -> Result<String> {
    let model = build_model(params)?;
    diagonalize(&model);
    let report = eigenstate_report(&model, mode)
        .with_context(|| format!("failed to sample eigenstate {mode}"))?;
    to_json(&report)
}

fn cmd_scaling(params: &HamiltonianParams, sizes: &[usize]) -> Result<String> {
    warn_unused("scaling", params, &["points", "half_period"]);
    let points = grid_scaling(sizes, &params.primes, params.weights.as_deref())
        .context("scaling sweep failed")?;
    to_json(&scaling_report(&params.primes, points))
}

fn cmd_primes(params: &HamiltonianParams, sets: &[PrimeSet]) -> Result<String> {
    let sets: Vec<Vec<u64>> = if sets.is_empty() {
        default_prime_sets()
    } else {
        sets.iter().map(|s| s.0.clone()).collect()
    };
    warn_unused("primes", params, &["half_period", "weights"]);
    for set in &sets {
        warn_composite(set);
    }
    let splits = prime_sets(params.points, &sets).context("prime-set sweep failed")?;
    to_json(&prime_set_report(params.points, splits))
}

fn cmd_weights(params: &HamiltonianParams, values: &[f64], count: usize) -> Result<String> {
    warn_unused("weights", params, &["half_period", "weights"]);
    let runs = weight_scan(params.points, &params.primes, values, count)
        .context("weight scan failed")?;
    to_json(&weight_scan_report(params.points, &params.primes, runs))
}
