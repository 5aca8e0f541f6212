use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bilap_core::HamiltonianParams;
use clap::Args;

/// Environment variable naming a TOML config file when `--config` is absent.
pub const CONFIG_ENV: &str = "BILAP_CONFIG";

/// Model parameters shared by every subcommand.
///
/// Precedence: built-in defaults < config file < flags.
#[derive(Args, Debug, Default, Clone)]
pub struct ModelArgs {
    /// TOML file with points / half_period / primes / weights
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of grid points
    #[arg(long, global = true)]
    pub points: Option<usize>,

    /// Half-period T of the circle [-T, T) (default: ln(points))
    #[arg(long, global = true)]
    pub half_period: Option<f64>,

    /// Comma-separated shifts, e.g. 2,3,5
    #[arg(long, global = true, value_delimiter = ',')]
    pub primes: Option<Vec<u64>>,

    /// Comma-separated weights, one per prime
    #[arg(long, global = true, value_delimiter = ',')]
    pub weights: Option<Vec<f64>>,
}

impl ModelArgs {
    fn config_path(&self) -> Option<PathBuf> {
        self.config
            .clone()
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
    }
}

pub fn parse_config(content: &str) -> Result<HamiltonianParams> {
    toml::from_str(content).context("invalid model config")
}

fn read_config(path: &Path) -> Result<HamiltonianParams> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&content).with_context(|| format!("in {}", path.display()))
}

/// Layer flags over the config file over the defaults.
pub fn resolve(args: &ModelArgs) -> Result<HamiltonianParams> {
    let mut params = match args.config_path() {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            read_config(&path)?
        }
        None => HamiltonianParams::default(),
    };
    apply_overrides(&mut params, args);
    Ok(params)
}

fn apply_overrides(params: &mut HamiltonianParams, args: &ModelArgs) {
    if let Some(points) = args.points {
        params.points = points;
    }
    if let Some(t) = args.half_period {
        params.half_period = Some(t);
    }
    if let Some(primes) = &args.primes {
        params.primes = primes.clone();
        // file weights were sized for the file's primes
        if args.weights.is_none() && params.weights.is_some() {
            tracing::debug!("--primes given without --weights; using unit weights");
            params.weights = None;
        }
    }
    if let Some(weights) = &args.weights {
        params.weights = Some(weights.clone());
    }
}
