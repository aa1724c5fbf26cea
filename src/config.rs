//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - relmat.toml (default configuration)
//! - Environment variables (RELMAT_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # relmat.toml
//! [performance]
//! num_threads = 8
//! parallel_threshold = 4096
//! bitset_domain_limit = 4096
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! RELMAT_PERFORMANCE__NUM_THREADS=8
//! RELMAT_PERFORMANCE__PARALLEL_THRESHOLD=8192
//! ```
//!
//! Algorithms consult a process-wide snapshot installed with [`install`];
//! without one, compiled defaults apply.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Workload threshold below which bulk per-row operations stay serial.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Largest node space served by the bitset membership fast path.
pub const DEFAULT_BITSET_DOMAIN_LIMIT: usize = 4096;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub performance: PerformanceConfig,
}

/// Performance settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Rayon worker threads (0 = library default)
    #[serde(default)]
    pub num_threads: usize,

    /// Minimum outer workload before per-row parallelism engages
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Maximum node space for the bitset membership fast path
    #[serde(default = "default_bitset_domain_limit")]
    pub bitset_domain_limit: usize,
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

fn default_bitset_domain_limit() -> usize {
    DEFAULT_BITSET_DOMAIN_LIMIT
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        PerformanceConfig {
            num_threads: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            bitset_domain_limit: DEFAULT_BITSET_DOMAIN_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from `relmat.toml` in the working directory,
    /// then apply `RELMAT_*` environment overrides.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from("relmat.toml")
    }

    /// Load configuration from an explicit TOML path plus environment
    /// overrides. A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("RELMAT_").split("__"))
            .extract()
    }
}

static INSTALLED: OnceLock<Config> = OnceLock::new();

/// Install a process-wide configuration snapshot. The first call wins;
/// returns false if a snapshot was already installed.
pub fn install(config: Config) -> bool {
    INSTALLED.set(config).is_ok()
}

/// Configure the global rayon thread pool from `config.performance`.
///
/// Ignores the error if the pool is already initialized (e.g. in tests).
pub fn init_thread_pool(config: &Config) {
    let num_threads = config.performance.num_threads;
    if num_threads > 0 {
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global();
    }
}

pub(crate) fn parallel_threshold() -> usize {
    INSTALLED
        .get()
        .map_or(DEFAULT_PARALLEL_THRESHOLD, |c| {
            c.performance.parallel_threshold
        })
}

pub(crate) fn bitset_domain_limit() -> usize {
    INSTALLED
        .get()
        .map_or(DEFAULT_BITSET_DOMAIN_LIMIT, |c| {
            c.performance.bitset_domain_limit
        })
}
