//! Process-wide kernel configuration, loaded once from the environment.
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `TSK_ISA` | `scalar`, `avx2`, `avx512` | hardware detection |
//! | `TSK_PAR_MIN_BLOCKS` | blocks before the block loop is split across threads | 4096 |
//! | `TSK_TASKS_PER_THREAD` | rayon tasks per worker thread | 4 |

use std::sync::OnceLock;

use crate::cpu_kernels::IsaLevel;
use crate::error::{KernelError, KernelResult};

pub const ENV_ISA: &str = "TSK_ISA";
pub const ENV_PAR_MIN_BLOCKS: &str = "TSK_PAR_MIN_BLOCKS";
pub const ENV_TASKS_PER_THREAD: &str = "TSK_TASKS_PER_THREAD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelConfig {
    /// Requested ISA ceiling. Never raises the level above what the CPU supports.
    pub isa_override: Option<IsaLevel>,
    /// Below this many full vector blocks the block loop runs on the calling thread.
    pub parallel_min_blocks: usize,
    /// Chunks handed to rayon per worker thread.
    pub tasks_per_thread: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            isa_override: None,
            parallel_min_blocks: 4096,
            tasks_per_thread: 4,
        }
    }
}

impl KernelConfig {
    /// Build a config from the process environment. Invalid values are
    /// logged and replaced by defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(value) = lookup(ENV_ISA) {
            match parse_isa(&value) {
                Ok(level) => cfg.isa_override = Some(level),
                Err(err) => log::warn!("ignoring {err}"),
            }
        }
        if let Some(value) = lookup(ENV_PAR_MIN_BLOCKS) {
            match parse_count(ENV_PAR_MIN_BLOCKS, &value, 0) {
                Ok(v) => cfg.parallel_min_blocks = v,
                Err(err) => log::warn!("ignoring {err}"),
            }
        }
        if let Some(value) = lookup(ENV_TASKS_PER_THREAD) {
            match parse_count(ENV_TASKS_PER_THREAD, &value, 1) {
                Ok(v) => cfg.tasks_per_thread = v,
                Err(err) => log::warn!("ignoring {err}"),
            }
        }
        cfg
    }
}

/// Parse an ISA name (case-insensitive).
pub fn parse_isa(value: &str) -> KernelResult<IsaLevel> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("scalar") {
        Ok(IsaLevel::Scalar)
    } else if value.eq_ignore_ascii_case("avx2") {
        Ok(IsaLevel::Avx2)
    } else if value.eq_ignore_ascii_case("avx512") || value.eq_ignore_ascii_case("avx512f") {
        Ok(IsaLevel::Avx512)
    } else {
        Err(KernelError::InvalidOverride { var: ENV_ISA, value: value.to_string() })
    }
}

fn parse_count(var: &'static str, value: &str, min: usize) -> KernelResult<usize> {
    match value.trim().parse::<usize>() {
        Ok(v) if v >= min => Ok(v),
        _ => Err(KernelError::InvalidOverride { var, value: value.to_string() }),
    }
}

static CONFIG: OnceLock<KernelConfig> = OnceLock::new();

/// Get the process-wide config (read from the environment on first use).
pub fn kernel_config() -> &'static KernelConfig {
    CONFIG.get_or_init(|| {
        let cfg = KernelConfig::from_env();
        log::debug!("kernel config: {cfg:?}");
        cfg
    })
}
