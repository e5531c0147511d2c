//! Fork-join splitting of the vectorized block loop.
//!
//! Blocks never share a write target, so contiguous block ranges can run on
//! different rayon workers without synchronization. The same policy applies
//! to every kernel. The scalar tail is always run by the caller, serially.

use rayon::prelude::*;

use crate::config::{kernel_config, KernelConfig};

/// How a block range is split across workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Blocks per chunk (the last chunk may be shorter).
    pub chunk_blocks: usize,
    /// Number of chunks. 1 means run serially.
    pub num_chunks: usize,
}

/// Plan the split of `blocks` full vector blocks over `threads` workers.
pub fn plan_chunks(blocks: usize, threads: usize, cfg: &KernelConfig) -> ChunkPlan {
    if blocks == 0 {
        return ChunkPlan { chunk_blocks: 0, num_chunks: 0 };
    }
    if threads <= 1 || blocks < cfg.parallel_min_blocks {
        return ChunkPlan { chunk_blocks: blocks, num_chunks: 1 };
    }
    let tasks = threads * cfg.tasks_per_thread.max(1);
    let chunk_blocks = blocks.div_ceil(tasks).max(1);
    let num_chunks = blocks.div_ceil(chunk_blocks);
    ChunkPlan { chunk_blocks, num_chunks }
}

/// Run `f(lo, hi)` over `[0, blocks)` in contiguous, non-overlapping ranges.
///
/// Returns once every range has completed.
#[inline]
pub fn run_blocks<F>(blocks: usize, f: F)
where
    F: Fn(usize, usize) + Sync,
{
    let plan = plan_chunks(blocks, rayon::current_num_threads().max(1), kernel_config());
    match plan.num_chunks {
        0 => {}
        1 => f(0, blocks),
        num_chunks => {
            (0..num_chunks).into_par_iter().for_each(|ci| {
                let lo = ci * plan.chunk_blocks;
                let hi = (lo + plan.chunk_blocks).min(blocks);
                f(lo, hi);
            });
        }
    }
}
