#![allow(dead_code)]

use rand::Rng;

/// Memory throughput in GiB/s
pub fn throughput_gibs(bytes: usize, duration_secs: f64) -> f64 {
    bytes as f64 / duration_secs / (1024.0 * 1024.0 * 1024.0)
}

/// Bytes moved by a two-input, one-output kernel over 4-byte elements
pub fn binary_rw_bytes(n: usize) -> u64 {
    3 * n as u64 * 4
}

/// Bytes moved by a one-input, one-output kernel (broadcast, relu, neg)
pub fn unary_rw_bytes(n: usize) -> u64 {
    2 * n as u64 * 4
}

/// Gradient step reads val and grad and writes val
pub fn gradient_step_rw_bytes(n: usize) -> u64 {
    3 * n as u64 * 4
}

/// Random f32 vector in [-1.0, 1.0)
pub fn random_f32_vec(n: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Random i32 vector with no zero entries
pub fn random_nonzero_i32_vec(n: usize) -> Vec<i32> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| {
            let v: i32 = rng.gen_range(-1_000_000..1_000_000);
            if v == 0 { 1 } else { v }
        })
        .collect()
}
