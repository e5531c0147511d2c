//! tensor-simd-kernels: vectorized elementwise kernels for tensor libraries.
//!
//! This crate provides the per-element building blocks a tensor layer calls
//! with flattened, contiguous buffers:
//! - **Tensor-tensor**: add / sub / mul / div for f32 and i32
//! - **Scalar broadcast**: both operand orders for sub and div
//! - **ReLU** and **negation**
//! - **Gradient step**: `val -= grad * lr`, in place
//!
//! Each kernel runs a full-width SIMD block loop (AVX-512: 16 lanes, AVX2:
//! 8 lanes, scalar fallback otherwise) followed by a scalar tail, with the
//! block loop split across rayon workers for large buffers.
//!
//! # Quick Start
//!
//! ```
//! use tensor_simd_kernels::{CpuKernels, Kernels};
//!
//! let k = CpuKernels::<f32>::new();
//! let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
//! let b = [9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
//! let mut c = [0.0f32; 9];
//! k.vec_add(&a, &b, &mut c).unwrap();
//! assert_eq!(c, [10.0; 9]);
//! ```

#[macro_use]
pub mod macros;

pub mod config;
pub mod cpu_kernels;
pub mod error;
pub mod parallel;
pub mod traits;

pub use config::{kernel_config, KernelConfig};
pub use cpu_kernels::{detected_isa_level, get_isa_level, lanes, CpuKernels, IsaLevel};
pub use error::{KernelError, KernelResult};
pub use traits::{BinaryOp, Element, FloatKernels, Kernels, ScalarSide};
