//! # CPU Kernel Macro Architecture
//!
//! 3-layer macro system for ISA-dispatched SIMD kernels:
//!
//! ## Layer 1: `simd_primitive!` (src/macros/simd_primitive.rs)
//! Maps abstract lane ops to hardware intrinsics: `simd_primitive!(avx2, f32, add, a, b)`.
//! Covers scalar × {f32, i32}, avx2 × {f32, i32}, avx512 × f32.
//!
//! ## Layer 2: `operator_templates` (src/macros/operator_templates.rs)
//! Block loop + scalar tail bodies parameterized by ISA+Element:
//! `define_binary_ops!`, `define_broadcast_ops!`, `define_unary_ops!`, `define_update_ops!`.
//!
//! ## Layer 3: `expand_isa_impls!` (src/macros/expand.rs)
//! Generates per-ISA modules: `expand_isa_impls!(avx2_f32, avx2, f32, float, ["avx", "avx2"])`.
//!
//! ## Dispatch (this file)
//! Runtime ISA selection via `get_isa_level()`:
//!
//! | Level | f32 module | i32 module |
//! |---|---|---|
//! | `Avx512` | `avx512_f32` (16 lanes) | `avx2_i32` (8 lanes) |
//! | `Avx2` | `avx2_f32` (8 lanes) | `avx2_i32` (8 lanes) |
//! | `Scalar` | `scalar_f32` | `scalar_i32` |

pub mod avx2;
pub mod avx512;
pub mod scalar;

use crate::config::kernel_config;
use crate::error::{check_len, KernelResult};
use crate::traits::{BinaryOp, Element, FloatKernels, Kernels, ScalarSide};
use std::marker::PhantomData;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IsaLevel {
    Scalar,
    /// 256-bit: 8 x f32 / 8 x i32.
    Avx2,
    /// 512-bit: 16 x f32. i32 kernels stay on 256-bit registers.
    Avx512,
}

impl IsaLevel {
    /// Lanes per vector block for element type `E` at this level.
    pub fn lanes<E: Element>(self) -> usize {
        match (self, E::ELEM_ID) {
            #[cfg(target_arch = "x86_64")]
            (IsaLevel::Avx512, 0) => avx512::avx512_f32::LANES,
            #[cfg(target_arch = "x86_64")]
            (IsaLevel::Avx2, 0) => avx2::avx2_f32::LANES,
            #[cfg(target_arch = "x86_64")]
            (IsaLevel::Avx2 | IsaLevel::Avx512, _) => avx2::avx2_i32::LANES,
            _ => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IsaLevel::Scalar => "scalar",
            IsaLevel::Avx2 => "avx2",
            IsaLevel::Avx512 => "avx512",
        }
    }
}

static ISA_LEVEL: OnceLock<IsaLevel> = OnceLock::new();

/// The level every dispatched kernel runs at: hardware detection capped by
/// `KernelConfig::isa_override`.
pub fn get_isa_level() -> IsaLevel {
    *ISA_LEVEL.get_or_init(|| {
        let detected = detected_isa_level();
        let level = resolve_isa_level(detected, kernel_config().isa_override);
        log::debug!("cpu kernels: detected {}, using {}", detected.name(), level.name());
        level
    })
}

/// Highest level the running CPU supports.
#[cfg(target_arch = "x86_64")]
pub fn detected_isa_level() -> IsaLevel {
    if is_x86_feature_detected!("avx512f") {
        IsaLevel::Avx512
    } else if is_x86_feature_detected!("avx2") {
        IsaLevel::Avx2
    } else {
        IsaLevel::Scalar
    }
}

#[cfg(not(target_arch = "x86_64"))]
pub fn detected_isa_level() -> IsaLevel {
    IsaLevel::Scalar
}

/// Apply a requested level. A request above the detected level is ignored.
pub fn resolve_isa_level(detected: IsaLevel, requested: Option<IsaLevel>) -> IsaLevel {
    match requested {
        None => detected,
        Some(req) if req <= detected => req,
        Some(req) => {
            log::warn!(
                "requested ISA {} is not supported by this CPU, using {}",
                req.name(),
                detected.name()
            );
            detected
        }
    }
}

/// Lanes per block used by the dispatched kernels for `E`.
pub fn lanes<E: Element>() -> usize {
    get_isa_level().lanes::<E>()
}

pub struct CpuKernels<E: Element> {
    _phantom: PhantomData<E>,
}

impl<E: Element> CpuKernels<E> {
    pub fn new() -> Self {
        Self { _phantom: PhantomData }
    }
}

impl<E: Element> Default for CpuKernels<E> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Dispatch macros
// ============================================================================
// ELEM_ID is a compile-time constant, so dead branches are eliminated.
// Pointers and scalars are reinterpreted as the matching concrete type.

macro_rules! cast_arg {
    (ptr $x:expr, $t:ty) => { $x as *const $t };
    (out $x:expr, $t:ty) => { $x as *mut $t };
    (val $x:expr, $t:ty) => { bytemuck::cast::<E, $t>($x) };
    (len $x:expr, $t:ty) => { $x };
}

/// Call `$op` from the module matching (ISA level, element type).
/// Must be expanded in an `unsafe` context.
macro_rules! dispatch_kernel {
    ($op:ident($($kind:ident $arg:expr),*)) => {
        match (get_isa_level(), E::ELEM_ID) {
            #[cfg(target_arch = "x86_64")]
            (IsaLevel::Avx512, 0) => avx512::avx512_f32::$op($(cast_arg!($kind $arg, f32)),*),
            #[cfg(target_arch = "x86_64")]
            (IsaLevel::Avx2, 0) => avx2::avx2_f32::$op($(cast_arg!($kind $arg, f32)),*),
            #[cfg(target_arch = "x86_64")]
            (IsaLevel::Avx2 | IsaLevel::Avx512, 1) => avx2::avx2_i32::$op($(cast_arg!($kind $arg, i32)),*),
            (_, 0) => scalar::scalar_f32::$op($(cast_arg!($kind $arg, f32)),*),
            (_, 1) => scalar::scalar_i32::$op($(cast_arg!($kind $arg, i32)),*),
            _ => unreachable!(),
        }
    };
}

/// f32-only dispatch.
macro_rules! dispatch_f32 {
    ($op:ident($($arg:expr),*)) => {
        match get_isa_level() {
            #[cfg(target_arch = "x86_64")]
            IsaLevel::Avx512 => avx512::avx512_f32::$op($($arg),*),
            #[cfg(target_arch = "x86_64")]
            IsaLevel::Avx2 => avx2::avx2_f32::$op($($arg),*),
            _ => scalar::scalar_f32::$op($($arg),*),
        }
    };
}

// ============================================================================
// Kernels implementation
// ============================================================================

impl<E: Element> Kernels<E> for CpuKernels<E> {

    fn binary(&self, op: BinaryOp, a: &[E], b: &[E], out: &mut [E]) -> KernelResult<()> {
        check_len("b", a.len(), b.len())?;
        check_len("out", a.len(), out.len())?;
        unsafe { self.binary_unchecked(op, a.as_ptr(), b.as_ptr(), out.as_mut_ptr(), a.len()) };
        Ok(())
    }

    fn binary_inplace(&self, op: BinaryOp, acc: &mut [E], rhs: &[E]) -> KernelResult<()> {
        check_len("rhs", acc.len(), rhs.len())?;
        let p = acc.as_mut_ptr();
        // SAFETY: whole-buffer aliasing of the output with `a` is allowed.
        unsafe { self.binary_unchecked(op, p, rhs.as_ptr(), p, acc.len()) };
        Ok(())
    }

    fn broadcast(&self, op: BinaryOp, side: ScalarSide, s: E, x: &[E], out: &mut [E]) -> KernelResult<()> {
        check_len("out", x.len(), out.len())?;
        unsafe { self.broadcast_unchecked(op, side, s, x.as_ptr(), out.as_mut_ptr(), x.len()) };
        Ok(())
    }

    fn broadcast_inplace(&self, op: BinaryOp, side: ScalarSide, s: E, x: &mut [E]) {
        let p = x.as_mut_ptr();
        unsafe { self.broadcast_unchecked(op, side, s, p, p, x.len()) };
    }

    fn vec_neg(&self, x: &[E], out: &mut [E]) -> KernelResult<()> {
        check_len("out", x.len(), out.len())?;
        unsafe { self.neg_unchecked(x.as_ptr(), out.as_mut_ptr(), x.len()) };
        Ok(())
    }

    unsafe fn binary_unchecked(&self, op: BinaryOp, a: *const E, b: *const E, c: *mut E, n: usize) {
        unsafe {
            match op {
                BinaryOp::Add => dispatch_kernel!(add(ptr a, ptr b, out c, len n)),
                BinaryOp::Sub => dispatch_kernel!(sub(ptr a, ptr b, out c, len n)),
                BinaryOp::Mul => dispatch_kernel!(mul(ptr a, ptr b, out c, len n)),
                BinaryOp::Div => dispatch_kernel!(div(ptr a, ptr b, out c, len n)),
            }
        }
    }

    unsafe fn broadcast_unchecked(&self, op: BinaryOp, side: ScalarSide, s: E, x: *const E, c: *mut E, n: usize) {
        unsafe {
            match (op, side) {
                (BinaryOp::Add, _) => dispatch_kernel!(add_const(ptr x, val s, out c, len n)),
                (BinaryOp::Mul, _) => dispatch_kernel!(mul_const(ptr x, val s, out c, len n)),
                (BinaryOp::Sub, ScalarSide::Right) => dispatch_kernel!(sub_const_b(ptr x, val s, out c, len n)),
                (BinaryOp::Sub, ScalarSide::Left) => dispatch_kernel!(sub_const_a(val s, ptr x, out c, len n)),
                (BinaryOp::Div, ScalarSide::Right) => dispatch_kernel!(div_const_b(ptr x, val s, out c, len n)),
                (BinaryOp::Div, ScalarSide::Left) => dispatch_kernel!(div_const_a(val s, ptr x, out c, len n)),
            }
        }
    }

    unsafe fn neg_unchecked(&self, x: *const E, c: *mut E, n: usize) {
        unsafe { dispatch_kernel!(neg(ptr x, out c, len n)) }
    }
}

impl FloatKernels for CpuKernels<f32> {
    fn relu(&self, x: &[f32], out: &mut [f32]) -> KernelResult<()> {
        check_len("out", x.len(), out.len())?;
        unsafe { self.relu_unchecked(x.as_ptr(), out.as_mut_ptr(), x.len()) };
        Ok(())
    }

    fn relu_inplace(&self, x: &mut [f32]) {
        let p = x.as_mut_ptr();
        unsafe { self.relu_unchecked(p, p, x.len()) };
    }

    fn gradient_step(&self, val: &mut [f32], grad: &[f32], lr: f32) -> KernelResult<()> {
        check_len("grad", val.len(), grad.len())?;
        unsafe { self.gradient_step_unchecked(val.as_mut_ptr(), grad.as_ptr(), lr, val.len()) };
        Ok(())
    }

    unsafe fn relu_unchecked(&self, x: *const f32, c: *mut f32, n: usize) {
        unsafe { dispatch_f32!(relu(x, c, n)) }
    }

    unsafe fn gradient_step_unchecked(&self, val: *mut f32, grad: *const f32, lr: f32, n: usize) {
        unsafe { dispatch_f32!(gradient_step(val, grad, lr, n)) }
    }
}
