use std::fmt::Debug;

use crate::error::KernelResult;

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for i32 {}
}

/// Core element trait for the elementwise kernels.
///
/// Every scalar tail (and the whole scalar ISA) goes through these lane
/// methods, so a vector lane and a scalar lane always compute the same value.
/// Compile-time monomorphization, zero runtime overhead.
///
/// Sealed: dispatch reinterprets buffers by `ELEM_ID`, so only `f32` and
/// `i32` implement it.
///
/// ```compile_fail
/// use tensor_simd_kernels::Element;
///
/// #[derive(Debug, Clone, Copy, Default, PartialEq)]
/// #[repr(transparent)]
/// struct Byte(u8);
/// unsafe impl bytemuck::Zeroable for Byte {}
/// unsafe impl bytemuck::Pod for Byte {}
///
/// impl Element for Byte {
///     const ZERO: Self = Byte(0);
///     const ELEM_ID: u8 = 0;
///     fn elem_add(self, o: Self) -> Self { Byte(self.0.wrapping_add(o.0)) }
///     fn elem_sub(self, o: Self) -> Self { Byte(self.0.wrapping_sub(o.0)) }
///     fn elem_mul(self, o: Self) -> Self { Byte(self.0.wrapping_mul(o.0)) }
///     fn elem_div(self, o: Self) -> Self { Byte(self.0 / o.0) }
///     fn elem_neg(self) -> Self { self }
/// }
/// ```
pub trait Element:
    sealed::Sealed + Debug + Clone + Copy + Send + Sync + Default + PartialEq + bytemuck::Pod + 'static
{
    const ZERO: Self;
    /// Element type discriminant: 0=f32, 1=i32
    const ELEM_ID: u8;

    fn elem_add(self, other: Self) -> Self;
    fn elem_sub(self, other: Self) -> Self;
    fn elem_mul(self, other: Self) -> Self;
    fn elem_div(self, other: Self) -> Self;
    fn elem_neg(self) -> Self;
}

impl Element for f32 {
    const ZERO: Self = 0.0;
    const ELEM_ID: u8 = 0;

    #[inline(always)] fn elem_add(self, other: Self) -> Self { self + other }
    #[inline(always)] fn elem_sub(self, other: Self) -> Self { self - other }
    #[inline(always)] fn elem_mul(self, other: Self) -> Self { self * other }
    #[inline(always)] fn elem_div(self, other: Self) -> Self { self / other }
    #[inline(always)] fn elem_neg(self) -> Self { -self }
}

impl Element for i32 {
    const ZERO: Self = 0;
    const ELEM_ID: u8 = 1;

    #[inline(always)] fn elem_add(self, other: Self) -> Self { self.wrapping_add(other) }
    #[inline(always)] fn elem_sub(self, other: Self) -> Self { self.wrapping_sub(other) }
    #[inline(always)] fn elem_mul(self, other: Self) -> Self { self.wrapping_mul(other) }

    /// Truncating division. A zero divisor yields `i32::MIN`, the value the
    /// x86 truncating conversion produces for the vector lanes.
    #[inline(always)]
    fn elem_div(self, other: Self) -> Self {
        if other == 0 { i32::MIN } else { self.wrapping_div(other) }
    }

    #[inline(always)] fn elem_neg(self) -> Self { self.wrapping_neg() }
}

/// ReLU lane op for f32: `x > 0 ? x : 0`.
///
/// NaN and -0.0 both map to +0.0, which is what `max_ps(x, 0)` returns.
#[inline(always)]
pub fn relu_lane(x: f32) -> f32 {
    if x > 0.0 { x } else { 0.0 }
}

/// Elementwise binary operator selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 4] = [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div];

    /// Scalar reference for `a OP b`.
    #[inline(always)]
    pub fn apply<E: Element>(self, a: E, b: E) -> E {
        match self {
            BinaryOp::Add => a.elem_add(b),
            BinaryOp::Sub => a.elem_sub(b),
            BinaryOp::Mul => a.elem_mul(b),
            BinaryOp::Div => a.elem_div(b),
        }
    }

    pub fn is_commutative(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Mul)
    }

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
        }
    }
}

/// Which operand position the broadcast scalar takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarSide {
    /// `scalar OP x[i]` (the `_const_a` kernels).
    Left,
    /// `x[i] OP scalar` (the `_const_b` / unsuffixed kernels).
    Right,
}

impl ScalarSide {
    /// Scalar reference for one lane.
    #[inline(always)]
    pub fn apply<E: Element>(self, op: BinaryOp, scalar: E, x: E) -> E {
        match self {
            ScalarSide::Left => op.apply(scalar, x),
            ScalarSide::Right => op.apply(x, scalar),
        }
    }
}

// ==========================================================================
// Kernels Trait
// ==========================================================================

/// Elementwise kernels over contiguous buffers.
///
/// The slice methods validate lengths and return `KernelError::LengthMismatch`
/// before touching the output. The `*_unchecked` methods are the raw fast path:
/// the caller guarantees `n` valid elements behind every pointer, and the
/// output may alias an input only as a whole buffer (`c == a` or `c == b`).
pub trait Kernels<E: Element>: Send + Sync {

    // ======================================================================
    // Tensor-tensor
    // ======================================================================

    fn vec_add(&self, a: &[E], b: &[E], out: &mut [E]) -> KernelResult<()> {
        self.binary(BinaryOp::Add, a, b, out)
    }
    fn vec_sub(&self, a: &[E], b: &[E], out: &mut [E]) -> KernelResult<()> {
        self.binary(BinaryOp::Sub, a, b, out)
    }
    fn vec_mul(&self, a: &[E], b: &[E], out: &mut [E]) -> KernelResult<()> {
        self.binary(BinaryOp::Mul, a, b, out)
    }
    fn vec_div(&self, a: &[E], b: &[E], out: &mut [E]) -> KernelResult<()> {
        self.binary(BinaryOp::Div, a, b, out)
    }

    fn binary(&self, op: BinaryOp, a: &[E], b: &[E], out: &mut [E]) -> KernelResult<()>;

    /// `acc[i] = acc[i] OP rhs[i]`
    fn binary_inplace(&self, op: BinaryOp, acc: &mut [E], rhs: &[E]) -> KernelResult<()>;

    /// Length-1 operands broadcast: `b.len() == 1` selects the right-scalar
    /// kernel, `a.len() == 1` the left-scalar one. Empty operands are a no-op.
    fn binary_auto(&self, op: BinaryOp, a: &[E], b: &[E], out: &mut [E]) -> KernelResult<()> {
        if a.is_empty() || b.is_empty() || out.is_empty() {
            return Ok(());
        }
        if b.len() == 1 {
            self.broadcast(op, ScalarSide::Right, b[0], a, out)
        } else if a.len() == 1 {
            self.broadcast(op, ScalarSide::Left, a[0], b, out)
        } else {
            self.binary(op, a, b, out)
        }
    }

    // ======================================================================
    // Scalar broadcast
    // ======================================================================

    fn vec_add_scalar(&self, x: &[E], s: E, out: &mut [E]) -> KernelResult<()> {
        self.broadcast(BinaryOp::Add, ScalarSide::Right, s, x, out)
    }
    fn vec_mul_scalar(&self, x: &[E], s: E, out: &mut [E]) -> KernelResult<()> {
        self.broadcast(BinaryOp::Mul, ScalarSide::Right, s, x, out)
    }
    /// `out = x - s`
    fn vec_sub_scalar(&self, x: &[E], s: E, out: &mut [E]) -> KernelResult<()> {
        self.broadcast(BinaryOp::Sub, ScalarSide::Right, s, x, out)
    }
    /// `out = s - x`
    fn scalar_sub_vec(&self, s: E, x: &[E], out: &mut [E]) -> KernelResult<()> {
        self.broadcast(BinaryOp::Sub, ScalarSide::Left, s, x, out)
    }
    /// `out = x / s`
    fn vec_div_scalar(&self, x: &[E], s: E, out: &mut [E]) -> KernelResult<()> {
        self.broadcast(BinaryOp::Div, ScalarSide::Right, s, x, out)
    }
    /// `out = s / x`
    fn scalar_div_vec(&self, s: E, x: &[E], out: &mut [E]) -> KernelResult<()> {
        self.broadcast(BinaryOp::Div, ScalarSide::Left, s, x, out)
    }

    fn broadcast(&self, op: BinaryOp, side: ScalarSide, s: E, x: &[E], out: &mut [E]) -> KernelResult<()>;

    fn broadcast_inplace(&self, op: BinaryOp, side: ScalarSide, s: E, x: &mut [E]);

    // ======================================================================
    // Unary
    // ======================================================================

    fn vec_neg(&self, x: &[E], out: &mut [E]) -> KernelResult<()>;

    // ======================================================================
    // Unchecked fast path
    // ======================================================================

    /// # Safety
    /// `a`, `b` and `c` must each address `n` valid elements; `c` may equal
    /// `a` or `b` but must not partially overlap either.
    unsafe fn binary_unchecked(&self, op: BinaryOp, a: *const E, b: *const E, c: *mut E, n: usize);

    /// # Safety
    /// `x` and `c` must each address `n` valid elements; `c` may equal `x`.
    unsafe fn broadcast_unchecked(&self, op: BinaryOp, side: ScalarSide, s: E, x: *const E, c: *mut E, n: usize);

    /// # Safety
    /// Same contract as [`Kernels::broadcast_unchecked`].
    unsafe fn neg_unchecked(&self, x: *const E, c: *mut E, n: usize);
}

/// f32-only kernels: activation and parameter update.
pub trait FloatKernels: Kernels<f32> {
    fn relu(&self, x: &[f32], out: &mut [f32]) -> KernelResult<()>;
    fn relu_inplace(&self, x: &mut [f32]);

    /// `val[i] -= grad[i] * lr`
    fn gradient_step(&self, val: &mut [f32], grad: &[f32], lr: f32) -> KernelResult<()>;

    /// # Safety
    /// `x` and `c` must each address `n` valid elements; `c` may equal `x`.
    unsafe fn relu_unchecked(&self, x: *const f32, c: *mut f32, n: usize);

    /// # Safety
    /// `val` and `grad` must each address `n` valid elements and must not overlap.
    unsafe fn gradient_step_unchecked(&self, val: *mut f32, grad: *const f32, lr: f32, n: usize);
}
