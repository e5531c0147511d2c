//! Layer 2: generic kernel bodies parameterized by ISA + element.
//!
//! Every kernel has the same three parts:
//! 1. `LANES` from `simd_primitive!(isa, elem, lanes)`
//! 2. a `#[target_feature]` block loop over whole blocks `[lo, hi)`, split
//!    across workers by `parallel::run_blocks`
//! 3. a serial tail over the last `n % LANES` elements using the scalar
//!    primitive of the same op
//!
//! Each block loads every input before it stores, so `c == a` / `c == b`
//! aliasing is safe. Pointers cross the rayon boundary as `usize`.

/// Tensor-tensor kernels: `add`, `sub`, `mul`, `div`.
#[macro_export]
macro_rules! define_binary_ops {
    ($isa:ident, $elem:ident, [$($feat:literal),*]) => {
        $crate::define_binary_ops!(@op $isa, $elem, [$($feat),*], add);
        $crate::define_binary_ops!(@op $isa, $elem, [$($feat),*], sub);
        $crate::define_binary_ops!(@op $isa, $elem, [$($feat),*], mul);
        $crate::define_binary_ops!(@op $isa, $elem, [$($feat),*], div);
    };
    (@op $isa:ident, $elem:ident, [$($feat:literal),*], $op:ident) => {
        #[doc = concat!("`c[i] = a[i] ", stringify!($op), " b[i]` for `i < n`.")]
        ///
        /// # Safety
        /// `a`, `b`, `c` must each address `n` valid elements. `c` may equal
        /// `a` or `b`; any other overlap is undefined behavior.
        #[inline]
        pub unsafe fn $op(a: *const $elem, b: *const $elem, c: *mut $elem, n: usize) {
            const LANES: usize = $crate::simd_primitive!($isa, $elem, lanes);

            $(#[target_feature(enable = $feat)])*
            unsafe fn blocks(a: *const $elem, b: *const $elem, c: *mut $elem, lo: usize, hi: usize) {
                let end = hi * LANES;
                let mut i = lo * LANES;
                while i < end {
                    #[allow(unused_unsafe)]
                    unsafe {
                        let va = $crate::simd_primitive!($isa, $elem, load, a.add(i));
                        let vb = $crate::simd_primitive!($isa, $elem, load, b.add(i));
                        let res = $crate::simd_primitive!($isa, $elem, $op, va, vb);
                        $crate::simd_primitive!($isa, $elem, store, c.add(i), res);
                    }
                    i += LANES;
                }
            }

            let block_count = n / LANES;
            let (ap, bp, cp) = (a as usize, b as usize, c as usize);
            $crate::parallel::run_blocks(block_count, |lo, hi| unsafe {
                blocks(ap as *const $elem, bp as *const $elem, cp as *mut $elem, lo, hi)
            });

            for i in block_count * LANES..n {
                unsafe {
                    let res = $crate::simd_primitive!(scalar, $elem, $op, *a.add(i), *b.add(i));
                    *c.add(i) = res;
                }
            }
        }
    };
}

/// Scalar-broadcast kernels.
///
/// `_const_a` takes the scalar as the left operand, `_const_b` (and the
/// unsuffixed commutative kernels) as the right operand.
#[macro_export]
macro_rules! define_broadcast_ops {
    ($isa:ident, $elem:ident, [$($feat:literal),*]) => {
        $crate::define_broadcast_ops!(@right $isa, $elem, [$($feat),*], add_const, add);
        $crate::define_broadcast_ops!(@right $isa, $elem, [$($feat),*], mul_const, mul);
        $crate::define_broadcast_ops!(@right $isa, $elem, [$($feat),*], sub_const_b, sub);
        $crate::define_broadcast_ops!(@right $isa, $elem, [$($feat),*], div_const_b, div);
        $crate::define_broadcast_ops!(@left $isa, $elem, [$($feat),*], sub_const_a, sub);
        $crate::define_broadcast_ops!(@left $isa, $elem, [$($feat),*], div_const_a, div);
    };
    (@right $isa:ident, $elem:ident, [$($feat:literal),*], $name:ident, $op:ident) => {
        #[doc = concat!("`c[i] = x[i] ", stringify!($op), " s` for `i < n`.")]
        ///
        /// # Safety
        /// `x` and `c` must each address `n` valid elements; `c` may equal `x`.
        #[inline]
        pub unsafe fn $name(x: *const $elem, s: $elem, c: *mut $elem, n: usize) {
            const LANES: usize = $crate::simd_primitive!($isa, $elem, lanes);

            $(#[target_feature(enable = $feat)])*
            unsafe fn blocks(x: *const $elem, s: $elem, c: *mut $elem, lo: usize, hi: usize) {
                #[allow(unused_unsafe)]
                let vs = unsafe { $crate::simd_primitive!($isa, $elem, splat, s) };
                let end = hi * LANES;
                let mut i = lo * LANES;
                while i < end {
                    #[allow(unused_unsafe)]
                    unsafe {
                        let vx = $crate::simd_primitive!($isa, $elem, load, x.add(i));
                        let res = $crate::simd_primitive!($isa, $elem, $op, vx, vs);
                        $crate::simd_primitive!($isa, $elem, store, c.add(i), res);
                    }
                    i += LANES;
                }
            }

            let block_count = n / LANES;
            let (xp, cp) = (x as usize, c as usize);
            $crate::parallel::run_blocks(block_count, |lo, hi| unsafe {
                blocks(xp as *const $elem, s, cp as *mut $elem, lo, hi)
            });

            for i in block_count * LANES..n {
                unsafe {
                    let res = $crate::simd_primitive!(scalar, $elem, $op, *x.add(i), s);
                    *c.add(i) = res;
                }
            }
        }
    };
    (@left $isa:ident, $elem:ident, [$($feat:literal),*], $name:ident, $op:ident) => {
        #[doc = concat!("`c[i] = s ", stringify!($op), " x[i]` for `i < n`.")]
        ///
        /// # Safety
        /// `x` and `c` must each address `n` valid elements; `c` may equal `x`.
        #[inline]
        pub unsafe fn $name(s: $elem, x: *const $elem, c: *mut $elem, n: usize) {
            const LANES: usize = $crate::simd_primitive!($isa, $elem, lanes);

            $(#[target_feature(enable = $feat)])*
            unsafe fn blocks(s: $elem, x: *const $elem, c: *mut $elem, lo: usize, hi: usize) {
                #[allow(unused_unsafe)]
                let vs = unsafe { $crate::simd_primitive!($isa, $elem, splat, s) };
                let end = hi * LANES;
                let mut i = lo * LANES;
                while i < end {
                    #[allow(unused_unsafe)]
                    unsafe {
                        let vx = $crate::simd_primitive!($isa, $elem, load, x.add(i));
                        let res = $crate::simd_primitive!($isa, $elem, $op, vs, vx);
                        $crate::simd_primitive!($isa, $elem, store, c.add(i), res);
                    }
                    i += LANES;
                }
            }

            let block_count = n / LANES;
            let (xp, cp) = (x as usize, c as usize);
            $crate::parallel::run_blocks(block_count, |lo, hi| unsafe {
                blocks(s, xp as *const $elem, cp as *mut $elem, lo, hi)
            });

            for i in block_count * LANES..n {
                unsafe {
                    let res = $crate::simd_primitive!(scalar, $elem, $op, s, *x.add(i));
                    *c.add(i) = res;
                }
            }
        }
    };
}

/// Unary kernels (`neg`, and `relu` for f32).
#[macro_export]
macro_rules! define_unary_ops {
    (@op $isa:ident, $elem:ident, [$($feat:literal),*], $op:ident) => {
        #[doc = concat!("`c[i] = ", stringify!($op), "(x[i])` for `i < n`.")]
        ///
        /// # Safety
        /// `x` and `c` must each address `n` valid elements; `c` may equal `x`.
        #[inline]
        pub unsafe fn $op(x: *const $elem, c: *mut $elem, n: usize) {
            const LANES: usize = $crate::simd_primitive!($isa, $elem, lanes);

            $(#[target_feature(enable = $feat)])*
            unsafe fn blocks(x: *const $elem, c: *mut $elem, lo: usize, hi: usize) {
                let end = hi * LANES;
                let mut i = lo * LANES;
                while i < end {
                    #[allow(unused_unsafe)]
                    unsafe {
                        let vx = $crate::simd_primitive!($isa, $elem, load, x.add(i));
                        let res = $crate::simd_primitive!($isa, $elem, $op, vx);
                        $crate::simd_primitive!($isa, $elem, store, c.add(i), res);
                    }
                    i += LANES;
                }
            }

            let block_count = n / LANES;
            let (xp, cp) = (x as usize, c as usize);
            $crate::parallel::run_blocks(block_count, |lo, hi| unsafe {
                blocks(xp as *const $elem, cp as *mut $elem, lo, hi)
            });

            for i in block_count * LANES..n {
                unsafe {
                    let res = $crate::simd_primitive!(scalar, $elem, $op, *x.add(i));
                    *c.add(i) = res;
                }
            }
        }
    };
    // The feature list is forwarded as a single token tree so it can be
    // repeated once per op.
    ($isa:ident, $elem:ident, $feats:tt, $($op:ident),+) => {
        $( $crate::define_unary_ops!(@op $isa, $elem, $feats, $op); )+
    };
}

/// Parameter update: `val[i] = val[i] - grad[i] * lr`, in place.
#[macro_export]
macro_rules! define_update_ops {
    ($isa:ident, $elem:ident, [$($feat:literal),*]) => {
        /// Gradient descent step over `n` parameters: multiply, then subtract.
        ///
        /// # Safety
        /// `val` and `grad` must each address `n` valid elements and must not overlap.
        #[inline]
        pub unsafe fn gradient_step(val: *mut $elem, grad: *const $elem, lr: $elem, n: usize) {
            const LANES: usize = $crate::simd_primitive!($isa, $elem, lanes);

            $(#[target_feature(enable = $feat)])*
            unsafe fn blocks(val: *mut $elem, grad: *const $elem, lr: $elem, lo: usize, hi: usize) {
                #[allow(unused_unsafe)]
                let vlr = unsafe { $crate::simd_primitive!($isa, $elem, splat, lr) };
                let end = hi * LANES;
                let mut i = lo * LANES;
                while i < end {
                    #[allow(unused_unsafe)]
                    unsafe {
                        let vv = $crate::simd_primitive!($isa, $elem, load, val.add(i));
                        let vg = $crate::simd_primitive!($isa, $elem, load, grad.add(i));
                        let step = $crate::simd_primitive!($isa, $elem, mul, vg, vlr);
                        let res = $crate::simd_primitive!($isa, $elem, sub, vv, step);
                        $crate::simd_primitive!($isa, $elem, store, val.add(i), res);
                    }
                    i += LANES;
                }
            }

            let block_count = n / LANES;
            let (vp, gp) = (val as usize, grad as usize);
            $crate::parallel::run_blocks(block_count, |lo, hi| unsafe {
                blocks(vp as *mut $elem, gp as *const $elem, lr, lo, hi)
            });

            for i in block_count * LANES..n {
                unsafe {
                    let step = $crate::simd_primitive!(scalar, $elem, mul, *grad.add(i), lr);
                    let res = $crate::simd_primitive!(scalar, $elem, sub, *val.add(i), step);
                    *val.add(i) = res;
                }
            }
        }
    };
}
