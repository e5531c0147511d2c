#![cfg(target_arch = "x86_64")]

use crate::cpu_kernels::avx2::{avx2_f32, avx2_i32};
use crate::cpu_kernels::scalar::{scalar_f32, scalar_i32};
use crate::traits::relu_lane;

macro_rules! skip_without_avx2 {
    () => {
        if !is_x86_feature_detected!("avx2") {
            println!("Skipping AVX2 test: AVX2 not supported");
            return;
        }
    };
}

fn bits(v: &[f32]) -> &[u32] {
    bytemuck::cast_slice(v)
}

#[test]
fn test_avx2_add_f32() {
    skip_without_avx2!();

    let a = vec![1.0f32; 8];
    let b = vec![2.0f32; 8];
    let mut out = vec![0.0f32; 8];

    unsafe { avx2_f32::add(a.as_ptr(), b.as_ptr(), out.as_mut_ptr(), 8) };

    assert_eq!(out, vec![3.0; 8]);
}

#[test]
fn test_avx2_f32_matches_scalar_bitwise() {
    skip_without_avx2!();

    // 3 blocks + 5 tail, with values that exercise rounding
    let n = 29;
    let a: Vec<f32> = (0..n).map(|i| (i as f32 * 0.37 - 4.1).powi(3)).collect();
    let b: Vec<f32> = (0..n).map(|i| 1.0 / (i as f32 - 13.5)).collect();
    let mut simd = vec![0.0f32; n];
    let mut reference = vec![0.0f32; n];

    type Kernel = unsafe fn(*const f32, *const f32, *mut f32, usize);
    let pairs: [(Kernel, Kernel); 4] = [
        (avx2_f32::add, scalar_f32::add),
        (avx2_f32::sub, scalar_f32::sub),
        (avx2_f32::mul, scalar_f32::mul),
        (avx2_f32::div, scalar_f32::div),
    ];
    for (vector, scalar) in pairs {
        unsafe {
            vector(a.as_ptr(), b.as_ptr(), simd.as_mut_ptr(), n);
            scalar(a.as_ptr(), b.as_ptr(), reference.as_mut_ptr(), n);
        }
        assert_eq!(bits(&simd), bits(&reference));
    }
}

#[test]
fn test_avx2_div_ieee_specials() {
    skip_without_avx2!();

    let a = [1.0f32, -1.0, 0.0, f32::INFINITY, 3.0, -0.0, f32::NAN, 5.0, 1.0];
    let b = [0.0f32, 0.0, 0.0, f32::INFINITY, -0.0, 2.0, 1.0, f32::INFINITY, 0.0];
    let mut out = [0.0f32; 9];
    unsafe { avx2_f32::div(a.as_ptr(), b.as_ptr(), out.as_mut_ptr(), 9) };

    assert_eq!(out[0], f32::INFINITY);
    assert_eq!(out[1], f32::NEG_INFINITY);
    assert!(out[2].is_nan());
    assert!(out[3].is_nan());
    assert_eq!(out[4], f32::NEG_INFINITY);
    assert_eq!(out[5].to_bits(), (-0.0f32).to_bits());
    assert!(out[6].is_nan());
    assert_eq!(out[7], 0.0);
    // tail lane
    assert_eq!(out[8], f32::INFINITY);
}

#[test]
fn test_avx2_relu_negative_zero_and_nan() {
    skip_without_avx2!();

    let x = [-0.0f32, f32::NAN, -1.5, 2.5, 0.0, f32::NEG_INFINITY, f32::INFINITY, 1e-38, -0.0, f32::NAN];
    let mut out = [1.0f32; 10];
    unsafe { avx2_f32::relu(x.as_ptr(), out.as_mut_ptr(), x.len()) };

    let expected: Vec<f32> = x.iter().map(|&v| relu_lane(v)).collect();
    assert_eq!(bits(&out), bits(&expected));
}

#[test]
fn test_avx2_neg_flips_sign_bit() {
    skip_without_avx2!();

    let x = [0.0f32, -0.0, 1.0, -2.0, f32::INFINITY, f32::MIN_POSITIVE, 3.5, -7.25, 0.0];
    let mut out = [0.0f32; 9];
    unsafe { avx2_f32::neg(x.as_ptr(), out.as_mut_ptr(), x.len()) };
    for (o, v) in out.iter().zip(x.iter()) {
        assert_eq!(o.to_bits(), (-v).to_bits());
    }
}

#[test]
fn test_avx2_sub_const_operand_order() {
    skip_without_avx2!();

    let b = [1.0f32, 2.0, 3.0];
    let mut left = [0.0f32; 3];
    let mut right = [0.0f32; 3];
    unsafe {
        avx2_f32::sub_const_a(5.0, b.as_ptr(), left.as_mut_ptr(), 3);
        avx2_f32::sub_const_b(b.as_ptr(), 5.0, right.as_mut_ptr(), 3);
    }
    assert_eq!(left, [4.0, 3.0, 2.0]);
    assert_eq!(right, [-4.0, -3.0, -2.0]);
}

#[test]
fn test_avx2_i32_mul_wraps() {
    skip_without_avx2!();

    let a = [i32::MAX, i32::MIN, 65_536, -3, 7, 1 << 30, -1, 123_456_789, i32::MAX];
    let b = [2, -1, 65_536, 5, -7, 4, i32::MIN, 1_000, 3];
    let mut out = [0i32; 9];
    unsafe { avx2_i32::mul(a.as_ptr(), b.as_ptr(), out.as_mut_ptr(), 9) };
    for i in 0..9 {
        assert_eq!(out[i], a[i].wrapping_mul(b[i]), "lane {i}");
    }
}

#[test]
fn test_avx2_i32_div_matches_scalar() {
    skip_without_avx2!();

    let a = [7, -7, 7, -7, i32::MIN, i32::MAX, 0, 12, 99, i32::MIN, 5, -2_000_000_001, 1, 2, 3, 4];
    let b = [2, 2, -2, -2, -1, 1, 0, 0, 100, 1, 3, 7, -1, i32::MAX, i32::MIN, 4];
    let mut simd = [0i32; 16];
    let mut reference = [0i32; 16];
    unsafe {
        avx2_i32::div(a.as_ptr(), b.as_ptr(), simd.as_mut_ptr(), 16);
        scalar_i32::div(a.as_ptr(), b.as_ptr(), reference.as_mut_ptr(), 16);
    }
    assert_eq!(simd, reference);
    assert_eq!(&simd[..4], &[3, -3, -3, 3]);
    assert_eq!(simd[4], i32::MIN);
    assert_eq!(simd[6], i32::MIN);
}

#[test]
fn test_avx2_i32_broadcast_inplace() {
    skip_without_avx2!();

    let mut x: Vec<i32> = (0..19).collect();
    let p = x.as_mut_ptr();
    unsafe { avx2_i32::sub_const_a(100, p, p, 19) };
    let expected: Vec<i32> = (0..19).map(|i| 100 - i).collect();
    assert_eq!(x, expected);
}

#[test]
fn test_avx2_gradient_step() {
    skip_without_avx2!();

    let n = 21;
    let mut val: Vec<f32> = (0..n).map(|i| i as f32 * 0.5).collect();
    let grad: Vec<f32> = (0..n).map(|i| 1.0 - i as f32 * 0.1).collect();
    let mut reference = val.clone();
    for (v, g) in reference.iter_mut().zip(grad.iter()) {
        *v -= g * 0.01;
    }
    unsafe { avx2_f32::gradient_step(val.as_mut_ptr(), grad.as_ptr(), 0.01, n) };
    assert_eq!(bits(&val), bits(&reference));
}

/// Lengths around the 8-lane block, plus one past the parallel threshold.
fn boundary_lengths() -> Vec<usize> {
    let mut ns: Vec<usize> = (0..8).collect();
    ns.extend([8, 9, 15, 16, 17, 29, 64, 4096 * 8 + 5]);
    ns
}

#[test]
fn test_avx2_f32_broadcast_matches_scalar_bitwise() {
    skip_without_avx2!();

    type Right = unsafe fn(*const f32, f32, *mut f32, usize);
    type Left = unsafe fn(f32, *const f32, *mut f32, usize);
    let right: [(&str, Right, Right); 4] = [
        ("add_const", avx2_f32::add_const, scalar_f32::add_const),
        ("mul_const", avx2_f32::mul_const, scalar_f32::mul_const),
        ("sub_const_b", avx2_f32::sub_const_b, scalar_f32::sub_const_b),
        ("div_const_b", avx2_f32::div_const_b, scalar_f32::div_const_b),
    ];
    let left: [(&str, Left, Left); 2] = [
        ("sub_const_a", avx2_f32::sub_const_a, scalar_f32::sub_const_a),
        ("div_const_a", avx2_f32::div_const_a, scalar_f32::div_const_a),
    ];
    let s = -1.375f32;

    for n in boundary_lengths() {
        let x: Vec<f32> = (0..n).map(|i| (i % 977) as f32 * 0.31 - 150.2).collect();
        let mut simd = vec![f32::NAN; n];
        let mut reference = vec![f32::NAN; n];

        for (name, vector, scalar) in right {
            unsafe {
                vector(x.as_ptr(), s, simd.as_mut_ptr(), n);
                scalar(x.as_ptr(), s, reference.as_mut_ptr(), n);
            }
            assert_eq!(bits(&simd), bits(&reference), "{name} n = {n}");
        }
        for (name, vector, scalar) in left {
            unsafe {
                vector(s, x.as_ptr(), simd.as_mut_ptr(), n);
                scalar(s, x.as_ptr(), reference.as_mut_ptr(), n);
            }
            assert_eq!(bits(&simd), bits(&reference), "{name} n = {n}");
        }
    }
}

#[test]
fn test_avx2_f32_unary_matches_scalar_bitwise() {
    skip_without_avx2!();

    type Unary = unsafe fn(*const f32, *mut f32, usize);
    let ops: [(&str, Unary, Unary); 2] = [
        ("neg", avx2_f32::neg, scalar_f32::neg),
        ("relu", avx2_f32::relu, scalar_f32::relu),
    ];
    for n in boundary_lengths() {
        let x: Vec<f32> = (0..n).map(|i| (i % 13) as f32 - 6.5).collect();
        let mut simd = vec![f32::NAN; n];
        let mut reference = vec![f32::NAN; n];
        for (name, vector, scalar) in ops {
            unsafe {
                vector(x.as_ptr(), simd.as_mut_ptr(), n);
                scalar(x.as_ptr(), reference.as_mut_ptr(), n);
            }
            assert_eq!(bits(&simd), bits(&reference), "{name} n = {n}");
        }
    }
}
