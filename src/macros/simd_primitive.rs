/// Maps abstract lane operations to concrete hardware intrinsics or scalar fallbacks.
///
/// # Architecture
/// This macro is "Layer 1" of the kernel macro architecture. It provides, per
/// `(isa, elem)` pair:
/// - the lane count (`lanes`)
/// - load/store/splat
/// - lane operations (add, sub, mul, div, neg, relu)
///
/// Scalar arms forward to the [`Element`](crate::traits::Element) lane methods,
/// and every template tail uses the same methods, so vector and scalar
/// results agree bit-for-bit.
///
/// Memory and intrinsic arms must be expanded inside an `unsafe` context.
///
/// # Usage
/// ```ignore
/// simd_primitive!(scalar, f32, add, a, b) // -> a.elem_add(b)
/// simd_primitive!(avx2, f32, add, a, b)   // -> _mm256_add_ps(a, b)
/// ```
#[macro_export]
macro_rules! simd_primitive {
    // ========================================================================
    // Scalar Fallback (Baseline): f32 and i32
    // ========================================================================

    (scalar, $elem:ident, lanes) => { 1 };
    (scalar, $elem:ident, splat, $v:expr) => { $v };
    (scalar, $elem:ident, load, $p:expr) => { *$p };
    (scalar, $elem:ident, store, $p:expr, $v:expr) => { *$p = $v };
    (scalar, $elem:ident, add, $a:expr, $b:expr) => { <$elem as $crate::traits::Element>::elem_add($a, $b) };
    (scalar, $elem:ident, sub, $a:expr, $b:expr) => { <$elem as $crate::traits::Element>::elem_sub($a, $b) };
    (scalar, $elem:ident, mul, $a:expr, $b:expr) => { <$elem as $crate::traits::Element>::elem_mul($a, $b) };
    (scalar, $elem:ident, div, $a:expr, $b:expr) => { <$elem as $crate::traits::Element>::elem_div($a, $b) };
    (scalar, $elem:ident, neg, $a:expr) => { <$elem as $crate::traits::Element>::elem_neg($a) };
    (scalar, f32, relu, $a:expr) => { $crate::traits::relu_lane($a) };

    // ========================================================================
    // AVX2 (x86_64): 256-bit
    // ========================================================================

    // --- f32 ---
    (avx2, f32, lanes) => { 8 };
    (avx2, f32, splat, $v:expr) => { std::arch::x86_64::_mm256_set1_ps($v) };
    (avx2, f32, load, $p:expr) => { std::arch::x86_64::_mm256_loadu_ps($p) };
    (avx2, f32, store, $p:expr, $v:expr) => { std::arch::x86_64::_mm256_storeu_ps($p, $v) };
    (avx2, f32, add, $a:expr, $b:expr) => { std::arch::x86_64::_mm256_add_ps($a, $b) };
    (avx2, f32, sub, $a:expr, $b:expr) => { std::arch::x86_64::_mm256_sub_ps($a, $b) };
    (avx2, f32, mul, $a:expr, $b:expr) => { std::arch::x86_64::_mm256_mul_ps($a, $b) };
    (avx2, f32, div, $a:expr, $b:expr) => { std::arch::x86_64::_mm256_div_ps($a, $b) };
    // flip the sign bit, same bits as scalar `-x`
    (avx2, f32, neg, $a:expr) => { std::arch::x86_64::_mm256_xor_ps($a, std::arch::x86_64::_mm256_set1_ps(-0.0)) };
    // max_ps returns the second operand on NaN and on ±0 ties
    (avx2, f32, relu, $a:expr) => { std::arch::x86_64::_mm256_max_ps($a, std::arch::x86_64::_mm256_setzero_ps()) };

    // --- i32 ---
    (avx2, i32, lanes) => { 8 };
    (avx2, i32, splat, $v:expr) => { std::arch::x86_64::_mm256_set1_epi32($v) };
    (avx2, i32, load, $p:expr) => { std::arch::x86_64::_mm256_loadu_si256($p as *const std::arch::x86_64::__m256i) };
    (avx2, i32, store, $p:expr, $v:expr) => { std::arch::x86_64::_mm256_storeu_si256($p as *mut std::arch::x86_64::__m256i, $v) };
    (avx2, i32, add, $a:expr, $b:expr) => { std::arch::x86_64::_mm256_add_epi32($a, $b) };
    (avx2, i32, sub, $a:expr, $b:expr) => { std::arch::x86_64::_mm256_sub_epi32($a, $b) };
    // low 32 bits of each lane product
    (avx2, i32, mul, $a:expr, $b:expr) => { std::arch::x86_64::_mm256_mullo_epi32($a, $b) };
    (avx2, i32, neg, $a:expr) => { std::arch::x86_64::_mm256_sub_epi32(std::arch::x86_64::_mm256_setzero_si256(), $a) };
    // No integer divide on AVX2: divide in f64 (exact for i32 operands) and
    // truncate. Zero divisors and MIN / -1 convert to i32::MIN.
    (avx2, i32, div, $a:expr, $b:expr) => {{
        let va = $a;
        let vb = $b;
        let lo = std::arch::x86_64::_mm256_div_pd(
            std::arch::x86_64::_mm256_cvtepi32_pd(std::arch::x86_64::_mm256_castsi256_si128(va)),
            std::arch::x86_64::_mm256_cvtepi32_pd(std::arch::x86_64::_mm256_castsi256_si128(vb)),
        );
        let hi = std::arch::x86_64::_mm256_div_pd(
            std::arch::x86_64::_mm256_cvtepi32_pd(std::arch::x86_64::_mm256_extracti128_si256::<1>(va)),
            std::arch::x86_64::_mm256_cvtepi32_pd(std::arch::x86_64::_mm256_extracti128_si256::<1>(vb)),
        );
        std::arch::x86_64::_mm256_set_m128i(
            std::arch::x86_64::_mm256_cvttpd_epi32(hi),
            std::arch::x86_64::_mm256_cvttpd_epi32(lo),
        )
    }};

    // ========================================================================
    // AVX-512F (x86_64): 512-bit, f32 only
    // ========================================================================

    (avx512, f32, lanes) => { 16 };
    (avx512, f32, splat, $v:expr) => { std::arch::x86_64::_mm512_set1_ps($v) };
    (avx512, f32, load, $p:expr) => { std::arch::x86_64::_mm512_loadu_ps($p) };
    (avx512, f32, store, $p:expr, $v:expr) => { std::arch::x86_64::_mm512_storeu_ps($p, $v) };
    (avx512, f32, add, $a:expr, $b:expr) => { std::arch::x86_64::_mm512_add_ps($a, $b) };
    (avx512, f32, sub, $a:expr, $b:expr) => { std::arch::x86_64::_mm512_sub_ps($a, $b) };
    (avx512, f32, mul, $a:expr, $b:expr) => { std::arch::x86_64::_mm512_mul_ps($a, $b) };
    (avx512, f32, div, $a:expr, $b:expr) => { std::arch::x86_64::_mm512_div_ps($a, $b) };
    // integer xor keeps this within AVX-512F (xor_ps needs DQ)
    (avx512, f32, neg, $a:expr) => {
        std::arch::x86_64::_mm512_castsi512_ps(std::arch::x86_64::_mm512_xor_si512(
            std::arch::x86_64::_mm512_castps_si512($a),
            std::arch::x86_64::_mm512_set1_epi32(i32::MIN),
        ))
    };
    (avx512, f32, relu, $a:expr) => { std::arch::x86_64::_mm512_max_ps($a, std::arch::x86_64::_mm512_setzero_ps()) };
}
