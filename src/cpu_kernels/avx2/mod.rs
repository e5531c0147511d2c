// Expand AVX2 float-32 implementations (8 lanes)
#[cfg(target_arch = "x86_64")]
crate::expand_isa_impls!(avx2_f32, avx2, f32, float, ["avx", "avx2"]);
// Expand AVX2 int-32 implementations (8 lanes, also used at the AVX-512 level)
#[cfg(target_arch = "x86_64")]
crate::expand_isa_impls!(avx2_i32, avx2, i32, int, ["avx", "avx2"]);

#[cfg(test)]
mod tests;
