// Expand scalar float-32 implementations (1 lane, used as the portable fallback)
crate::expand_isa_impls!(scalar_f32, scalar, f32, float, []);
// Expand scalar int-32 implementations
crate::expand_isa_impls!(scalar_i32, scalar, i32, int, []);
