/// Expands operator templates for a specific ISA and element type.
///
/// This macro is "Layer 3" of the architecture. It takes a module name, an
/// ISA identifier, an element type, the element kind (`float` or `int`) and
/// the target features the block loops are compiled with, and generates a
/// module holding every kernel for that combination plus its `LANES`.
#[macro_export]
macro_rules! expand_isa_impls {
    ($module_name:ident, $isa:ident, $elem:ident, float, [$($feat:literal),*]) => {
        pub mod $module_name {
            /// Elements per vector block.
            pub const LANES: usize = $crate::simd_primitive!($isa, $elem, lanes);

            $crate::define_binary_ops!($isa, $elem, [$($feat),*]);
            $crate::define_broadcast_ops!($isa, $elem, [$($feat),*]);
            $crate::define_unary_ops!($isa, $elem, [$($feat),*], neg, relu);
            $crate::define_update_ops!($isa, $elem, [$($feat),*]);
        }
    };
    ($module_name:ident, $isa:ident, $elem:ident, int, [$($feat:literal),*]) => {
        pub mod $module_name {
            /// Elements per vector block.
            pub const LANES: usize = $crate::simd_primitive!($isa, $elem, lanes);

            $crate::define_binary_ops!($isa, $elem, [$($feat),*]);
            $crate::define_broadcast_ops!($isa, $elem, [$($feat),*]);
            $crate::define_unary_ops!($isa, $elem, [$($feat),*], neg);
        }
    };
}
