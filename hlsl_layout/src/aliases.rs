//! HLSL spellings of the vector and matrix types.
//!
//! HLSL matrices are column-major by default,
//! so `floatAxB` is stored as `B` registers of `A` lanes.
//! The `Cb` matrix variants use constant buffer packing.
use crate::{LooseMatrix, PaddedMatrix, Vector};

macro_rules! vector_aliases {
    ($($scalar:ty => $one:ident $two:ident $three:ident $four:ident),* $(,)?) => {
        $(
            pub type $one = Vector<$scalar, 1>;
            pub type $two = Vector<$scalar, 2>;
            pub type $three = Vector<$scalar, 3>;
            pub type $four = Vector<$scalar, 4>;
        )*
    };
}

vector_aliases! {
    f32 => Float1 Float2 Float3 Float4,
    u32 => Uint1 Uint2 Uint3 Uint4,
    i32 => Int1 Int2 Int3 Int4,
    // HLSL bool is 4 bytes in constant buffers.
    i32 => Bool1 Bool2 Bool3 Bool4,
    u16 => UShort1 UShort2 UShort3 UShort4,
    f64 => Double1 Double2 Double3 Double4,
}

macro_rules! float_matrix_aliases {
    ($($loose:ident $padded:ident = $lanes:literal x $rows:literal),* $(,)?) => {
        $(
            #[doc = concat!("HLSL `float", stringify!($lanes), "x", stringify!($rows), "` with tightly packed rows.")]
            pub type $loose = LooseMatrix<f32, $lanes, $rows>;

            #[doc = concat!("HLSL `float", stringify!($lanes), "x", stringify!($rows), "` in a constant buffer.")]
            pub type $padded = PaddedMatrix<f32, $lanes, $rows>;
        )*
    };
}

float_matrix_aliases! {
    Float1x1 Float1x1Cb = 1 x 1,
    Float1x2 Float1x2Cb = 1 x 2,
    Float1x3 Float1x3Cb = 1 x 3,
    Float1x4 Float1x4Cb = 1 x 4,
    Float2x1 Float2x1Cb = 2 x 1,
    Float2x2 Float2x2Cb = 2 x 2,
    Float2x3 Float2x3Cb = 2 x 3,
    Float2x4 Float2x4Cb = 2 x 4,
    Float3x1 Float3x1Cb = 3 x 1,
    Float3x2 Float3x2Cb = 3 x 2,
    Float3x3 Float3x3Cb = 3 x 3,
    Float3x4 Float3x4Cb = 3 x 4,
    Float4x1 Float4x1Cb = 4 x 1,
    Float4x2 Float4x2Cb = 4 x 2,
    Float4x3 Float4x3Cb = 4 x 3,
    Float4x4 Float4x4Cb = 4 x 4,
}
