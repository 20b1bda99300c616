use std::fmt::Debug;

use bytemuck::Pod;

mod private {
    pub trait Sealed {}
}

/// The underlying numeric representation of a vector lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// 32-bit float, HLSL `float`.
    Float,
    /// 32-bit unsigned integer, HLSL `uint`.
    Uint,
    /// 32-bit signed integer, HLSL `int`.
    /// HLSL `bool` is stored in constant buffers with the same 4 bytes.
    Int,
    /// 16-bit unsigned integer, HLSL `uint16_t`.
    Uint16,
    /// 64-bit float, HLSL `double`.
    Double,
}

impl ScalarKind {
    /// The size in bytes of a single lane.
    pub const fn size(self) -> usize {
        match self {
            ScalarKind::Float | ScalarKind::Uint | ScalarKind::Int => 4,
            ScalarKind::Uint16 => 2,
            ScalarKind::Double => 8,
        }
    }

    /// The HLSL spelling of the scalar type.
    pub const fn hlsl_name(self) -> &'static str {
        match self {
            ScalarKind::Float => "float",
            ScalarKind::Uint => "uint",
            ScalarKind::Int => "int",
            ScalarKind::Uint16 => "uint16_t",
            ScalarKind::Double => "double",
        }
    }

    /// The Rust primitive used to store the scalar.
    pub const fn rust_name(self) -> &'static str {
        match self {
            ScalarKind::Float => "f32",
            ScalarKind::Uint => "u32",
            ScalarKind::Int => "i32",
            ScalarKind::Uint16 => "u16",
            ScalarKind::Double => "f64",
        }
    }
}

/// A primitive that can be used as a vector lane.
///
/// This trait is sealed and implemented for `f32`, `u32`, `i32`, `u16` and `f64`.
pub trait Scalar: Pod + Default + PartialEq + Debug + private::Sealed {
    const KIND: ScalarKind;
}

macro_rules! impl_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl private::Sealed for $ty {}

            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;
            }

            static_assertions::const_assert_eq!(
                std::mem::size_of::<$ty>(),
                ScalarKind::$kind.size()
            );
        )*
    };
}

impl_scalar! {
    f32 => Float,
    u32 => Uint,
    i32 => Int,
    u16 => Uint16,
    f64 => Double,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_kinds() {
        assert_eq!(ScalarKind::Float, f32::KIND);
        assert_eq!(ScalarKind::Uint, u32::KIND);
        assert_eq!(ScalarKind::Int, i32::KIND);
        assert_eq!(ScalarKind::Uint16, u16::KIND);
        assert_eq!(ScalarKind::Double, f64::KIND);
    }

    #[test]
    fn scalar_names() {
        assert_eq!("uint16_t", ScalarKind::Uint16.hlsl_name());
        assert_eq!("u16", ScalarKind::Uint16.rust_name());
        assert_eq!("double", ScalarKind::Double.hlsl_name());
        assert_eq!(8, ScalarKind::Double.size());
    }
}
