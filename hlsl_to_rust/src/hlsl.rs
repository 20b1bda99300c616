use hlsl_layout::ScalarKind;
use proc_macro2::{Literal, Span, TokenStream};
use quote::quote;
use syn::Ident;

use crate::parse::MatrixLayout;

/// A field type without array dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseType {
    Scalar(ScalarKind),
    Vector {
        scalar: ScalarKind,
        lanes: usize,
    },
    /// `rows` registers of `lanes` lanes each.
    Matrix {
        scalar: ScalarKind,
        lanes: usize,
        rows: usize,
    },
    Struct(String),
    Opaque(String),
}

// Longer names first so `uint16_t` is not read as `uint` with a suffix.
const SCALAR_NAMES: &[(&str, ScalarKind)] = &[
    ("uint16_t", ScalarKind::Uint16),
    ("float", ScalarKind::Float),
    ("half", ScalarKind::Float),
    ("double", ScalarKind::Double),
    ("dword", ScalarKind::Uint),
    ("uint", ScalarKind::Uint),
    ("bool", ScalarKind::Int),
    ("int", ScalarKind::Int),
];

/// A builtin scalar, vector or matrix type name like `float3x4`.
///
/// Returns `None` for names that are not builtin types
/// and `Some(Err(()))` for builtin types with invalid dimensions like `int5`.
pub fn builtin_type(name: &str, layout: MatrixLayout) -> Option<Result<BaseType, ()>> {
    let (scalar, suffix) = SCALAR_NAMES
        .iter()
        .find_map(|(prefix, kind)| Some((*kind, name.strip_prefix(prefix)?)))?;

    if suffix.is_empty() {
        return Some(Ok(BaseType::Scalar(scalar)));
    }

    let dimension = |digits: &str| -> Option<usize> {
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            digits.parse().ok()
        } else {
            None
        }
    };
    let valid = |n: usize| (1..=4).contains(&n);

    if let Some(n) = dimension(suffix) {
        return Some(if valid(n) {
            Ok(BaseType::Vector { scalar, lanes: n })
        } else {
            Err(())
        });
    }

    let (a, b) = suffix.split_once('x')?;
    let (a, b) = (dimension(a)?, dimension(b)?);
    if !valid(a) || !valid(b) {
        return Some(Err(()));
    }

    // floatAxB has A rows and B columns.
    // Column major matrices store each column in its own register.
    let (lanes, rows) = match layout {
        MatrixLayout::ColumnMajor => (a, b),
        MatrixLayout::RowMajor => (b, a),
    };
    Some(Ok(BaseType::Matrix {
        scalar,
        lanes,
        rows,
    }))
}

pub fn rust_scalar_type(scalar: ScalarKind) -> TokenStream {
    let name = Ident::new(scalar.rust_name(), Span::call_site());
    quote!(#name)
}

pub fn rust_vector_type(scalar: ScalarKind, lanes: usize) -> TokenStream {
    let scalar = rust_scalar_type(scalar);
    let lanes = Literal::usize_unsuffixed(lanes);
    quote!(hlsl_layout::Vector<#scalar, #lanes>)
}

pub fn rust_matrix_type(scalar: ScalarKind, lanes: usize, rows: usize, padded: bool) -> TokenStream {
    let scalar = rust_scalar_type(scalar);
    let lanes = Literal::usize_unsuffixed(lanes);
    let rows = Literal::usize_unsuffixed(rows);
    if padded {
        quote!(hlsl_layout::PaddedMatrix<#scalar, #lanes, #rows>)
    } else {
        quote!(hlsl_layout::LooseMatrix<#scalar, #lanes, #rows>)
    }
}

pub fn rust_array_type(element: TokenStream, count: usize, padded: bool) -> TokenStream {
    let count = Literal::usize_unsuffixed(count);
    if padded {
        quote!(hlsl_layout::PaddedArray<#element, #count>)
    } else {
        quote!(hlsl_layout::LooseArray<#element, #count>)
    }
}
