//! # hlsl_to_rust
//! hlsl_to_rust generates Rust structs matching the memory layout of HLSL struct and cbuffer declarations.
//!
//! ## Getting Started
//! Each HLSL struct produces two Rust structs built from [hlsl_layout] types.
//! `Name` uses the loose layout of structured buffers and plain `#[repr(C)]` data.
//! `NameCb` uses constant buffer packing with explicit padding fields
//! so it can be uploaded directly with [bytemuck](https://docs.rs/bytemuck).
//! Compile time assertions check every size and offset against the computed HLSL layout.
//!
//! The [create_layout_module] function and [Module] are intended for use in build scripts.
//!
//! ```rust no_run
//! // build.rs
//! use hlsl_to_rust::{create_layout_module, WriteOptions};
//!
//! fn main() {
//!     println!("cargo:rerun-if-changed=src/shared.hlsli");
//!
//!     // Read the HLSL header shared with the shaders.
//!     let hlsl_source = std::fs::read_to_string("src/shared.hlsli").unwrap();
//!
//!     // Generate the structs.
//!     let text = create_layout_module(&hlsl_source, WriteOptions::default()).unwrap();
//!     let out_dir = std::env::var("OUT_DIR").unwrap();
//!     std::fs::write(format!("{out_dir}/shared.rs"), text.as_bytes()).unwrap();
//! }
//! ```
//!
//! ## Preprocessing
//! Only `#define NAME <integer>` and `#pragma pack_matrix` are interpreted.
//! Conditional compilation and includes are not evaluated.
//! Pass already preprocessed HLSL or define array sizes from Rust with [Module::define].
#![allow(clippy::result_large_err)]

use std::{
    collections::{BTreeMap, BTreeSet},
    io::Write,
    process::{Command, Stdio},
};

use case::CaseExt;
use hlsl_layout::{cb_array_size, loose_array_size, MAX_PADDED_LENGTH};
use log::debug;
use proc_macro2::TokenStream;
use quote::quote;

mod error;
mod hlsl;
mod layout;
mod parse;
mod structs;

pub use error::{CreateModuleError, SourceLocation};
pub use layout::{MemberLayout, Packing, StructLayout};

use crate::{
    hlsl::{
        builtin_type, rust_array_type, rust_matrix_type, rust_scalar_type, rust_vector_type,
        BaseType,
    },
    layout::{struct_layout, ElementLayout},
    parse::{parse_header, BlockDecl, Dim, FieldDecl, Item},
    structs::{rust_ident, struct_items, Field},
};

/// Options for configuring the generated structs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Derive [bytemuck::Pod](https://docs.rs/bytemuck/latest/bytemuck/trait.Pod.html#)
    /// and [bytemuck::Zeroable](https://docs.rs/bytemuck/latest/bytemuck/trait.Zeroable.html#)
    /// for the loose `Name` structs when `true`.
    ///
    /// The constant buffer `NameCb` structs always derive both traits.
    /// Loose structs may contain implicit padding that bytemuck rejects,
    /// so this is `false` by default.
    pub derive_bytemuck: bool,

    /// Generate `const` assertions on the size of each struct and the offset of each field.
    /// This is `true` by default.
    pub layout_assertions: bool,

    /// Convert field names like `ambientColor` to `ambient_color`.
    pub snake_case_fields: bool,

    /// Format the generated code with the `rustfmt` formatter used for `cargo fmt`.
    /// This invokes a separate process to run the `rustfmt` executable.
    /// For cases where `rustfmt` is not available
    /// or the generated code is not included in the src directory,
    /// leave this at its default value of `false`.
    pub rustfmt: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            derive_bytemuck: false,
            layout_assertions: true,
            snake_case_fields: false,
            rustfmt: false,
        }
    }
}

/// A type declared outside of HLSL like a descriptor handle.
///
/// The Rust type must have the given size and alignment.
/// Fields in constant buffer structs also require [bytemuck::Pod](https://docs.rs/bytemuck/latest/bytemuck/trait.Pod.html#).
///
/// Arrays in constant buffer structs require [hlsl_layout::PaddedElement].
/// The orphan rule only allows implementing it for types defined in the using crate,
/// so arrays of non path types like `[u32; 2]` or `(u32, u32)` are rejected with
/// [CreateModuleError::OpaqueTypeArray].
/// Foreign path types like `u64` are accepted but fail to compile when used in an array.
///
/// ```rust ignore
/// #[repr(C)]
/// #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
/// pub struct DescriptorHandle {
///     pub heap: u32,
///     pub index: u32,
/// }
///
/// // Pad each array element to the 16 byte register.
/// unsafe impl hlsl_layout::PaddedElement for DescriptorHandle {
///     type Padding = [u8; 8];
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueType {
    /// The Rust type for fields like `u64` or `crate::DescriptorHandle`.
    pub rust_type: String,
    /// The size in bytes.
    pub size: usize,
    /// The alignment in bytes. This must be a power of two of at most 16.
    pub alignment: usize,
}

#[derive(Debug)]
struct RegisteredOpaqueType {
    tokens: TokenStream,
    size: usize,
    alignment: usize,
    path: bool,
}

#[derive(Debug)]
struct StructLayouts {
    loose: StructLayout,
    cb: StructLayout,
}

/// Create Rust structs for the HLSL declarations in `hlsl_source`.
///
/// This creates a [Module] internally and adds a single header.
/// See [Module::add_header] for details.
pub fn create_layout_module(
    hlsl_source: &str,
    options: WriteOptions,
) -> Result<String, CreateModuleError> {
    let mut module = Module::default();
    module.add_header(hlsl_source, options)?;
    Ok(module.to_generated_bindings(options))
}

/// Generated structs for one or more HLSL headers.
///
/// Structs, defines and opaque types are shared by all headers added to the module.
/// Types must be declared before they are used.
#[derive(Debug, Default)]
pub struct Module {
    defines: BTreeMap<String, u64>,
    opaque_types: BTreeMap<String, RegisteredOpaqueType>,
    layouts: BTreeMap<String, StructLayouts>,
    items: BTreeMap<String, TokenStream>,
}

impl Module {
    /// Define an integer constant used for array sizes like `#define NAME value`.
    pub fn define(&mut self, name: impl Into<String>, value: u64) {
        self.defines.insert(name.into(), value);
    }

    /// Register a type that is not declared in HLSL like `PalDescriptorHandle`.
    ///
    /// # Examples
    /**
    ```rust
    use hlsl_to_rust::{Module, OpaqueType, WriteOptions};

    let mut module = Module::default();
    module
        .add_opaque_type(
            "DescriptorHandle",
            OpaqueType {
                rust_type: "[u32; 2]".to_string(),
                size: 8,
                alignment: 4,
            },
        )
        .unwrap();
    module
        .add_header("struct A { float a; DescriptorHandle h; };", WriteOptions::default())
        .unwrap();
    ```
     */
    pub fn add_opaque_type(
        &mut self,
        name: impl Into<String>,
        opaque_type: OpaqueType,
    ) -> Result<(), CreateModuleError> {
        let name = name.into();
        let invalid = |reason: &str| CreateModuleError::InvalidOpaqueType {
            name: name.clone(),
            reason: reason.to_string(),
        };

        let ty = syn::parse_str::<syn::Type>(&opaque_type.rust_type)
            .map_err(|e| invalid(&format!("`{}` is not a Rust type: {e}", opaque_type.rust_type)))?;
        if opaque_type.size == 0 {
            return Err(invalid("size must be greater than 0"));
        }
        if !opaque_type.alignment.is_power_of_two() || opaque_type.alignment > 16 {
            return Err(invalid("alignment must be a power of two of at most 16"));
        }
        if opaque_type.size % opaque_type.alignment != 0 {
            return Err(invalid("size must be a multiple of the alignment"));
        }

        self.opaque_types.insert(
            name,
            RegisteredOpaqueType {
                path: matches!(ty, syn::Type::Path(_)),
                tokens: quote!(#ty),
                size: opaque_type.size,
                alignment: opaque_type.alignment,
            },
        );
        Ok(())
    }

    /// Add generated structs for each `struct` and `cbuffer` declaration in `hlsl_source`.
    ///
    /// Declarations are processed in order.
    /// Field types must be builtin types, structs declared earlier in this or a previous header,
    /// or types registered with [Module::add_opaque_type].
    /// Array sizes must be integer literals or names defined earlier.
    ///
    /// Nothing is added to the module if an error occurs
    /// before the first struct declaration is processed.
    pub fn add_header(
        &mut self,
        hlsl_source: &str,
        options: WriteOptions,
    ) -> Result<(), CreateModuleError> {
        for item in parse_header(hlsl_source)? {
            match item {
                Item::Define { name, value } => self.define(name, value),
                Item::Block(block) => self.add_block(block, options)?,
            }
        }
        Ok(())
    }

    /// The computed layout of a previously added struct using its HLSL name.
    pub fn layout(&self, name: &str, packing: Packing) -> Option<&StructLayout> {
        self.layouts.get(name).map(|layouts| match packing {
            Packing::Loose => &layouts.loose,
            Packing::ConstantBuffer => &layouts.cb,
        })
    }

    /// Generate a Rust module with all added structs.
    pub fn to_generated_bindings(&self, options: WriteOptions) -> String {
        let items = self.items.values();
        let output = quote!(#(#items)*);
        if options.rustfmt {
            pretty_print_rustfmt(output)
        } else {
            pretty_print(output)
        }
    }

    fn add_block(&mut self, block: BlockDecl, options: WriteOptions) -> Result<(), CreateModuleError> {
        let cb_name = format!("{}Cb", block.name);
        let conflict = [block.name.as_str(), cb_name.as_str()]
            .into_iter()
            .chain(block.name.strip_suffix("Cb"))
            .find(|name| self.layouts.contains_key(*name));
        if let Some(name) = conflict {
            return Err(CreateModuleError::DuplicateStruct {
                name: name.to_string(),
                location: block.location,
            });
        }

        let mut names = BTreeSet::new();
        let mut fields = Vec::new();
        let mut loose_members = Vec::new();
        let mut cb_members = Vec::new();

        for field in &block.fields {
            let name = if options.snake_case_fields {
                field.name.to_snake()
            } else {
                field.name.clone()
            };
            // Use the final Rust identifier to also catch keyword renames.
            if !names.insert(rust_ident(&name).to_string()) {
                return Err(CreateModuleError::DuplicateField {
                    name: block.name.clone(),
                    field: name,
                    location: field.location,
                });
            }

            let count = self.array_length(field)?;
            let (loose_type, loose_layout) = self.member(field, count, Packing::Loose)?;
            let (cb_type, cb_layout) = self.member(field, count, Packing::ConstantBuffer)?;

            loose_members.push((name.clone(), loose_layout));
            cb_members.push((name, cb_layout));
            fields.push(Field {
                loose_type,
                cb_type,
            });
        }

        debug!("Computing layouts for {:?} {}", block.kind, block.name);
        let loose = struct_layout(block.name.clone(), loose_members, Packing::Loose);
        let cb = struct_layout(cb_name, cb_members, Packing::ConstantBuffer);
        debug!("{loose}");
        debug!("{cb}");

        self.items
            .insert(block.name.clone(), struct_items(&fields, &loose, &cb, options));
        self.layouts.insert(block.name, StructLayouts { loose, cb });
        Ok(())
    }

    fn array_length(&self, field: &FieldDecl) -> Result<Option<usize>, CreateModuleError> {
        if field.dims.is_empty() {
            return Ok(None);
        }

        // Multidimensional arrays are flattened.
        let mut length: u64 = 1;
        for dim in &field.dims {
            let value = match dim {
                Dim::Literal(value) => *value,
                Dim::Named(name) => *self.defines.get(name).ok_or_else(|| {
                    CreateModuleError::UndefinedArraySize {
                        name: name.clone(),
                        location: field.location,
                    }
                })?,
            };
            length = length.saturating_mul(value);
        }

        if length == 0 {
            Err(CreateModuleError::ZeroArraySize {
                field: field.name.clone(),
                location: field.location,
            })
        } else if length > MAX_PADDED_LENGTH as u64 {
            Err(CreateModuleError::ArrayTooLong {
                field: field.name.clone(),
                length,
                max: MAX_PADDED_LENGTH,
                location: field.location,
            })
        } else {
            Ok(Some(length as usize))
        }
    }

    fn member(
        &self,
        field: &FieldDecl,
        count: Option<usize>,
        packing: Packing,
    ) -> Result<(TokenStream, ElementLayout), CreateModuleError> {
        let padded = packing == Packing::ConstantBuffer;
        let unknown_type = || CreateModuleError::UnknownType {
            name: field.ty.clone(),
            location: field.ty_location,
        };

        let base = match builtin_type(&field.ty, field.matrix_layout) {
            Some(Ok(base)) => base,
            Some(Err(())) => {
                return Err(CreateModuleError::InvalidDimensions {
                    name: field.ty.clone(),
                    location: field.ty_location,
                })
            }
            None if self.layouts.contains_key(&field.ty) => BaseType::Struct(field.ty.clone()),
            None if self.opaque_types.contains_key(&field.ty) => BaseType::Opaque(field.ty.clone()),
            None => return Err(unknown_type()),
        };

        let (ty, element) = match base {
            BaseType::Scalar(scalar) => (
                rust_scalar_type(scalar),
                ElementLayout::primitive(scalar.size(), scalar.size()),
            ),
            BaseType::Vector { scalar, lanes } => (
                rust_vector_type(scalar, lanes),
                ElementLayout::primitive(scalar.size() * lanes, scalar.size()),
            ),
            BaseType::Matrix {
                scalar,
                lanes,
                rows,
            } => {
                let row_size = scalar.size() * lanes;
                let size = if padded {
                    cb_array_size(rows, row_size)
                } else {
                    loose_array_size(rows, row_size)
                };
                (
                    rust_matrix_type(scalar, lanes, rows, padded),
                    ElementLayout {
                        size,
                        alignment: scalar.size(),
                        starts_register: true,
                        ends_register: false,
                    },
                )
            }
            BaseType::Struct(name) => {
                let layouts = self.layouts.get(&name).ok_or_else(unknown_type)?;
                let layout = if padded { &layouts.cb } else { &layouts.loose };
                let ident = rust_ident(&layout.name);
                (
                    quote!(#ident),
                    ElementLayout {
                        size: layout.size,
                        alignment: layout.alignment,
                        starts_register: true,
                        ends_register: true,
                    },
                )
            }
            BaseType::Opaque(name) => {
                let opaque = self.opaque_types.get(&name).ok_or_else(unknown_type)?;
                if padded && count.is_some() && !opaque.path {
                    return Err(CreateModuleError::OpaqueTypeArray {
                        name,
                        location: field.ty_location,
                    });
                }
                (
                    opaque.tokens.clone(),
                    ElementLayout::primitive(opaque.size, opaque.alignment),
                )
            }
        };

        Ok(match count {
            Some(count) => {
                let size = if padded {
                    cb_array_size(count, element.size)
                } else {
                    loose_array_size(count, element.size)
                };
                (
                    rust_array_type(ty, count, padded),
                    ElementLayout {
                        size,
                        alignment: element.alignment,
                        starts_register: true,
                        ends_register: element.ends_register,
                    },
                )
            }
            None => (ty, element),
        })
    }
}

fn pretty_print(output: TokenStream) -> String {
    let text = output.to_string();
    match syn::parse_file(&text) {
        Ok(file) => prettyplease::unparse(&file),
        Err(_) => text,
    }
}

fn pretty_print_rustfmt(tokens: TokenStream) -> String {
    let value = tokens.to_string();
    match rustfmt(&value) {
        Some(formatted) => formatted,
        None => pretty_print(tokens),
    }
}

fn rustfmt(value: &str) -> Option<String> {
    let mut proc = Command::new("rustfmt")
        .arg("--emit=stdout")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;
    proc.stdin.as_mut()?.write_all(value.as_bytes()).ok()?;

    let output = proc.wait_with_output().ok()?;
    if output.status.success() {
        // Don't modify line endings.
        String::from_utf8(output.stdout)
            .ok()
            .map(|s| s.replace('\r', ""))
    } else {
        None
    }
}
