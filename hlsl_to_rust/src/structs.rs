use hlsl_layout::cb_stride;
use proc_macro2::{Literal, Span, TokenStream};
use quote::quote;
use syn::Ident;

use crate::{StructLayout, WriteOptions};

/// The Rust types of a struct field for both packings.
pub struct Field {
    pub loose_type: TokenStream,
    pub cb_type: TokenStream,
}

/// The loose struct, the constant buffer struct and its [hlsl_layout::PaddedElement] impl.
pub fn struct_items(
    fields: &[Field],
    loose: &StructLayout,
    cb: &StructLayout,
    options: WriteOptions,
) -> TokenStream {
    let loose_types: Vec<_> = fields.iter().map(|f| &f.loose_type).collect();
    let cb_types: Vec<_> = fields.iter().map(|f| &f.cb_type).collect();

    let loose_struct = layout_struct(loose, &loose_types, options.derive_bytemuck, options);
    let cb_struct = layout_struct(cb, &cb_types, true, options);

    // The trailing padding of the last register when used as an array element.
    let cb_name = rust_ident(&cb.name);
    let padding = Literal::usize_unsuffixed(cb_stride(cb.size) - cb.size);

    quote! {
        #loose_struct
        #cb_struct
        unsafe impl hlsl_layout::PaddedElement for #cb_name {
            type Padding = [u8; #padding];
        }
    }
}

fn layout_struct(
    layout: &StructLayout,
    types: &[&TokenStream],
    derive_bytemuck: bool,
    options: WriteOptions,
) -> TokenStream {
    let name = rust_ident(&layout.name);

    let mut members = Vec::new();
    let mut field_names = Vec::new();
    let mut padded = false;
    let mut end = 0;
    for (member, ty) in layout.members.iter().zip(types) {
        if member.offset > end {
            members.push(padding_field(end, member.offset - end));
            padded = true;
        }
        let field_name = rust_ident(&member.name);
        members.push(quote!(pub #field_name: #ty));
        field_names.push(field_name);
        end = member.offset + member.size;
    }
    if layout.size > end {
        members.push(padding_field(end, layout.size - end));
        padded = true;
    }

    let mut derives = vec![quote!(Debug), quote!(Copy), quote!(Clone)];
    if !padded {
        derives.push(quote!(PartialEq));
    }
    if derive_bytemuck {
        derives.push(quote!(bytemuck::Pod));
        derives.push(quote!(bytemuck::Zeroable));
    }

    // Padding bytes do not take part in comparisons.
    let partial_eq = padded.then(|| partial_eq_impl(&name, &field_names));

    let assertions = options
        .layout_assertions
        .then(|| layout_assertions(layout));

    quote! {
        #[repr(C)]
        #[derive(#(#derives),*)]
        pub struct #name {
            #(#members),*
        }
        #partial_eq
        #assertions
    }
}

fn partial_eq_impl(name: &Ident, field_names: &[Ident]) -> TokenStream {
    let body = if field_names.is_empty() {
        quote!(true)
    } else {
        quote!(#(self.#field_names == other.#field_names)&&*)
    };
    quote! {
        impl PartialEq for #name {
            fn eq(&self, other: &Self) -> bool {
                #body
            }
        }
    }
}

fn padding_field(offset: usize, size: usize) -> TokenStream {
    let name = Ident::new(&format!("_pad{offset}"), Span::call_site());
    let size = Literal::usize_unsuffixed(size);
    quote!(pub #name: [u8; #size])
}

fn layout_assertions(layout: &StructLayout) -> TokenStream {
    let name = rust_ident(&layout.name);
    let size = Literal::usize_unsuffixed(layout.size);
    let size_message = format!("size of {} does not match HLSL", layout.name);

    let offsets = layout.members.iter().map(|member| {
        let field_name = rust_ident(&member.name);
        let offset = Literal::usize_unsuffixed(member.offset);
        let message = format!("offset of {}.{} does not match HLSL", layout.name, member.name);
        quote! {
            const _: () = assert!(
                std::mem::offset_of!(#name, #field_name) == #offset,
                #message
            );
        }
    });

    quote! {
        const _: () = assert!(
            std::mem::size_of::<#name>() == #size,
            #size_message
        );
        #(#offsets)*
    }
}

/// An identifier for `name`, using a raw identifier for keywords like `type`.
pub fn rust_ident(name: &str) -> Ident {
    if syn::parse_str::<Ident>(name).is_ok() {
        Ident::new(name, Span::call_site())
    } else if matches!(name, "self" | "Self" | "super" | "crate" | "_") {
        Ident::new(&format!("{name}_"), Span::call_site())
    } else {
        Ident::new_raw(name, Span::call_site())
    }
}
