use std::fmt;

use hlsl_layout::{align_to, CB_ROW_BYTES};

/// The packing rules used to place struct members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packing {
    /// Members are placed back to back at their natural alignment
    /// like `#[repr(C)]` Rust structs and HLSL structured buffers.
    Loose,
    /// HLSL constant buffer packing with 16-byte registers.
    ConstantBuffer,
}

/// The location of a struct member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberLayout {
    /// The name of the generated Rust field.
    pub name: String,
    /// The byte offset from the start of the struct.
    pub offset: usize,
    /// The size in bytes.
    pub size: usize,
}

/// The computed memory layout of a generated struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructLayout {
    /// The name of the generated Rust struct.
    pub name: String,
    pub packing: Packing,
    pub members: Vec<MemberLayout>,
    /// The size in bytes including trailing padding.
    pub size: usize,
    /// The largest alignment of any member.
    pub alignment: usize,
}

impl StructLayout {
    /// The gaps between members and after the last member as `(offset, size)`.
    pub fn padding(&self) -> Vec<(usize, usize)> {
        let mut padding = Vec::new();
        let mut end = 0;
        for member in &self.members {
            if member.offset > end {
                padding.push((end, member.offset - end));
            }
            end = member.offset + member.size;
        }
        if self.size > end {
            padding.push((end, self.size - end));
        }
        padding
    }
}

impl fmt::Display for StructLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let packing = match self.packing {
            Packing::Loose => "loose",
            Packing::ConstantBuffer => "constant buffer",
        };
        writeln!(
            f,
            "{} ({packing}, {} bytes, align {})",
            self.name, self.size, self.alignment
        )?;

        let mut rows: Vec<_> = self
            .members
            .iter()
            .map(|m| (m.offset, m.size, m.name.as_str()))
            .chain(self.padding().into_iter().map(|(o, s)| (o, s, "padding")))
            .collect();
        rows.sort_by_key(|(offset, _, _)| *offset);

        for (offset, size, name) in rows {
            writeln!(f, "{offset:>6} {size:>6}  {name}")?;
        }
        Ok(())
    }
}

/// The size and placement constraints of a member type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementLayout {
    pub size: usize,
    pub alignment: usize,
    /// Arrays, matrices and structs start a new register in constant buffers.
    pub starts_register: bool,
    /// Structs do not share their last register with the following member.
    pub ends_register: bool,
}

impl ElementLayout {
    pub fn primitive(size: usize, alignment: usize) -> Self {
        Self {
            size,
            alignment,
            starts_register: false,
            ends_register: false,
        }
    }
}

/// Places members in declaration order.
pub fn struct_layout(
    name: String,
    members: Vec<(String, ElementLayout)>,
    packing: Packing,
) -> StructLayout {
    let mut end = 0;
    let mut alignment = 1;
    let mut register_closed = false;

    let members = members
        .into_iter()
        .map(|(name, element)| {
            let offset = match packing {
                Packing::Loose => align_to(end, element.alignment),
                Packing::ConstantBuffer => {
                    if element.starts_register || register_closed {
                        align_to(end, CB_ROW_BYTES)
                    } else {
                        let offset = align_to(end, element.alignment);
                        if straddles_register(offset, element.size) {
                            align_to(offset, CB_ROW_BYTES)
                        } else {
                            offset
                        }
                    }
                }
            };

            alignment = alignment.max(element.alignment);
            register_closed = element.ends_register;
            end = offset + element.size;

            MemberLayout {
                name,
                offset,
                size: element.size,
            }
        })
        .collect();

    StructLayout {
        name,
        packing,
        members,
        size: align_to(end, alignment),
        alignment,
    }
}

fn straddles_register(offset: usize, size: usize) -> bool {
    size > 0 && offset / CB_ROW_BYTES != (offset + size - 1) / CB_ROW_BYTES
}
