use std::fmt;
use std::path::Path;

use thiserror::Error;

/// A position in the HLSL source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// The line starting from 1.
    pub line: usize,
    /// The column in characters starting from 1.
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors while generating Rust source for HLSL struct declarations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CreateModuleError {
    /// The HLSL source could not be parsed.
    #[error("failed to parse: {message}")]
    ParseError {
        message: String,
        location: SourceLocation,
    },

    /// The field type is not a builtin type, a previously declared struct, or a registered opaque type.
    #[error("unknown type `{name}`")]
    UnknownType {
        name: String,
        location: SourceLocation,
    },

    /// The array size is a name without a `#define` or [Module::define](crate::Module::define).
    #[error("array size `{name}` is not defined")]
    UndefinedArraySize {
        name: String,
        location: SourceLocation,
    },

    /// Arrays must have at least one element.
    #[error("array `{field}` has no elements")]
    ZeroArraySize {
        field: String,
        location: SourceLocation,
    },

    /// Constant buffer arrays support at most [hlsl_layout::MAX_PADDED_LENGTH] elements.
    #[error("array `{field}` has {length} elements but at most {max} are supported")]
    ArrayTooLong {
        field: String,
        length: u64,
        max: usize,
        location: SourceLocation,
    },

    /// Vectors and matrices have between 1 and 4 lanes and rows.
    #[error("type `{name}` has invalid dimensions")]
    InvalidDimensions {
        name: String,
        location: SourceLocation,
    },

    /// Each struct name can only be declared once in a [Module](crate::Module).
    #[error("struct `{name}` is already defined")]
    DuplicateStruct {
        name: String,
        location: SourceLocation,
    },

    /// Field names must be unique after applying [WriteOptions::snake_case_fields](crate::WriteOptions::snake_case_fields).
    #[error("field `{field}` is defined more than once in struct `{name}`")]
    DuplicateField {
        name: String,
        field: String,
        location: SourceLocation,
    },

    /// Constant buffer arrays of an opaque type require a path type implementing
    /// [hlsl_layout::PaddedElement] like `crate::DescriptorHandle`.
    #[error("opaque type `{name}` cannot be used in constant buffer arrays")]
    OpaqueTypeArray {
        name: String,
        location: SourceLocation,
    },

    /// The opaque type registration is invalid.
    #[error("invalid opaque type `{name}`: {reason}")]
    InvalidOpaqueType { name: String, reason: String },
}

impl CreateModuleError {
    /// The location of the error in the HLSL source if known.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            CreateModuleError::ParseError { location, .. }
            | CreateModuleError::UnknownType { location, .. }
            | CreateModuleError::UndefinedArraySize { location, .. }
            | CreateModuleError::ZeroArraySize { location, .. }
            | CreateModuleError::ArrayTooLong { location, .. }
            | CreateModuleError::InvalidDimensions { location, .. }
            | CreateModuleError::DuplicateStruct { location, .. }
            | CreateModuleError::DuplicateField { location, .. }
            | CreateModuleError::OpaqueTypeArray { location, .. } => Some(*location),
            CreateModuleError::InvalidOpaqueType { .. } => None,
        }
    }

    /// Writes a diagnostic error to stderr.
    pub fn emit_to_stderr(&self, hlsl_source: &str) {
        eprintln!("{}", self.emit_to_string(hlsl_source))
    }

    /// Writes a diagnostic error to stderr, including a source path.
    pub fn emit_to_stderr_with_path(&self, hlsl_source: &str, path: impl AsRef<Path>) {
        eprintln!("{}", self.emit_to_string_with_path(hlsl_source, path))
    }

    /// Creates a diagnostic string from the error.
    pub fn emit_to_string(&self, hlsl_source: &str) -> String {
        self.diagnostic(hlsl_source, None)
    }

    /// Creates a diagnostic string from the error, including a source path.
    pub fn emit_to_string_with_path(&self, hlsl_source: &str, path: impl AsRef<Path>) -> String {
        self.diagnostic(hlsl_source, Some(path.as_ref()))
    }

    fn diagnostic(&self, hlsl_source: &str, path: Option<&Path>) -> String {
        let path = path.map(|p| p.to_string_lossy());
        match self.location() {
            Some(location) => {
                let line = hlsl_source
                    .lines()
                    .nth(location.line.saturating_sub(1))
                    .unwrap_or_default();

                // Keep tabs so the caret lines up with the source line.
                let caret: String = line
                    .chars()
                    .take(location.column.saturating_sub(1))
                    .map(|c| if c == '\t' { '\t' } else { ' ' })
                    .chain(std::iter::once('^'))
                    .collect();

                let position = match path {
                    Some(path) => format!("{path}:{location}"),
                    None => location.to_string(),
                };
                let gutter = " ".repeat(location.line.to_string().len());

                format!(
                    "error: {self}\n{gutter}--> {position}\n{gutter} |\n{} | {line}\n{gutter} | {caret}\n",
                    location.line
                )
            }
            None => match path {
                Some(path) => format!("{path}: {self}"),
                None => format!("{self}"),
            },
        }
    }
}
