//! Formatting error taxonomy.
//!
//! At the primitive boundary (`CharUnit::measure` / `CharUnit::write`) every
//! variant collapses to a negative return; the never-fails surface in
//! [`crate::fmt`] then maps that to an empty result. `try_format` and the
//! conformance harness see the full taxonomy.

use thiserror::Error;

/// Why a template and argument list could not be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A directive had no positional argument left to bind to.
    #[error("format directive {index} has no matching argument")]
    MissingArgument {
        /// Zero-based position of the unbound directive.
        index: usize,
    },

    /// The bound argument's type does not fit the conversion.
    #[error("argument {index} has the wrong type for conversion '%{conversion}'")]
    TypeMismatch {
        /// Zero-based position of the offending argument.
        index: usize,
        /// The conversion character it was bound to.
        conversion: char,
    },

    /// A `%c` argument cannot be represented in the target character unit
    /// (e.g. a scalar above U+00FF in the narrow-unit path).
    #[error("character U+{codepoint:04X} is not representable in this character unit")]
    Unencodable {
        /// The rejected Unicode scalar value.
        codepoint: u32,
    },

    /// The conversion is syntactically valid but deliberately unsupported
    /// (`%n` writes through an argument and has no safe rendering).
    #[error("conversion '%{conversion}' is not supported")]
    UnsupportedConversion {
        /// The refused conversion character.
        conversion: char,
    },
}
