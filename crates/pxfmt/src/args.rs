//! Typed format arguments.
//!
//! The statically typed replacement for C varargs: an ordered list of
//! [`FormatArg`] values bound positionally to the directives in a template.
//! String arguments borrow caller-owned unit slices; everything else is a
//! plain scalar.

use crate::unit::CharUnit;

/// One positional argument for a format call.
#[derive(Debug, Clone, Copy)]
pub enum FormatArg<'a, U: CharUnit> {
    /// Signed integer, bound by `%d` / `%i` (and accepted with C
    /// reinterpretation semantics by the unsigned conversions).
    Int(i64),
    /// Unsigned integer, bound by `%u` / `%o` / `%x` / `%X`.
    Uint(u64),
    /// Floating-point value, bound by `%f` / `%e` / `%g` and friends.
    Float(f64),
    /// Single character, bound by `%c`. Whether a given scalar is
    /// representable depends on the character unit.
    Char(char),
    /// String in the template's own unit type, bound by `%s`.
    Str(&'a [U]),
    /// Address rendered by `%p` as `0x...` or `(nil)`.
    Pointer(usize),
}

impl<'a, U: CharUnit> From<i32> for FormatArg<'a, U> {
    fn from(value: i32) -> Self {
        FormatArg::Int(i64::from(value))
    }
}

impl<'a, U: CharUnit> From<i64> for FormatArg<'a, U> {
    fn from(value: i64) -> Self {
        FormatArg::Int(value)
    }
}

impl<'a, U: CharUnit> From<u64> for FormatArg<'a, U> {
    fn from(value: u64) -> Self {
        FormatArg::Uint(value)
    }
}

impl<'a, U: CharUnit> From<usize> for FormatArg<'a, U> {
    fn from(value: usize) -> Self {
        FormatArg::Uint(value as u64)
    }
}

impl<'a, U: CharUnit> From<f64> for FormatArg<'a, U> {
    fn from(value: f64) -> Self {
        FormatArg::Float(value)
    }
}

impl<'a, U: CharUnit> From<f32> for FormatArg<'a, U> {
    fn from(value: f32) -> Self {
        FormatArg::Float(f64::from(value))
    }
}

impl<'a, U: CharUnit> From<char> for FormatArg<'a, U> {
    fn from(value: char) -> Self {
        FormatArg::Char(value)
    }
}

impl<'a, U: CharUnit> From<&'a [U]> for FormatArg<'a, U> {
    fn from(value: &'a [U]) -> Self {
        FormatArg::Str(value)
    }
}

impl<'a, U: CharUnit> From<&'a Vec<U>> for FormatArg<'a, U> {
    fn from(value: &'a Vec<U>) -> Self {
        FormatArg::Str(value.as_slice())
    }
}

/// Narrow-unit strings can be borrowed straight from `&str` bytes.
impl<'a> From<&'a str> for FormatArg<'a, u8> {
    fn from(value: &'a str) -> Self {
        FormatArg::Str(value.as_bytes())
    }
}
