//! Character-unit representations and their formatting primitives.
//!
//! Three unit types are supported, selected statically at the call site:
//! `u8` (narrow, C-locale byte semantics), `u32` (wide, one Unicode scalar
//! per unit, the Linux `wchar_t` convention), and [`Utf8Unit`] (a UTF-8 code
//! unit, type-distinct from the narrow byte).
//!
//! Each unit type supplies the two primitives the contract layer in
//! [`crate::fmt`] is built on: `measure` (how many units would the formatted
//! output occupy) and `write` (render into a caller-supplied buffer). Both
//! return a negative value on failure, and the UTF-8 variant resolves its
//! locale context immediately before each call.

use crate::args::FormatArg;
use crate::engine;
use crate::locale::Utf8Locale;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u32 {}
    impl Sealed for super::Utf8Unit {}
}

/// A UTF-8 code unit, distinct at the type level from the narrow `u8` unit.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Utf8Unit(pub u8);

/// One supported character-unit representation.
///
/// The trait is sealed: exactly three implementations exist, and uniform
/// formatting semantics across them is part of the contract.
pub trait CharUnit: sealed::Sealed + Copy + Eq + core::fmt::Debug + 'static {
    /// Per-call context handed to the renderer. `()` everywhere except the
    /// UTF-8 unit, which resolves a [`Utf8Locale`].
    type Ctx;

    /// The terminator unit the write primitive appends.
    const NUL: Self;

    /// Resolve the rendering context for one primitive call. Dropped at the
    /// end of that call on every exit path; never cached.
    fn acquire_ctx() -> Self::Ctx;

    /// Widen an ASCII byte into this unit. Directives, digits, signs, and
    /// padding are ASCII in every representation.
    fn from_ascii(byte: u8) -> Self;

    /// Narrow this unit back to ASCII, if it is in ASCII range.
    fn to_ascii(self) -> Option<u8>;

    /// Emit one `%c` scalar as units. Returns `false` if the scalar is not
    /// representable in this unit type.
    fn emit_scalar(ctx: &Self::Ctx, c: char, out: &mut Vec<Self>) -> bool;

    /// Largest prefix length of `s` that fits in `max_units` units. The
    /// UTF-8 unit backs off to a code-point boundary; the others take the
    /// plain minimum.
    fn clip(ctx: &Self::Ctx, s: &[Self], max_units: usize) -> usize;

    /// Number of units the formatted output would occupy, excluding the
    /// terminator, or negative if the template and arguments cannot be
    /// measured.
    fn measure(template: &[Self], args: &[FormatArg<'_, Self>]) -> isize {
        let ctx = Self::acquire_ctx();
        match engine::render(&ctx, template, args) {
            Ok(rendered) => isize::try_from(rendered.len()).unwrap_or(-1),
            Err(_) => -1,
        }
    }

    /// Render into `buffer`, which must have room for the output plus one
    /// terminator unit. Returns the number of units written excluding the
    /// terminator, or negative on failure (including insufficient capacity).
    fn write(buffer: &mut [Self], template: &[Self], args: &[FormatArg<'_, Self>]) -> isize {
        let ctx = Self::acquire_ctx();
        let rendered = match engine::render(&ctx, template, args) {
            Ok(rendered) => rendered,
            Err(_) => return -1,
        };
        if rendered.len() >= buffer.len() {
            return -1;
        }
        buffer[..rendered.len()].copy_from_slice(&rendered);
        buffer[rendered.len()] = Self::NUL;
        isize::try_from(rendered.len()).unwrap_or(-1)
    }
}

impl CharUnit for u8 {
    type Ctx = ();
    const NUL: Self = 0;

    fn acquire_ctx() -> Self::Ctx {}

    fn from_ascii(byte: u8) -> Self {
        byte
    }

    fn to_ascii(self) -> Option<u8> {
        self.is_ascii().then_some(self)
    }

    fn emit_scalar(_ctx: &Self::Ctx, c: char, out: &mut Vec<Self>) -> bool {
        // One byte per character: only Latin-1-range scalars fit.
        match u8::try_from(u32::from(c)) {
            Ok(b) => {
                out.push(b);
                true
            }
            Err(_) => false,
        }
    }

    fn clip(_ctx: &Self::Ctx, s: &[Self], max_units: usize) -> usize {
        s.len().min(max_units)
    }
}

impl CharUnit for u32 {
    type Ctx = ();
    const NUL: Self = 0;

    fn acquire_ctx() -> Self::Ctx {}

    fn from_ascii(byte: u8) -> Self {
        u32::from(byte)
    }

    fn to_ascii(self) -> Option<u8> {
        (self < 0x80).then_some(self as u8)
    }

    fn emit_scalar(_ctx: &Self::Ctx, c: char, out: &mut Vec<Self>) -> bool {
        out.push(c as u32);
        true
    }

    fn clip(_ctx: &Self::Ctx, s: &[Self], max_units: usize) -> usize {
        s.len().min(max_units)
    }
}

impl CharUnit for Utf8Unit {
    type Ctx = Utf8Locale;
    const NUL: Self = Utf8Unit(0);

    fn acquire_ctx() -> Self::Ctx {
        Utf8Locale::acquire()
    }

    fn from_ascii(byte: u8) -> Self {
        Utf8Unit(byte)
    }

    fn to_ascii(self) -> Option<u8> {
        self.0.is_ascii().then_some(self.0)
    }

    fn emit_scalar(ctx: &Self::Ctx, c: char, out: &mut Vec<Self>) -> bool {
        ctx.encode(c, out);
        true
    }

    fn clip(ctx: &Self::Ctx, s: &[Self], max_units: usize) -> usize {
        ctx.clip(s, max_units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert;

    #[test]
    fn measure_counts_units_without_terminator() {
        let n = <u8 as CharUnit>::measure(b"Value: %d", &[FormatArg::Int(42)]);
        assert_eq!(n, 9);
    }

    #[test]
    fn measure_failure_is_negative() {
        let n = <u8 as CharUnit>::measure(b"%d", &[]);
        assert!(n < 0);
    }

    #[test]
    fn write_appends_terminator_and_reports_content_length() {
        let mut buf = [0xFFu8; 10];
        let n = <u8 as CharUnit>::write(&mut buf, b"Value: %d", &[FormatArg::Int(42)]);
        assert_eq!(n, 9);
        assert_eq!(&buf[..9], b"Value: 42");
        assert_eq!(buf[9], 0);
    }

    #[test]
    fn write_rejects_undersized_buffer() {
        // Needs 9 content units + 1 terminator.
        let mut buf = [0u8; 9];
        let n = <u8 as CharUnit>::write(&mut buf, b"Value: %d", &[FormatArg::Int(42)]);
        assert!(n < 0);
    }

    #[test]
    fn wide_measure_counts_scalars() {
        let fmt = convert::wide::from_str("π=%d");
        let n = <u32 as CharUnit>::measure(&fmt, &[FormatArg::Int(3)]);
        assert_eq!(n, 3); // 'π', '=', '3'
    }

    #[test]
    fn utf8_measure_counts_code_units() {
        let fmt = convert::utf8::from_str("π=%d");
        let n = <Utf8Unit as CharUnit>::measure(&fmt, &[FormatArg::Int(3)]);
        assert_eq!(n, 4); // 'π' is two code units
    }

    #[test]
    fn narrow_char_above_latin1_fails() {
        let n = <u8 as CharUnit>::measure(b"%c", &[FormatArg::Char('\u{1F600}')]);
        assert!(n < 0);
    }

    #[test]
    fn utf8_char_encodes_multi_unit() {
        let fmt = convert::utf8::from_str("%c");
        let n = <Utf8Unit as CharUnit>::measure(&fmt, &[FormatArg::Char('\u{1F600}')]);
        assert_eq!(n, 4);
    }

    #[test]
    fn wide_char_is_one_unit() {
        let fmt = convert::wide::from_str("%c");
        let n = <u32 as CharUnit>::measure(&fmt, &[FormatArg::Char('\u{1F600}')]);
        assert_eq!(n, 1);
    }
}
