//! printf directive engine.
//!
//! Parses format directives and renders typed arguments into unit buffers
//! with full width/precision/flag support, generically over the character
//! unit. This is the formatting runtime the [`crate::fmt`] contract layer
//! delegates to; it never touches the caller's output sequence directly.
//!
//! Reference: POSIX.1-2024 fprintf, ISO C11 7.21.6.1
//!
//! Design invariant: all formatting is bounded — no allocation can grow
//! unboundedly from a single format specifier. Maximum expansion per
//! specifier is `width + precision + 64` units (sign + prefix + digits).

use crate::args::FormatArg;
use crate::error::FormatError;
use crate::unit::CharUnit;

// ---------------------------------------------------------------------------
// Format spec types
// ---------------------------------------------------------------------------

/// Flags parsed from a printf format directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
}

/// Width specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    FromArg, // '*'
}

/// Precision specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    FromArg, // '.*'
}

/// Length modifier. Parsed for compatibility with C format strings; the
/// renderer ignores it because arguments arrive already typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMod {
    None,
    Hh,   // 'hh'
    H,    // 'h'
    L,    // 'l'
    Ll,   // 'll'
    Z,    // 'z'
    T,    // 't'
    J,    // 'j'
    BigL, // 'L'
}

/// A parsed printf format specifier.
#[derive(Debug, Clone)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: Width,
    pub precision: Precision,
    pub length: LengthMod,
    pub conversion: u8,
}

/// A segment of a parsed format string.
#[derive(Debug, Clone)]
pub enum FormatSegment<'a, U: CharUnit> {
    /// Literal units to emit verbatim.
    Literal(&'a [U]),
    /// A `%%` escape (emit a single '%').
    Percent,
    /// A conversion specifier requiring an argument.
    Spec(FormatSpec),
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// ASCII view of one unit, if it has one. Directives are ASCII in every
/// unit representation.
fn at<U: CharUnit>(fmt: &[U], pos: usize) -> Option<u8> {
    fmt.get(pos).and_then(|u| u.to_ascii())
}

/// Parse a single format specifier starting after the '%' character.
///
/// `fmt` points to the first unit AFTER '%'. Returns `(spec, units_consumed)`
/// where `units_consumed` counts from `fmt[0]`. Returns `None` if malformed.
pub fn parse_format_spec<U: CharUnit>(fmt: &[U]) -> Option<(FormatSpec, usize)> {
    let mut pos = 0;

    // --- flags ---
    let mut flags = FormatFlags::default();
    while let Some(b) = at(fmt, pos) {
        match b {
            b'-' => flags.left_justify = true,
            b'+' => flags.force_sign = true,
            b' ' => flags.space_sign = true,
            b'#' => flags.alt_form = true,
            b'0' => flags.zero_pad = true,
            _ => break,
        }
        pos += 1;
    }
    // POSIX: '+' overrides ' '; '-' overrides '0'.
    if flags.force_sign {
        flags.space_sign = false;
    }
    if flags.left_justify {
        flags.zero_pad = false;
    }

    // --- width ---
    let width = if at(fmt, pos) == Some(b'*') {
        pos += 1;
        Width::FromArg
    } else {
        match scan_decimal(fmt, &mut pos) {
            Some(w) => Width::Fixed(w),
            None => Width::None,
        }
    };

    // --- precision ---
    let precision = if at(fmt, pos) == Some(b'.') {
        pos += 1;
        if at(fmt, pos) == Some(b'*') {
            pos += 1;
            Precision::FromArg
        } else {
            Precision::Fixed(scan_decimal(fmt, &mut pos).unwrap_or(0))
        }
    } else {
        Precision::None
    };

    // --- length modifier ---
    let length = match at(fmt, pos) {
        Some(b'h') => {
            pos += 1;
            if at(fmt, pos) == Some(b'h') {
                pos += 1;
                LengthMod::Hh
            } else {
                LengthMod::H
            }
        }
        Some(b'l') => {
            pos += 1;
            if at(fmt, pos) == Some(b'l') {
                pos += 1;
                LengthMod::Ll
            } else {
                LengthMod::L
            }
        }
        Some(b'z') => {
            pos += 1;
            LengthMod::Z
        }
        Some(b't') => {
            pos += 1;
            LengthMod::T
        }
        Some(b'j') => {
            pos += 1;
            LengthMod::J
        }
        Some(b'L') => {
            pos += 1;
            LengthMod::BigL
        }
        _ => LengthMod::None,
    };

    // --- conversion specifier ---
    let conversion = at(fmt, pos)?;
    pos += 1;

    match conversion {
        b'd' | b'i' | b'u' | b'x' | b'X' | b'o' | b's' | b'c' | b'p' | b'n' | b'%' | b'f'
        | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {}
        _ => return None,
    }

    Some((
        FormatSpec {
            flags,
            width,
            precision,
            length,
            conversion,
        },
        pos,
    ))
}

/// Iterate over segments of a printf format string.
///
/// Yields `FormatSegment::Literal` for literal runs and `FormatSegment::Spec`
/// for each `%`-directive. `%%` yields `FormatSegment::Percent`. A malformed
/// directive or trailing '%' is emitted as a literal.
pub fn parse_format_string<U: CharUnit>(fmt: &[U]) -> Vec<FormatSegment<'_, U>> {
    let mut segments = Vec::new();
    let mut pos = 0;
    let len = fmt.len();

    while pos < len {
        // Find the next '%' or end of string.
        let start = pos;
        while pos < len && fmt[pos].to_ascii() != Some(b'%') {
            pos += 1;
        }
        if pos > start {
            segments.push(FormatSegment::Literal(&fmt[start..pos]));
        }
        if pos >= len {
            break;
        }
        // Skip the '%'.
        pos += 1;
        if pos >= len {
            segments.push(FormatSegment::Literal(&fmt[pos - 1..pos]));
            break;
        }
        if fmt[pos].to_ascii() == Some(b'%') {
            segments.push(FormatSegment::Percent);
            pos += 1;
            continue;
        }
        if let Some((spec, consumed)) = parse_format_spec(&fmt[pos..]) {
            pos += consumed;
            segments.push(FormatSegment::Spec(spec));
        } else {
            segments.push(FormatSegment::Literal(&fmt[pos - 1..pos]));
        }
    }
    segments
}

// ---------------------------------------------------------------------------
// Rendering entry point
// ---------------------------------------------------------------------------

/// Render `fmt` with `args` into a fresh unit buffer.
///
/// Both primitives (`measure` and `write`) are built on this single
/// renderer, so a measure and the write that follows it agree whenever both
/// succeed. Positional binding: each spec consumes the next argument, with
/// `*` width/precision consuming an integer argument first.
pub(crate) fn render<U: CharUnit>(
    ctx: &U::Ctx,
    fmt: &[U],
    args: &[FormatArg<'_, U>],
) -> Result<Vec<U>, FormatError> {
    let mut out = Vec::with_capacity(fmt.len());
    let mut next_arg = 0usize;

    for segment in parse_format_string(fmt) {
        match segment {
            FormatSegment::Literal(s) => out.extend_from_slice(s),
            FormatSegment::Percent => out.push(U::from_ascii(b'%')),
            FormatSegment::Spec(spec) => {
                let spec = resolve_star_fields(spec, args, &mut next_arg)?;
                render_spec(ctx, &spec, args, &mut next_arg, &mut out)?;
            }
        }
    }
    Ok(out)
}

/// Replace `*` width/precision with the next integer arguments.
fn resolve_star_fields<U: CharUnit>(
    mut spec: FormatSpec,
    args: &[FormatArg<'_, U>],
    next_arg: &mut usize,
) -> Result<FormatSpec, FormatError> {
    if matches!(spec.width, Width::FromArg) {
        let w = take_int(&spec, args, next_arg)?;
        if w < 0 {
            // POSIX: a negative '*' width means left-justified |width|.
            spec.flags.left_justify = true;
            spec.flags.zero_pad = false;
            spec.width = Width::Fixed(usize::try_from(w.unsigned_abs()).unwrap_or(usize::MAX));
        } else {
            spec.width = Width::Fixed(usize::try_from(w).unwrap_or(usize::MAX));
        }
    }
    if matches!(spec.precision, Precision::FromArg) {
        let p = take_int(&spec, args, next_arg)?;
        // POSIX: a negative '*' precision is treated as omitted.
        spec.precision = if p < 0 {
            Precision::None
        } else {
            Precision::Fixed(usize::try_from(p).unwrap_or(usize::MAX))
        };
    }
    Ok(spec)
}

fn take_int<U: CharUnit>(
    spec: &FormatSpec,
    args: &[FormatArg<'_, U>],
    next_arg: &mut usize,
) -> Result<i64, FormatError> {
    let index = *next_arg;
    let arg = args.get(index).ok_or(FormatError::MissingArgument { index })?;
    *next_arg += 1;
    match arg {
        FormatArg::Int(v) => Ok(*v),
        FormatArg::Uint(v) => Ok(i64::try_from(*v).map_err(|_| FormatError::TypeMismatch {
            index,
            conversion: char::from(spec.conversion),
        })?),
        _ => Err(FormatError::TypeMismatch {
            index,
            conversion: char::from(spec.conversion),
        }),
    }
}

/// Bind one argument to `spec` and render it.
fn render_spec<U: CharUnit>(
    ctx: &U::Ctx,
    spec: &FormatSpec,
    args: &[FormatArg<'_, U>],
    next_arg: &mut usize,
    out: &mut Vec<U>,
) -> Result<(), FormatError> {
    let index = *next_arg;
    let arg = *args.get(index).ok_or(FormatError::MissingArgument { index })?;
    *next_arg += 1;

    let mismatch = || FormatError::TypeMismatch {
        index,
        conversion: char::from(spec.conversion),
    };

    match spec.conversion {
        b'd' | b'i' => {
            let value = match arg {
                FormatArg::Int(v) => v,
                _ => return Err(mismatch()),
            };
            format_signed(value, spec, out);
        }
        b'u' | b'o' | b'x' | b'X' => {
            // C varargs reinterpret a signed argument bit-for-bit.
            let value = match arg {
                FormatArg::Uint(v) => v,
                FormatArg::Int(v) => v as u64,
                _ => return Err(mismatch()),
            };
            format_unsigned(value, spec, out);
        }
        b'f' | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {
            let value = match arg {
                FormatArg::Float(v) => v,
                _ => return Err(mismatch()),
            };
            format_float(value, spec, out);
        }
        b's' => {
            let value = match arg {
                FormatArg::Str(s) => s,
                _ => return Err(mismatch()),
            };
            format_str(ctx, value, spec, out);
        }
        b'c' => {
            let value = match arg {
                FormatArg::Char(c) => c,
                FormatArg::Int(v) => u32::try_from(v)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| FormatError::Unencodable {
                        codepoint: v as u32,
                    })?,
                _ => return Err(mismatch()),
            };
            format_char(ctx, value, spec, out)?;
        }
        b'p' => {
            let value = match arg {
                FormatArg::Pointer(p) => p,
                FormatArg::Uint(v) => usize::try_from(v).map_err(|_| mismatch())?,
                _ => return Err(mismatch()),
            };
            format_pointer(value, spec, out);
        }
        b'n' => {
            return Err(FormatError::UnsupportedConversion {
                conversion: char::from(spec.conversion),
            });
        }
        // The parser only admits the conversions above.
        other => {
            return Err(FormatError::UnsupportedConversion {
                conversion: char::from(other),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Render a signed integer according to `spec`.
fn format_signed<U: CharUnit>(value: i64, spec: &FormatSpec, out: &mut Vec<U>) {
    let negative = value < 0;
    let abs = value.unsigned_abs();

    let (base, uppercase) = int_base(spec.conversion);
    let mut digits = [0u8; 64];
    let digit_count = render_digits(abs, base, uppercase, &mut digits);
    let digit_slice = &digits[64 - digit_count..];

    // Determine sign character.
    let sign = if negative {
        Some(b'-')
    } else if spec.flags.force_sign {
        Some(b'+')
    } else if spec.flags.space_sign {
        Some(b' ')
    } else {
        None
    };

    // Precision: minimum digits (pad with zeros).
    let precision = match spec.precision {
        Precision::Fixed(p) => p,
        _ => 1, // default: at least 1 digit
    };
    let zero_prefix_count = precision.saturating_sub(digit_count);

    // Alternate form prefix.
    let prefix = alt_prefix(spec);

    let content_len = sign.is_some() as usize + prefix.len() + zero_prefix_count + digit_count;

    // Explicit precision 0 with value 0: no digits emitted.
    let suppress_zero = value == 0 && matches!(spec.precision, Precision::Fixed(0));

    let effective_content = if suppress_zero {
        sign.is_some() as usize + prefix.len()
    } else {
        content_len
    };

    let width = resolve_width(spec);
    let pad_total = width.saturating_sub(effective_content);

    if !spec.flags.left_justify && !spec.flags.zero_pad {
        pad(out, b' ', pad_total);
    }
    if let Some(s) = sign {
        out.push(U::from_ascii(s));
    }
    push_ascii(out, prefix);
    if !spec.flags.left_justify && spec.flags.zero_pad {
        pad(out, b'0', pad_total);
    }
    if !suppress_zero {
        pad(out, b'0', zero_prefix_count);
        push_ascii(out, digit_slice);
    }
    if spec.flags.left_justify {
        pad(out, b' ', pad_total);
    }
}

/// Render an unsigned integer according to `spec`.
fn format_unsigned<U: CharUnit>(value: u64, spec: &FormatSpec, out: &mut Vec<U>) {
    let (base, uppercase) = int_base(spec.conversion);
    let mut digits = [0u8; 64];
    let digit_count = render_digits(value, base, uppercase, &mut digits);
    let digit_slice = &digits[64 - digit_count..];

    let precision = match spec.precision {
        Precision::Fixed(p) => p,
        _ => 1,
    };
    let zero_prefix_count = precision.saturating_sub(digit_count);

    let prefix = if value != 0 {
        alt_prefix(spec)
    } else {
        b"" as &[u8]
    };

    let content_len = prefix.len() + zero_prefix_count + digit_count;

    let suppress_zero = value == 0 && matches!(spec.precision, Precision::Fixed(0));
    let effective_content = if suppress_zero {
        prefix.len()
    } else {
        content_len
    };

    let width = resolve_width(spec);
    let pad_total = width.saturating_sub(effective_content);

    if !spec.flags.left_justify && !spec.flags.zero_pad {
        pad(out, b' ', pad_total);
    }
    push_ascii(out, prefix);
    if !spec.flags.left_justify && spec.flags.zero_pad {
        pad(out, b'0', pad_total);
    }
    if !suppress_zero {
        pad(out, b'0', zero_prefix_count);
        push_ascii(out, digit_slice);
    }
    if spec.flags.left_justify {
        pad(out, b' ', pad_total);
    }
}

/// Render a floating-point value according to `spec`.
///
/// Supports `%f`/`%F`, `%e`/`%E`, and `%g`/`%G`; `%a`/`%A` fall back to
/// fixed-point. Digit generation uses Rust's own float formatting, then the
/// POSIX width/flag rules are applied on top.
fn format_float<U: CharUnit>(value: f64, spec: &FormatSpec, out: &mut Vec<U>) {
    let precision = match spec.precision {
        Precision::Fixed(p) => p,
        Precision::None => 6, // POSIX default
        Precision::FromArg => 6,
    };

    if value.is_nan() {
        let s: &[u8] = if spec.conversion.is_ascii_uppercase() {
            b"NAN"
        } else {
            b"nan"
        };
        return format_float_special(s, spec, out);
    }
    if value.is_infinite() {
        let s: &[u8] = if spec.conversion.is_ascii_uppercase() {
            if value > 0.0 { b"INF" } else { b"-INF" }
        } else if value > 0.0 {
            b"inf"
        } else {
            b"-inf"
        };
        return format_float_special(s, spec, out);
    }

    let negative = value.is_sign_negative();
    let abs = value.abs();

    let body = match spec.conversion | 0x20 {
        b'f' => format_f(abs, precision, spec.flags.alt_form),
        b'e' => format_e(
            abs,
            precision,
            spec.conversion.is_ascii_uppercase(),
            spec.flags.alt_form,
        ),
        b'g' => format_g(
            abs,
            precision,
            spec.conversion.is_ascii_uppercase(),
            spec.flags.alt_form,
        ),
        _ => format_f(abs, precision, spec.flags.alt_form),
    };

    let sign = if negative {
        Some(b'-')
    } else if spec.flags.force_sign {
        Some(b'+')
    } else if spec.flags.space_sign {
        Some(b' ')
    } else {
        None
    };

    let content_len = sign.is_some() as usize + body.len();
    let width = resolve_width(spec);
    let pad_total = width.saturating_sub(content_len);

    if !spec.flags.left_justify && !spec.flags.zero_pad {
        pad(out, b' ', pad_total);
    }
    if let Some(s) = sign {
        out.push(U::from_ascii(s));
    }
    if !spec.flags.left_justify && spec.flags.zero_pad {
        pad(out, b'0', pad_total);
    }
    push_ascii(out, body.as_bytes());
    if spec.flags.left_justify {
        pad(out, b' ', pad_total);
    }
}

/// Render a string argument according to `spec`.
///
/// Precision truncates the string. The cut point is unit-aware: the UTF-8
/// unit never splits a multi-unit sequence, so the effective length can come
/// in under the requested precision.
fn format_str<U: CharUnit>(ctx: &U::Ctx, s: &[U], spec: &FormatSpec, out: &mut Vec<U>) {
    let max_len = match spec.precision {
        Precision::Fixed(p) => p,
        _ => s.len(),
    };
    let effective = &s[..U::clip(ctx, s, max_len)];
    let width = resolve_width(spec);
    let pad_total = width.saturating_sub(effective.len());

    if !spec.flags.left_justify {
        pad(out, b' ', pad_total);
    }
    out.extend_from_slice(effective);
    if spec.flags.left_justify {
        pad(out, b' ', pad_total);
    }
}

/// Render a character according to `spec`.
///
/// Width padding counts units, so a multi-unit UTF-8 character consumes that
/// many columns of the field.
fn format_char<U: CharUnit>(
    ctx: &U::Ctx,
    c: char,
    spec: &FormatSpec,
    out: &mut Vec<U>,
) -> Result<(), FormatError> {
    let mut encoded = Vec::new();
    if !U::emit_scalar(ctx, c, &mut encoded) {
        return Err(FormatError::Unencodable {
            codepoint: c as u32,
        });
    }

    let width = resolve_width(spec);
    let pad_total = width.saturating_sub(encoded.len());

    if !spec.flags.left_justify {
        pad(out, b' ', pad_total);
    }
    out.extend_from_slice(&encoded);
    if spec.flags.left_justify {
        pad(out, b' ', pad_total);
    }
    Ok(())
}

/// Render a pointer as `0x...` hex, or `(nil)` for null.
fn format_pointer<U: CharUnit>(addr: usize, spec: &FormatSpec, out: &mut Vec<U>) {
    if addr == 0 {
        let s = b"(nil)";
        let width = resolve_width(spec);
        let pad_total = width.saturating_sub(s.len());
        if !spec.flags.left_justify {
            pad(out, b' ', pad_total);
        }
        push_ascii(out, s);
        if spec.flags.left_justify {
            pad(out, b' ', pad_total);
        }
        return;
    }

    let mut digits = [0u8; 64];
    let count = render_digits(addr as u64, 16, false, &mut digits);
    let digit_slice = &digits[64 - count..];
    let content_len = 2 + count; // "0x" + digits
    let width = resolve_width(spec);
    let pad_total = width.saturating_sub(content_len);

    if !spec.flags.left_justify {
        pad(out, b' ', pad_total);
    }
    push_ascii(out, b"0x");
    push_ascii(out, digit_slice);
    if spec.flags.left_justify {
        pad(out, b' ', pad_total);
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Scan a run of ASCII digits at `*pos`, advancing past it.
fn scan_decimal<U: CharUnit>(fmt: &[U], pos: &mut usize) -> Option<usize> {
    let mut value = 0usize;
    let mut any = false;
    while let Some(d @ b'0'..=b'9') = at(fmt, *pos) {
        value = value.saturating_mul(10).saturating_add((d - b'0') as usize);
        any = true;
        *pos += 1;
    }
    any.then_some(value)
}

fn resolve_width(spec: &FormatSpec) -> usize {
    match spec.width {
        Width::Fixed(w) => w,
        _ => 0,
    }
}

fn int_base(conversion: u8) -> (u64, bool) {
    match conversion {
        b'o' => (8, false),
        b'x' => (16, false),
        b'X' => (16, true),
        _ => (10, false),
    }
}

/// Render `value` in the given `base` into the END of `buf`.
/// Returns the number of digits written. Digits are placed right-aligned.
fn render_digits(mut value: u64, base: u64, uppercase: bool, buf: &mut [u8; 64]) -> usize {
    if value == 0 {
        buf[63] = b'0';
        return 1;
    }
    let alpha = if uppercase { b'A' } else { b'a' };
    let mut pos = 64;
    while value > 0 && pos > 0 {
        pos -= 1;
        let digit = (value % base) as u8;
        buf[pos] = if digit < 10 {
            b'0' + digit
        } else {
            alpha + (digit - 10)
        };
        value /= base;
    }
    64 - pos
}

fn alt_prefix(spec: &FormatSpec) -> &'static [u8] {
    if !spec.flags.alt_form {
        return b"";
    }
    match spec.conversion {
        b'o' => b"0",
        b'x' => b"0x",
        b'X' => b"0X",
        _ => b"",
    }
}

fn pad<U: CharUnit>(out: &mut Vec<U>, byte: u8, count: usize) {
    // Bounded: maximum pad from width spec.
    let count = count.min(4096);
    for _ in 0..count {
        out.push(U::from_ascii(byte));
    }
}

fn push_ascii<U: CharUnit>(out: &mut Vec<U>, bytes: &[u8]) {
    out.extend(bytes.iter().map(|&b| U::from_ascii(b)));
}

/// Format a special float value (nan/inf) with width/flags.
fn format_float_special<U: CharUnit>(s: &[u8], spec: &FormatSpec, out: &mut Vec<U>) {
    let width = resolve_width(spec);
    let pad_total = width.saturating_sub(s.len());
    if !spec.flags.left_justify {
        pad(out, b' ', pad_total);
    }
    push_ascii(out, s);
    if spec.flags.left_justify {
        pad(out, b' ', pad_total);
    }
}

/// `%f` / `%F` formatting: fixed-point decimal.
fn format_f(value: f64, precision: usize, alt_form: bool) -> String {
    if precision == 0 {
        let int_part = value as u64;
        if alt_form {
            format!("{int_part}.")
        } else {
            format!("{int_part}")
        }
    } else {
        format!("{value:.precision$}")
    }
}

/// `%e` / `%E` formatting: scientific notation.
fn format_e(value: f64, precision: usize, uppercase: bool, _alt_form: bool) -> String {
    let e_char = if uppercase { 'E' } else { 'e' };
    if value == 0.0 {
        if precision == 0 {
            return format!("0{e_char}+00");
        }
        let zeros: String = core::iter::repeat_n('0', precision).collect();
        return format!("0.{zeros}{e_char}+00");
    }
    let exp = value.log10().floor() as i32;
    let mantissa = value / 10_f64.powi(exp);
    let sign = if exp < 0 { '-' } else { '+' };
    let abs_exp = exp.unsigned_abs();
    if precision == 0 {
        format!("{}{e_char}{sign}{abs_exp:02}", mantissa.round() as u64)
    } else {
        format!("{mantissa:.precision$}{e_char}{sign}{abs_exp:02}")
    }
}

/// `%g` / `%G` formatting: shortest of `%f` or `%e`.
fn format_g(value: f64, precision: usize, uppercase: bool, alt_form: bool) -> String {
    let p = if precision == 0 { 1 } else { precision };

    if value == 0.0 {
        if alt_form {
            if p <= 1 {
                return "0.".into();
            }
            let zeros: String = core::iter::repeat_n('0', p - 1).collect();
            return format!("0.{zeros}");
        }
        return "0".into();
    }

    let exp = value.log10().floor() as i32;
    if exp >= -1 && exp < p as i32 {
        // Use %f style.
        let frac_digits = (p as i32 - 1 - exp).max(0) as usize;
        let mut s = format!("{value:.frac_digits$}");
        if !alt_form {
            strip_trailing_zeros(&mut s);
        }
        s
    } else {
        // Use %e style.
        let mut s = format_e(value, p.saturating_sub(1), uppercase, alt_form);
        if !alt_form {
            // Strip trailing zeros from the mantissa part (before 'e'/'E').
            if let Some(e_pos) = s.bytes().position(|b| b == b'e' || b == b'E') {
                let mut mantissa = s[..e_pos].to_string();
                strip_trailing_zeros(&mut mantissa);
                let exp_part = &s[e_pos..];
                s = format!("{mantissa}{exp_part}");
            }
        }
        s
    }
}

/// Remove trailing zeros after the decimal point.
fn strip_trailing_zeros(s: &mut String) {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(conversion: u8) -> FormatSpec {
        FormatSpec {
            flags: FormatFlags::default(),
            width: Width::None,
            precision: Precision::None,
            length: LengthMod::None,
            conversion,
        }
    }

    fn render_narrow(fmt: &[u8], args: &[FormatArg<'_, u8>]) -> Result<Vec<u8>, FormatError> {
        render(&(), fmt, args)
    }

    #[test]
    fn test_parse_simple_int() {
        let (spec, consumed) = parse_format_spec(b"d").unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(spec.conversion, b'd');
        assert_eq!(spec.width, Width::None);
        assert_eq!(spec.precision, Precision::None);
    }

    #[test]
    fn test_parse_width_precision() {
        let (spec, consumed) = parse_format_spec(b"10.5f").unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(spec.conversion, b'f');
        assert_eq!(spec.width, Width::Fixed(10));
        assert_eq!(spec.precision, Precision::Fixed(5));
    }

    #[test]
    fn test_parse_flags() {
        let (spec, _) = parse_format_spec(b"-+#010d").unwrap();
        // '-' overrides '0'
        assert!(spec.flags.left_justify);
        assert!(spec.flags.force_sign);
        assert!(spec.flags.alt_form);
        assert!(!spec.flags.zero_pad); // overridden by '-'
    }

    #[test]
    fn test_parse_length_mods() {
        let (spec, _) = parse_format_spec(b"hhd").unwrap();
        assert_eq!(spec.length, LengthMod::Hh);
        let (spec, _) = parse_format_spec(b"llu").unwrap();
        assert_eq!(spec.length, LengthMod::Ll);
        let (spec, _) = parse_format_spec(b"zu").unwrap();
        assert_eq!(spec.length, LengthMod::Z);
    }

    #[test]
    fn test_parse_star_width_and_precision() {
        let (spec, _) = parse_format_spec(b"*d").unwrap();
        assert_eq!(spec.width, Width::FromArg);
        let (spec, _) = parse_format_spec(b".*f").unwrap();
        assert_eq!(spec.precision, Precision::FromArg);
    }

    #[test]
    fn test_parse_wide_format_string() {
        let fmt: Vec<u32> = "x=%d".chars().map(|c| c as u32).collect();
        let segments = parse_format_string(&fmt);
        assert_eq!(segments.len(), 2);
        assert!(matches!(&segments[1], FormatSegment::Spec(s) if s.conversion == b'd'));
    }

    #[test]
    fn test_parse_format_string_segments() {
        let segments = parse_format_string(b"hello %d world %s!");
        assert_eq!(segments.len(), 5);
        assert!(matches!(segments[0], FormatSegment::Literal(b"hello ")));
        assert!(matches!(&segments[1], FormatSegment::Spec(s) if s.conversion == b'd'));
        assert!(matches!(segments[2], FormatSegment::Literal(b" world ")));
        assert!(matches!(&segments[3], FormatSegment::Spec(s) if s.conversion == b's'));
        assert!(matches!(segments[4], FormatSegment::Literal(b"!")));
    }

    #[test]
    fn test_parse_percent_escape() {
        let segments = parse_format_string(b"100%%");
        assert_eq!(segments.len(), 2);
        assert!(matches!(segments[0], FormatSegment::Literal(b"100")));
        assert!(matches!(segments[1], FormatSegment::Percent));
    }

    #[test]
    fn test_malformed_spec_is_literal_percent() {
        let out = render_narrow(b"100%q", &[]).unwrap();
        assert_eq!(out, b"100%q");
    }

    #[test]
    fn test_trailing_percent_is_literal() {
        let out = render_narrow(b"done%", &[]).unwrap();
        assert_eq!(out, b"done%");
    }

    #[test]
    fn test_format_signed_basic() {
        let mut out: Vec<u8> = Vec::new();
        format_signed(42, &spec(b'd'), &mut out);
        assert_eq!(out, b"42");
    }

    #[test]
    fn test_format_signed_negative() {
        let mut out: Vec<u8> = Vec::new();
        format_signed(-123, &spec(b'd'), &mut out);
        assert_eq!(out, b"-123");
    }

    #[test]
    fn test_format_signed_width_pad() {
        let mut s = spec(b'd');
        s.width = Width::Fixed(8);
        let mut out: Vec<u8> = Vec::new();
        format_signed(42, &s, &mut out);
        assert_eq!(out, b"      42");
    }

    #[test]
    fn test_format_signed_zero_pad() {
        let mut s = spec(b'd');
        s.width = Width::Fixed(8);
        s.flags.zero_pad = true;
        let mut out: Vec<u8> = Vec::new();
        format_signed(42, &s, &mut out);
        assert_eq!(out, b"00000042");
    }

    #[test]
    fn test_format_signed_left_justify() {
        let mut s = spec(b'd');
        s.width = Width::Fixed(8);
        s.flags.left_justify = true;
        let mut out: Vec<u8> = Vec::new();
        format_signed(42, &s, &mut out);
        assert_eq!(out, b"42      ");
    }

    #[test]
    fn test_format_unsigned_hex_alt() {
        let mut s = spec(b'x');
        s.flags.alt_form = true;
        let mut out: Vec<u8> = Vec::new();
        format_unsigned(255, &s, &mut out);
        assert_eq!(out, b"0xff");
    }

    #[test]
    fn test_format_unsigned_octal_alt() {
        let mut s = spec(b'o');
        s.flags.alt_form = true;
        let mut out: Vec<u8> = Vec::new();
        format_unsigned(8, &s, &mut out);
        assert_eq!(out, b"010");
    }

    #[test]
    fn test_precision_zero_int() {
        let mut s = spec(b'd');
        s.precision = Precision::Fixed(0);
        let mut out: Vec<u8> = Vec::new();
        format_signed(0, &s, &mut out);
        assert_eq!(out, b""); // POSIX: precision 0 with value 0 produces no digits
    }

    #[test]
    fn test_force_sign() {
        let mut s = spec(b'd');
        s.flags.force_sign = true;
        let mut out: Vec<u8> = Vec::new();
        format_signed(42, &s, &mut out);
        assert_eq!(out, b"+42");
    }

    #[test]
    fn test_i64_min() {
        let mut out: Vec<u8> = Vec::new();
        format_signed(i64::MIN, &spec(b'd'), &mut out);
        assert_eq!(out, b"-9223372036854775808");
    }

    #[test]
    fn test_format_str_precision_truncate() {
        let out = render_narrow(b"%.3s", &[FormatArg::Str(b"hello")]).unwrap();
        assert_eq!(out, b"hel");
    }

    #[test]
    fn test_format_char_width() {
        let out = render_narrow(b"%5c", &[FormatArg::Char('A')]).unwrap();
        assert_eq!(out, b"    A");
    }

    #[test]
    fn test_format_pointer() {
        let out = render_narrow(b"%p", &[FormatArg::Pointer(0)]).unwrap();
        assert_eq!(out, b"(nil)");
        let out = render_narrow(b"%p", &[FormatArg::Pointer(0xDEAD)]).unwrap();
        assert_eq!(out, b"0xdead");
    }

    #[test]
    fn test_format_float_basic() {
        let out = render_narrow(b"%f", &[FormatArg::Float(core::f64::consts::PI)]).unwrap();
        assert!(out.starts_with(b"3.14"));
    }

    #[test]
    fn test_format_float_specials() {
        let out = render_narrow(b"%f", &[FormatArg::Float(f64::NAN)]).unwrap();
        assert_eq!(out, b"nan");
        let out = render_narrow(b"%F", &[FormatArg::Float(f64::INFINITY)]).unwrap();
        assert_eq!(out, b"INF");
    }

    #[test]
    fn test_star_width_consumes_argument() {
        let out = render_narrow(b"%*d", &[FormatArg::Int(6), FormatArg::Int(42)]).unwrap();
        assert_eq!(out, b"    42");
    }

    #[test]
    fn test_negative_star_width_left_justifies() {
        let out = render_narrow(b"[%*d]", &[FormatArg::Int(-6), FormatArg::Int(42)]).unwrap();
        assert_eq!(out, b"[42    ]");
    }

    #[test]
    fn test_missing_argument_is_error() {
        let err = render_narrow(b"%d %d", &[FormatArg::Int(1)]).unwrap_err();
        assert_eq!(err, FormatError::MissingArgument { index: 1 });
    }

    #[test]
    fn test_type_mismatch_is_error() {
        let err = render_narrow(b"%d", &[FormatArg::Str(b"x")]).unwrap_err();
        assert_eq!(
            err,
            FormatError::TypeMismatch {
                index: 0,
                conversion: 'd'
            }
        );
    }

    #[test]
    fn test_percent_n_is_rejected() {
        let err = render_narrow(b"%n", &[FormatArg::Int(0)]).unwrap_err();
        assert_eq!(err, FormatError::UnsupportedConversion { conversion: 'n' });
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let out = render_narrow(b"%d", &[FormatArg::Int(1), FormatArg::Int(2)]).unwrap();
        assert_eq!(out, b"1");
    }

    #[test]
    fn test_signed_arg_reinterpreted_for_unsigned_conversion() {
        let out = render_narrow(b"%x", &[FormatArg::Int(-1)]).unwrap();
        assert_eq!(out, b"ffffffffffffffff");
    }
}
