//! The formatting contract layer.
//!
//! One algorithm for every unit type: query the required size, allocate
//! exactly that many units (plus one slot for the terminator the write
//! primitive appends), write, then trim to the count the write actually
//! reported. The write count is the only authoritative length; a negative
//! return from either primitive at any stage forces an empty result — never
//! a partially written one.
//!
//! [`format`] and [`append_format`] never fail observably: any underlying
//! formatting failure degrades silently to an empty result, so they are safe
//! to call unconditionally, including from failure-handling code. Callers
//! that want the failure taxonomy use [`try_format`].

use crate::args::FormatArg;
use crate::engine;
use crate::error::FormatError;
use crate::unit::CharUnit;

/// Formats `template` with `args` into a fresh sequence.
///
/// On any underlying formatting failure this returns an empty sequence
/// rather than an error; an empty result is indistinguishable from a format
/// that legitimately produced nothing. That ambiguity is part of the
/// contract.
///
/// ```
/// use pxfmt::{format, FormatArg};
///
/// let out = format(b"Value: %d", &[FormatArg::Int(42)]);
/// assert_eq!(out, b"Value: 42");
/// ```
pub fn format<U: CharUnit>(template: &[U], args: &[FormatArg<'_, U>]) -> Vec<U> {
    let mut size = U::measure(template, args);

    let mut out: Vec<U> = Vec::new();
    if size >= 0 {
        // One extra slot for the terminator the primitive writes; the
        // returned sequence never exposes it.
        out = vec![U::NUL; size as usize + 1];
        size = U::write(&mut out, template, args);
    }

    if size < 0 {
        size = 0;
    }
    out.truncate(size as usize);
    out
}

/// Formats `template` with `args` and appends the result to `target`.
///
/// The append is all-or-nothing: if formatting fails, `target` is left
/// unchanged. Returns `target` for chaining.
///
/// ```
/// use pxfmt::{append_format, FormatArg};
///
/// let mut log = b"Log: ".to_vec();
/// append_format(&mut log, b"%s done", &[FormatArg::Str(b"build")]);
/// assert_eq!(log, b"Log: build done");
/// ```
pub fn append_format<'a, U: CharUnit>(
    target: &'a mut Vec<U>,
    template: &[U],
    args: &[FormatArg<'_, U>],
) -> &'a mut Vec<U> {
    let tail = format(template, args);
    target.extend_from_slice(&tail);
    target
}

/// Formats `template` with `args`, surfacing failures.
///
/// The explicit-error counterpart of [`format`]: same rendering, but a
/// failed format returns the [`FormatError`] instead of degrading to an
/// empty sequence.
pub fn try_format<U: CharUnit>(
    template: &[U],
    args: &[FormatArg<'_, U>],
) -> Result<Vec<U>, FormatError> {
    let ctx = U::acquire_ctx();
    engine::render(&ctx, template, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert;
    use crate::unit::Utf8Unit;

    #[test]
    fn format_narrow_scenario() {
        let out = format(b"Value: %d", &[FormatArg::Int(42)]);
        assert_eq!(out, b"Value: 42");
    }

    #[test]
    fn format_wide_scenario() {
        let fmt = convert::wide::from_str("Count=%d/%d");
        let out = format(&fmt, &[FormatArg::Int(3), FormatArg::Int(10)]);
        assert_eq!(convert::wide::to_string(&out), "Count=3/10");
    }

    #[test]
    fn format_utf8_scenario() {
        let fmt = convert::utf8::from_str("ok: %s");
        let arg = convert::utf8::from_str("héllo");
        let out = format(&fmt, &[FormatArg::Str(&arg)]);
        assert_eq!(convert::utf8::to_string(&out), "ok: héllo");
    }

    #[test]
    fn empty_template_yields_empty_output() {
        assert!(format::<u8>(b"", &[]).is_empty());
        assert!(format::<u32>(&[], &[]).is_empty());
        assert!(format::<Utf8Unit>(&[], &[]).is_empty());
    }

    #[test]
    fn directive_free_template_is_verbatim() {
        let out = format(b"plain text", &[]);
        assert_eq!(out, b"plain text");
        assert_eq!(out.len(), b"plain text".len());
    }

    #[test]
    fn failure_degrades_to_empty() {
        // Missing argument forces a negative measure.
        let out = format::<u8>(b"%d", &[]);
        assert!(out.is_empty());
    }

    #[test]
    fn failure_retains_no_partial_content() {
        // The literal prefix renders fine; the dangling directive then fails.
        let out = format::<u8>(b"prefix %d", &[]);
        assert!(out.is_empty());
    }

    #[test]
    fn append_format_concatenates() {
        let mut log = b"Log: ".to_vec();
        append_format(&mut log, b"%s done", &[FormatArg::Str(b"build")]);
        assert_eq!(log, b"Log: build done");
    }

    #[test]
    fn append_format_on_failure_leaves_target_unchanged() {
        let mut log = b"Log: ".to_vec();
        append_format(&mut log, b"%d", &[]);
        assert_eq!(log, b"Log: ");
    }

    #[test]
    fn append_format_chains() {
        let mut out: Vec<u8> = Vec::new();
        append_format(
            append_format(&mut out, b"%d", &[FormatArg::Int(1)]),
            b"+%d",
            &[FormatArg::Int(2)],
        );
        assert_eq!(out, b"1+2");
    }

    #[test]
    fn format_is_idempotent() {
        let args = [FormatArg::Int(7), FormatArg::Float(1.5)];
        let a = format(b"%d %.1f", &args);
        let b = format(b"%d %.1f", &args);
        assert_eq!(a, b);
        assert_eq!(a, b"7 1.5");
    }

    #[test]
    fn try_format_surfaces_the_error() {
        let err = try_format::<u8>(b"%d", &[]).unwrap_err();
        assert_eq!(err, FormatError::MissingArgument { index: 0 });
    }

    #[test]
    fn try_format_matches_format_on_success() {
        let args = [FormatArg::Int(42)];
        assert_eq!(try_format(b"n=%d", &args).unwrap(), format(b"n=%d", &args));
    }
}
