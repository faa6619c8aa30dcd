//! UTF-8 locale context.
//!
//! The UTF-8 unit path resolves a [`Utf8Locale`] immediately before each
//! measure/write primitive call and drops it at scope exit, including on the
//! failure path. The context is never cached across calls. It carries the
//! LC_CTYPE-style knowledge the renderer needs: code-unit boundary detection
//! and scalar encoding.

use crate::unit::Utf8Unit;

/// Transient, call-scoped handle for UTF-8 character-unit semantics.
pub struct Utf8Locale {
    _private: (),
}

impl Utf8Locale {
    /// Resolves a UTF-8 locale context for the duration of one primitive call.
    pub(crate) fn acquire() -> Self {
        Utf8Locale { _private: () }
    }

    /// Returns `true` if `unit` is a UTF-8 continuation byte (`10xxxxxx`).
    fn is_continuation(unit: u8) -> bool {
        unit & 0xC0 == 0x80
    }

    /// Largest prefix length of `s` that fits in `max_units` units without
    /// splitting a multi-unit sequence.
    pub(crate) fn clip(&self, s: &[Utf8Unit], max_units: usize) -> usize {
        let mut cut = s.len().min(max_units);
        while cut > 0 && cut < s.len() && Self::is_continuation(s[cut].0) {
            cut -= 1;
        }
        cut
    }

    /// Encodes `c` as 1-4 UTF-8 code units onto `out`.
    pub(crate) fn encode(&self, c: char, out: &mut Vec<Utf8Unit>) {
        let mut buf = [0u8; 4];
        out.extend(c.encode_utf8(&mut buf).bytes().map(Utf8Unit));
    }
}
